//! Court time slots and the overlap predicate.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A reservation window on a single court day.
///
/// Built from a start time plus a whole-hour duration, so the invariant
/// `end_time == start_time + duration_hours` holds by construction.
/// Windows that would cross midnight are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TimeSlot {
    /// Calendar date of the reservation.
    #[schema(value_type = String, example = "2026-09-01")]
    pub date: NaiveDate,
    /// Start of the window.
    #[schema(value_type = String, example = "18:00")]
    pub start_time: NaiveTime,
    /// End of the window (exclusive).
    #[schema(value_type = String, example = "20:00")]
    pub end_time: NaiveTime,
}

impl TimeSlot {
    /// Builds a slot from a start time and a whole-hour duration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the duration is zero,
    /// unreasonably long, or the window would cross midnight.
    pub fn from_duration(
        date: NaiveDate,
        start_time: NaiveTime,
        duration_hours: u32,
    ) -> Result<Self, GatewayError> {
        if duration_hours == 0 {
            return Err(GatewayError::InvalidRequest(
                "duration must be at least one hour".to_string(),
            ));
        }
        if duration_hours > 12 {
            return Err(GatewayError::InvalidRequest(format!(
                "duration of {duration_hours}h exceeds the 12h maximum"
            )));
        }

        let seconds = u64::from(duration_hours) * 3600;
        let (end_time, wrapped) =
            start_time.overflowing_add_signed(chrono::Duration::seconds(seconds as i64));
        if wrapped != 0 || end_time <= start_time {
            return Err(GatewayError::InvalidRequest(
                "slot must not cross midnight".to_string(),
            ));
        }

        Ok(Self {
            date,
            start_time,
            end_time,
        })
    }

    /// Returns the slot duration in whole hours.
    #[must_use]
    pub fn duration_hours(&self) -> u32 {
        let secs = (self.end_time - self.start_time).num_seconds().max(0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hours = (secs / 3600) as u32;
        hours
    }

    /// Returns `true` if two slots on the same court conflict.
    ///
    /// Slots conflict iff they share a date and their half-open time
    /// ranges intersect: `a.start < b.end && a.end > b.start`. Back-to-back
    /// slots (one ending exactly when the other starts) do not conflict.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date
            && self.start_time < other.end_time
            && self.end_time > other.start_time
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}–{}",
            self.date,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn slot(start: (u32, u32), duration: u32) -> TimeSlot {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 9, 1) else {
            panic!("valid date");
        };
        let Some(start_time) = NaiveTime::from_hms_opt(start.0, start.1, 0) else {
            panic!("valid time");
        };
        let Ok(slot) = TimeSlot::from_duration(date, start_time, duration) else {
            panic!("valid slot");
        };
        slot
    }

    #[test]
    fn end_time_is_start_plus_duration() {
        let s = slot((18, 0), 2);
        assert_eq!(s.end_time, NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default());
        assert_eq!(s.duration_hours(), 2);
    }

    #[test]
    fn minutes_are_preserved() {
        let s = slot((18, 30), 1);
        assert_eq!(s.end_time, NaiveTime::from_hms_opt(19, 30, 0).unwrap_or_default());
    }

    #[test]
    fn zero_duration_rejected() {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 9, 1) else {
            panic!("valid date");
        };
        let Some(start) = NaiveTime::from_hms_opt(18, 0, 0) else {
            panic!("valid time");
        };
        assert!(TimeSlot::from_duration(date, start, 0).is_err());
    }

    #[test]
    fn crossing_midnight_rejected() {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 9, 1) else {
            panic!("valid date");
        };
        let Some(start) = NaiveTime::from_hms_opt(23, 0, 0) else {
            panic!("valid time");
        };
        assert!(TimeSlot::from_duration(date, start, 2).is_err());
    }

    #[test]
    fn overlapping_slots_conflict() {
        let a = slot((18, 0), 2);
        let b = slot((19, 0), 2);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn contained_slot_conflicts() {
        let a = slot((18, 0), 4);
        let b = slot((19, 0), 1);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn back_to_back_slots_do_not_conflict() {
        let a = slot((18, 0), 2);
        let b = slot((20, 0), 2);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn different_dates_never_conflict() {
        let a = slot((18, 0), 2);
        let mut b = slot((18, 0), 2);
        b.date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap_or_default();
        assert!(!a.overlaps(&b));
    }
}

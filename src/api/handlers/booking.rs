//! Booking management handlers: get, list, cancel.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BookingDto, BookingListParams, BookingListResponse, CancelBookingRequest, PaginationMeta,
    PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::BookingId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /bookings/:id` — Get a booking by ID.
///
/// # Errors
///
/// Returns [`GatewayError`] when the booking does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Get a booking",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "The booking", body = BookingDto),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let booking = state.store.get(BookingId::from_uuid(id)).await?;
    Ok(Json(BookingDto::from(booking)))
}

/// `GET /bookings` — List a customer's bookings, most recent slot first.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "List bookings for a customer",
    params(BookingListParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated booking list", body = BookingListResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingListParams>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let params = params.clamped();
    let bookings = state.store.list_for_customer(&filter.customer_email).await?;

    #[allow(clippy::cast_possible_truncation)]
    let total = bookings.len() as u32;
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(params.per_page)
    };
    let start = page_offset(params.page, params.per_page);
    let data: Vec<BookingDto> = bookings
        .into_iter()
        .skip(start)
        .take(params.per_page as usize)
        .map(BookingDto::from)
        .collect();

    Ok(Json(BookingListResponse {
        data,
        pagination: PaginationMeta {
            page: params.page,
            per_page: params.per_page,
            total,
            total_pages,
        },
    }))
}

/// `POST /bookings/:id/cancel` — Cancel a pending booking.
///
/// # Errors
///
/// Returns [`GatewayError`] when the booking does not exist or is not
/// pending; confirmed bookings are released through the refund path.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    summary = "Cancel a pending booking",
    params(
        ("id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "The cancelled booking", body = BookingDto),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Booking is not pending", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let booking = state
        .checkout
        .cancel_booking(BookingId::from_uuid(id), req.reason)
        .await?;
    Ok(Json(BookingDto::from(booking)))
}

/// First item index for a 1-indexed page, widened so extreme query
/// values cannot overflow under `overflow-checks`.
fn page_offset(page: u32, per_page: u32) -> usize {
    usize::try_from(u64::from(page.saturating_sub(1)) * u64::from(per_page)).unwrap_or(usize::MAX)
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }

    #[test]
    fn page_offset_survives_maximum_page() {
        // u32 arithmetic would overflow here; the offset must not panic.
        let start = page_offset(u32::MAX, 100);
        assert_eq!(start as u64, u64::from(u32::MAX - 1) * 100);
    }
}

//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching subscribe/unsubscribe commands and forwarding filtered
//! booking events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{BookingEvent, BookingId};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<BookingEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(booking_event) => {
                        if subs.matches(booking_event.booking_id()) {
                            let msg = WsMessage {
                                id: uuid::Uuid::new_v4().to_string(),
                                msg_type: WsMessageType::Event,
                                timestamp: chrono::Utc::now(),
                                payload: serde_json::to_value(&booking_event).unwrap_or_default(),
                            };
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage {
            id: String::new(),
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 400,
                "message": "malformed JSON"
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload.clone()) else {
        let err = WsMessage {
            id: msg.id,
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 404,
                "message": "unknown command"
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    let response = match command {
        WsCommand::Subscribe { booking_ids } => {
            let (ids, wildcard) = parse_booking_ids(&booking_ids);
            subs.subscribe(&ids, wildcard);
            WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "subscribed": ids.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            }
        }
        WsCommand::Unsubscribe { booking_ids } => {
            let (ids, _) = parse_booking_ids(&booking_ids);
            subs.unsubscribe(&ids);
            WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "unsubscribed": ids.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                }),
            }
        }
    };
    serde_json::to_string(&response).ok()
}

/// Parses booking IDs from a command, treating `"*"` as the
/// subscribe-to-all wildcard. Unparseable IDs are ignored.
fn parse_booking_ids(raw: &[String]) -> (Vec<BookingId>, bool) {
    let mut ids = Vec::new();
    let mut wildcard = false;
    for s in raw {
        if s == "*" {
            wildcard = true;
        } else if let Ok(uuid) = s.parse::<uuid::Uuid>() {
            ids.push(BookingId::from_uuid(uuid));
        }
    }
    (ids, wildcard)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn envelope(payload: serde_json::Value) -> String {
        serde_json::to_string(&WsMessage {
            id: "req-1".to_string(),
            msg_type: WsMessageType::Command,
            timestamp: chrono::Utc::now(),
            payload,
        })
        .unwrap_or_default()
    }

    #[test]
    fn subscribe_command_updates_filter() {
        let mut subs = SubscriptionManager::new();
        let id = BookingId::new();
        let text = envelope(serde_json::json!({
            "command": "subscribe",
            "booking_ids": [id.to_string()],
        }));

        let response = handle_text_message(&text, &mut subs);
        assert!(response.is_some());
        assert!(subs.matches(id));
    }

    #[test]
    fn wildcard_subscribe() {
        let mut subs = SubscriptionManager::new();
        let text = envelope(serde_json::json!({
            "command": "subscribe",
            "booking_ids": ["*"],
        }));

        handle_text_message(&text, &mut subs);
        assert!(subs.is_subscribed_all());
    }

    #[test]
    fn unsubscribe_command_removes_ids() {
        let mut subs = SubscriptionManager::new();
        let id = BookingId::new();
        handle_text_message(
            &envelope(serde_json::json!({
                "command": "subscribe",
                "booking_ids": [id.to_string()],
            })),
            &mut subs,
        );
        assert!(subs.matches(id));

        handle_text_message(
            &envelope(serde_json::json!({
                "command": "unsubscribe",
                "booking_ids": [id.to_string()],
            })),
            &mut subs,
        );
        assert!(!subs.matches(id));
    }

    #[test]
    fn malformed_json_yields_error_message() {
        let mut subs = SubscriptionManager::new();
        let Some(response) = handle_text_message("not json", &mut subs) else {
            panic!("error response expected");
        };
        assert!(response.contains("malformed JSON"));
    }

    #[test]
    fn unknown_command_yields_error_message() {
        let mut subs = SubscriptionManager::new();
        let text = envelope(serde_json::json!({ "command": "reboot" }));
        let Some(response) = handle_text_message(&text, &mut subs) else {
            panic!("error response expected");
        };
        assert!(response.contains("unknown command"));
    }
}

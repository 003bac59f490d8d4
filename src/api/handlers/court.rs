//! Court catalog handlers: create, list, get.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CourtDto, CreateCourtRequest};
use crate::app_state::AppState;
use crate::domain::Court;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /courts` — Register or replace a court.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid price or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/courts",
    tag = "Courts",
    summary = "Register a court",
    request_body = CreateCourtRequest,
    responses(
        (status = 201, description = "Court registered", body = CourtDto),
        (status = 400, description = "Invalid court data", body = ErrorResponse),
    )
)]
pub async fn create_court(
    State(state): State<AppState>,
    Json(req): Json<CreateCourtRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    if req.price_per_hour <= rust_decimal::Decimal::ZERO {
        return Err(GatewayError::InvalidRequest(
            "price per hour must be positive".to_string(),
        ));
    }
    let court = Court {
        id: req.id.unwrap_or_else(uuid::Uuid::new_v4),
        name: req.name,
        price_per_hour: req.price_per_hour,
    };
    state.store.upsert_court(court.clone()).await?;
    Ok((StatusCode::CREATED, Json(CourtDto::from(court))))
}

/// `GET /courts` — List all courts.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/courts",
    tag = "Courts",
    summary = "List courts",
    responses(
        (status = 200, description = "Court catalog", body = Vec<CourtDto>),
    )
)]
pub async fn list_courts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let courts = state.store.list_courts().await?;
    let dtos: Vec<CourtDto> = courts.into_iter().map(CourtDto::from).collect();
    Ok(Json(dtos))
}

/// `GET /courts/:id` — Get a court by ID.
///
/// # Errors
///
/// Returns [`GatewayError`] when the court does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/courts/{id}",
    tag = "Courts",
    summary = "Get a court",
    params(
        ("id" = uuid::Uuid, Path, description = "Court UUID"),
    ),
    responses(
        (status = 200, description = "The court", body = CourtDto),
        (status = 404, description = "Court not found", body = ErrorResponse),
    )
)]
pub async fn get_court(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let court = state.store.get_court(id).await?;
    Ok(Json(CourtDto::from(court)))
}

/// Court routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courts", post(create_court).get(list_courts))
        .route("/courts/{id}", get(get_court))
}

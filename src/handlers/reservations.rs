// src/handlers/reservations.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::reservation::{QuoteResponse, ReleaseResponse, Reservation, ReservationHistoryEntry},
};

// ---
// Payload: BookReservation
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookReservationPayload {
    pub lot_id: Uuid,

    #[validate(length(max = 20, message = "A placa deve ter no máximo 20 caracteres."))]
    pub vehicle_number: Option<String>,
}

// ---
// Handler: book
// Escolhe uma vaga livre do lote e cria a reserva, atomicamente.
// ---
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = BookReservationPayload,
    responses(
        (status = 201, description = "Reserva criada, vaga ocupada", body = Reservation),
        (status = 404, description = "Lote não encontrado"),
        (status = 409, description = "Nenhuma vaga disponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn book(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<BookReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let reservation = app_state
        .reservation_service
        .book(user.id, payload.lot_id, payload.vehicle_number.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// ---
// Handler: release
// Encerra a reserva, libera a vaga e devolve o custo calculado.
// ---
#[utoipa::path(
    post,
    path = "/api/reservations/{reservation_id}/release",
    tag = "Reservations",
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva")
    ),
    responses(
        (status = 200, description = "Reserva encerrada", body = ReleaseResponse),
        (status = 403, description = "Reserva de outro usuário"),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Reserva já encerrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn release(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state
        .reservation_service
        .release(&user, reservation_id)
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub as_of: Option<chrono::DateTime<chrono::Utc>>,
}

// ---
// Handler: quote
// Prévia do custo ("quanto estou devendo até agora?"). Nada é persistido.
// ---
#[utoipa::path(
    get,
    path = "/api/reservations/{reservation_id}/quote",
    tag = "Reservations",
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("asOf" = Option<String>, Query, description = "Instante de referência (RFC 3339); padrão: agora")
    ),
    responses(
        (status = 200, description = "Custo da reserva no instante pedido", body = QuoteResponse),
        (status = 403, description = "Reserva de outro usuário"),
        (status = 404, description = "Reserva não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(reservation_id): Path<Uuid>,
    Query(query): Query<QuoteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state
        .reservation_service
        .quote(&user, reservation_id, query.as_of)
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

// ---
// Handler: my_reservations
// Histórico do usuário autenticado, mais recente primeiro.
// ---
#[utoipa::path(
    get,
    path = "/api/users/me/reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "Histórico de reservas", body = Vec<ReservationHistoryEntry>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn my_reservations(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let reservations = app_state.reservation_service.list_for_user(user.id).await?;
    Ok((StatusCode::OK, Json(reservations)))
}

// ---
// Handler: receipt (PDF)
// ---
pub async fn receipt(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(reservation_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let pdf_bytes = app_state
        .receipt_service
        .generate_receipt_pdf(&user, reservation_id)
        .await?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"comprovante_{}.pdf\"", reservation_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}

// src/handlers/spots.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::admin::RequireAdmin,
    models::parking::SpotDetail,
};

// ---
// Handler: get_spot (admin)
// Detalhe de uma vaga; se ocupada, mostra a reserva ativa e o custo até agora.
// ---
#[utoipa::path(
    get,
    path = "/api/spots/{spot_id}",
    tag = "Spots",
    params(
        ("spot_id" = Uuid, Path, description = "ID da vaga")
    ),
    responses(
        (status = 200, description = "Detalhe da vaga", body = SpotDetail),
        (status = 404, description = "Vaga não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_spot(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(spot_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.lot_service.get_spot(spot_id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// ---
// Handler: delete_spot (admin)
// Remove uma vaga avulsa e decrementa a capacidade declarada do lote.
// Vaga ocupada não é removida.
// ---
#[utoipa::path(
    delete,
    path = "/api/spots/{spot_id}",
    tag = "Spots",
    params(
        ("spot_id" = Uuid, Path, description = "ID da vaga")
    ),
    responses(
        (status = 204, description = "Vaga removida"),
        (status = 404, description = "Vaga não encontrada"),
        (status = 409, description = "Vaga ocupada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_spot(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(spot_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lot_service.delete_spot(spot_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

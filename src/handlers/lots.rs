// src/handlers/lots.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{admin::RequireAdmin, auth::AuthenticatedUser},
    models::parking::{LotDetail, LotWithAvailability},
};

// ---
// Validação customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateLot
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLotPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city: String,

    #[validate(length(min = 4, max = 10, message = "O CEP deve ter entre 4 e 10 caracteres."))]
    pub pin_code: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price_per_hour: Decimal,

    #[validate(range(min = 1, message = "A capacidade deve ser de pelo menos 1 vaga."))]
    pub max_number_of_spots: i32,
}

// ---
// Payload: UpdateLot (campos + redimensionamento)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLotPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city: String,

    #[validate(length(min = 4, max = 10, message = "O CEP deve ter entre 4 e 10 caracteres."))]
    pub pin_code: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price_per_hour: Decimal,

    #[validate(range(min = 1, message = "A capacidade deve ser de pelo menos 1 vaga."))]
    pub max_number_of_spots: i32,
}

#[derive(Debug, Deserialize)]
pub struct ListLotsQuery {
    pub city: Option<String>,
}

// ---
// Handler: list_lots (qualquer usuário autenticado)
// ---
#[utoipa::path(
    get,
    path = "/api/lots",
    tag = "Lots",
    params(
        ("city" = Option<String>, Query, description = "Filtra os lotes pela cidade")
    ),
    responses(
        (status = 200, description = "Lotes com a contagem de vagas livres", body = Vec<LotWithAvailability>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_lots(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListLotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lots = app_state
        .lot_service
        .list_lots(query.city.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(lots)))
}

// ---
// Handler: create_lot (admin)
// ---
#[utoipa::path(
    post,
    path = "/api/lots",
    tag = "Lots",
    request_body = CreateLotPayload,
    responses(
        (status = 201, description = "Lote criado com o conjunto inicial de vagas", body = LotDetail),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Apenas o administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lot(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CreateLotPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state
        .lot_service
        .create_lot(
            &payload.name,
            &payload.address,
            &payload.city,
            &payload.pin_code,
            payload.price_per_hour,
            payload.max_number_of_spots,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// ---
// Handler: get_lot (admin)
// ---
#[utoipa::path(
    get,
    path = "/api/lots/{lot_id}",
    tag = "Lots",
    params(
        ("lot_id" = Uuid, Path, description = "ID do lote")
    ),
    responses(
        (status = 200, description = "Detalhe do lote com vagas e ocupação", body = LotDetail),
        (status = 404, description = "Lote não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lot(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(lot_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.lot_service.get_lot(lot_id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// ---
// Handler: update_lot (admin)
// ---
#[utoipa::path(
    put,
    path = "/api/lots/{lot_id}",
    tag = "Lots",
    params(
        ("lot_id" = Uuid, Path, description = "ID do lote")
    ),
    request_body = UpdateLotPayload,
    responses(
        (status = 200, description = "Lote atualizado (capacidade reconciliada)", body = LotDetail),
        (status = 404, description = "Lote não encontrado"),
        (status = 409, description = "Redução bloqueada por vagas ocupadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lot(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(lot_id): Path<Uuid>,
    Json(payload): Json<UpdateLotPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state
        .lot_service
        .update_lot(
            lot_id,
            &payload.name,
            &payload.address,
            &payload.city,
            &payload.pin_code,
            payload.price_per_hour,
            payload.max_number_of_spots,
        )
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// ---
// Handler: delete_lot (admin)
// ---
#[utoipa::path(
    delete,
    path = "/api/lots/{lot_id}",
    tag = "Lots",
    params(
        ("lot_id" = Uuid, Path, description = "ID do lote")
    ),
    responses(
        (status = 204, description = "Lote removido"),
        (status = 404, description = "Lote não encontrado"),
        (status = 409, description = "Remoção bloqueada por vagas ocupadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lot(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(lot_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lot_service.delete_lot(lot_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

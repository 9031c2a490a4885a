// src/models/reservation.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// A reserva referencia exatamente um usuário e exatamente uma vaga.
// `cost_per_hour` é o preço do lote congelado no momento da reserva.
// Ciclo de vida: Ativa (leaving_time = NULL) -> Encerrada (leaving_time
// preenchido, uma única vez). Estado terminal; não há reabertura.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub spot_id: Uuid,
    pub vehicle_number: Option<String>,
    pub parking_time: DateTime<Utc>,
    pub leaving_time: Option<DateTime<Utc>>,
    pub cost_per_hour: Decimal,
    // Gravado na liberação para auditoria; sempre recomputável dos timestamps.
    pub total_cost: Option<Decimal>,
}

impl Reservation {
    pub fn is_released(&self) -> bool {
        self.leaving_time.is_some()
    }
}

// Entrada do histórico do usuário, com os nomes do lote e da vaga
// (sobrevivem ao soft delete da vaga).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationHistoryEntry {
    pub id: Uuid,
    pub spot_name: String,
    pub lot_name: String,
    pub lot_address: String,
    pub lot_city: String,
    pub vehicle_number: Option<String>,
    pub parking_time: DateTime<Utc>,
    pub leaving_time: Option<DateTime<Utc>>,
    pub cost_per_hour: Decimal,
    pub total_cost: Option<Decimal>,
}

// Resposta da liberação: a reserva encerrada e o custo calculado.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResponse {
    pub reservation: Reservation,
    pub total_cost: Decimal,
}

// Prévia do custo de uma reserva em um instante (nada é persistido).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub reservation_id: Uuid,
    pub parking_time: DateTime<Utc>,
    pub as_of: DateTime<Utc>,
    pub cost_per_hour: Decimal,
    pub current_cost: Decimal,
}

// Dados completos para o comprovante em PDF (join reserva + vaga + lote + usuário).
#[derive(Debug, Clone, FromRow)]
pub struct ReceiptData {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub user_full_name: String,
    pub user_email: String,
    pub lot_name: String,
    pub lot_address: String,
    pub lot_city: String,
    pub spot_name: String,
    pub vehicle_number: Option<String>,
    pub parking_time: DateTime<Utc>,
    pub leaving_time: Option<DateTime<Utc>>,
    pub cost_per_hour: Decimal,
    pub total_cost: Option<Decimal>,
}

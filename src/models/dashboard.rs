// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Ocupação de um lote: ocupadas + livres == capacidade declarada.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotOccupancyEntry {
    pub lot_id: Uuid,
    pub lot_name: String,
    pub lot_city: String,
    pub capacity: i32,
    pub occupied_spots: i64,
    pub available_spots: i64,
}

// Receita consolidada por lote (soma dos custos das reservas encerradas).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotRevenueEntry {
    pub lot_id: Uuid,
    pub lot_name: String,
    pub closed_reservations: i64,
    pub revenue: Decimal,
}

// Resumo administrativo. Apenas os NÚMEROS: a renderização de gráficos
// fica na camada de apresentação, fora deste serviço.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_lots: i64,
    pub total_spots: i64,
    pub occupied_spots: i64,
    pub active_reservations: i64,
    pub total_revenue: Decimal,
    pub occupancy: Vec<LotOccupancyEntry>,
    pub revenue: Vec<LotRevenueEntry>,
}

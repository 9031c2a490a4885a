// src/models/parking.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Status da vaga ---
// Uma vaga só tem dois estados; a transição é feita junto com a criação
// ou encerramento de uma reserva, nunca isoladamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "spot_status", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum SpotStatus {
    Available,
    Occupied,
}

// --- 2. Estacionamento (lote) ---
// Invariante: o número de vagas vivas do lote é sempre igual a
// `max_number_of_spots` ao fim de qualquer operação de escrita.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLot {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub pin_code: String,
    pub price_per_hour: Decimal,
    pub max_number_of_spots: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 3. Vaga ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub spot_name: String,
    pub spot_number: i32,
    pub status: SpotStatus,
    pub created_at: DateTime<Utc>,
}

// --- 4. DTOs de leitura ---

// Lote com a contagem de vagas livres, para a listagem do usuário.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotWithAvailability {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub pin_code: String,
    pub price_per_hour: Decimal,
    pub max_number_of_spots: i32,
    pub available_spots: i64,
}

// Visão administrativa de um lote: as vagas vivas e a ocupação atual.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotDetail {
    pub lot: ParkingLot,
    pub spots: Vec<ParkingSpot>,
    pub occupied_spots: i64,
}

// Linha da consulta "quem está nesta vaga?" (join reserva + usuário).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveReservationRow {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub user_full_name: String,
    pub user_email: String,
    pub vehicle_number: Option<String>,
    pub parking_time: DateTime<Utc>,
    pub cost_per_hour: Decimal,
}

// Detalhe de uma vaga: se ocupada, inclui a reserva ativa e o custo até agora.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpotDetail {
    pub spot: ParkingSpot,
    pub active_reservation: Option<ActiveReservationRow>,
    pub current_cost: Option<Decimal>,
}

// src/db/reservation_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        parking::{ActiveReservationRow, ParkingSpot},
        reservation::{ReceiptData, Reservation, ReservationHistoryEntry},
    },
};

// Repositório de reservas. Também é dono das duas transições de status
// da vaga, porque elas só acontecem junto com a criação/encerramento de
// uma reserva.
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Reivindica UMA vaga livre do lote e já a marca como ocupada, em um
    // único comando condicional. Duas reservas simultâneas nunca levam a
    // mesma vaga: a linha é travada no subselect e o SKIP LOCKED faz o
    // concorrente pular para a próxima vaga livre em vez de esperar.
    // Em repouso a escolha é determinística: menor número primeiro.
    pub async fn claim_available_spot<'e, E>(
        &self,
        executor: E,
        lot_id: Uuid,
    ) -> Result<Option<ParkingSpot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            r#"
            UPDATE parking_spots SET status = 'OCCUPIED'
            WHERE id = (
                SELECT id FROM parking_spots
                WHERE lot_id = $1 AND status = 'AVAILABLE' AND deleted_at IS NULL
                ORDER BY spot_number ASC
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(lot_id)
        .fetch_optional(executor)
        .await?;
        Ok(spot)
    }

    pub async fn insert_reservation<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        spot_id: Uuid,
        vehicle_number: Option<&str>,
        cost_per_hour: Decimal,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, spot_id, vehicle_number, cost_per_hour)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(spot_id)
        .bind(vehicle_number)
        .bind(cost_per_hour)
        .fetch_one(executor)
        .await?;
        Ok(reservation)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(reservation)
    }

    // Encerra a reserva, condicionado a ela ainda estar ativa. Zero linhas
    // afetadas significa que alguém encerrou antes: o chamador decide o erro.
    pub async fn close_reservation<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        leaving_time: DateTime<Utc>,
        total_cost: Decimal,
    ) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET leaving_time = $2, total_cost = $3
            WHERE id = $1 AND leaving_time IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(leaving_time)
        .bind(total_cost)
        .fetch_optional(executor)
        .await?;
        Ok(reservation)
    }

    pub async fn free_spot<'e, E>(&self, executor: E, spot_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE parking_spots SET status = 'AVAILABLE' WHERE id = $1")
            .bind(spot_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Histórico do usuário, mais recente primeiro (a mesma ordenação do
    // painel original). O join não filtra soft delete: o histórico de uma
    // vaga removida continua aparecendo.
    pub async fn list_by_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<ReservationHistoryEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, ReservationHistoryEntry>(
            r#"
            SELECT
                r.id, s.spot_name, l.name AS lot_name, l.address AS lot_address,
                l.city AS lot_city, r.vehicle_number, r.parking_time,
                r.leaving_time, r.cost_per_hour, r.total_cost
            FROM reservations r
            JOIN parking_spots s ON s.id = r.spot_id
            JOIN parking_lots l ON l.id = s.lot_id
            WHERE r.user_id = $1
            ORDER BY r.parking_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    // "Quem está nesta vaga?": a reserva ativa com os dados do usuário.
    pub async fn find_active_by_spot<'e, E>(
        &self,
        executor: E,
        spot_id: Uuid,
    ) -> Result<Option<ActiveReservationRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ActiveReservationRow>(
            r#"
            SELECT
                r.id AS reservation_id, r.user_id, u.full_name AS user_full_name,
                u.email AS user_email, r.vehicle_number, r.parking_time, r.cost_per_hour
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            WHERE r.spot_id = $1 AND r.leaving_time IS NULL
            "#,
        )
        .bind(spot_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    // Dados consolidados para o comprovante em PDF.
    pub async fn find_receipt_data<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
    ) -> Result<Option<ReceiptData>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, ReceiptData>(
            r#"
            SELECT
                r.id AS reservation_id, r.user_id, u.full_name AS user_full_name, u.email AS user_email,
                l.name AS lot_name, l.address AS lot_address, l.city AS lot_city,
                s.spot_name, r.vehicle_number, r.parking_time, r.leaving_time,
                r.cost_per_hour, r.total_cost
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            JOIN parking_spots s ON s.id = r.spot_id
            JOIN parking_lots l ON l.id = s.lot_id
            WHERE r.id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(executor)
        .await?;
        Ok(data)
    }
}

// src/db/lot_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::parking::{LotWithAvailability, ParkingLot, ParkingSpot},
};

// Repositório do Registro de Lotes: lotes e suas vagas.
// Escritas aceitam um executor genérico para rodar dentro da transação
// que o service abriu; o service é quem faz begin/commit.
#[derive(Clone)]
pub struct LotRepository {
    pool: PgPool,
}

impl LotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ParkingLot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lot = sqlx::query_as::<_, ParkingLot>(
            "SELECT * FROM parking_lots WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(lot)
    }

    // Mesma busca, mas travando a linha do lote. Toda mutação do registro
    // (resize, delete, delete de vaga) passa por aqui primeiro, para que a
    // contagem de ocupação lida em seguida não mude embaixo dos nossos pés.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ParkingLot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lot = sqlx::query_as::<_, ParkingLot>(
            "SELECT * FROM parking_lots WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(lot)
    }

    // Trava compartilhada na linha do lote, usada pelo booking: várias
    // reservas podem entrar juntas, mas nenhuma entra enquanto um
    // resize/delete (que trava com FOR UPDATE) estiver no meio do caminho.
    pub async fn find_by_id_for_share<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ParkingLot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lot = sqlx::query_as::<_, ParkingLot>(
            "SELECT * FROM parking_lots WHERE id = $1 AND deleted_at IS NULL FOR SHARE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(lot)
    }

    // Listagem com contagem de vagas livres, opcionalmente filtrada por cidade.
    pub async fn list_with_availability<'e, E>(
        &self,
        executor: E,
        city: Option<&str>,
    ) -> Result<Vec<LotWithAvailability>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lots = sqlx::query_as::<_, LotWithAvailability>(
            r#"
            SELECT
                l.id, l.name, l.address, l.city, l.pin_code,
                l.price_per_hour, l.max_number_of_spots,
                COUNT(s.id) FILTER (WHERE s.status = 'AVAILABLE') AS available_spots
            FROM parking_lots l
            LEFT JOIN parking_spots s ON s.lot_id = l.id AND s.deleted_at IS NULL
            WHERE l.deleted_at IS NULL
              AND ($1::varchar IS NULL OR l.city = $1)
            GROUP BY l.id
            ORDER BY l.name ASC
            "#,
        )
        .bind(city)
        .fetch_all(executor)
        .await?;
        Ok(lots)
    }

    pub async fn list_spots<'e, E>(&self, executor: E, lot_id: Uuid) -> Result<Vec<ParkingSpot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let spots = sqlx::query_as::<_, ParkingSpot>(
            r#"
            SELECT * FROM parking_spots
            WHERE lot_id = $1 AND deleted_at IS NULL
            ORDER BY spot_number ASC
            "#,
        )
        .bind(lot_id)
        .fetch_all(executor)
        .await?;
        Ok(spots)
    }

    pub async fn count_occupied<'e, E>(&self, executor: E, lot_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM parking_spots
            WHERE lot_id = $1 AND status = 'OCCUPIED' AND deleted_at IS NULL
            "#,
        )
        .bind(lot_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    // Maior número de vaga viva do lote. O crescimento continua a numeração
    // a partir daqui (igual à capacidade antiga no caso contíguo normal).
    pub async fn max_spot_number<'e, E>(&self, executor: E, lot_id: Uuid) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let max = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT COALESCE(MAX(spot_number), 0) FROM parking_spots
            WHERE lot_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(lot_id)
        .fetch_one(executor)
        .await?;
        Ok(max)
    }

    pub async fn find_spot_by_id<'e, E>(
        &self,
        executor: E,
        spot_id: Uuid,
    ) -> Result<Option<ParkingSpot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            "SELECT * FROM parking_spots WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(spot_id)
        .fetch_optional(executor)
        .await?;
        Ok(spot)
    }

    // Versão com trava de linha, para serializar contra o claim da reserva.
    pub async fn find_spot_by_id_for_update<'e, E>(
        &self,
        executor: E,
        spot_id: Uuid,
    ) -> Result<Option<ParkingSpot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            "SELECT * FROM parking_spots WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(spot_id)
        .fetch_optional(executor)
        .await?;
        Ok(spot)
    }

    // ---
    // Escritas (transacionais)
    // ---

    pub async fn insert_lot<'e, E>(
        &self,
        executor: E,
        name: &str,
        address: &str,
        city: &str,
        pin_code: &str,
        price_per_hour: Decimal,
        max_number_of_spots: i32,
    ) -> Result<ParkingLot, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lot = sqlx::query_as::<_, ParkingLot>(
            r#"
            INSERT INTO parking_lots (name, address, city, pin_code, price_per_hour, max_number_of_spots)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(city)
        .bind(pin_code)
        .bind(price_per_hour)
        .bind(max_number_of_spots)
        .fetch_one(executor)
        .await?;
        Ok(lot)
    }

    pub async fn update_lot<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        address: &str,
        city: &str,
        pin_code: &str,
        price_per_hour: Decimal,
        max_number_of_spots: i32,
    ) -> Result<ParkingLot, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lot = sqlx::query_as::<_, ParkingLot>(
            r#"
            UPDATE parking_lots
            SET name = $2, address = $3, city = $4, pin_code = $5,
                price_per_hour = $6, max_number_of_spots = $7, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(city)
        .bind(pin_code)
        .bind(price_per_hour)
        .bind(max_number_of_spots)
        .fetch_one(executor)
        .await?;
        Ok(lot)
    }

    pub async fn insert_spot<'e, E>(
        &self,
        executor: E,
        lot_id: Uuid,
        spot_name: &str,
        spot_number: i32,
    ) -> Result<ParkingSpot, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            r#"
            INSERT INTO parking_spots (lot_id, spot_name, spot_number)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(lot_id)
        .bind(spot_name)
        .bind(spot_number)
        .fetch_one(executor)
        .await?;
        Ok(spot)
    }

    // Encolhimento: remove (soft) as N vagas de numeração mais alta.
    // Política "remove as mais novas primeiro": as vagas de número baixo,
    // presumivelmente as mais antigas, sobrevivem.
    pub async fn soft_delete_highest_spots<'e, E>(
        &self,
        executor: E,
        lot_id: Uuid,
        how_many: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE parking_spots SET deleted_at = now()
            WHERE id IN (
                SELECT id FROM parking_spots
                WHERE lot_id = $1 AND deleted_at IS NULL
                ORDER BY spot_number DESC
                LIMIT $2
            )
            "#,
        )
        .bind(lot_id)
        .bind(how_many)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn soft_delete_all_spots<'e, E>(&self, executor: E, lot_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE parking_spots SET deleted_at = now() WHERE lot_id = $1 AND deleted_at IS NULL",
        )
        .bind(lot_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn soft_delete_spot<'e, E>(&self, executor: E, spot_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE parking_spots SET deleted_at = now() WHERE id = $1")
            .bind(spot_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn soft_delete_lot<'e, E>(&self, executor: E, lot_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE parking_lots SET deleted_at = now(), updated_at = now() WHERE id = $1")
            .bind(lot_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Usado pelo delete administrativo de uma vaga avulsa: a capacidade
    // declarada acompanha a contagem de vagas vivas.
    pub async fn decrement_capacity<'e, E>(&self, executor: E, lot_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE parking_lots
            SET max_number_of_spots = max_number_of_spots - 1, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(lot_id)
        .execute(executor)
        .await?;
        Ok(())
    }
}

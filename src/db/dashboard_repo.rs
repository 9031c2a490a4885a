// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardSummary, LotOccupancyEntry, LotRevenueEntry},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Resumo administrativo. Roda tudo dentro de uma transação para obter
    // um snapshot consistente dos dados (reservas em andamento não fazem
    // as contagens se contradizerem no meio da leitura).
    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // A. Totais gerais
        let total_lots = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM parking_lots WHERE deleted_at IS NULL",
        )
        .fetch_one(&mut *tx)
        .await?;

        let total_spots = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM parking_spots WHERE deleted_at IS NULL",
        )
        .fetch_one(&mut *tx)
        .await?;

        let occupied_spots = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM parking_spots
            WHERE status = 'OCCUPIED' AND deleted_at IS NULL
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // Invariante derivada: vagas ocupadas == reservas ativas.
        let active_reservations = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE leaving_time IS NULL",
        )
        .fetch_one(&mut *tx)
        .await?;

        let total_revenue = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_cost), 0) FROM reservations
            WHERE leaving_time IS NOT NULL
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // B. Ocupação por lote
        let occupancy = sqlx::query_as::<_, LotOccupancyEntry>(
            r#"
            SELECT
                l.id AS lot_id, l.name AS lot_name, l.city AS lot_city,
                l.max_number_of_spots AS capacity,
                COUNT(s.id) FILTER (WHERE s.status = 'OCCUPIED') AS occupied_spots,
                COUNT(s.id) FILTER (WHERE s.status = 'AVAILABLE') AS available_spots
            FROM parking_lots l
            LEFT JOIN parking_spots s ON s.lot_id = l.id AND s.deleted_at IS NULL
            WHERE l.deleted_at IS NULL
            GROUP BY l.id
            ORDER BY l.name ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        // C. Receita por lote (o join NÃO filtra vagas soft-deletadas:
        // a receita histórica de vagas removidas continua contando).
        let revenue = sqlx::query_as::<_, LotRevenueEntry>(
            r#"
            SELECT
                l.id AS lot_id, l.name AS lot_name,
                COUNT(r.id) AS closed_reservations,
                COALESCE(SUM(r.total_cost), 0) AS revenue
            FROM parking_lots l
            LEFT JOIN parking_spots s ON s.lot_id = l.id
            LEFT JOIN reservations r ON r.spot_id = s.id AND r.leaving_time IS NOT NULL
            WHERE l.deleted_at IS NULL
            GROUP BY l.id
            ORDER BY l.name ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            total_lots,
            total_spots,
            occupied_spots,
            active_reservations,
            total_revenue,
            occupancy,
            revenue,
        })
    }
}

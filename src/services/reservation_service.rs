// src/services/reservation_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LotRepository, ReservationRepository},
    models::{
        auth::User,
        reservation::{QuoteResponse, ReleaseResponse, Reservation, ReservationHistoryEntry},
    },
    services::billing,
};

// O Alocador de Vagas: reservar e liberar. Os dois efeitos de cada
// operação (reserva + status da vaga) acontecem na mesma transação;
// ou ambos entram, ou nenhum.
#[derive(Clone)]
pub struct ReservationService {
    reservation_repo: ReservationRepository,
    lot_repo: LotRepository,
    pool: PgPool,
}

impl ReservationService {
    pub fn new(reservation_repo: ReservationRepository, lot_repo: LotRepository, pool: PgPool) -> Self {
        Self { reservation_repo, lot_repo, pool }
    }

    // --- BOOK ---
    pub async fn book(
        &self,
        user_id: Uuid,
        lot_id: Uuid,
        vehicle_number: Option<&str>,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava compartilhada no lote: reservas simultâneas convivem,
        // mas um resize/delete em andamento nos faz esperar (e vice-versa).
        // O preço é congelado AQUI: mudanças futuras no lote não mexem
        // em reservas abertas nem fechadas.
        let lot = self.lot_repo
            .find_by_id_for_share(&mut *tx, lot_id)
            .await?
            .ok_or(AppError::LotNotFound)?;

        let spot = self.reservation_repo
            .claim_available_spot(&mut *tx, lot_id)
            .await?
            .ok_or(AppError::NoSpotAvailable)?;

        let reservation = self.reservation_repo
            .insert_reservation(&mut *tx, user_id, spot.id, vehicle_number, lot.price_per_hour)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Reserva {} criada: vaga '{}' do lote '{}'.",
            reservation.id,
            spot.spot_name,
            lot.name
        );
        Ok(reservation)
    }

    // --- RELEASE ---
    pub async fn release(&self, user: &User, reservation_id: Uuid) -> Result<ReleaseResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let reservation = self.reservation_repo
            .find_by_id(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if reservation.user_id != user.id && !user.is_admin() {
            return Err(AppError::NotReservationOwner);
        }
        if reservation.is_released() {
            return Err(AppError::ReservationAlreadyReleased);
        }

        let leaving_time = Utc::now();
        let total_cost = billing::quote(reservation.cost_per_hour, reservation.parking_time, leaving_time);

        // Update condicional: se outra requisição encerrou no meio do
        // caminho, zero linhas são afetadas e reportamos o conflito.
        let reservation = self.reservation_repo
            .close_reservation(&mut *tx, reservation_id, leaving_time, total_cost)
            .await?
            .ok_or(AppError::ReservationAlreadyReleased)?;

        self.reservation_repo.free_spot(&mut *tx, reservation.spot_id).await?;

        tx.commit().await?;

        tracing::info!("Reserva {} encerrada, custo {}.", reservation.id, total_cost);
        Ok(ReleaseResponse { reservation, total_cost })
    }

    // --- QUOTE (prévia, nada é persistido) ---
    pub async fn quote(
        &self,
        user: &User,
        reservation_id: Uuid,
        as_of: Option<chrono::DateTime<Utc>>,
    ) -> Result<QuoteResponse, AppError> {
        let reservation = self.reservation_repo
            .find_by_id(&self.pool, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if reservation.user_id != user.id && !user.is_admin() {
            return Err(AppError::NotReservationOwner);
        }

        // Reserva ativa: custo no instante pedido (ou agora). Encerrada:
        // o custo final, recalculado dos timestamps (a fonte da verdade).
        let as_of = reservation
            .leaving_time
            .unwrap_or_else(|| as_of.unwrap_or_else(Utc::now));
        let current_cost = billing::quote(reservation.cost_per_hour, reservation.parking_time, as_of);

        Ok(QuoteResponse {
            reservation_id: reservation.id,
            parking_time: reservation.parking_time,
            as_of,
            cost_per_hour: reservation.cost_per_hour,
            current_cost,
        })
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ReservationHistoryEntry>, AppError> {
        self.reservation_repo.list_by_user(&self.pool, user_id).await
    }
}

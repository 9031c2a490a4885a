// src/services/lot_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LotRepository, ReservationRepository},
    models::parking::{LotDetail, LotWithAvailability, SpotDetail, SpotStatus},
    services::billing,
};

// Gera os pares (número, nome) das vagas de um lote: inicial do nome do
// lote em maiúscula + índice sequencial. "Central" com 3 vagas vira
// C1, C2, C3; um crescimento continua a sequência de onde ela parou.
pub fn spot_names(lot_name: &str, start: i32, end: i32) -> Vec<(i32, String)> {
    let prefix = lot_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .unwrap_or('V');

    (start..=end).map(|i| (i, format!("{prefix}{i}"))).collect()
}

// O Registro de Lotes: criação, redimensionamento e remoção de lotes e
// vagas. Cada operação de escrita é UMA transação que trava a linha do
// lote antes de olhar a ocupação, para que a invariante
// `vagas vivas == capacidade declarada` valha no commit mesmo com
// reservas acontecendo ao mesmo tempo.
#[derive(Clone)]
pub struct LotService {
    lot_repo: LotRepository,
    reservation_repo: ReservationRepository,
    pool: PgPool,
}

impl LotService {
    pub fn new(lot_repo: LotRepository, reservation_repo: ReservationRepository, pool: PgPool) -> Self {
        Self { lot_repo, reservation_repo, pool }
    }

    // --- CREATE LOT ---
    pub async fn create_lot(
        &self,
        name: &str,
        address: &str,
        city: &str,
        pin_code: &str,
        price_per_hour: Decimal,
        max_number_of_spots: i32,
    ) -> Result<LotDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let lot = self.lot_repo
            .insert_lot(&mut *tx, name, address, city, pin_code, price_per_hour, max_number_of_spots)
            .await?;

        // Gera o conjunto inicial de vagas junto com o lote
        let mut spots = Vec::with_capacity(max_number_of_spots as usize);
        for (number, spot_name) in spot_names(&lot.name, 1, max_number_of_spots) {
            let spot = self.lot_repo
                .insert_spot(&mut *tx, lot.id, &spot_name, number)
                .await?;
            spots.push(spot);
        }

        tx.commit().await?;

        tracing::info!("🅿️ Lote '{}' criado com {} vagas.", lot.name, max_number_of_spots);
        Ok(LotDetail { lot, spots, occupied_spots: 0 })
    }

    // --- UPDATE LOT (campos + redimensionamento) ---
    pub async fn update_lot(
        &self,
        lot_id: Uuid,
        name: &str,
        address: &str,
        city: &str,
        pin_code: &str,
        price_per_hour: Decimal,
        max_number_of_spots: i32,
    ) -> Result<LotDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha do lote: nenhum book/release/resize concorrente
        // muda a ocupação entre a contagem e o commit.
        let current = self.lot_repo
            .find_by_id_for_update(&mut *tx, lot_id)
            .await?
            .ok_or(AppError::LotNotFound)?;

        let old_capacity = current.max_number_of_spots;
        let new_capacity = max_number_of_spots;

        // Encolher é proibido com QUALQUER vaga ocupada no lote, mesmo que
        // as vagas a remover estejam livres.
        if new_capacity < old_capacity {
            let occupied = self.lot_repo.count_occupied(&mut *tx, lot_id).await?;
            if occupied > 0 {
                return Err(AppError::CapacityConflict(format!(
                    "Não é possível reduzir as vagas: {} ocupada(s).",
                    occupied
                )));
            }
        }

        let lot = self.lot_repo
            .update_lot(&mut *tx, lot_id, name, address, city, pin_code, price_per_hour, new_capacity)
            .await?;

        if new_capacity > old_capacity {
            // Continua a numeração depois da maior vaga viva (igual a
            // old_capacity + 1 quando a numeração está contígua).
            let start = self.lot_repo.max_spot_number(&mut *tx, lot_id).await? + 1;
            let end = start + (new_capacity - old_capacity) - 1;
            for (number, spot_name) in spot_names(&lot.name, start, end) {
                self.lot_repo
                    .insert_spot(&mut *tx, lot.id, &spot_name, number)
                    .await?;
            }
        } else if new_capacity < old_capacity {
            // Remove as vagas adicionadas por último
            self.lot_repo
                .soft_delete_highest_spots(&mut *tx, lot_id, i64::from(old_capacity - new_capacity))
                .await?;
        }

        let spots = self.lot_repo.list_spots(&mut *tx, lot_id).await?;
        let occupied_spots = self.lot_repo.count_occupied(&mut *tx, lot_id).await?;

        tx.commit().await?;
        Ok(LotDetail { lot, spots, occupied_spots })
    }

    // --- DELETE LOT ---
    pub async fn delete_lot(&self, lot_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let lot = self.lot_repo
            .find_by_id_for_update(&mut *tx, lot_id)
            .await?
            .ok_or(AppError::LotNotFound)?;

        let occupied = self.lot_repo.count_occupied(&mut *tx, lot_id).await?;
        if occupied > 0 {
            return Err(AppError::CapacityConflict(format!(
                "Não é possível excluir o lote: {} vaga(s) ainda ocupada(s).",
                occupied
            )));
        }

        // Soft delete em cascata: as vagas somem da API, o histórico de
        // reservas (inclusive o faturamento) permanece no banco.
        self.lot_repo.soft_delete_all_spots(&mut *tx, lot_id).await?;
        self.lot_repo.soft_delete_lot(&mut *tx, lot_id).await?;

        tx.commit().await?;

        tracing::info!("Lote '{}' removido.", lot.name);
        Ok(())
    }

    // --- DELETE SPOT (vaga avulsa) ---
    pub async fn delete_spot(&self, spot_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Localiza a vaga primeiro para saber o lote; as travas vêm na
        // ordem lote -> vaga, a mesma das outras mutações do registro.
        let spot = self.lot_repo
            .find_spot_by_id(&mut *tx, spot_id)
            .await?
            .ok_or(AppError::SpotNotFound)?;

        self.lot_repo
            .find_by_id_for_update(&mut *tx, spot.lot_id)
            .await?
            .ok_or(AppError::LotNotFound)?;

        // Relê com trava: o claim de uma reserva concorrente já não pode
        // mais mudar o status embaixo de nós.
        let spot = self.lot_repo
            .find_spot_by_id_for_update(&mut *tx, spot_id)
            .await?
            .ok_or(AppError::SpotNotFound)?;

        // Uma vaga ocupada nunca é removida: remover encerraria a reserva
        // ativa sem cobrança.
        if spot.status == SpotStatus::Occupied {
            return Err(AppError::CapacityConflict(
                "A vaga está ocupada; encerre a reserva antes de removê-la.".to_string(),
            ));
        }

        self.lot_repo.soft_delete_spot(&mut *tx, spot_id).await?;
        self.lot_repo.decrement_capacity(&mut *tx, spot.lot_id).await?;

        tx.commit().await?;

        tracing::info!("Vaga '{}' removida do lote {}.", spot.spot_name, spot.lot_id);
        Ok(())
    }

    // ---
    // Leituras
    // ---

    pub async fn list_lots(&self, city: Option<&str>) -> Result<Vec<LotWithAvailability>, AppError> {
        self.lot_repo.list_with_availability(&self.pool, city).await
    }

    pub async fn get_lot(&self, lot_id: Uuid) -> Result<LotDetail, AppError> {
        let lot = self.lot_repo
            .find_by_id(&self.pool, lot_id)
            .await?
            .ok_or(AppError::LotNotFound)?;
        let spots = self.lot_repo.list_spots(&self.pool, lot_id).await?;
        let occupied_spots = self.lot_repo.count_occupied(&self.pool, lot_id).await?;
        Ok(LotDetail { lot, spots, occupied_spots })
    }

    // Detalhe da vaga: se ocupada, inclui quem está nela e o custo até agora.
    pub async fn get_spot(&self, spot_id: Uuid) -> Result<SpotDetail, AppError> {
        let spot = self.lot_repo
            .find_spot_by_id(&self.pool, spot_id)
            .await?
            .ok_or(AppError::SpotNotFound)?;

        let active_reservation = self.reservation_repo
            .find_active_by_spot(&self.pool, spot_id)
            .await?;

        let current_cost = active_reservation
            .as_ref()
            .map(|r| billing::quote(r.cost_per_hour, r.parking_time, Utc::now()));

        Ok(SpotDetail { spot, active_reservation, current_cost })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nomes_usam_a_inicial_do_lote_em_maiuscula() {
        let nomes = spot_names("central", 1, 3);
        assert_eq!(
            nomes,
            vec![
                (1, "C1".to_string()),
                (2, "C2".to_string()),
                (3, "C3".to_string())
            ]
        );
    }

    #[test]
    fn crescimento_continua_a_sequencia() {
        // Lote de 5 vagas crescendo para 8: entram exatamente 6, 7 e 8.
        let novas = spot_names("Shopping", 6, 8);
        assert_eq!(
            novas,
            vec![
                (6, "S6".to_string()),
                (7, "S7".to_string()),
                (8, "S8".to_string())
            ]
        );
    }

    #[test]
    fn intervalo_vazio_nao_gera_vagas() {
        assert!(spot_names("Central", 6, 5).is_empty());
    }

    #[test]
    fn capacidade_um_gera_uma_unica_vaga() {
        assert_eq!(spot_names("Aeroporto", 1, 1), vec![(1, "A1".to_string())]);
    }
}

// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{DashboardRepository, LotRepository, ReservationRepository, UserRepository},
    services::{
        auth::AuthService, dashboard_service::DashboardService, lot_service::LotService,
        receipt_service::ReceiptService, reservation_service::ReservationService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub lot_service: LotService,
    pub reservation_service: ReservationService,
    pub dashboard_service: DashboardService,
    pub receipt_service: ReceiptService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let lot_repo = LotRepository::new(db_pool.clone());
        let reservation_repo = ReservationRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret.clone(), db_pool.clone());
        let lot_service = LotService::new(
            lot_repo.clone(),
            reservation_repo.clone(),
            db_pool.clone(),
        );
        let reservation_service = ReservationService::new(
            reservation_repo.clone(),
            lot_repo,
            db_pool.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo, db_pool.clone());
        let receipt_service = ReceiptService::new(reservation_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            lot_service,
            reservation_service,
            dashboard_service,
            receipt_service,
        })
    }
}

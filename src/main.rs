//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Provisiona o administrador único, com identidade fixa vinda do ambiente
    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@estaciona.com.br".to_string());
    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    app_state
        .auth_service
        .ensure_admin(&admin_email, &admin_password)
        .await
        .expect("Falha ao provisionar o administrador.");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Define as rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/reservations", get(handlers::reservations::my_reservations))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Gestão de lotes: listagem para qualquer usuário autenticado;
    // criação/edição/remoção exigem o RequireAdmin dentro dos handlers.
    let lot_routes = Router::new()
        .route("/"
               ,get(handlers::lots::list_lots)
               .post(handlers::lots::create_lot)
        )
        .route("/{lot_id}"
               ,get(handlers::lots::get_lot)
               .put(handlers::lots::update_lot)
               .delete(handlers::lots::delete_lot)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let spot_routes = Router::new()
        .route("/{spot_id}"
               ,get(handlers::spots::get_spot)
               .delete(handlers::spots::delete_spot)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let reservation_routes = Router::new()
        .route("/", post(handlers::reservations::book))
        .route("/{reservation_id}/release", post(handlers::reservations::release))
        .route("/{reservation_id}/quote", get(handlers::reservations::quote))
        .route("/{reservation_id}/receipt", get(handlers::reservations::receipt))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/lots", lot_routes)
        .nest("/api/spots", spot_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

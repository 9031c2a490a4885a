// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::reservations::my_reservations,

        // --- Lots ---
        handlers::lots::list_lots,
        handlers::lots::create_lot,
        handlers::lots::get_lot,
        handlers::lots::update_lot,
        handlers::lots::delete_lot,

        // --- Spots ---
        handlers::spots::get_spot,
        handlers::spots::delete_spot,

        // --- Reservations ---
        handlers::reservations::book,
        handlers::reservations::release,
        handlers::reservations::quote,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Parking ---
            models::parking::SpotStatus,
            models::parking::ParkingLot,
            models::parking::ParkingSpot,
            models::parking::LotWithAvailability,
            models::parking::LotDetail,
            models::parking::ActiveReservationRow,
            models::parking::SpotDetail,

            // --- Reservations ---
            models::reservation::Reservation,
            models::reservation::ReservationHistoryEntry,
            models::reservation::ReleaseResponse,
            models::reservation::QuoteResponse,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::LotOccupancyEntry,
            models::dashboard::LotRevenueEntry,

            // --- Payloads ---
            handlers::lots::CreateLotPayload,
            handlers::lots::UpdateLotPayload,
            handlers::reservations::BookReservationPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Histórico"),
        (name = "Lots", description = "Gestão de Estacionamentos e Capacidade"),
        (name = "Spots", description = "Vagas Individuais"),
        (name = "Reservations", description = "Reserva e Liberação de Vagas"),
        (name = "Dashboard", description = "Indicadores de Ocupação e Receita")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

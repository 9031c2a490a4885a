pub mod user_repo;
pub use user_repo::UserRepository;
pub mod lot_repo;
pub use lot_repo::LotRepository;
pub mod reservation_repo;
pub use reservation_repo::ReservationRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

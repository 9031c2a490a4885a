pub mod auth;
pub mod billing;
pub mod dashboard_service;
pub mod lot_service;
pub mod receipt_service;
pub mod reservation_service;

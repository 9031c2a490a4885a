pub mod auth;
pub mod dashboard;
pub mod parking;
pub mod reservation;

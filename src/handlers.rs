pub mod auth;
pub mod dashboard;
pub mod lots;
pub mod reservations;
pub mod spots;

// src/middleware/admin.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::User};

// O Guardião administrativo. O modelo é de admin único (ver
// AuthService::ensure_admin), então a checagem é o papel no próprio
// usuário, sem tabela de permissões.
//
// Uso nos handlers, depois do auth_guard na rota:
//   pub async fn create_lot(..., RequireAdmin(admin): RequireAdmin, ...)
pub struct RequireAdmin(pub User);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o usuário colocado pelo auth_guard
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        // B. Verifica o papel
        if !user.is_admin() {
            return Err(AppError::AdminOnly);
        }

        Ok(RequireAdmin(user))
    }
}

// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Role, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    pub async fn register_user(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        address: &str,
        pin_code: &str,
    ) -> Result<String, AppError> {
        // Hashing fora do runtime assíncrono (bcrypt é caro de propósito)
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
            ?;

        // E-mail duplicado vira AppError::EmailAlreadyExists dentro do repositório
        let new_user = self.user_repo
            .create_user(
                &self.pool,
                email,
                &hashed_password,
                full_name,
                address,
                pin_code,
                Role::User,
            )
            .await?;

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self.user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // Provisiona o administrador único do sistema na inicialização.
    // A identidade é fixa (ADMIN_EMAIL), nunca "o primeiro usuário que
    // tiver role admin".
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            tracing::info!("Administrador já existe.");
            return Ok(());
        }

        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
            ?;

        self.user_repo
            .create_user(
                &self.pool,
                email,
                &hashed_password,
                "Administrador",
                "N/A",
                "00000",
                Role::Admin,
            )
            .await?;

        tracing::info!("✅ Administrador provisionado ({}).", email);
        Ok(())
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service_de_teste(secret: &str) -> AuthService {
        // Pool preguiçosa: nenhuma conexão é aberta, o que basta para
        // exercitar a parte puramente criptográfica do serviço.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/estaciona_test")
            .expect("URL de teste inválida");
        AuthService::new(UserRepository::new(pool.clone()), secret.to_string(), pool)
    }

    #[tokio::test]
    async fn token_carrega_o_usuario_e_expira_em_sete_dias() {
        let service = service_de_teste("segredo-de-teste");
        let user_id = Uuid::new_v4();

        let token = service.create_token(user_id).expect("falha ao gerar token");

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"segredo-de-teste"),
            &Validation::default(),
        )
        .expect("falha ao decodificar token");

        assert_eq!(decoded.claims.sub, user_id);
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 7 * 24 * 3600);
    }

    #[tokio::test]
    async fn token_nao_valida_com_outro_segredo() {
        let service = service_de_teste("segredo-a");
        let token = service.create_token(Uuid::new_v4()).expect("falha ao gerar token");

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"segredo-b"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}

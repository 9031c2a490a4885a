use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Todos os erros de negócio são reportados de forma síncrona ao chamador;
// nenhum deles derruba o processo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso restrito ao administrador")]
    AdminOnly,

    #[error("A reserva pertence a outro usuário")]
    NotReservationOwner,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Estacionamento não encontrado")]
    LotNotFound,

    #[error("Vaga não encontrada")]
    SpotNotFound,

    #[error("Reserva não encontrada")]
    ReservationNotFound,

    // Nenhuma vaga livre no lote no momento da reserva.
    #[error("Nenhuma vaga disponível")]
    NoSpotAvailable,

    // Redimensionar/excluir bloqueado pela ocupação atual do lote.
    #[error("Conflito de ocupação: {0}")]
    CapacityConflict(String),

    #[error("A reserva já foi encerrada")]
    ReservationAlreadyReleased,

    #[error("A reserva ainda está ativa")]
    ReservationStillActive,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // Mapeamento central de status HTTP, também usado nos testes.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::JwtError(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AdminOnly | AppError::NotReservationOwner => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::LotNotFound
            | AppError::SpotNotFound
            | AppError::ReservationNotFound => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::NoSpotAvailable
            | AppError::CapacityConflict(_)
            | AppError::ReservationAlreadyReleased
            | AppError::ReservationStillActive => StatusCode::CONFLICT,
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (status, "Este e-mail já está em uso.".to_string()),
            AppError::InvalidCredentials => (status, "E-mail ou senha inválidos.".to_string()),
            AppError::InvalidToken | AppError::JwtError(_) => {
                (status, "Token de autenticação inválido ou ausente.".to_string())
            }
            AppError::AdminOnly => {
                (status, "Apenas o administrador pode realizar esta ação.".to_string())
            }
            AppError::NotReservationOwner => {
                (status, "Esta reserva pertence a outro usuário.".to_string())
            }
            AppError::UserNotFound => (status, "Usuário não encontrado.".to_string()),
            AppError::LotNotFound => (status, "Estacionamento não encontrado.".to_string()),
            AppError::SpotNotFound => (status, "Vaga não encontrada.".to_string()),
            AppError::ReservationNotFound => (status, "Reserva não encontrada.".to_string()),
            AppError::NoSpotAvailable => {
                (status, "Nenhuma vaga disponível neste estacionamento.".to_string())
            }
            AppError::CapacityConflict(reason) => (status, reason),
            AppError::ReservationAlreadyReleased => {
                (status, "Esta reserva já foi encerrada.".to_string())
            }
            AppError::ReservationStillActive => {
                (status, "Esta reserva ainda está ativa; encerre-a antes de emitir o comprovante.".to_string())
            }

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erros_de_dominio_mapeiam_para_os_status_esperados() {
        assert_eq!(AppError::LotNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::SpotNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ReservationNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::NoSpotAvailable.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::CapacityConflict("2 vagas ocupadas".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ReservationAlreadyReleased.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::AdminOnly.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn erro_de_validacao_vira_bad_request_com_detalhes() {
        let errors = validator::ValidationErrors::new();
        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflito_de_capacidade_usa_o_motivo_como_mensagem() {
        let err = AppError::CapacityConflict("Não é possível reduzir — 3 vagas ocupadas.".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}

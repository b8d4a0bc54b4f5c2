// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cobre a taxonomia inteira: validação, acesso, not-found,
// conflitos de merge e falhas de importação/transação.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validação de custom_data contra os campos do pipeline.
    // Mapa: chave do campo -> código do erro ("required", "invalid_number"...)
    #[error("Erro de validação dos campos customizados")]
    CustomDataValidationError(HashMap<String, String>),

    #[error("custom_data deve ser um objeto JSON")]
    CustomDataJson,

    // O chamador não enxerga a diferença entre "não existe" e
    // "existe em outro tenant" — evita enumeração de tenants.
    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Acesso negado")]
    AccessDenied,

    // SUPER_ADMIN precisa informar o tenant alvo explicitamente.
    #[error("clientId é obrigatório para este perfil")]
    MissingClientId,

    // Rejeição da planilha pelo portão de validação de colunas.
    #[error("Colunas inválidas: {0}")]
    InvalidColumns(String),

    // Definição de pipeline malformada (estágios vazios, ids repetidos...).
    #[error("Pipeline inválido: {0}")]
    InvalidPipeline(String),

    // Merge rejeitado antes de qualquer mutação.
    #[error("Conflito de merge: {0}")]
    MergeConflict(String),

    // Linha inválida numa importação tudo-ou-nada (leads): o lote
    // inteiro sofre rollback e o chamador recebe a linha culpada.
    #[error("Erro de importação: {0}")]
    ImportRowError(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
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
            AppError::CustomDataValidationError(details) => {
                let body = Json(json!({
                    "error": "Um ou mais campos customizados são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::CustomDataJson => {
                (StatusCode::BAD_REQUEST, "custom_data deve ser um objeto JSON.".to_string())
            }
            AppError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, format!("{} não encontrado(a).", entity))
            }
            // Resposta genérica de propósito: não vaza se o recurso existe.
            AppError::AccessDenied => (StatusCode::FORBIDDEN, "Acesso negado.".to_string()),
            AppError::MissingClientId => {
                (StatusCode::BAD_REQUEST, "O parâmetro clientId é obrigatório.".to_string())
            }
            AppError::InvalidColumns(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::InvalidPipeline(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::MergeConflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::ImportRowError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UniqueConstraintViolation(msg) => (StatusCode::CONFLICT, msg),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.".to_string())
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe o genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

//! Unified backend error type.
//!
//! Store, resolver, state machine and export code all return `AppError`;
//! handlers propagate it with `?` and actix renders it through
//! [`ResponseError`] as a JSON `{ "message", "details" }` body.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Scan resolution
    // ---------------------------
    /// A required QR field was not supplied in the request body.
    #[error("QR code not provided: {0}")]
    MissingField(&'static str),

    /// A QR payload could not be decoded into the field the core needs.
    #[error("Invalid QR payload for {0}: no ID field")]
    InvalidPayload(&'static str),

    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// A second open session for the same (task, pallet, worker) was rejected
    /// by the store.
    #[error("Concurrent work registration detected for this task, pallet and worker")]
    ConflictRace,

    // ---------------------------
    // Entity creation
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    // ---------------------------
    // Access
    // ---------------------------
    #[error("Missing or invalid access token")]
    Unauthorized,

    #[error("Role {0} is not allowed to perform this operation")]
    Forbidden(String),

    // ---------------------------
    // Infrastructure
    // ---------------------------
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Short, user-facing summary used as the `message` of the JSON body.
    fn summary(&self) -> &'static str {
        match self {
            AppError::MissingField(_) => "Todos os QR Codes são obrigatórios",
            AppError::InvalidPayload(_) => "QR Code inválido",
            AppError::NotFound { .. } => "Registo não encontrado",
            AppError::ConflictRace => "Registo de trabalho em conflito",
            AppError::Validation(_) => "Dados inválidos",
            AppError::Unauthorized => "Token não fornecido ou inválido",
            AppError::Forbidden(_) => "Operação não permitida",
            _ => "Erro interno do servidor",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    details: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) | AppError::InvalidPayload(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ConflictRace => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.summary(),
            details: self.to_string(),
        })
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task join error: {}", e))
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

//! Despesas API is a REST service for managing monthly personal expenses.
//!
//! This library provides a JSON API over a single SQLite table of expenses
//! (despesas). The API is consumed by a separately hosted front-end client,
//! so all routes allow cross-origin requests.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod expense;
mod logging;
mod routing;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The uniform JSON body returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A description of the failure, in the language of the API client.
    pub message: String,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client supplied an expense kind outside the accepted set.
    #[error("Tipo de despesa inválido: {0}")]
    UnknownExpenseKind(String),

    /// An empty or whitespace-only string was used for an expense title.
    #[error("Título não pode ser vazio")]
    EmptyTitle,

    /// A zero or negative amount was supplied for an expense.
    #[error("Valor deve ser maior que zero")]
    NonPositiveAmount,

    /// A due day outside the range 1-31 was supplied.
    #[error("Dia de vencimento deve ser entre 1 e 31")]
    DueDayOutOfRange,

    /// A zero or negative installment count was supplied.
    #[error("Parcelas deve ser um número positivo")]
    NonPositiveInstallments,

    /// An installment credit expense was created without an installment count.
    #[error("Parcelas é obrigatório para despesas do tipo CRÉDITO PARCELADO")]
    MissingInstallments,

    /// A required field was absent from the request.
    #[error("Campo obrigatório ausente: {0}")]
    MissingField(&'static str),

    /// A field value could not be parsed as the expected type.
    #[error("Valor inválido para o campo {0}")]
    MalformedField(&'static str),

    /// An update request supplied no fields to change.
    #[error("Pelo menos um campo deve ser fornecido para atualização")]
    EmptyUpdate,

    /// The requested expense could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Despesa não encontrada na base")]
    NotFound,

    /// Tried to update an expense that is not in the database.
    #[error("Despesa não encontrada na base")]
    UpdateMissingExpense,

    /// Tried to delete an expense that is not in the database.
    #[error("Despesa não encontrada na base")]
    DeleteMissingExpense,

    /// The database rejected a write because of an integrity constraint.
    #[error("Erro de integridade ao salvar despesa")]
    IntegrityConflict,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, _)
                if sql_error.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::IntegrityConflict
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnknownExpenseKind(_)
            | Error::EmptyTitle
            | Error::NonPositiveAmount
            | Error::DueDayOutOfRange
            | Error::NonPositiveInstallments
            | Error::MissingInstallments
            | Error::MissingField(_)
            | Error::MalformedField(_)
            | Error::EmptyUpdate => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::UpdateMissingExpense | Error::DeleteMissingExpense => {
                StatusCode::NOT_FOUND
            }
            Error::IntegrityConflict => StatusCode::CONFLICT,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // SQL details are logged for the operator, never serialized for the client.
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "Erro interno do servidor".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(ErrorBody { message })).into_response()
    }
}

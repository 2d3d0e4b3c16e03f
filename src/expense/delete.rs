//! Expense deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{ExpenseIdQuery, delete_expense, view::DeleteConfirmation},
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The app's database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle deleting the expense identified by the `id` query parameter.
pub async fn delete_expense_endpoint(
    Query(query): Query<ExpenseIdQuery>,
    State(state): State<DeleteExpenseState>,
) -> Result<Response, Error> {
    let id = query.parse()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_expense(id, &connection)?;
    tracing::debug!("deleted expense {id}");

    Ok((StatusCode::OK, Json(DeleteConfirmation::removed(id))).into_response())
}

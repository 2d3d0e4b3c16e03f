//! List-all-expenses endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{get_all_expenses, view::ExpenseListView},
};

/// The state needed for listing all expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The app's database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle listing all stored expenses. An empty list is a valid result.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_all_expenses(&connection)?;
    tracing::debug!("{} expenses found", expenses.len());

    Ok((StatusCode::OK, Json(ExpenseListView::new(&expenses))).into_response())
}

//! Expense update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{UpdateExpenseForm, update_expense, view::ExpenseView},
};

/// The state needed for updating an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseState {
    /// The app's database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle updating an expense.
///
/// The target ID comes from the form body; at least one other field must be
/// supplied. Returns the updated record.
pub async fn update_expense_endpoint(
    State(state): State<UpdateExpenseState>,
    Form(form): Form<UpdateExpenseForm>,
) -> Result<Response, Error> {
    let (id, changes) = form.parse()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = update_expense(id, changes, &connection)?;
    tracing::debug!("updated expense {id}");

    Ok((StatusCode::OK, Json(ExpenseView::from(&expense))).into_response())
}

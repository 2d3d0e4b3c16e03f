//! Fetch-by-id expense endpoint.

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
    expense::{ExpenseIdQuery, get_expense, view::ExpenseView},
};

/// The state needed for fetching a single expense.
#[derive(Debug, Clone)]
pub struct GetExpenseState {
    /// The app's database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle fetching a single expense by the `id` query parameter.
pub async fn get_expense_endpoint(
    Query(query): Query<ExpenseIdQuery>,
    State(state): State<GetExpenseState>,
) -> Result<Response, Error> {
    let id = query.parse()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(id, &connection)?;

    Ok((StatusCode::OK, Json(ExpenseView::from(&expense))).into_response())
}

#[cfg(test)]
mod get_expense_endpoint_tests {
    use axum::{
        extract::{FromRef, Query, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        Error, ErrorBody,
        expense::{
            ExpenseIdQuery, ExpenseKind, ExpenseTitle, NewExpense, create_expense,
            view::ExpenseView,
        },
        test_utils::{new_test_state, parse_json_body},
    };

    use super::{GetExpenseState, get_expense_endpoint};

    fn insert_test_expense(state: &GetExpenseState) -> i64 {
        let new_expense = NewExpense {
            kind: ExpenseKind::Pix,
            title: ExpenseTitle::new_unchecked("Internet"),
            amount: 99.90,
            due_day: 10,
            installments: None,
            paid: false,
        };

        create_expense(new_expense, &state.db_connection.lock().unwrap())
            .expect("Could not create test expense")
            .id
    }

    #[tokio::test]
    async fn get_expense_returns_the_record() {
        let state = GetExpenseState::from_ref(&new_test_state());
        let id = insert_test_expense(&state);

        let query = ExpenseIdQuery {
            id: Some(id.to_string()),
        };
        let response = get_expense_endpoint(Query(query), State(state))
            .await
            .expect("Request should succeed");

        assert_eq!(response.status(), StatusCode::OK);

        let view: ExpenseView = parse_json_body(response).await;
        assert_eq!(view.id, id);
        assert_eq!(view.titulo, "Internet");
    }

    #[tokio::test]
    async fn get_expense_with_unknown_id_returns_not_found() {
        let state = GetExpenseState::from_ref(&new_test_state());

        let query = ExpenseIdQuery {
            id: Some("999999".to_string()),
        };
        let error = get_expense_endpoint(Query(query), State(state))
            .await
            .expect_err("Request should be rejected");

        assert_eq!(error, Error::NotFound);

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: ErrorBody = parse_json_body(response).await;
        assert_eq!(body.message, "Despesa não encontrada na base");
    }

    #[tokio::test]
    async fn get_expense_with_malformed_id_returns_bad_request() {
        let state = GetExpenseState::from_ref(&new_test_state());

        let query = ExpenseIdQuery {
            id: Some("abc".to_string()),
        };
        let error = get_expense_endpoint(Query(query), State(state))
            .await
            .expect_err("Request should be rejected");

        assert_eq!(error, Error::MalformedField("id"));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}

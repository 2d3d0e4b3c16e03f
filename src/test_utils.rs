#![allow(missing_docs)]

//! Helpers shared by the unit tests.

use axum::response::Response;
use rusqlite::Connection;
use serde::de::DeserializeOwned;

use crate::AppState;

/// Create an [AppState] backed by an in-memory SQLite database with the
/// schema initialized.
pub(crate) fn new_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection).expect("Could not initialize database")
}

/// Deserialize a JSON response body.
pub(crate) async fn parse_json_body<T: DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}

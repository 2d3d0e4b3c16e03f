//! The API endpoints URIs.

/// The root route, which describes the service.
pub const ROOT: &str = "/";
/// The route for operating on a single expense: create (POST), fetch (GET),
/// update (PUT) and delete (DELETE).
pub const EXPENSE: &str = "/despesa";
/// The route for listing all expenses.
pub const EXPENSES: &str = "/despesas";

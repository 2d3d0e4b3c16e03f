//! Application router configuration.

use axum::{
    Json, Router, middleware,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    AppState, ErrorBody, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
        list_expenses_endpoint, update_expense_endpoint,
    },
    logging::logging_middleware,
};

/// Return a router with all the app's routes.
///
/// The router accepts requests from any origin because the front-end client
/// is hosted separately from this API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_service_info))
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .post(create_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(endpoints::EXPENSES, get(list_expenses_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Describe the service at the root route.
async fn get_service_info() -> Response {
    Json(json!({
        "nome": "API de Despesas Mensais",
        "versao": env!("CARGO_PKG_VERSION"),
        "rotas": [endpoints::EXPENSE, endpoints::EXPENSES],
    }))
    .into_response()
}

/// The JSON response for unknown routes.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            message: "Rota não encontrada".to_owned(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{build_router, endpoints, test_utils::new_test_state};

    fn new_test_server() -> TestServer {
        TestServer::try_new(build_router(new_test_state())).expect("Could not create test server")
    }

    #[tokio::test]
    async fn root_route_describes_the_service() {
        let server = new_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["nome"], "API de Despesas Mensais");
    }

    #[tokio::test]
    async fn unknown_routes_return_json_not_found() {
        let server = new_test_server();

        let response = server.get("/contas").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["message"], "Rota não encontrada");
    }

    #[tokio::test]
    async fn creating_a_pix_expense_defaults_installments_and_paid() {
        let server = new_test_server();

        let response = server
            .post(endpoints::EXPENSE)
            .form(&[
                ("tipo", "PIX"),
                ("titulo", "Internet"),
                ("valor", "99.90"),
                ("dia_vencimento", "10"),
            ])
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], json!(1));
        assert_eq!(body["tipo"], "PIX");
        assert_eq!(body["titulo"], "Internet");
        assert_eq!(body["valor"], json!(99.90));
        assert_eq!(body["parcelas"], Value::Null);
        assert_eq!(body["dia_vencimento"], json!(10));
        assert_eq!(body["paga"], json!(false));
    }

    #[tokio::test]
    async fn changing_an_installment_expense_to_boleto_clears_installments() {
        let server = new_test_server();

        let response = server
            .post(endpoints::EXPENSE)
            .form(&[
                ("tipo", "CRÉDITO PARCELADO"),
                ("titulo", "Notebook"),
                ("valor", "3000"),
                ("dia_vencimento", "5"),
                ("parcelas", "10"),
            ])
            .await;
        response.assert_status_ok();
        let id = response.json::<Value>()["id"].to_string();

        let response = server
            .put(endpoints::EXPENSE)
            .form(&[("id", id.as_str()), ("tipo", "BOLETO")])
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["tipo"], "BOLETO");
        assert_eq!(body["parcelas"], Value::Null);

        let response = server
            .get(endpoints::EXPENSE)
            .add_query_param("id", &id)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["tipo"], "BOLETO");
        assert_eq!(body["parcelas"], Value::Null);
    }

    #[tokio::test]
    async fn paying_an_installment_expense_decrements_the_count() {
        let server = new_test_server();

        let response = server
            .post(endpoints::EXPENSE)
            .form(&[
                ("tipo", "CRÉDITO PARCELADO"),
                ("titulo", "Financiamento Carro"),
                ("valor", "2500.00"),
                ("dia_vencimento", "10"),
                ("parcelas", "12"),
            ])
            .await;
        response.assert_status_ok();
        let id = response.json::<Value>()["id"].to_string();

        let response = server
            .put(endpoints::EXPENSE)
            .form(&[("id", id.as_str()), ("paga", "true")])
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["paga"], json!(true));
        assert_eq!(body["parcelas"], json!(11));
    }

    #[tokio::test]
    async fn deleting_an_expense_twice_returns_not_found_the_second_time() {
        let server = new_test_server();

        let response = server
            .post(endpoints::EXPENSE)
            .form(&[
                ("tipo", "BOLETO"),
                ("titulo", "Aluguel"),
                ("valor", "1200"),
                ("dia_vencimento", "1"),
            ])
            .await;
        response.assert_status_ok();
        let id = response.json::<Value>()["id"].to_string();

        let response = server
            .delete(endpoints::EXPENSE)
            .add_query_param("id", &id)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Despesa removida");

        let response = server
            .delete(endpoints::EXPENSE)
            .add_query_param("id", &id)
            .await;
        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["message"], "Despesa não encontrada na base");
    }

    #[tokio::test]
    async fn listing_expenses_returns_them_in_creation_order() {
        let server = new_test_server();

        for (titulo, valor) in [("Internet", "99.90"), ("Aluguel", "1200")] {
            let response = server
                .post(endpoints::EXPENSE)
                .form(&[
                    ("tipo", "BOLETO"),
                    ("titulo", titulo),
                    ("valor", valor),
                    ("dia_vencimento", "10"),
                ])
                .await;
            response.assert_status_ok();
        }

        let response = server.get(endpoints::EXPENSES).await;

        response.assert_status_ok();
        let body: Value = response.json();
        let despesas = body["despesas"].as_array().expect("despesas should be a list");
        assert_eq!(despesas.len(), 2);
        assert_eq!(despesas[0]["titulo"], "Internet");
        assert_eq!(despesas[1]["titulo"], "Aluguel");
    }

    #[tokio::test]
    async fn malformed_id_returns_bad_request() {
        let server = new_test_server();

        let response = server
            .get(endpoints::EXPENSE)
            .add_query_param("id", "abc")
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Valor inválido para o campo id");
    }

    #[tokio::test]
    async fn invalid_create_input_returns_bad_request() {
        let server = new_test_server();

        let response = server
            .post(endpoints::EXPENSE)
            .form(&[
                ("tipo", "PIX"),
                ("titulo", "Internet"),
                ("valor", "-5"),
                ("dia_vencimento", "10"),
            ])
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Valor deve ser maior que zero");
    }
}

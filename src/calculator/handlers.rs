use axum::{
    extract::rejection::JsonRejection,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{CalculateRequest, CalculationRequest, CalculationResponse};
use super::services::Operation;
use crate::{error::AppResult, state::AppState};

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

pub fn calc_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add))
        .route("/subtract", post(subtract))
        .route("/multiply", post(multiply))
        .route("/divide", post(divide))
        .route("/power", post(power))
        .route("/calculate", post(calculate))
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn run(
    op: Operation,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> AppResult<Json<CalculationResponse>> {
    let Json(req) = payload.map_err(|e| {
        warn!(op = %op, error = %e.body_text(), "rejected calculation body");
        e
    })?;
    let result = op.apply(req.a, req.b).map_err(|e| {
        info!(op = %op, a = %req.a, b = %req.b, error = %e, "calculation refused");
        e
    })?;
    Ok(Json(CalculationResponse { result }))
}

#[instrument(skip_all)]
pub async fn add(
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> AppResult<Json<CalculationResponse>> {
    run(Operation::Add, payload)
}

#[instrument(skip_all)]
pub async fn subtract(
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> AppResult<Json<CalculationResponse>> {
    run(Operation::Subtract, payload)
}

#[instrument(skip_all)]
pub async fn multiply(
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> AppResult<Json<CalculationResponse>> {
    run(Operation::Multiply, payload)
}

#[instrument(skip_all)]
pub async fn divide(
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> AppResult<Json<CalculationResponse>> {
    run(Operation::Divide, payload)
}

#[instrument(skip_all)]
pub async fn power(
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> AppResult<Json<CalculationResponse>> {
    run(Operation::Power, payload)
}

#[instrument(skip_all)]
pub async fn calculate(
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> AppResult<Json<CalculationResponse>> {
    let Json(req) = payload?;
    let result = req.operation.apply(req.a, req.b)?;
    Ok(Json(CalculationResponse { result }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::app::test_support::{get_text, post_json};

    #[tokio::test]
    async fn add_api() {
        let (status, body) = post_json("/add", json!({"a": 10, "b": 5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(15));
    }

    #[tokio::test]
    async fn subtract_api() {
        let (status, body) = post_json("/subtract", json!({"a": 10, "b": 5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(5));
    }

    #[tokio::test]
    async fn multiply_api() {
        let (status, body) = post_json("/multiply", json!({"a": 10, "b": 5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(50));
    }

    #[tokio::test]
    async fn divide_api() {
        let (status, body) = post_json("/divide", json!({"a": 10, "b": 2})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"].as_f64(), Some(5.0));
    }

    #[tokio::test]
    async fn divide_by_zero_api() {
        let (status, body) = post_json("/divide", json!({"a": 10, "b": 0})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Cannot divide by zero!"}));
        assert!(body.get("result").is_none());
    }

    #[tokio::test]
    async fn divide_by_float_zero_api() {
        let (status, body) = post_json("/divide", json!({"a": 1.5, "b": 0.0})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot divide by zero!");
    }

    #[tokio::test]
    async fn power_api() {
        let (status, body) = post_json("/power", json!({"a": 10, "b": 2})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(100));
    }

    #[tokio::test]
    async fn non_finite_results_are_client_errors() {
        let cases = [
            ("/power", json!({"a": 10.0, "b": 400})),
            ("/power", json!({"a": 0, "b": -1})),
            ("/add", json!({"a": 1e308, "b": 1e308})),
            ("/power", json!({"a": -8, "b": 0.5})),
        ];
        for (uri, payload) in cases {
            let (status, body) = post_json(uri, payload.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {payload}");
            assert_eq!(body, json!({"error": "Result is not a finite number"}));
        }
    }

    #[tokio::test]
    async fn calculate_with_selector() {
        let (status, body) =
            post_json("/calculate", json!({"a": 3, "b": 4, "operation": "multiply"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!(12));

        let (status, body) =
            post_json("/calculate", json!({"a": 3, "b": 0, "operation": "divide"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot divide by zero!");
    }

    #[tokio::test]
    async fn unknown_operation_is_a_client_error() {
        let (status, body) =
            post_json("/calculate", json!({"a": 3, "b": 4, "operation": "modulo"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn non_numeric_operand_is_a_client_error() {
        let (status, body) = post_json("/add", json!({"a": "ten", "b": 5})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(body.get("result").is_none());
    }

    #[tokio::test]
    async fn index_page_has_heading() {
        let (status, html) = get_text("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("id=\"result\""));
    }
}

//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use entity_store::EntityStore;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<usize>,
}

/// GET /health — 200 with row counts while both stores answer, 503 otherwise.
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let counts = async {
        let employees = state.employee_store.count().await?;
        let orders = state.order_store.count().await?;
        Ok::<_, entity_store::StoreError>((employees, orders))
    };

    match counts.await {
        Ok((employees, orders)) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                employees: Some(employees),
                orders: Some(orders),
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    employees: None,
                    orders: None,
                }),
            )
        }
    }
}

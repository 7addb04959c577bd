//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health;
use serde_json::Value;

use crate::state::AppState;

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut checks: Vec<(&str, HealthCheckFuture)> = Vec::new();

    if let Some(db) = &state.db {
        let probe: HealthCheckFuture =
            Box::pin(async move { check_health(db).await.map_err(|e| e.to_string()) });
        checks.push(("database", probe));
    }

    run_health_checks(checks).await
}

/// `GET /ready`: 200 when the store answers, 503 otherwise.
pub fn ready_router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ready_without_database_is_ok() {
        let response = ready_router(AppState { db: None })
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ready");
    }
}

// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// JSON endpoints live under `/api/v1/` and are public. `POST /webhook`
// receives Telegram updates: the secret header is checked on the raw body
// before it is parsed, then the update is processed in a spawned task and the
// delivery answered with 200.
//
// CORS is configured permissively.
// =============================================================================

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::api::auth::verify_webhook_secret;
use crate::app_state::AppState;
use crate::coingecko::SpotPrice;
use crate::envelope::AnalysisEnvelope;
use crate::error::ServiceError;
use crate::service::{self, AnalyzeRequest};
use crate::telegram::{handle_update, Update};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analyze/:symbol", get(analyze))
        .route("/api/v1/price/:id", get(price))
        .route("/webhook", post(webhook))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    analyses_served: u64,
    updates_received: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        analyses_served: state.analyses_served(),
        updates_received: state.updates_received(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Debug, Deserialize)]
struct AnalyzeQuery {
    vs: Option<String>,
    interval: Option<String>,
    limit: Option<u32>,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<AnalysisEnvelope>, ServiceError> {
    let request = AnalyzeRequest {
        symbol,
        quote: query.vs,
        interval: query.interval,
        limit: query.limit,
    };
    let envelope = service::analyze_symbol(&state, &request).await?;
    Ok(Json(envelope))
}

// =============================================================================
// Spot price
// =============================================================================

#[derive(Debug, Deserialize)]
struct PriceQuery {
    vs: Option<String>,
}

async fn price(
    State(state): State<Arc<AppState>>,
    Path(coin_id): Path<String>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<SpotPrice>, ServiceError> {
    let price = service::spot_price(&state, &coin_id, query.vs.as_deref()).await?;
    Ok(Json(price))
}

// =============================================================================
// Telegram webhook
// =============================================================================

async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(rejection) = verify_webhook_secret(&headers, state.webhook_secret.as_deref()) {
        return rejection.into_response();
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "malformed webhook payload");
            let body = serde_json::json!({ "error": format!("malformed update: {e}") });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    tokio::spawn(async move {
        handle_update(&state, update).await;
    });
    StatusCode::OK.into_response()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::SECRET_HEADER;
    use crate::app_state::test_support::{mock_binance, offline_state, state_with_binance};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const PLAIN_TEXT_UPDATE: &str =
        r#"{"update_id":1,"message":{"message_id":2,"chat":{"id":3},"text":"hello"}}"#;
    const MALFORMED_UPDATE: &str = r#"{"update_id":"#;

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn webhook_request(secret: Option<&str>) -> Request<Body> {
        webhook_request_with(secret, PLAIN_TEXT_UPDATE)
    }

    fn webhook_request_with(secret: Option<&str>, body: &'static str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header(SECRET_HEADER, secret);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(offline_state(None));
        let resp = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["analyses_served"], 0);
        assert!(body["server_time"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn webhook_rejects_wrong_secret() {
        let app = router(offline_state(Some("s3cret")));
        let resp = app.oneshot(webhook_request(Some("guess"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let app = router(offline_state(Some("s3cret")));
        let resp = app.oneshot(webhook_request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn webhook_accepts_valid_secret() {
        let app = router(offline_state(Some("s3cret")));
        let resp = app.oneshot(webhook_request(Some("s3cret"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn webhook_checks_secret_before_parsing_body() {
        let app = router(offline_state(Some("s3cret")));
        let resp = app
            .oneshot(webhook_request_with(Some("guess"), MALFORMED_UPDATE))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let app = router(offline_state(Some("s3cret")));
        let resp = app
            .oneshot(webhook_request_with(Some("s3cret"), MALFORMED_UPDATE))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("malformed update"));
    }

    #[tokio::test]
    async fn analyze_unknown_pair_is_bad_request() {
        let base = mock_binance(
            StatusCode::BAD_REQUEST,
            r#"{"code":-1121,"msg":"Invalid symbol."}"#.into(),
        )
        .await;
        let app = router(state_with_binance(&base));
        let resp = app
            .oneshot(Request::get("/api/v1/analyze/foo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "invalid symbol: FOOUSDT");
    }

    #[tokio::test]
    async fn analyze_rejects_bad_symbol_without_fetching() {
        let state = offline_state(None);
        let app = router(state.clone());
        let resp = app
            .oneshot(
                Request::get("/api/v1/analyze/b%21tc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("invalid symbol"));
        assert_eq!(state.analyses_served(), 0);
    }

    #[tokio::test]
    async fn analyze_rejects_out_of_range_limit() {
        let app = router(offline_state(None));
        let resp = app
            .oneshot(
                Request::get("/api/v1/analyze/btc?limit=5000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn price_rejects_malformed_coin_id() {
        let app = router(offline_state(None));
        let resp = app
            .oneshot(
                Request::get("/api/v1/price/bit%20coin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_bad_gateway() {
        let app = router(offline_state(None));
        let resp = app
            .oneshot(Request::get("/api/v1/analyze/btc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}

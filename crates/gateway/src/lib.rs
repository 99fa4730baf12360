//! HTTP API gateway for TruthLens.
//!
//! Exposes the query pipeline as `POST /query`, plus a liveness endpoint and a
//! service banner. The only client-visible errors are malformed requests;
//! pipeline failures come back as degraded `200` results.
//!
//! Built on Axum.

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{Instrument, info, info_span, warn};

use truthlens_agent::Orchestrator;
use truthlens_config::{AppConfig, GatewayConfig};
use truthlens_core::error::ValidationError;
use truthlens_core::query::Query;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Orchestrator,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes and layers.
pub fn build_router(state: SharedState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/query", post(query_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.cors_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS from the configured origin list; `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    if origins.iter().any(|o| o.trim() == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

/// Start the gateway HTTP server.
///
/// Builds the pipeline once; every request shares it.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = Arc::new(GatewayState {
        orchestrator: truthlens_agent::build_from_config(&config),
    });
    let app = build_router(state, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct BannerResponse {
    service: &'static str,
    version: &'static str,
    endpoints: [&'static str; 2],
}

async fn root_handler() -> Json<BannerResponse> {
    Json(BannerResponse {
        service: "TruthLens news query API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ["POST /query", "GET /health"],
    })
}

#[derive(Deserialize)]
struct QueryRequest {
    #[serde(alias = "queryText")]
    query: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

async fn query_handler(
    State(state): State<SharedState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        api_error(status, rejection.body_text())
    })?;

    let query = Query::new(&request.query).map_err(|err| {
        let status = match err {
            ValidationError::Empty => StatusCode::BAD_REQUEST,
            ValidationError::TooLong { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        };
        api_error(status, err.to_string())
    })?;

    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("query", request_id = %request_id);
    let result = state.orchestrator.handle(query).instrument(span).await;

    Ok(([("x-request-id", request_id.to_string())], Json(result)))
}

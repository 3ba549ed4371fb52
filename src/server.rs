//! HTTP boundary: a thin axum layer over the scraper.
//!
//! ```text
//! GET /                     - health check
//! GET /consult/{identity}   - run one query
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use adres_config::{Config, ServerConfig};
use adres_scraper::{AdresScraper, CanonicalField, CanonicalRecord, Outcome, QueryRequest};

pub(crate) const INVALID_IDENTITY: &str = "Identity must contain only numbers.";
const NOT_REGISTERED: &str = "The identity is not registered in BDUA.";
const NOT_REGISTERED_CODE: &str = "1";
const LOOKUP_FAILED: &str = "No records found or timeout waiting for external service.";

/// Anything that can answer a query. The server only needs this much of
/// [`AdresScraper`].
#[async_trait]
pub(crate) trait Consultant: Send + Sync {
    async fn consult(&self, request: &QueryRequest) -> Outcome;
}

#[async_trait]
impl Consultant for AdresScraper {
    async fn consult(&self, request: &QueryRequest) -> Outcome {
        AdresScraper::consult(self, request).await
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    consultant: Arc<dyn Consultant>,
    /// Each admitted query owns a browser; this bounds how many run at once.
    permits: Arc<Semaphore>,
}

impl AppState {
    pub(crate) fn new(consultant: Arc<dyn Consultant>, max_concurrent_queries: usize) -> Self {
        Self {
            consultant,
            permits: Arc::new(Semaphore::new(max_concurrent_queries.max(1))),
        }
    }
}

/// Every canonical field, `null` when the portal did not show it.
#[derive(Debug, Default, Serialize)]
pub(crate) struct AffiliationResponse {
    pub type_identity: Option<String>,
    pub identity: Option<String>,
    pub names: Option<String>,
    pub last_names: Option<String>,
    pub birthday: Option<String>,
    pub province: Option<String>,
    pub municipality: Option<String>,
    pub status: Option<String>,
    pub entity: Option<String>,
    pub regime: Option<String>,
    pub effective_date_membership: Option<String>,
    pub end_date_membership: Option<String>,
    pub type_member: Option<String>,
}

impl From<&CanonicalRecord> for AffiliationResponse {
    fn from(record: &CanonicalRecord) -> Self {
        let field = |f: CanonicalField| record.get(f).map(str::to_string);
        Self {
            type_identity: field(CanonicalField::TypeIdentity),
            identity: field(CanonicalField::Identity),
            names: field(CanonicalField::Names),
            last_names: field(CanonicalField::LastNames),
            birthday: field(CanonicalField::Birthday),
            province: field(CanonicalField::Province),
            municipality: field(CanonicalField::Municipality),
            status: field(CanonicalField::Status),
            entity: field(CanonicalField::Entity),
            regime: field(CanonicalField::Regime),
            effective_date_membership: field(CanonicalField::EffectiveDateMembership),
            end_date_membership: field(CanonicalField::EndDateMembership),
            type_member: field(CanonicalField::TypeMember),
        }
    }
}

pub(crate) fn is_valid_identity(identity: &str) -> bool {
    !identity.is_empty() && identity.chars().all(|c| c.is_ascii_digit())
}

/// Status and JSON body for an outcome. Shared with the `consult` command.
pub(crate) fn outcome_body(outcome: &Outcome) -> (StatusCode, Value) {
    match outcome {
        Outcome::Found(record) => (
            StatusCode::OK,
            serde_json::to_value(AffiliationResponse::from(record)).unwrap_or(Value::Null),
        ),
        Outcome::NotFound => (
            StatusCode::NOT_FOUND,
            json!({ "message": NOT_REGISTERED, "code": NOT_REGISTERED_CODE }),
        ),
        Outcome::Failed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "detail": LOOKUP_FAILED }),
        ),
    }
}

pub(crate) fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/consult/", get(empty_identity))
        .route("/consult/{identity}", get(consult_identity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "ADRES API" }))
}

async fn empty_identity() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": INVALID_IDENTITY })))
}

async fn consult_identity(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> impl IntoResponse {
    if !is_valid_identity(&identity) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": INVALID_IDENTITY })));
    }

    let _permit = match state.permits.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            warn!("Query admission closed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": LOOKUP_FAILED })),
            );
        }
    };

    let outcome = state.consultant.consult(&QueryRequest::new(identity)).await;
    let (status, body) = outcome_body(&outcome);
    (status, Json(body))
}

/// Bind the configured address. `host` may be an IP literal or a name.
pub(crate) async fn bind_listener(server: &ServerConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind((server.host.as_str(), server.port)).await
}

/// Serve the API until the process is stopped.
pub(crate) async fn run_server(
    config: &Config,
    server: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let scraper = Arc::new(AdresScraper::from_config(config));
    let state = AppState::new(scraper, server.max_concurrent_queries);
    let app = create_router(state);

    let listener = bind_listener(server).await?;
    let addr = listener.local_addr()?;

    info!("Starting ADRES API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Listening on {} (up to {} concurrent queries)",
        addr, server.max_concurrent_queries
    );
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

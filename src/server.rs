//! HTTP API for official lookups.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/officials` | Look up officials for a location |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! `GET /officials` accepts `address`, `zip`, `lat`+`lng`, `currentOnly`,
//! and `level` query parameters. At least one location parameter is required
//! (400 if absent), a zip must be exactly 5 digits (400), and lat/lng must
//! parse as floats (400).
//!
//! Failures return `{ "error": "<message>" }` with a status from the error
//! taxonomy: invalid input 400, unresolved location 422, missing credential
//! 500, upstream/partial provider failure 502.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregate::{self, AggregateRequest};
use crate::config::Config;
use crate::error::LookupError;
use crate::geocode::LocationQuery;
use crate::models::{Level, LocationDescriptor, OfficeHolder, RankedGroup};

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Build the application router. Split out from [`run_server`] so tests can
/// drive the API against mock providers without binding a fixed port.
pub fn router(config: Arc<Config>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/officials", get(handle_officials))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { config })
}

/// Start the HTTP server on the configured bind address.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Arc::new(config.clone()));

    println!("civica server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// Flat error body: `{ "error": "<message>" }`.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        let status = match &err {
            LookupError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LookupError::LocationUnresolved => StatusCode::UNPROCESSABLE_ENTITY,
            LookupError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LookupError::Provider { .. } => StatusCode::BAD_GATEWAY,
            LookupError::PartialProviderFailure { .. } => StatusCode::BAD_GATEWAY,
        };
        AppError {
            status,
            message: err.to_string(),
        }
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /officials ============

/// Raw query parameters. Lat/lng arrive as strings so a malformed float can
/// produce a controlled 400 instead of an extractor rejection.
#[derive(Debug, Deserialize)]
struct OfficialsParams {
    address: Option<String>,
    zip: Option<String>,
    lat: Option<String>,
    lng: Option<String>,
    #[serde(rename = "currentOnly")]
    current_only: Option<bool>,
    level: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OfficialsResponse {
    location: LocationDescriptor,
    office_holders: Vec<OfficeHolder>,
    by_level: LevelBuckets,
    count: usize,
}

/// Fixed-shape `byLevel` map. Every level key is always present so clients
/// can render "no officials at this level" without existence checks.
#[derive(Serialize, Default)]
struct LevelBuckets {
    federal: Vec<OfficeHolder>,
    state: Vec<OfficeHolder>,
    regional: Vec<OfficeHolder>,
    county: Vec<OfficeHolder>,
    city: Vec<OfficeHolder>,
    local: Vec<OfficeHolder>,
}

impl From<Vec<RankedGroup>> for LevelBuckets {
    fn from(groups: Vec<RankedGroup>) -> Self {
        let mut buckets = LevelBuckets::default();
        for group in groups {
            match group.level {
                Level::Federal => buckets.federal = group.members,
                Level::State => buckets.state = group.members,
                Level::Regional => buckets.regional = group.members,
                Level::County => buckets.county = group.members,
                Level::City => buckets.city = group.members,
                Level::Local => buckets.local = group.members,
            }
        }
        buckets
    }
}

fn parse_float(value: Option<String>, name: &str) -> Result<Option<f64>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| bad_request(format!("{} must be a number, got '{}'", name, raw))),
    }
}

async fn handle_officials(
    State(state): State<AppState>,
    Query(params): Query<OfficialsParams>,
) -> Result<Json<OfficialsResponse>, AppError> {
    let lat = parse_float(params.lat, "lat")?;
    let lng = parse_float(params.lng, "lng")?;
    if lat.is_some() != lng.is_some() {
        return Err(bad_request("lat and lng must be supplied together"));
    }

    let level = match params.level {
        None => None,
        Some(raw) => Some(raw.parse::<Level>().map_err(|e| bad_request(e))?),
    };

    let request = AggregateRequest {
        query: LocationQuery {
            address: params.address,
            zip: params.zip,
            lat,
            lng,
        },
        current_only: params.current_only.unwrap_or(true),
        level,
    };

    let result = aggregate::lookup_officials(&state.config, &request).await?;

    Ok(Json(OfficialsResponse {
        location: result.location,
        office_holders: result.office_holders,
        by_level: result.by_level.into(),
        count: result.count,
    }))
}

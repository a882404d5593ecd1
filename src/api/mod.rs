//! Options REST API.

pub mod error;
mod middleware;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::cache::TtlCache;
use crate::database::OptionsStore;

pub use error::ApiError;

const RESTRICTION_RULES_KEY: &str = "/options/restriction-rules";
const MUSCLE_FOCUSES_KEY: &str = "/options/muscle-focuses";

/// Serialized response bodies keyed by request path.
pub type ResponseCache = TtlCache<&'static str, String>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OptionsStore>,
    pub cache: ResponseCache,
}

impl AppState {
    pub fn new(store: Arc<dyn OptionsStore>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: TtlCache::new(cache_ttl),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/health/ready", get(readiness_handler))
        .route(RESTRICTION_RULES_KEY, get(get_restriction_rules))
        .route(MUSCLE_FOCUSES_KEY, get(get_muscle_focuses))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

/// `None` or `*` allows any origin, otherwise a comma separated list.
pub fn cors_layer(allow_origins: Option<&str>) -> CorsLayer {
    let origin = match allow_origins.map(str::trim) {
        None | Some("") | Some("*") => AllowOrigin::any(),
        Some(list) => AllowOrigin::list(
            list.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

/// Binds the API socket. Called before anything is spawned so a bad
/// address or a busy port stops startup.
pub async fn bind(address: &str) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(address).await?;
    log::info!("🌐 Options API listening on {}", listener.local_addr()?);
    Ok(listener)
}

pub async fn serve(listener: TcpListener, state: AppState, cors: CorsLayer) -> std::io::Result<()> {
    axum::serve(listener, router(state).layer(cors)).await
}

async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.store.health_check().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn get_restriction_rules(State(state): State<AppState>) -> Result<Response, ApiError> {
    cached_json(&state.cache, RESTRICTION_RULES_KEY, || state.store.restriction_rules()).await
}

async fn get_muscle_focuses(State(state): State<AppState>) -> Result<Response, ApiError> {
    cached_json(&state.cache, MUSCLE_FOCUSES_KEY, || state.store.muscle_focuses()).await
}

/// Serves `key` from the cache, loading and caching it on a miss.
/// Failed loads are not cached.
async fn cached_json<T, F, Fut>(
    cache: &ResponseCache,
    key: &'static str,
    load: F,
) -> Result<Response, ApiError>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, sqlx::Error>>,
{
    if let Some((body, remaining)) = cache.get_with_remaining(&key).await {
        log::debug!("🎯 Cache hit for {}", key);
        return Ok(json_response(body, "HIT", remaining));
    }

    let rows = load().await?;
    let body = serde_json::to_string(&rows)?;
    cache.insert(key, body.clone()).await;
    log::debug!("💾 Cached {} rows for {}", rows.len(), key);

    Ok(json_response(body, "MISS", cache.ttl()))
}

fn json_response(body: String, cache_status: &'static str, max_age: Duration) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CACHE_CONTROL, format!("max-age={}", max_age.as_secs())),
            (HeaderName::from_static("x-cache"), cache_status.to_string()),
        ],
        body,
    )
        .into_response()
}

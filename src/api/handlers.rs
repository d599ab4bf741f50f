//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{HttpFetcher, ResourceFetcher};
use crate::instrument::InstrumentedCache;
use crate::models::{
    CountResponse, DecodeAs, FlushResponse, GetQuery, GetResponse, HealthResponse,
    HistoryResponse, KeysQuery, KeysResponse, PageResponse, ReplayResponse, StatsResponse,
    StoreRequest, StoreResponse, UrlQuery,
};
use crate::store::{Backend, KeyValueStore, Value};

/// Instrumented cache in front of the page fetcher.
pub type PageCache = InstrumentedCache<Arc<dyn ResourceFetcher>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Key-value store handle
    pub store: KeyValueStore,
    /// Page cache, sharing the store's backend
    pub pages: Arc<PageCache>,
}

impl AppState {
    /// Creates a new AppState around `store`, caching pages produced by
    /// `fetcher` for `page_ttl`.
    pub fn new(store: KeyValueStore, fetcher: Arc<dyn ResourceFetcher>, page_ttl: Duration) -> Self {
        let pages = InstrumentedCache::new(store.clone(), fetcher).with_ttl(page_ttl);
        Self {
            store,
            pages: Arc::new(pages),
        }
    }

    /// Creates a new AppState from configuration, fetching pages over HTTP.
    pub fn from_config(config: &Config, backend: Arc<dyn Backend>) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        Ok(Self::new(
            KeyValueStore::new(backend),
            Arc::new(fetcher),
            config.page_ttl(),
        ))
    }
}

/// Handler for POST /store
///
/// Stores a value under a freshly generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.store.put(req.into_value()?).await?;
    Ok(Json(StoreResponse { key }))
}

/// Handler for GET /get/:key
///
/// Retrieves and decodes a value. A missing key answers 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Response> {
    let value = match query.decode_as {
        DecodeAs::String => state.store.get_as_string(&key).await?.map(Value::Str),
        DecodeAs::Integer => state.store.get_as_integer(&key).await?.map(Value::Int),
        DecodeAs::Float => state.store.get_as_float(&key).await?.map(Value::Float),
    };

    Ok(match value {
        Some(value) => Json(GetResponse::new(key, value)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Key not found: {}", key) })),
        )
            .into_response(),
    })
}

/// Handler for GET /page?url=...
///
/// Fetches a page through the instrumented cache.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let (content, access_count) = state.pages.fetch_counted(&query.url).await?;

    Ok(Json(PageResponse {
        url: query.url,
        content,
        access_count,
    }))
}

/// Handler for GET /count?url=...
pub async fn count_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<CountResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let access_count = state.pages.access_count(&query.url).await?;
    Ok(Json(CountResponse {
        url: query.url,
        access_count,
    }))
}

/// Handler for GET /history/:op
pub async fn history_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<HistoryResponse>> {
    let records = state.store.history_of(&operation).await?;
    Ok(Json(HistoryResponse { operation, records }))
}

/// Handler for GET /replay/:op
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let lines = state.store.replay(&operation).await?;
    Ok(Json(ReplayResponse { lines }))
}

/// Handler for GET /keys?pattern=...
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(query): Query<KeysQuery>,
) -> Result<Json<KeysResponse>> {
    let keys = state.store.keys(&query.pattern).await?;
    Ok(Json(KeysResponse { keys }))
}

/// Handler for DELETE /flush
pub async fn flush_handler(State(state): State<AppState>) -> Result<Json<FlushResponse>> {
    state.store.clear_all().await?;
    Ok(Json(FlushResponse::new()))
}

/// Handler for GET /stats
///
/// Returns page cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.pages.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Each handler maps
//! to exactly one cache call; parameter and payload validation happens
//! before the cache is touched.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{Cache, Ttl};
use crate::error::{CacheError, Result};
use crate::models::{GetValueParams, MessageResponse, PutValueParams, ValueResponse};

const ITEM_NOT_FOUND_MSG: &str = "Cache item not found";
const LIST_ITEM_NOT_FOUND_MSG: &str = "List item not found";
const DICT_ITEM_NOT_FOUND_MSG: &str = "Dictionary item not found";
const VALUE_NOT_LIST_MSG: &str = "Indicated value is not list";
const VALUE_NOT_DICT_MSG: &str = "Indicated value is not dictionary";
const INVALID_PAYLOAD_MSG: &str = "Invalid payload request";
const TIMEOUT_SET_MSG: &str = "The timeout was set";
const ITEM_DELETED_MSG: &str = "Cache item deleted";
const DATA_PERSISTED_MSG: &str = "Cache Data persisted";
const DATA_RELOADED_MSG: &str = "Cache Data reloaded";

/// Application state shared across all handlers.
///
/// The cache is internally shared and sharded, so the state is just a
/// cheap clone handle.
#[derive(Clone)]
pub struct AppState {
    /// The shared cache
    pub cache: Cache,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

/// Handler for GET `/api/v1/ping`
pub async fn ping_handler() -> Json<ValueResponse> {
    Json(ValueResponse::new("ping"))
}

/// Handler for GET `/api/v1/keys`
pub async fn keys_handler(State(state): State<AppState>) -> Json<ValueResponse> {
    let keys = state.cache.keys().await;
    Json(ValueResponse::new(keys))
}

/// Handler for GET `/api/v1/values/{key}`
///
/// Returns the whole value, or a projection of it when `listIndex` or
/// `dictKey` is supplied; `listIndex` wins when both are present.
pub async fn get_value_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<GetValueParams>,
) -> Result<Json<ValueResponse>> {
    let value = state
        .cache
        .get(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(ITEM_NOT_FOUND_MSG.to_string()))?;

    let result = if let Some(index) = params.parsed_list_index()? {
        match &value {
            Value::Array(items) => items
                .get(index)
                .cloned()
                .ok_or_else(|| CacheError::NotFound(LIST_ITEM_NOT_FOUND_MSG.to_string()))?,
            _ => return Err(CacheError::ShapeMismatch(VALUE_NOT_LIST_MSG.to_string())),
        }
    } else if let Some(dict_key) = params.dict_key() {
        match &value {
            Value::Object(map) => map
                .get(dict_key)
                .cloned()
                .ok_or_else(|| CacheError::NotFound(DICT_ITEM_NOT_FOUND_MSG.to_string()))?,
            _ => return Err(CacheError::ShapeMismatch(VALUE_NOT_DICT_MSG.to_string())),
        }
    } else {
        value
    };

    Ok(Json(ValueResponse::new(result)))
}

/// Handler for PUT `/api/v1/values/{key}`
///
/// The body is an arbitrary JSON value; `?expire=seconds` schedules
/// expiration. The response echoes the stored value.
pub async fn put_value_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<PutValueParams>,
    body: Bytes,
) -> Result<Json<ValueResponse>> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|_| CacheError::InvalidArgument(INVALID_PAYLOAD_MSG.to_string()))?;
    let expire = params.parsed_expire()?;

    state.cache.put(&key, value.clone(), expire).await;

    Ok(Json(ValueResponse::new(value)))
}

/// Handler for DELETE `/api/v1/values/{key}`
pub async fn delete_value_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>> {
    if state.cache.remove(&key).await {
        Ok(Json(MessageResponse::new(ITEM_DELETED_MSG)))
    } else {
        Err(CacheError::NotFound(ITEM_NOT_FOUND_MSG.to_string()))
    }
}

/// Handler for PUT `/api/v1/expire/{key}`
///
/// The body is a bare JSON integer holding the timeout in seconds.
pub async fn expire_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>> {
    let seconds: i64 = serde_json::from_slice(&body)
        .map_err(|_| CacheError::InvalidArgument(INVALID_PAYLOAD_MSG.to_string()))?;

    if state.cache.expire(&key, seconds).await {
        Ok(Json(MessageResponse::new(TIMEOUT_SET_MSG)))
    } else {
        Err(CacheError::NotFound(ITEM_NOT_FOUND_MSG.to_string()))
    }
}

/// Handler for GET `/api/v1/ttl/{key}`
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>> {
    match state.cache.ttl(&key).await {
        Ttl::Missing => Err(CacheError::NotFound(ITEM_NOT_FOUND_MSG.to_string())),
        Ttl::NoExpiry => Ok(Json(ValueResponse::new(-1))),
        Ttl::Seconds(seconds) => Ok(Json(ValueResponse::new(seconds))),
    }
}

/// Handler for POST `/api/v1/persist`
pub async fn persist_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.cache.persist().await?;
    Ok(Json(MessageResponse::new(DATA_PERSISTED_MSG)))
}

/// Handler for POST `/api/v1/reload`
pub async fn reload_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.cache.reload().await?;
    Ok(Json(MessageResponse::new(DATA_RELOADED_MSG)))
}

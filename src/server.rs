use std::{ops::Deref, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::instrument;

use crate::{AppError, CounterName, CounterStore};

#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<CounterStore>,
}

#[derive(Serialize, Debug)]
pub struct ApiInfo {
    message: &'static str,
    usage: &'static str,
}

#[derive(Serialize, Debug)]
pub struct CounterOutput {
    counter: String,
    value: u64,
}

impl AppState {
    pub fn new(store: CounterStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

impl Deref for AppState {
    type Target = CounterStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/{counter_name}", get(increment_handler))
        .route("/{counter_name}/", get(increment_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[instrument]
async fn index_handler() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Counter API",
        usage: "GET /{counter_name}/ to increment and get counter value",
    })
}

#[instrument(skip(state))]
async fn increment_handler(
    State(state): State<AppState>,
    counter_name: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    // a segment that isn't valid UTF-8 is just another bad name
    let Path(counter_name) =
        counter_name.map_err(|e| AppError::InvalidName(e.body_text()))?;
    let name = CounterName::validate(&counter_name)?;
    let value = state.increment(&name).await?;
    Ok((
        StatusCode::OK,
        Json(CounterOutput {
            counter: name.into_inner(),
            value,
        }),
    ))
}

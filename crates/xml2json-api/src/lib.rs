//! HTTP front end for xml2json
//!
//! `POST /api/convert` accepts an XML body and answers with the JSON
//! document. Converted documents can optionally be kept in a [`Store`] and
//! fetched again from `GET /api/documents/:id`.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use xml2json::{ConvertOptions, Style};

pub use config::{ApiConfig, ConfigError, StoreKind};
pub use error::ApiError;
pub use store::{MemoryStore, Store, StoreError};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub options: Arc<ConvertOptions>,
    pub style: Style,
    pub store: Option<Arc<dyn Store>>,
    pub body_limit: Option<usize>,
}

impl AppState {
    pub fn new(config: &ApiConfig) -> Self {
        let store: Option<Arc<dyn Store>> = match config.store {
            StoreKind::None => None,
            StoreKind::Memory => Some(Arc::new(MemoryStore::new(config.store_capacity))),
        };
        Self {
            options: Arc::new(config.convert_options()),
            style: config.style(),
            store,
            body_limit: config.body_limit(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = match state.body_limit {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("content-transfer-encoding"),
        ])
        .expose_headers([handlers::DOCUMENT_ID]);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/convert",
            post(handlers::convert).fallback(handlers::method_not_allowed),
        )
        .route("/api/documents/:id", get(handlers::get_document))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

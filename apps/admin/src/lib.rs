//! # Maestro Admin
//!
//! HTTP back-office for warehouses (bodegas), products (productos) and
//! sellers (vendedores).
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Client ──► SetRequestId ──► TraceLayer ──► Router ──► Handler          │
//! │                                                          │              │
//! │                                  ┌───────────────────────┤              │
//! │                                  ▼                       ▼              │
//! │                        maestro-core validation   dyn *Repository        │
//! │                                                   (SQLite or memory)    │
//! │                                                          │              │
//! │  Client ◄── PagePayload JSON / 303 + flash / 422 ◄───────┘              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod page;

use std::sync::Arc;

use axum::extract::Request;
use axum::routing::get;
use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use maestro_db::{
    Database, MemoryProductRepository, MemorySellerRepository, MemoryWarehouseRepository,
    ProductRepository, SellerRepository, WarehouseRepository,
};

use handlers::{product, seller, warehouse};

pub use config::{AdminConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
///
/// Handlers see only the repository traits, so the same router runs against
/// SQLite in production and in-memory repositories in tests.
#[derive(Clone)]
pub struct AppState {
    pub warehouses: Arc<dyn WarehouseRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub sellers: Arc<dyn SellerRepository>,
    /// Present when backed by SQLite; used by `/health`.
    pub database: Option<Database>,
}

impl AppState {
    /// State backed by the SQLite repositories of `db`.
    pub fn from_database(db: Database) -> Self {
        AppState {
            warehouses: Arc::new(db.warehouses()),
            products: Arc::new(db.products()),
            sellers: Arc::new(db.sellers()),
            database: Some(db),
        }
    }

    /// State backed by empty in-memory repositories.
    pub fn in_memory() -> Self {
        AppState {
            warehouses: Arc::new(MemoryWarehouseRepository::new()),
            products: Arc::new(MemoryProductRepository::new()),
            sellers: Arc::new(MemorySellerRepository::new()),
            database: None,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Bodegas
        .route("/bodegas", get(warehouse::index).post(warehouse::store))
        .route("/bodegas/create", get(warehouse::create))
        .route(
            "/bodegas/{id}",
            get(warehouse::show)
                .put(warehouse::update)
                .patch(warehouse::update)
                .delete(warehouse::destroy),
        )
        .route("/bodegas/{id}/edit", get(warehouse::edit))
        // Productos (no detail page)
        .route("/productos", get(product::index).post(product::store))
        .route("/productos/create", get(product::create))
        .route(
            "/productos/{id}",
            axum::routing::put(product::update)
                .patch(product::update)
                .delete(product::destroy),
        )
        .route("/productos/{id}/edit", get(product::edit))
        // Vendedores
        .route("/vendedores", get(seller::index).post(seller::store))
        .route("/vendedores/create", get(seller::create))
        .route(
            "/vendedores/{id}",
            get(seller::show)
                .put(seller::update)
                .patch(seller::update)
                .delete(seller::destroy),
        )
        .route("/vendedores/{id}/edit", get(seller::edit))
        // Layers run bottom-up: the id is set before the trace span reads it.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

// =============================================================================
// Unit Tests
// =============================================================================

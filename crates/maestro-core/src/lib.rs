//! # maestro-core: Pure Rules for the Maestro Back-Office
//!
//! This crate holds everything about warehouses, products and sellers that
//! can be decided without touching a database or a socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Maestro Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Client pages (React)                         │   │
//! │  │   bodegas ──► productos ──► vendedores   (table + dialogs)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (page payloads)                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    maestro-admin (axum)                         │   │
//! │  │    list, create, store, show, edit, update, destroy             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ maestro-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │validation │  │   page    │  │   │
//! │  │   │ Warehouse │  │   Money   │  │  FILLABLE │  │ ListPage  │  │   │
//! │  │   │  Product  │  │  es-CL    │  │  rules    │  │ Debouncer │  │   │
//! │  │   │  Seller   │  │  format   │  │  errors   │  │ FormDialog│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    maestro-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities, their mutable field sets, list filters and pages
//! - [`money`] - Integer money with decimal parsing and peso formatting
//! - [`error`] - Domain error types and field-keyed validation errors
//! - [`validation`] - Mass-assignment guard and per-entity rules
//! - [`page`] - Client-side list page state (dialogs, debounce, sorting)
//!
//! ## Example Usage
//!
//! ```rust
//! use maestro_core::validation::validate_product;
//! use serde_json::json;
//!
//! let payload = json!({
//!     "codigo": "SKU1",
//!     "descripcion": "Item",
//!     "precio_neto": 1000,
//!     "precio_bruto": "1190",
//!     "activo": "1",
//! });
//!
//! let fields = validate_product(payload.as_object().unwrap()).unwrap();
//! assert_eq!(fields.gross_price.cents(), 119_000);
//! assert!(fields.active);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod page;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, FieldErrors, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows per product page (cursor pagination).
pub const PRODUCT_PAGE_SIZE: u32 = 15;

/// Rows per seller page (offset pagination).
pub const SELLER_PAGE_SIZE: u32 = 10;

/// Quiet period after the last keystroke before a search is sent.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

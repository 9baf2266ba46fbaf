//! # Domain Types
//!
//! Entities, their mutable field sets, list filters and list pages.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Warehouse     │   │    Product      │   │     Seller      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  code (unique)  │   │  code (unique)  │   │  description    │       │
//! │  │  description    │   │  description    │   │  username       │       │
//! │  │  address?       │   │  net_price      │   │  branch         │       │
//! │  │  ecommerce      │   │  gross_price    │   │                 │       │
//! │  │                 │   │  active         │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Every entity has a `*Fields` twin: the allow-listed, validated         │
//! │  values a create or update may write. The id is never among them.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Rust fields are English; the serialized names are the ones the client
//! pages already use (`codigo`, `descripcion`, `bodega_ecommerce`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Display label for a yes/no flag.
///
/// ```rust
/// assert_eq!(maestro_core::yes_no(true), "Sí");
/// assert_eq!(maestro_core::yes_no(false), "No");
/// ```
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Sí"
    } else {
        "No"
    }
}

// =============================================================================
// Warehouse
// =============================================================================

/// A storage location (bodega).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Warehouse {
    pub id: i64,

    /// Business code, unique across warehouses (max 20 chars).
    #[serde(rename = "codigo")]
    pub code: String,

    #[serde(rename = "descripcion")]
    pub description: String,

    #[serde(rename = "direccion")]
    pub address: Option<String>,

    /// Whether this warehouse fulfils online orders.
    #[serde(rename = "bodega_ecommerce")]
    pub ecommerce: bool,
}

impl Warehouse {
    /// `Sí` / `No` label shown in the list table.
    pub fn ecommerce_label(&self) -> &'static str {
        yes_no(self.ecommerce)
    }
}

/// Validated values a warehouse create or update writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseFields {
    pub code: String,
    pub description: String,
    pub address: Option<String>,
    /// An absent flag means "not an e-commerce warehouse", like an unchecked box.
    pub ecommerce: bool,
}

impl WarehouseFields {
    /// Payload keys a warehouse write may carry.
    pub const FILLABLE: &'static [&'static str] =
        &["codigo", "descripcion", "direccion", "bodega_ecommerce"];

    pub const CODE_MAX: usize = 20;
    pub const DESCRIPTION_MAX: usize = 150;
    pub const ADDRESS_MAX: usize = 255;
}

impl From<Warehouse> for WarehouseFields {
    fn from(w: Warehouse) -> Self {
        WarehouseFields {
            code: w.code,
            description: w.description,
            address: w.address,
            ecommerce: w.ecommerce,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable item (producto).
///
/// Prices are held as [`Money`] and serialized as decimal strings
/// (`"1190.00"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Business code, unique across products.
    #[serde(rename = "codigo")]
    pub code: String,

    #[serde(rename = "descripcion")]
    pub description: String,

    /// Price before tax.
    #[serde(rename = "precio_neto")]
    #[ts(type = "string")]
    pub net_price: Money,

    /// Price including tax.
    #[serde(rename = "precio_bruto")]
    #[ts(type = "string")]
    pub gross_price: Money,

    #[serde(rename = "activo")]
    pub active: bool,
}

impl Product {
    /// `Sí` / `No` label for the status column.
    pub fn active_label(&self) -> &'static str {
        yes_no(self.active)
    }
}

/// Validated values a product create or update writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub code: String,
    pub description: String,
    pub net_price: Money,
    pub gross_price: Money,
    pub active: bool,
}

impl ProductFields {
    /// Payload keys a product write may carry.
    pub const FILLABLE: &'static [&'static str] = &[
        "codigo",
        "descripcion",
        "precio_neto",
        "precio_bruto",
        "activo",
    ];

    pub const CODE_MAX: usize = 255;
    pub const DESCRIPTION_MAX: usize = 255;
}

impl From<Product> for ProductFields {
    fn from(p: Product) -> Self {
        ProductFields {
            code: p.code,
            description: p.description,
            net_price: p.net_price,
            gross_price: p.gross_price,
            active: p.active,
        }
    }
}

// =============================================================================
// Seller
// =============================================================================

/// A salesperson account (vendedor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Seller {
    pub id: i64,

    #[serde(rename = "descripcion")]
    pub description: String,

    /// Login name.
    #[serde(rename = "usuario")]
    pub username: String,

    /// Branch (store) the seller belongs to.
    #[serde(rename = "sucursal")]
    pub branch: String,
}

/// Validated values a seller create or update writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerFields {
    pub description: String,
    pub username: String,
    pub branch: String,
}

impl SellerFields {
    /// Payload keys a seller write may carry.
    pub const FILLABLE: &'static [&'static str] = &["descripcion", "usuario", "sucursal"];

    pub const USERNAME_MAX: usize = 255;
    pub const BRANCH_MAX: usize = 255;
}

impl From<Seller> for SellerFields {
    fn from(s: Seller) -> Self {
        SellerFields {
            description: s.description,
            username: s.username,
            branch: s.branch,
        }
    }
}

// =============================================================================
// List Filters
// =============================================================================

/// Product status filter, sent as `status=1` / `status=0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StatusFilter {
    #[serde(rename = "1")]
    Active,
    #[serde(rename = "0")]
    Inactive,
}

impl StatusFilter {
    /// Parses a query-string value. Empty, `all` and unknown values yield `None`.
    ///
    /// ```rust
    /// use maestro_core::StatusFilter;
    ///
    /// assert_eq!(StatusFilter::parse("1"), Some(StatusFilter::Active));
    /// assert_eq!(StatusFilter::parse("0"), Some(StatusFilter::Inactive));
    /// assert_eq!(StatusFilter::parse("all"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(StatusFilter::Active),
            "0" => Some(StatusFilter::Inactive),
            _ => None,
        }
    }

    /// The `active` column value this filter selects.
    pub fn is_active(self) -> bool {
        matches!(self, StatusFilter::Active)
    }

    /// Query-string form.
    pub fn as_param(self) -> &'static str {
        match self {
            StatusFilter::Active => "1",
            StatusFilter::Inactive => "0",
        }
    }
}

/// Filter state of a list page, echoed back to the client on every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ListFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusFilter>,
}

impl ListFilters {
    /// Builds filters from raw query parameters.
    ///
    /// The search term is trimmed; blank terms become `None`.
    pub fn from_query(search: Option<&str>, status: Option<&str>) -> Self {
        ListFilters {
            search: search.and_then(crate::validation::normalize_search),
            status: status.and_then(StatusFilter::parse),
        }
    }

    /// Filters with only a search term.
    pub fn search(term: &str) -> Self {
        ListFilters::from_query(Some(term), None)
    }

    /// Returns the search term, or `""` when there is none.
    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    /// True when neither a search term nor a status is set.
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.status.is_none()
    }
}

// =============================================================================
// Pages
// =============================================================================

/// A cursor-paginated slice of a list, newest first.
///
/// Cursors are opaque to everything but the repository that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub data: Vec<T>,
    pub per_page: u32,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
}

/// A page plus the number of rows matching its filter across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counted<P> {
    pub paginator: P,
    pub total: u64,
}

/// An offset-paginated slice of a list (`page` is 1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPage<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// 1-based position of the first row on this page, `None` when empty.
    pub from: Option<u64>,
    /// 1-based position of the last row on this page, `None` when empty.
    pub to: Option<u64>,
}

impl<T> OffsetPage<T> {
    /// Assembles a page from one slice of rows and the overall total.
    pub fn new(data: Vec<T>, current_page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let last_page = (total.div_ceil(u64::from(per_page))).max(1) as u32;
        let offset = u64::from(current_page.saturating_sub(1)) * u64::from(per_page);
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + data.len() as u64))
        };

        OffsetPage {
            data,
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
        }
    }

    /// Previous page number, if any.
    pub fn prev_page(&self) -> Option<u32> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    /// Next page number, if any.
    pub fn next_page(&self) -> Option<u32> {
        (self.current_page < self.last_page).then(|| self.current_page + 1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: 7,
            code: "SKU1".into(),
            description: "Widget Azul".into(),
            net_price: Money::from_units(1000),
            gross_price: Money::from_units(1190),
            active: true,
        }
    }

    #[test]
    fn test_warehouse_wire_names() {
        let w = Warehouse {
            id: 1,
            code: "BP1".into(),
            description: "Bodega Principal".into(),
            address: None,
            ecommerce: false,
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["codigo"], "BP1");
        assert_eq!(json["descripcion"], "Bodega Principal");
        assert!(json["direccion"].is_null());
        assert_eq!(json["bodega_ecommerce"], false);
        assert_eq!(w.ecommerce_label(), "No");
    }

    #[test]
    fn test_product_prices_serialize_as_decimal_strings() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert_eq!(json["precio_neto"], "1000.00");
        assert_eq!(json["precio_bruto"], "1190.00");
        assert_eq!(json["activo"], true);
    }

    #[test]
    fn test_fields_from_entity_prefill() {
        let fields = ProductFields::from(sample_product());
        assert_eq!(fields.code, "SKU1");
        assert_eq!(fields.gross_price.cents(), 119_000);
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(StatusFilter::parse(""), None);
        assert_eq!(StatusFilter::parse("2"), None);
        assert!(StatusFilter::Active.is_active());
        assert_eq!(
            serde_json::to_value(StatusFilter::Inactive).unwrap(),
            serde_json::json!("0")
        );
    }

    #[test]
    fn test_list_filters_from_query() {
        let filters = ListFilters::from_query(Some("  widget "), Some("1"));
        assert_eq!(filters.search.as_deref(), Some("widget"));
        assert_eq!(filters.status, Some(StatusFilter::Active));

        let empty = ListFilters::from_query(Some("   "), Some("all"));
        assert!(empty.is_empty());
        assert_eq!(serde_json::to_value(&empty).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_offset_page_bounds() {
        let page = OffsetPage::new(vec![1, 2, 3], 2, 10, 23);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.from, Some(11));
        assert_eq!(page.to, Some(13));
        assert_eq!(page.prev_page(), Some(1));
        assert_eq!(page.next_page(), Some(3));

        let empty: OffsetPage<i32> = OffsetPage::new(vec![], 1, 10, 0);
        assert_eq!(empty.last_page, 1);
        assert_eq!(empty.from, None);
        assert_eq!(empty.next_page(), None);
        assert_eq!(empty.prev_page(), None);
    }
}

//! # Page Payloads
//!
//! Every GET answers with the same envelope; the client picks the page to
//! render from `component` and feeds it `props`.
//!
//! ```json
//! {
//!   "component": "productos",
//!   "props": {
//!     "productos": { "paginator": { "data": [...], "next_page_url": "/productos?cursor=..." }, "total": 42 },
//!     "filters": { "search": "leche", "status": "1" }
//!   },
//!   "url": "/productos?search=leche&status=1",
//!   "flash": { "message": null }
//! }
//! ```
//!
//! Paginator URLs keep the current filters so the next/previous links stay
//! on the filtered list.

use axum::http::header::SET_COOKIE;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::form_urlencoded;

use maestro_core::{CursorPage, ListFilters, OffsetPage};

use crate::flash::{self, Flash, FlashProps};

// =============================================================================
// Envelope
// =============================================================================

/// The JSON body of every page response.
#[derive(Debug, Clone, Serialize)]
pub struct PagePayload {
    pub component: &'static str,
    pub props: Value,
    pub url: String,
    pub flash: FlashProps,
}

/// A rendered page. Clears the flash cookie when it consumed a message.
#[derive(Debug, Clone)]
pub struct Page {
    payload: PagePayload,
    consumed_flash: bool,
}

impl Page {
    pub fn render(component: &'static str, uri: &Uri, props: Value, flash: Flash) -> Self {
        let consumed_flash = flash.is_some();
        Page {
            payload: PagePayload {
                component,
                props,
                url: request_url(uri),
                flash: flash.into_props(),
            },
            consumed_flash,
        }
    }

    pub fn payload(&self) -> &PagePayload {
        &self.payload
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut response = Json(self.payload).into_response();
        if self.consumed_flash {
            response
                .headers_mut()
                .append(SET_COOKIE, flash::clear_cookie());
        }
        response
    }
}

/// Path plus query of the request, as the client addressed it.
fn request_url(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

// =============================================================================
// List Query
// =============================================================================

/// Query parameters accepted by the list routes.
///
/// Everything arrives as text so malformed values degrade to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub cursor: Option<String>,
    pub page: Option<String>,
}

impl ListQuery {
    /// Search and status filters.
    pub fn filters(&self) -> ListFilters {
        ListFilters::from_query(self.search.as_deref(), self.status.as_deref())
    }

    /// Search filter only, for resources without a status.
    pub fn search_filters(&self) -> ListFilters {
        ListFilters::from_query(self.search.as_deref(), None)
    }

    /// 1-based page number; anything unparsable is page 1.
    pub fn page_number(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

// =============================================================================
// Paginator JSON
// =============================================================================

/// `path?search=..&status=..&{key}={value}`.
pub fn list_url(path: &str, filters: &ListFilters, extra: Option<(&str, &str)>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(search) = &filters.search {
        query.append_pair("search", search);
    }
    if let Some(status) = filters.status {
        query.append_pair("status", status.as_param());
    }
    if let Some((key, value)) = extra {
        query.append_pair(key, value);
    }

    let query = query.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Cursor paginator with navigation links.
pub fn cursor_paginator<T: Serialize>(
    page: &CursorPage<T>,
    path: &str,
    filters: &ListFilters,
) -> Value {
    let link = |cursor: &Option<String>| {
        cursor
            .as_deref()
            .map(|c| list_url(path, filters, Some(("cursor", c))))
    };

    json!({
        "data": page.data,
        "path": path,
        "per_page": page.per_page,
        "next_cursor": page.next_cursor,
        "next_page_url": link(&page.next_cursor),
        "prev_cursor": page.prev_cursor,
        "prev_page_url": link(&page.prev_cursor),
    })
}

/// Offset paginator with navigation links.
pub fn offset_paginator<T: Serialize>(
    page: &OffsetPage<T>,
    path: &str,
    filters: &ListFilters,
) -> Value {
    let link = |n: u32| list_url(path, filters, Some(("page", &n.to_string())));

    json!({
        "data": page.data,
        "current_page": page.current_page,
        "last_page": page.last_page,
        "per_page": page.per_page,
        "total": page.total,
        "from": page.from,
        "to": page.to,
        "path": path,
        "first_page_url": link(1),
        "last_page_url": link(page.last_page),
        "next_page_url": page.next_page().map(link),
        "prev_page_url": page.prev_page().map(link),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_core::StatusFilter;

    #[test]
    fn test_list_url_keeps_filters() {
        let filters = ListFilters::from_query(Some("leche entera"), Some("1"));
        assert_eq!(
            list_url("/productos", &filters, Some(("cursor", "abc"))),
            "/productos?search=leche+entera&status=1&cursor=abc"
        );
        assert_eq!(list_url("/bodegas", &ListFilters::default(), None), "/bodegas");
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery {
            page: Some("abc".into()),
            cursor: Some(String::new()),
            status: Some("7".into()),
            ..Default::default()
        };
        assert_eq!(query.page_number(), 1);
        assert_eq!(query.cursor(), None);
        assert_eq!(query.filters().status, None);

        let query = ListQuery {
            page: Some("3".into()),
            status: Some("0".into()),
            ..Default::default()
        };
        assert_eq!(query.page_number(), 3);
        assert_eq!(query.filters().status, Some(StatusFilter::Inactive));
        assert_eq!(query.search_filters().status, None);
    }

    #[test]
    fn test_offset_paginator_links() {
        let page = OffsetPage::new(vec![1, 2], 2, 10, 25);
        let filters = ListFilters::search("ana");
        let json = offset_paginator(&page, "/vendedores", &filters);

        assert_eq!(json["total"], 25);
        assert_eq!(json["prev_page_url"], "/vendedores?search=ana&page=1");
        assert_eq!(json["next_page_url"], "/vendedores?search=ana&page=3");
        assert_eq!(json["last_page_url"], "/vendedores?search=ana&page=3");
        assert_eq!(json["from"], 11);
    }

    #[test]
    fn test_cursor_paginator_links() {
        let page = CursorPage {
            data: vec!["a"],
            per_page: 15,
            next_cursor: Some("n".to_string()),
            prev_cursor: None,
        };
        let json = cursor_paginator(&page, "/productos", &ListFilters::default());
        assert_eq!(json["next_page_url"], "/productos?cursor=n");
        assert!(json["prev_page_url"].is_null());
    }

    #[test]
    fn test_page_envelope() {
        let uri: Uri = "/bodegas?search=x".parse().unwrap();
        let page = Page::render("bodegas", &uri, json!({"bodegas": []}), Flash(Some("ok".into())));
        assert_eq!(page.payload().url, "/bodegas?search=x");

        let response = page.into_response();
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));

        let quiet = Page::render("bodegas", &uri, json!({}), Flash(None)).into_response();
        assert!(quiet.headers().get(SET_COOKIE).is_none());
    }
}

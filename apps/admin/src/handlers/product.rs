//! Product (producto) pages and form submissions.
//!
//! The list is cursor paginated, 15 per page, newest first, filtered by
//! `search` (code or description) and `status` (`1` active, `0` inactive).
//! `total` counts every matching row, not just the page.

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::Response;
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use maestro_core::validation::{duplicate_code, validate_product, Payload};
use maestro_core::ProductFields;

use super::{fillable, parse_id, submitted_code, validated};
use crate::error::{ApiError, ApiResult};
use crate::flash::{redirect_with, Flash};
use crate::page::{cursor_paginator, ListQuery, Page};
use crate::AppState;

const INDEX: &str = "/productos";
const RESOURCE: &str = "Producto";

/// `GET /productos`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    uri: Uri,
    flash: Flash,
) -> ApiResult<Page> {
    let filters = query.filters();
    let page = state.products.list(&filters, query.cursor()).await?;

    Ok(Page::render(
        "productos",
        &uri,
        json!({
            "productos": {
                "paginator": cursor_paginator(&page.paginator, INDEX, &filters),
                "total": page.total,
            },
            "filters": filters,
        }),
        flash,
    ))
}

/// `GET /productos/create`
pub async fn create(Query(query): Query<ListQuery>, uri: Uri, flash: Flash) -> Page {
    Page::render(
        "Productos/Crear",
        &uri,
        json!({ "filters": query.filters() }),
        flash,
    )
}

/// `POST /productos`
pub async fn store(
    State(state): State<AppState>,
    Json(payload): Json<Payload>,
) -> ApiResult<Response> {
    let fields = checked(&state, &payload, None).await?;

    let producto = state
        .products
        .create(&fields)
        .await
        .map_err(|e| ApiError::from_write(e, &fields.code))?;
    info!(id = producto.id, code = %producto.code, "Product created");

    Ok(redirect_with(INDEX, "Producto creado exitosamente."))
}

/// `GET /productos/{id}/edit`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
    uri: Uri,
    flash: Flash,
) -> ApiResult<Page> {
    let id = parse_id(&id, RESOURCE)?;
    let producto = state
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(RESOURCE, id))?;

    Ok(Page::render(
        "Productos/Editar",
        &uri,
        json!({ "producto": producto, "filters": query.filters() }),
        flash,
    ))
}

/// `PUT|PATCH /productos/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Payload>,
) -> ApiResult<Response> {
    let id = parse_id(&id, RESOURCE)?;
    let fields = checked(&state, &payload, Some(id)).await?;

    let updated = state
        .products
        .update(id, &fields)
        .await
        .map_err(|e| ApiError::from_write(e, &fields.code))?;
    match updated {
        Some(producto) => info!(id, code = %producto.code, "Product updated"),
        None => warn!(id, "Update of missing product"),
    }

    Ok(redirect_with(INDEX, "Producto actualizado exitosamente."))
}

/// `DELETE /productos/{id}`
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let removed = match parse_id(&id, RESOURCE) {
        Ok(id) => state.products.delete(id).await?,
        Err(_) => false,
    };
    if removed {
        info!(id = %id, "Product deleted");
    } else {
        warn!(id = %id, "Delete of missing product");
    }

    Ok(redirect_with(INDEX, "Producto eliminado exitosamente."))
}

async fn checked(
    state: &AppState,
    payload: &Payload,
    except_id: Option<i64>,
) -> ApiResult<ProductFields> {
    let payload = fillable(payload, ProductFields::FILLABLE, "productos");

    let mut duplicate = None;
    if let Some(code) = submitted_code(&payload, ProductFields::CODE_MAX) {
        if state.products.code_taken(&code, except_id).await? {
            duplicate = Some(duplicate_code(&code));
        }
    }

    validated(validate_product(&payload), duplicate)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    use super::super::test_support::*;

    async fn create(app: &Router, code: &str, description: &str, active: bool) {
        let response = send(
            app,
            Method::POST,
            "/productos",
            Some(json!({
                "codigo": code,
                "descripcion": description,
                "precio_neto": 1000,
                "precio_bruto": "1190.00",
                "activo": active,
            })),
        )
        .await;
        assert_redirect(&response, "/productos");
    }

    fn codes(page: &Value) -> Vec<String> {
        page["props"]["productos"]["paginator"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["codigo"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_status_filter_scenario() {
        let app = app();
        create(&app, "SKU1", "Item", true).await;

        let (_, inactive) = get_json(&app, "/productos?status=0").await;
        assert_eq!(inactive["props"]["productos"]["total"], 0);
        assert_eq!(inactive["props"]["filters"]["status"], "0");

        let (_, active) = get_json(&app, "/productos?status=1").await;
        assert_eq!(codes(&active), ["SKU1"]);
        let row = &active["props"]["productos"]["paginator"]["data"][0];
        assert_eq!(row["activo"], true);
        assert_eq!(row["precio_neto"], "1000.00");
        assert_eq!(row["precio_bruto"], "1190.00");

        let (_, unknown_status) = get_json(&app, "/productos?status=maybe").await;
        assert_eq!(unknown_status["props"]["productos"]["total"], 1);
        assert!(unknown_status["props"]["filters"].get("status").is_none());
    }

    #[tokio::test]
    async fn test_case_insensitive_search() {
        let app = app();
        create(&app, "SKU1", "Widget Azul", true).await;
        create(&app, "SKU2", "Tornillo", true).await;

        for term in ["widget", "AZUL", "sku1"] {
            let (_, page) = get_json(&app, &format!("/productos?search={term}")).await;
            assert_eq!(codes(&page), ["SKU1"], "search {term}");
        }
    }

    #[tokio::test]
    async fn test_cursor_pages_keep_filters() {
        let app = app();
        for i in 0..17 {
            create(&app, &format!("P{i:02}"), "Leche Entera", true).await;
        }
        create(&app, "OTRO", "Arroz", true).await;

        let (_, first) = get_json(&app, "/productos?search=leche").await;
        let productos = &first["props"]["productos"];
        assert_eq!(productos["total"], 17);
        assert_eq!(productos["paginator"]["data"].as_array().unwrap().len(), 15);
        assert!(productos["paginator"]["prev_page_url"].is_null());

        let next = productos["paginator"]["next_page_url"].as_str().unwrap();
        assert!(next.starts_with("/productos?search=leche&cursor="));

        let (_, second) = get_json(&app, next).await;
        assert_eq!(codes(&second), ["P01", "P00"]);
        assert_eq!(second["props"]["productos"]["total"], 17);
        assert!(second["props"]["productos"]["paginator"]["prev_page_url"].is_string());
    }

    #[tokio::test]
    async fn test_price_rules() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/productos",
            Some(json!({
                "codigo": "SKU1",
                "descripcion": "Widget",
                "precio_neto": -1,
                "precio_bruto": "abc",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let errors = json_body(response).await["errors"].clone();
        assert!(errors.get("precio_neto").is_some());
        assert!(errors.get("precio_bruto").is_some());
        assert!(errors.get("activo").is_some());
        assert!(errors.get("codigo").is_none());
    }

    #[tokio::test]
    async fn test_edit_update_delete() {
        let app = app();
        create(&app, "SKU1", "Widget", true).await;

        let (status, page) = get_json(&app, "/productos/1/edit").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["component"], "Productos/Editar");
        assert_eq!(page["props"]["producto"]["codigo"], "SKU1");

        let response = send(
            &app,
            Method::PUT,
            "/productos/1",
            Some(json!({
                "codigo": "SKU1",
                "descripcion": "Widget Rojo",
                "precio_neto": "2000",
                "precio_bruto": 2380,
                "activo": "0",
            })),
        )
        .await;
        let cookie = assert_redirect(&response, "/productos");

        let page = json_body(get_with_cookie(&app, "/productos", &cookie).await).await;
        assert_eq!(page["flash"]["message"], "Producto actualizado exitosamente.");
        assert_eq!(page["props"]["productos"]["paginator"]["data"][0]["activo"], false);
        assert_eq!(page["props"]["productos"]["paginator"]["data"][0]["precio_neto"], "2000.00");

        assert_redirect(&send(&app, Method::DELETE, "/productos/1", None).await, "/productos");
        let (status, _) = get_json(&app, "/productos/1/edit").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_no_detail_page() {
        let app = app();
        create(&app, "SKU1", "Widget", true).await;
        let response = send(&app, Method::GET, "/productos/1", None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

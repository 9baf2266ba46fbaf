//! Warehouse (bodega) pages and form submissions.
//!
//! The list is not paginated and ignores the search term: the page filters
//! the full collection on the client. `search` is still echoed back in
//! `filters`.

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::Response;
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use maestro_core::validation::{duplicate_code, validate_warehouse, Payload};
use maestro_core::WarehouseFields;

use super::{fillable, parse_id, submitted_code, validated};
use crate::error::{ApiError, ApiResult};
use crate::flash::{redirect_with, Flash};
use crate::page::{ListQuery, Page};
use crate::AppState;

const INDEX: &str = "/bodegas";
const RESOURCE: &str = "Bodega";

/// `GET /bodegas`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    uri: Uri,
    flash: Flash,
) -> ApiResult<Page> {
    let filters = query.search_filters();
    let bodegas = state.warehouses.list(&filters).await?;

    Ok(Page::render(
        "bodegas",
        &uri,
        json!({ "bodegas": bodegas, "filters": filters }),
        flash,
    ))
}

/// `GET /bodegas/create`
pub async fn create(Query(query): Query<ListQuery>, uri: Uri, flash: Flash) -> Page {
    Page::render(
        "Bodegas/Crear",
        &uri,
        json!({ "filters": query.search_filters() }),
        flash,
    )
}

/// `POST /bodegas`
pub async fn store(
    State(state): State<AppState>,
    Json(payload): Json<Payload>,
) -> ApiResult<Response> {
    let fields = checked(&state, &payload, None).await?;

    let bodega = state
        .warehouses
        .create(&fields)
        .await
        .map_err(|e| ApiError::from_write(e, &fields.code))?;
    info!(id = bodega.id, code = %bodega.code, "Warehouse created");

    Ok(redirect_with(INDEX, "Bodega creada exitosamente."))
}

/// `GET /bodegas/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
    uri: Uri,
    flash: Flash,
) -> ApiResult<Page> {
    let id = parse_id(&id, RESOURCE)?;
    let bodega = state
        .warehouses
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(RESOURCE, id))?;

    Ok(Page::render(
        "Bodegas/Show",
        &uri,
        json!({ "bodega": bodega, "filters": query.search_filters() }),
        flash,
    ))
}

/// `GET /bodegas/{id}/edit`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
    uri: Uri,
    flash: Flash,
) -> ApiResult<Page> {
    let id = parse_id(&id, RESOURCE)?;
    let bodega = state
        .warehouses
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(RESOURCE, id))?;

    Ok(Page::render(
        "Bodegas/Editar",
        &uri,
        json!({ "bodega": bodega, "filters": query.search_filters() }),
        flash,
    ))
}

/// `PUT|PATCH /bodegas/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Payload>,
) -> ApiResult<Response> {
    let id = parse_id(&id, RESOURCE)?;
    let fields = checked(&state, &payload, Some(id)).await?;

    let updated = state
        .warehouses
        .update(id, &fields)
        .await
        .map_err(|e| ApiError::from_write(e, &fields.code))?;
    match updated {
        Some(bodega) => info!(id, code = %bodega.code, "Warehouse updated"),
        None => warn!(id, "Update of missing warehouse"),
    }

    Ok(redirect_with(INDEX, "Bodega actualizada exitosamente."))
}

/// `DELETE /bodegas/{id}`
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let removed = match parse_id(&id, RESOURCE) {
        Ok(id) => state.warehouses.delete(id).await?,
        Err(_) => false,
    };
    if removed {
        info!(id = %id, "Warehouse deleted");
    } else {
        warn!(id = %id, "Delete of missing warehouse");
    }

    Ok(redirect_with(INDEX, "Bodega eliminada exitosamente."))
}

/// Allow-list, validate and probe the code of a warehouse submission.
async fn checked(
    state: &AppState,
    payload: &Payload,
    except_id: Option<i64>,
) -> ApiResult<WarehouseFields> {
    let payload = fillable(payload, WarehouseFields::FILLABLE, "bodegas");

    let mut duplicate = None;
    if let Some(code) = submitted_code(&payload, WarehouseFields::CODE_MAX) {
        if state.warehouses.code_taken(&code, except_id).await? {
            duplicate = Some(duplicate_code(&code));
        }
    }

    validated(validate_warehouse(&payload), duplicate)
}

// =============================================================================
// Unit Tests
// =============================================================================

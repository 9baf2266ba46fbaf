//! Seller (vendedor) pages and form submissions.
//!
//! The list is offset paginated, 10 per page, newest first, searched across
//! description, username and branch.

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::Response;
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use maestro_core::validation::{validate_seller, Payload};
use maestro_core::SellerFields;

use super::{fillable, parse_id};
use crate::error::{ApiError, ApiResult};
use crate::flash::{redirect_with, Flash};
use crate::page::{offset_paginator, ListQuery, Page};
use crate::AppState;

const INDEX: &str = "/vendedores";
const RESOURCE: &str = "Vendedor";

/// `GET /vendedores`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    uri: Uri,
    flash: Flash,
) -> ApiResult<Page> {
    let filters = query.search_filters();
    let page = state.sellers.list(&filters, query.page_number()).await?;

    Ok(Page::render(
        "vendedores",
        &uri,
        json!({
            "vendedores": offset_paginator(&page, INDEX, &filters),
            "filters": filters,
        }),
        flash,
    ))
}

/// `GET /vendedores/create`
pub async fn create(Query(query): Query<ListQuery>, uri: Uri, flash: Flash) -> Page {
    Page::render(
        "Vendedores/Crear",
        &uri,
        json!({ "filters": query.search_filters() }),
        flash,
    )
}

/// `POST /vendedores`
pub async fn store(
    State(state): State<AppState>,
    Json(payload): Json<Payload>,
) -> ApiResult<Response> {
    let fields = checked(&payload)?;
    let vendedor = state.sellers.create(&fields).await?;
    info!(id = vendedor.id, username = %vendedor.username, "Seller created");

    Ok(redirect_with(INDEX, "Vendedor creado exitosamente."))
}

/// `GET /vendedores/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
    uri: Uri,
    flash: Flash,
) -> ApiResult<Page> {
    let id = parse_id(&id, RESOURCE)?;
    let vendedor = state
        .sellers
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(RESOURCE, id))?;

    Ok(Page::render(
        "Vendedores/Show",
        &uri,
        json!({ "vendedor": vendedor, "filters": query.search_filters() }),
        flash,
    ))
}

/// `GET /vendedores/{id}/edit`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
    uri: Uri,
    flash: Flash,
) -> ApiResult<Page> {
    let id = parse_id(&id, RESOURCE)?;
    let vendedor = state
        .sellers
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(RESOURCE, id))?;

    Ok(Page::render(
        "Vendedores/Editar",
        &uri,
        json!({ "vendedor": vendedor, "filters": query.search_filters() }),
        flash,
    ))
}

/// `PUT|PATCH /vendedores/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Payload>,
) -> ApiResult<Response> {
    let id = parse_id(&id, RESOURCE)?;
    let fields = checked(&payload)?;

    match state.sellers.update(id, &fields).await? {
        Some(vendedor) => info!(id, username = %vendedor.username, "Seller updated"),
        None => warn!(id, "Update of missing seller"),
    }

    Ok(redirect_with(INDEX, "Vendedor actualizado exitosamente."))
}

/// `DELETE /vendedores/{id}`
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let removed = match parse_id(&id, RESOURCE) {
        Ok(id) => state.sellers.delete(id).await?,
        Err(_) => false,
    };
    if removed {
        info!(id = %id, "Seller deleted");
    } else {
        warn!(id = %id, "Delete of missing seller");
    }

    Ok(redirect_with(INDEX, "Vendedor eliminado exitosamente."))
}

fn checked(payload: &Payload) -> ApiResult<SellerFields> {
    let payload = fillable(payload, SellerFields::FILLABLE, "vendedores");
    validate_seller(&payload).map_err(ApiError::validation)
}

// =============================================================================
// Unit Tests
// =============================================================================

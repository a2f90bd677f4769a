//! CRUD routes for one collection.
//!
//! The same handlers serve every collection; the [`Collection`] state
//! supplies the table, field list and messages:
//! - GET /{collection} - List all rows
//! - GET /{collection}/{id} - Get one row
//! - POST /{collection} - Create a row
//! - PUT /{collection}/{id} - Overwrite a row
//! - DELETE /{collection}/{id} - Delete a row

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use logbook_core::{Record, column_values, created_response, validate_create};

use crate::error::{ApiError, ApiResult, MessageResponse};
use crate::extract::JsonBody;
use crate::state::Collection;

/// GET /{collection} - All rows in storage order.
async fn list_rows(State(collection): State<Collection>) -> ApiResult<Json<Vec<Record>>> {
    let rows = collection.store().list(collection.spec()).await?;
    Ok(Json(rows))
}

/// GET /{collection}/{id} - One row, or 404.
async fn get_row(
    State(collection): State<Collection>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record>> {
    let spec = collection.spec();

    collection
        .store()
        .get(spec, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(spec.not_found_message()))
}

/// POST /{collection} - Validate, insert, and echo the new row.
///
/// # Response
///
/// - 201 Created: the row with its assigned `id`
/// - 400 Bad Request: a required field is missing or falsy
async fn create_row(
    State(collection): State<Collection>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let spec = collection.spec();
    validate_create(spec, &body)?;

    let id = collection
        .store()
        .insert(spec, &column_values(spec, &body))
        .await?;

    tracing::info!(collection = spec.name, id, "Created row");
    Ok((StatusCode::CREATED, Json(created_response(spec, id, &body))))
}

/// PUT /{collection}/{id} - Overwrite every field of a row.
///
/// Fields missing from the body are written as NULL.
async fn update_row(
    State(collection): State<Collection>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<MessageResponse>> {
    let spec = collection.spec();

    let affected = collection
        .store()
        .update(spec, &id, &column_values(spec, &body))
        .await?;

    if affected == 0 {
        return Err(ApiError::NotFound(spec.not_found_message()));
    }

    Ok(Json(MessageResponse::new(spec.updated_message())))
}

/// DELETE /{collection}/{id} - Remove a row.
async fn delete_row(
    State(collection): State<Collection>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let spec = collection.spec();

    let affected = collection.store().delete(spec, &id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound(spec.not_found_message()));
    }

    tracing::info!(collection = spec.name, id = %id, "Deleted row");
    Ok(Json(MessageResponse::new(spec.deleted_message())))
}

/// Build the CRUD routes for one collection.
pub fn routes(collection: Collection) -> Router {
    let base = format!("/{}", collection.spec().name);
    let item = format!("{base}/{{id}}");

    Router::new()
        .route(&base, get(list_rows).post(create_row))
        .route(&item, get(get_row).put(update_row).delete(delete_row))
        .with_state(collection)
}

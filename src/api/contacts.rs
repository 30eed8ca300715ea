//! Contact API handlers
//!
//! Contains HTTP request handlers for contact CRUD and search.

use crate::api::ApiState;
use crate::contacts::{Contact, ContactUpdate, ListParams, NewContact};
use crate::error::AppError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
}

/// GET /contacts - List contacts with optional search and pagination
pub async fn list_contacts(
    State(db): State<ApiState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let contacts = db.list(&params).await?;
    Ok(Json(contacts))
}

/// GET /contacts/:id - Get a specific contact
pub async fn get_contact(
    State(db): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, AppError> {
    let contact = db.get(id).await?.ok_or(AppError::ContactNotFound(id))?;
    Ok(Json(contact))
}

/// POST /contacts - Create a new contact
pub async fn create_contact(
    State(db): State<ApiState>,
    Json(request): Json<NewContact>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact = db.create(request).await?;
    tracing::info!(contact_id = contact.id, "Contact created");
    Ok((StatusCode::CREATED, Json(contact)))
}

/// PUT /contacts/:id - Update the supplied fields of a contact
pub async fn update_contact(
    State(db): State<ApiState>,
    Path(id): Path<i64>,
    Json(request): Json<ContactUpdate>,
) -> Result<Json<Contact>, AppError> {
    let contact = db.update(id, request).await?;
    Ok(Json(contact))
}

/// DELETE /contacts/:id - Delete a contact
pub async fn delete_contact(
    State(db): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    db.delete(id).await?;
    tracing::info!(contact_id = id, "Contact deleted");

    Ok(Json(MessageResponse {
        message: "Contact deleted successfully".to_string(),
    }))
}

/// GET /contacts/search/:term - Every contact matching the term, unpaginated
pub async fn search_contacts(
    State(db): State<ApiState>,
    Path(term): Path<String>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let contacts = db.search(&term).await?;
    Ok(Json(contacts))
}

use std::io::ErrorKind;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::files::registry::FileListing;
use crate::identity::UserEmail;
use crate::state::AppState;

const STATIC_CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// GET /resume/files
pub async fn handle_list_files(
    State(state): State<AppState>,
    UserEmail(email): UserEmail,
) -> Result<Json<FileListing>, AppError> {
    let Some(email) = email else {
        return Ok(Json(FileListing::default()));
    };
    Ok(Json(state.registry.list(&email).await?))
}

/// DELETE /resume/files/:file_name
pub async fn handle_delete_file(
    State(state): State<AppState>,
    UserEmail(email): UserEmail,
    Path(file_name): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let Some(email) = email else {
        return Ok(Json(DeleteResponse { ok: false }));
    };
    state.registry.delete(&email, &file_name).await?;
    Ok(Json(DeleteResponse { ok: true }))
}

/// GET /static/:user_dir/:file_name
///
/// Serves a generated document with an explicit content type and a one-hour cache lifetime.
pub async fn handle_static_file(
    State(state): State<AppState>,
    Path((user_dir, file_name)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound(format!("File {file_name} not found"));

    let (path, ext) = state
        .registry
        .resolve_static(&user_dir, &file_name)
        .ok_or_else(not_found)?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, ext.content_type())
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{file_name}\""),
        )
        .header(header::CACHE_CONTROL, STATIC_CACHE_CONTROL)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.into()))
}

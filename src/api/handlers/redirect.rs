//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Every successful redirect counts one click. Expired links behave exactly
/// like unknown ones.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state
        .url_service
        .resolve(&code)
        .await?
        .ok_or_else(|| AppError::short_code_not_found(&code))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]))
}

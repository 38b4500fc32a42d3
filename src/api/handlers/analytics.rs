//! Handler for click counts.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::AppError;
use crate::state::AppState;

/// Returns the number of recorded clicks for a short code.
///
/// # Endpoint
///
/// `GET /api/analytics/{code}`
///
/// # Response
///
/// A bare JSON integer. Unknown codes report `0`; expired codes keep the count
/// they reached while live.
pub async fn click_count_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<u64>, AppError> {
    let count = state.url_service.click_count(&code).await?;
    Ok(Json(count))
}

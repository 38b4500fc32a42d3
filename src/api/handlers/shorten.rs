//! Handlers for link shortening endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{
    BulkShortenRequest, BulkShortenResponse, ShortenRequest, ShortenResponse,
};
use crate::domain::entities::{NewMapping, ShortenedUrl};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "https://example.com",
///   "customShortCode": "promo",  // optional
///   "ttlSeconds": 3600           // optional
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "shortUrl": "http://localhost:3000/promo",
///   "originalUrl": "https://example.com",
///   "shortCode": "promo"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the custom code is already taken.
/// Returns 429 Too Many Requests if the client is over its admission limit.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let created = state
        .url_service
        .shorten(NewMapping::from(payload))
        .await?;

    Ok(Json(to_response(&state, created)))
}

/// Creates short links for several URLs in order.
///
/// # Endpoint
///
/// `POST /api/shorten/bulk`
///
/// # Request Body
///
/// ```json
/// { "requests": [ { "originalUrl": "https://a.com" }, { "originalUrl": "https://b.com" } ] }
/// ```
///
/// # Response
///
/// ```json
/// { "responses": [ { "shortUrl": "...", "originalUrl": "https://a.com", "shortCode": "1" }, ... ] }
/// ```
///
/// # Errors
///
/// The first failing item aborts the batch and its error is returned.
/// Items created before it are kept.
pub async fn bulk_shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<BulkShortenRequest>,
) -> Result<Json<BulkShortenResponse>, AppError> {
    payload.validate()?;

    let inputs = payload
        .requests
        .into_iter()
        .map(NewMapping::from)
        .collect();

    let created = state.url_service.bulk_shorten(inputs).await?;

    Ok(Json(BulkShortenResponse {
        responses: created
            .into_iter()
            .map(|item| to_response(&state, item))
            .collect(),
    }))
}

fn to_response(state: &AppState, created: ShortenedUrl) -> ShortenResponse {
    ShortenResponse {
        short_url: state.short_url(&created.short_code),
        original_url: created.original_url,
        short_code: created.short_code,
    }
}

//! API route configuration.
//!
//! Write endpoints sit behind [`crate::api::middleware::admission`].

use crate::api::handlers::{bulk_shorten_handler, click_count_handler, shorten_handler};
use crate::api::middleware::admission;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// All routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`           - Create one short link (admission controlled)
/// - `POST /shorten/bulk`      - Create several short links (admission controlled)
/// - `GET  /analytics/{code}`  - Click count for a short code
pub fn api_routes(state: AppState) -> Router<AppState> {
    let writes = Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/bulk", post(bulk_shorten_handler))
        .route_layer(middleware::from_fn_with_state(state, admission::layer));

    Router::new()
        .merge(writes)
        .route("/analytics/{code}", get(click_count_handler))
}

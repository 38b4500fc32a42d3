//! Per-client admission control for the write path.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_key::client_key;

/// Rejects requests from clients that used up their current window.
///
/// The client key is the peer IP, or the forwarded client IP when the
/// service runs with `BEHIND_PROXY=true` (see [`client_key`]). One HTTP
/// request consumes one slot regardless of how many links it creates.
///
/// # Errors
///
/// Returns `429 Too Many Requests` when the window is exhausted.
///
/// # Example
///
/// ```rust,ignore
/// let writes = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), admission::layer));
/// ```
pub async fn layer(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(req.headers(), peer, state.behind_proxy);

    if !state.admission.is_allowed(&key) {
        let config = state.admission.config();
        warn!(client = %key, "Admission denied");
        return Err(AppError::too_many_requests(
            "Too many requests",
            json!({
                "maxRequests": config.max_requests,
                "windowSeconds": config.window_seconds,
            }),
        ));
    }

    Ok(next.run(req).await)
}

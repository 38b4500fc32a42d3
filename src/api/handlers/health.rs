//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::application::resilience::BreakerState;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: Mapping store round trip (Redis PING or in-memory)
/// 2. **Analytics Queue**: Checks if channel is open and reports free slots
/// 3. **Circuit Breaker**: Reports the breaker state; open counts as degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Store reachable" },
///     "analytics_queue": { "status": "ok", "message": "Capacity: 10000" },
///     "circuit_breaker": { "status": "ok", "message": "closed" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let queue_check = check_analytics_queue(&state);
    let breaker_check = check_breaker(&state);

    let all_healthy = store_check.is_ok() && queue_check.is_ok() && breaker_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            analytics_queue: queue_check,
            circuit_breaker: breaker_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    if state.store.health_check().await {
        CheckStatus::ok("Store reachable")
    } else {
        CheckStatus::error("Store unreachable")
    }
}

fn check_analytics_queue(state: &AppState) -> CheckStatus {
    if state.events.analytics_connected() {
        CheckStatus::ok(format!("Capacity: {}", state.events.analytics_capacity()))
    } else {
        CheckStatus::error("Analytics queue is closed")
    }
}

fn check_breaker(state: &AppState) -> CheckStatus {
    match state.url_service.pipeline().breaker().state() {
        BreakerState::Open => CheckStatus::error(BreakerState::Open.to_string()),
        other => CheckStatus::ok(other.to_string()),
    }
}

//! HTTP routes.

pub mod audit;
pub mod reports;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/reports", get(reports::list).post(reports::create))
        .route("/api/reports/export", get(reports::export))
        .route(
            "/api/reports/{id}",
            get(reports::get).put(reports::update).delete(reports::delete),
        )
        .route("/api/audit", get(audit::entries))
        .route("/api/audit/report/{id}", get(audit::report_trail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "service": "portal-server",
        "audit": {
            "enabled": state.audit_logger().is_enabled(),
            "droppedEntries": state.dropped_audit_entries(),
        }
    }))
}

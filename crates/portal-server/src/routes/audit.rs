//! Audit trail endpoints.

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use portal_audit::AuditEntry;
use portal_core::{REPORT_ENTITY, ReportId};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    /// Most recent entries to return; absent or zero means the configured default.
    pub limit: Option<usize>,
}

/// Entries for one entity when both `entityType` and `entityId` are given,
/// otherwise the most recent entries.
pub async fn entries(
    State(state): State<AppState>,
    query: Result<Query<AuditQuery>, QueryRejection>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    let Query(query) = query?;
    let logger = state.audit_logger();

    let entries = match (query.entity_type.as_deref(), query.entity_id) {
        (Some(entity_type), Some(entity_id)) => logger.for_entity(entity_type, entity_id).await?,
        _ => logger.recent(query.limit.unwrap_or(0)).await?,
    };
    Ok(Json(entries))
}

pub async fn report_trail(
    State(state): State<AppState>,
    id: Result<Path<ReportId>, PathRejection>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    let Path(id) = id?;
    let entries = state.audit_logger().for_entity(REPORT_ENTITY, id).await?;
    Ok(Json(entries))
}

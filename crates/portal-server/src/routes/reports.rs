//! Report endpoints.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use portal_core::{ReportId, ReportSubmission, ResearchReport};
use portal_runtime::{ReportOperations, ReportQueries};
use serde::Deserialize;

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

/// Optional list filters. `analystId` takes precedence over `securityId`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub analyst_id: Option<i64>,
    pub security_id: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<ReportFilter>, QueryRejection>,
) -> Result<Json<Vec<ResearchReport>>, ApiError> {
    let Query(filter) = filter?;
    let reports = state.reports();

    let found = match (filter.analyst_id, filter.security_id) {
        (Some(analyst_id), _) => reports.reports_by_analyst(analyst_id).await?,
        (None, Some(security_id)) => reports.reports_by_security(security_id).await?,
        (None, None) => reports.list_reports().await?,
    };
    Ok(Json(found))
}

pub async fn export(
    State(state): State<AppState>,
    RequestContext(context): RequestContext,
) -> Result<Json<Vec<ResearchReport>>, ApiError> {
    let reports = state.audited(context).export_reports().await?;
    Ok(Json(reports))
}

pub async fn get(
    State(state): State<AppState>,
    RequestContext(context): RequestContext,
    id: Result<Path<ReportId>, PathRejection>,
) -> Result<Json<ResearchReport>, ApiError> {
    let Path(id) = id?;
    let report = state.audited(context).get_report(id).await?;
    Ok(Json(report))
}

pub async fn create(
    State(state): State<AppState>,
    RequestContext(context): RequestContext,
    submission: Result<Json<ReportSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ResearchReport>), ApiError> {
    let Json(submission) = submission?;
    let report = state.audited(context).create_report(submission).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn update(
    State(state): State<AppState>,
    RequestContext(context): RequestContext,
    id: Result<Path<ReportId>, PathRejection>,
    submission: Result<Json<ReportSubmission>, JsonRejection>,
) -> Result<Json<ResearchReport>, ApiError> {
    let Path(id) = id?;
    let Json(submission) = submission?;
    let report = state.audited(context).update_report(id, submission).await?;
    Ok(Json(report))
}

pub async fn delete(
    State(state): State<AppState>,
    RequestContext(context): RequestContext,
    id: Result<Path<ReportId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.audited(context).delete_report(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

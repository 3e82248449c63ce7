//! Report operations composed with the audit trail.
//!
//! [`AuditedReports`] wraps any [`ReportOperations`] and routes each call
//! through an [`AuditInterceptor`]. The wrapped service does not know it is
//! being audited.

use async_trait::async_trait;
use portal_audit::{AuditAction, AuditInterceptor, AuditTag, AuditedOp};
use portal_core::{REPORT_ENTITY, ReportError, ReportId, ReportSubmission, ResearchReport};

use crate::service::{ReportOperations, ReportQueries};

/// Audit tag for a full report export.
pub const EXPORT_REPORTS: AuditTag = AuditTag::new(AuditAction::Export, REPORT_ENTITY);

pub struct AuditedReports<S> {
    inner: S,
    interceptor: AuditInterceptor,
}

impl<S> AuditedReports<S> {
    pub fn new(inner: S, interceptor: AuditInterceptor) -> Self {
        Self { inner, interceptor }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn interceptor(&self) -> &AuditInterceptor {
        &self.interceptor
    }
}

impl<S: ReportQueries> AuditedReports<S> {
    /// Every report, recorded as a single EXPORT entry without an entity id.
    pub async fn export_reports(&self) -> Result<Vec<ResearchReport>, ReportError> {
        self.interceptor
            .audited("exportReports", EXPORT_REPORTS, self.inner.list_reports())
            .await
    }
}

#[async_trait]
impl<S: ReportOperations> ReportOperations for AuditedReports<S> {
    async fn create_report(
        &self,
        submission: ReportSubmission,
    ) -> Result<ResearchReport, ReportError> {
        self.interceptor
            .intercept(AuditedOp::Create, self.inner.create_report(submission))
            .await
    }

    async fn update_report(
        &self,
        id: ReportId,
        submission: ReportSubmission,
    ) -> Result<ResearchReport, ReportError> {
        self.interceptor
            .intercept(AuditedOp::Update, self.inner.update_report(id, submission))
            .await
    }

    async fn delete_report(&self, id: ReportId) -> Result<(), ReportError> {
        self.interceptor
            .intercept(AuditedOp::Delete { id }, self.inner.delete_report(id))
            .await
    }

    async fn get_report(&self, id: ReportId) -> Result<ResearchReport, ReportError> {
        self.interceptor
            .intercept(AuditedOp::View { id }, self.inner.get_report(id))
            .await
    }
}

#[async_trait]
impl<S: ReportQueries> ReportQueries for AuditedReports<S> {
    async fn list_reports(&self) -> Result<Vec<ResearchReport>, ReportError> {
        self.inner.list_reports().await
    }

    async fn reports_by_analyst(
        &self,
        analyst_id: i64,
    ) -> Result<Vec<ResearchReport>, ReportError> {
        self.inner.reports_by_analyst(analyst_id).await
    }

    async fn reports_by_security(
        &self,
        security_id: i64,
    ) -> Result<Vec<ResearchReport>, ReportError> {
        self.inner.reports_by_security(security_id).await
    }
}

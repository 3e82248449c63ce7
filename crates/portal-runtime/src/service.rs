//! Report use cases.

use async_trait::async_trait;
use portal_core::{ReportError, ReportId, ReportSubmission, ResearchReport, derive_report};
use std::sync::Arc;

use crate::repository::ReportRepository;

/// The report operations that leave a trace in the audit trail.
#[async_trait]
pub trait ReportOperations: Send + Sync {
    /// Validate and derive a new report, then persist it.
    async fn create_report(
        &self,
        submission: ReportSubmission,
    ) -> Result<ResearchReport, ReportError>;

    /// Replace an existing report with one derived from `submission`.
    async fn update_report(
        &self,
        id: ReportId,
        submission: ReportSubmission,
    ) -> Result<ResearchReport, ReportError>;

    async fn delete_report(&self, id: ReportId) -> Result<(), ReportError>;

    async fn get_report(&self, id: ReportId) -> Result<ResearchReport, ReportError>;
}

/// Read-only report queries. These are not audited.
#[async_trait]
pub trait ReportQueries: Send + Sync {
    async fn list_reports(&self) -> Result<Vec<ResearchReport>, ReportError>;

    async fn reports_by_analyst(&self, analyst_id: i64)
    -> Result<Vec<ResearchReport>, ReportError>;

    async fn reports_by_security(
        &self,
        security_id: i64,
    ) -> Result<Vec<ResearchReport>, ReportError>;
}

/// Report use cases over a [`ReportRepository`].
pub struct ReportService<R: ReportRepository> {
    repository: R,
}

impl<R: ReportRepository> ReportService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    async fn require(&self, id: ReportId) -> Result<ResearchReport, ReportError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReportError::not_found(id))
    }
}

#[async_trait]
impl<R: ReportRepository> ReportOperations for ReportService<R> {
    async fn create_report(
        &self,
        submission: ReportSubmission,
    ) -> Result<ResearchReport, ReportError> {
        let report = derive_report(submission)?;
        let saved = self.repository.save(report).await?;

        tracing::info!(
            report_id = ?saved.id,
            analyst_id = saved.analyst_id,
            security_id = saved.security_id,
            rating = %saved.rating,
            "Report created"
        );
        Ok(saved)
    }

    async fn update_report(
        &self,
        id: ReportId,
        submission: ReportSubmission,
    ) -> Result<ResearchReport, ReportError> {
        self.require(id).await?;

        let mut report = derive_report(submission)?;
        report.id = Some(id);
        let saved = self.repository.save(report).await?;

        tracing::info!(
            report_id = id,
            rating = %saved.rating,
            rating_changed = saved.rating_changed,
            "Report updated"
        );
        Ok(saved)
    }

    async fn delete_report(&self, id: ReportId) -> Result<(), ReportError> {
        if !self.repository.delete_by_id(id).await? {
            return Err(ReportError::not_found(id));
        }
        tracing::info!(report_id = id, "Report deleted");
        Ok(())
    }

    async fn get_report(&self, id: ReportId) -> Result<ResearchReport, ReportError> {
        self.require(id).await
    }
}

#[async_trait]
impl<R: ReportRepository> ReportQueries for ReportService<R> {
    async fn list_reports(&self) -> Result<Vec<ResearchReport>, ReportError> {
        self.repository.find_all().await
    }

    async fn reports_by_analyst(
        &self,
        analyst_id: i64,
    ) -> Result<Vec<ResearchReport>, ReportError> {
        self.repository.find_by_analyst(analyst_id).await
    }

    async fn reports_by_security(
        &self,
        security_id: i64,
    ) -> Result<Vec<ResearchReport>, ReportError> {
        self.repository.find_by_security(security_id).await
    }
}

#[async_trait]
impl<T: ReportOperations + ?Sized> ReportOperations for Arc<T> {
    async fn create_report(
        &self,
        submission: ReportSubmission,
    ) -> Result<ResearchReport, ReportError> {
        (**self).create_report(submission).await
    }

    async fn update_report(
        &self,
        id: ReportId,
        submission: ReportSubmission,
    ) -> Result<ResearchReport, ReportError> {
        (**self).update_report(id, submission).await
    }

    async fn delete_report(&self, id: ReportId) -> Result<(), ReportError> {
        (**self).delete_report(id).await
    }

    async fn get_report(&self, id: ReportId) -> Result<ResearchReport, ReportError> {
        (**self).get_report(id).await
    }
}

#[async_trait]
impl<T: ReportQueries + ?Sized> ReportQueries for Arc<T> {
    async fn list_reports(&self) -> Result<Vec<ResearchReport>, ReportError> {
        (**self).list_reports().await
    }

    async fn reports_by_analyst(
        &self,
        analyst_id: i64,
    ) -> Result<Vec<ResearchReport>, ReportError> {
        (**self).reports_by_analyst(analyst_id).await
    }

    async fn reports_by_security(
        &self,
        security_id: i64,
    ) -> Result<Vec<ResearchReport>, ReportError> {
        (**self).reports_by_security(security_id).await
    }
}

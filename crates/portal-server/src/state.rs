//! Shared application state.

use portal_audit::{AuditContext, AuditError, AuditInterceptor, AuditLogger};
use portal_core::AuditConfig;
use portal_runtime::{AuditedReports, MemoryReportRepository, ReportService};
use std::sync::Arc;

/// The report service the server runs on.
pub type Reports = ReportService<MemoryReportRepository>;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    reports: Arc<Reports>,
    interceptor: AuditInterceptor,
}

impl AppState {
    /// Create state with an empty report store and the given audit logger.
    pub fn new(logger: Arc<AuditLogger>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                reports: Arc::new(ReportService::new(MemoryReportRepository::new())),
                interceptor: AuditInterceptor::new(logger),
            }),
        }
    }

    /// Create state with the audit storage described by `config`.
    pub fn from_config(config: &AuditConfig) -> Result<Self, AuditError> {
        let logger = AuditLogger::new(config.clone())?;
        Ok(Self::new(Arc::new(logger)))
    }

    /// Unaudited access for read-only queries.
    pub fn reports(&self) -> &Arc<Reports> {
        &self.inner.reports
    }

    /// Audited report operations attributed to `context`.
    pub fn audited(&self, context: AuditContext) -> AuditedReports<Arc<Reports>> {
        AuditedReports::new(
            self.inner.reports.clone(),
            self.inner.interceptor.with_context(context),
        )
    }

    pub fn audit_logger(&self) -> &Arc<AuditLogger> {
        self.inner.interceptor.logger()
    }

    /// Audit entries lost to storage failures since start-up.
    pub fn dropped_audit_entries(&self) -> u64 {
        self.inner.interceptor.dropped_entries()
    }
}

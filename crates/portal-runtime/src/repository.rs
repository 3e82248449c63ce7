use async_trait::async_trait;
use portal_core::{ReportError, ReportId, ResearchReport};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Persistence port for research reports.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<ResearchReport>, ReportError>;

    async fn find_by_id(&self, id: ReportId) -> Result<Option<ResearchReport>, ReportError>;

    async fn find_by_analyst(&self, analyst_id: i64) -> Result<Vec<ResearchReport>, ReportError>;

    async fn find_by_security(&self, security_id: i64)
    -> Result<Vec<ResearchReport>, ReportError>;

    /// Insert or replace a report. A report without an id gets the next one.
    async fn save(&self, report: ResearchReport) -> Result<ResearchReport, ReportError>;

    /// Remove a report. Returns whether it existed.
    async fn delete_by_id(&self, id: ReportId) -> Result<bool, ReportError>;
}

#[derive(Debug)]
struct Reports {
    by_id: BTreeMap<ReportId, ResearchReport>,
    next_id: ReportId,
}

/// Report store kept in process memory, ordered by id.
#[derive(Debug)]
pub struct MemoryReportRepository {
    reports: RwLock<Reports>,
}

impl MemoryReportRepository {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(Reports {
                by_id: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn filtered<P>(&self, predicate: P) -> Result<Vec<ResearchReport>, ReportError>
    where
        P: Fn(&ResearchReport) -> bool,
    {
        let reports = self.reports.read().map_err(lock_error)?;
        Ok(reports
            .by_id
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }
}

impl Default for MemoryReportRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error<T>(_: std::sync::PoisonError<T>) -> ReportError {
    ReportError::Storage("report store lock poisoned".to_string())
}

#[async_trait]
impl ReportRepository for MemoryReportRepository {
    async fn find_all(&self) -> Result<Vec<ResearchReport>, ReportError> {
        self.filtered(|_| true)
    }

    async fn find_by_id(&self, id: ReportId) -> Result<Option<ResearchReport>, ReportError> {
        let reports = self.reports.read().map_err(lock_error)?;
        Ok(reports.by_id.get(&id).cloned())
    }

    async fn find_by_analyst(&self, analyst_id: i64) -> Result<Vec<ResearchReport>, ReportError> {
        self.filtered(|r| r.analyst_id == analyst_id)
    }

    async fn find_by_security(
        &self,
        security_id: i64,
    ) -> Result<Vec<ResearchReport>, ReportError> {
        self.filtered(|r| r.security_id == security_id)
    }

    async fn save(&self, mut report: ResearchReport) -> Result<ResearchReport, ReportError> {
        let mut reports = self.reports.write().map_err(lock_error)?;
        let id = match report.id {
            Some(id) => id,
            None => reports.next_id,
        };
        reports.next_id = reports.next_id.max(id + 1);
        report.id = Some(id);
        reports.by_id.insert(id, report.clone());
        Ok(report)
    }

    async fn delete_by_id(&self, id: ReportId) -> Result<bool, ReportError> {
        let mut reports = self.reports.write().map_err(lock_error)?;
        Ok(reports.by_id.remove(&id).is_some())
    }
}

//! Audit interception for report operations.
//!
//! [`AuditInterceptor`] wraps an operation future. When the operation
//! succeeds, exactly one entry describing it is recorded; when it fails,
//! nothing is recorded. The operation's result is always returned as-is:
//! a failure to record is reported on the `audit_gap` tracing target and
//! counted, but never surfaces to the caller.
//!
//! | Operation | Entity id from | Details |
//! |-----------|----------------|---------|
//! | [`AuditedOp::Create`] | result payload | title and report type |
//! | [`AuditedOp::Update`] | result payload | title and rating |
//! | [`AuditedOp::Delete`] | argument | the id |
//! | [`AuditedOp::View`] | argument | the id |
//! | [`AuditInterceptor::audited`] | none | the operation name |

use portal_core::{REPORT_ENTITY, ReportId, ResearchReport};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::entry::AuditAction;
use crate::logger::{AuditContext, AuditLogger};

/// An operation result that may carry a report payload.
///
/// A bare [`ResearchReport`] is a payload. [`Reply`] unwraps one layer to
/// reach a bare payload. Anything else carries nothing to audit.
pub trait AuditSubject {
    /// The payload when `self` is itself a bare report.
    fn payload(&self) -> Option<&ResearchReport> {
        None
    }

    /// The report reachable from `self`, unwrapping at most one wrapper.
    fn audited_report(&self) -> Option<&ResearchReport> {
        self.payload()
    }
}

impl AuditSubject for ResearchReport {
    fn payload(&self) -> Option<&ResearchReport> {
        Some(self)
    }
}

impl<T: AuditSubject> AuditSubject for Reply<T> {
    fn audited_report(&self) -> Option<&ResearchReport> {
        self.body.as_ref().and_then(|body| body.payload())
    }
}

impl AuditSubject for () {}
impl AuditSubject for String {}

/// A response wrapper: status code plus optional body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: u16,
    pub body: Option<T>,
}

impl<T> Reply<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn created(body: T) -> Self {
        Self {
            status: 201,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }
}

/// Report operations with a fixed audit shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditedOp {
    Create,
    Update,
    Delete { id: ReportId },
    View { id: ReportId },
}

impl AuditedOp {
    pub fn action(&self) -> AuditAction {
        match self {
            Self::Create => AuditAction::Create,
            Self::Update => AuditAction::Update,
            Self::Delete { .. } => AuditAction::Delete,
            Self::View { .. } => AuditAction::View,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "createReport",
            Self::Update => "updateReport",
            Self::Delete { .. } => "deleteReport",
            Self::View { .. } => "getReportById",
        }
    }

    /// Summarise a successful result, or `None` when there is nothing to audit.
    fn describe<T: AuditSubject>(&self, result: &T) -> Option<Summary> {
        let (entity_id, details) = match *self {
            Self::Create => {
                let report = result.audited_report()?;
                let details = format!(
                    "Report '{}' created (type: {})",
                    report.title, report.report_type
                );
                (report.id?, details)
            }
            Self::Update => {
                let report = result.audited_report()?;
                let details = format!(
                    "Report '{}' updated (rating: {})",
                    report.title, report.rating
                );
                (report.id?, details)
            }
            Self::Delete { id } => (id, format!("Report with ID {} deleted", id)),
            Self::View { id } => (id, format!("Report with ID {} viewed", id)),
        };

        Some(Summary {
            action: self.action(),
            entity_type: REPORT_ENTITY,
            entity_id: Some(entity_id),
            details,
        })
    }
}

/// Audit metadata for operations outside the fixed report surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditTag {
    pub action: AuditAction,
    pub entity_type: &'static str,
}

impl AuditTag {
    pub const fn new(action: AuditAction, entity_type: &'static str) -> Self {
        Self {
            action,
            entity_type,
        }
    }
}

struct Summary {
    action: AuditAction,
    entity_type: &'static str,
    entity_id: Option<ReportId>,
    details: String,
}

/// Records one audit entry per successful wrapped operation.
#[derive(Clone)]
pub struct AuditInterceptor {
    logger: Arc<AuditLogger>,
    context: AuditContext,
    dropped: Arc<AtomicU64>,
}

impl AuditInterceptor {
    pub fn new(logger: Arc<AuditLogger>) -> Self {
        Self {
            logger,
            context: AuditContext::default(),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A copy of this interceptor that attributes entries to `context`.
    ///
    /// The copy shares the logger and the dropped-entry counter.
    pub fn with_context(&self, context: AuditContext) -> Self {
        Self {
            logger: self.logger.clone(),
            context,
            dropped: self.dropped.clone(),
        }
    }

    pub fn logger(&self) -> &Arc<AuditLogger> {
        &self.logger
    }

    pub fn context(&self) -> &AuditContext {
        &self.context
    }

    /// Number of entries that could not be recorded since start-up.
    pub fn dropped_entries(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Run a report operation and audit it if it succeeds.
    pub async fn intercept<T, E, F>(&self, op: AuditedOp, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        T: AuditSubject,
    {
        let result = operation.await?;

        match op.describe(&result) {
            Some(summary) => self.record(op.name(), summary).await,
            None => tracing::debug!(
                operation = op.name(),
                "Result carries no report payload, nothing to audit"
            ),
        }

        Ok(result)
    }

    /// Run an arbitrary operation and audit it under `tag` if it succeeds.
    ///
    /// The entry has no entity id; its details name the operation.
    pub async fn audited<T, E, F>(&self, name: &str, tag: AuditTag, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let result = operation.await?;

        self.record(
            name,
            Summary {
                action: tag.action,
                entity_type: tag.entity_type,
                entity_id: None,
                details: format!("Operation '{}' executed", name),
            },
        )
        .await;

        Ok(result)
    }

    async fn record(&self, operation: &str, summary: Summary) {
        let outcome = self
            .logger
            .log(
                summary.action,
                summary.entity_type,
                summary.entity_id,
                summary.details,
                &self.context,
            )
            .await;

        if let Err(error) = outcome {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::warn!(
                target: "audit_gap",
                operation,
                action = %summary.action,
                entity_type = summary.entity_type,
                entity_id = ?summary.entity_id,
                dropped_total = dropped,
                error = %error,
                "Audit entry dropped after successful operation"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AuditEntry;
    use crate::error::AuditError;
    use crate::storage::{AuditStorage, MemoryStorage};
    use async_trait::async_trait;
    use chrono::Utc;
    use portal_core::{AuditConfig, Rating, ReportType};

    struct FailingStorage;

    #[async_trait]
    impl AuditStorage for FailingStorage {
        async fn save(&self, _entry: AuditEntry) -> Result<AuditEntry, AuditError> {
            Err(AuditError::StorageError("disk full".into()))
        }

        async fn find_recent(&self, _limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
            Ok(vec![])
        }

        async fn find_by_entity(
            &self,
            _entity_type: &str,
            _entity_id: i64,
        ) -> Result<Vec<AuditEntry>, AuditError> {
            Ok(vec![])
        }
    }

    fn report(id: i64, title: &str) -> ResearchReport {
        ResearchReport {
            id: Some(id),
            analyst_id: 1,
            security_id: 2,
            published_at: Utc::now(),
            report_type: ReportType::Update,
            title: title.to_string(),
            executive_summary: "Summary".to_string(),
            full_text: None,
            rating: Rating::Buy,
            previous_rating: None,
            rating_changed: false,
            target_price: None,
            previous_target: None,
            current_price: None,
            implied_upside: None,
            risk_level: None,
            catalysts: vec![],
            key_risks: vec![],
            tags: vec![],
        }
    }

    fn interceptor() -> AuditInterceptor {
        AuditInterceptor::new(Arc::new(AuditLogger::in_memory()))
    }

    async fn entries(interceptor: &AuditInterceptor) -> Vec<AuditEntry> {
        interceptor.logger().recent(100).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_from_wrapped_reply() {
        let interceptor = interceptor();
        let reply = interceptor
            .intercept(AuditedOp::Create, async {
                Ok::<_, String>(Reply::created(report(5, "Nestle Update")))
            })
            .await
            .unwrap();
        assert_eq!(reply.status, 201);

        let entries = entries(&interceptor).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Create);
        assert_eq!(entries[0].entity_type, "REPORT");
        assert_eq!(entries[0].entity_id, Some(5));
        assert!(entries[0].details.contains("Nestle Update"));
        assert!(entries[0].details.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_create_from_bare_report() {
        let interceptor = interceptor();
        interceptor
            .intercept(AuditedOp::Create, async { Ok::<_, String>(report(3, "Roche Flash")) })
            .await
            .unwrap();

        let entries = entries(&interceptor).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_id, Some(3));
        assert_eq!(entries[0].details, "Report 'Roche Flash' created (type: UPDATE)");
    }

    #[tokio::test]
    async fn test_update_mentions_rating() {
        let interceptor = interceptor();
        interceptor
            .intercept(AuditedOp::Update, async {
                Ok::<_, String>(report(1, "UBS Rating Change"))
            })
            .await
            .unwrap();

        let entries = entries(&interceptor).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Update);
        assert_eq!(entries[0].entity_id, Some(1));
        assert_eq!(
            entries[0].details,
            "Report 'UBS Rating Change' updated (rating: BUY)"
        );
    }

    #[tokio::test]
    async fn test_delete_uses_argument_id() {
        let interceptor = interceptor();
        let reply = interceptor
            .intercept(AuditedOp::Delete { id: 7 }, async {
                Ok::<_, String>(Reply::<ResearchReport>::no_content())
            })
            .await
            .unwrap();
        assert_eq!(reply.status, 204);

        let entries = entries(&interceptor).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Delete);
        assert_eq!(entries[0].entity_id, Some(7));
        assert!(entries[0].details.contains('7'));
    }

    #[tokio::test]
    async fn test_view_uses_argument_id() {
        let interceptor = interceptor();
        interceptor
            .intercept(AuditedOp::View { id: 12 }, async {
                Ok::<_, String>(report(12, "Novartis Deep Dive"))
            })
            .await
            .unwrap();

        let entries = entries(&interceptor).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::View);
        assert_eq!(entries[0].details, "Report with ID 12 viewed");
    }

    #[tokio::test]
    async fn test_failed_operation_records_nothing() {
        let interceptor = interceptor();
        let err = interceptor
            .intercept(AuditedOp::Delete { id: 99 }, async {
                Err::<(), _>("report with id 99 not found".to_string())
            })
            .await
            .unwrap_err();
        assert!(err.contains("99"));

        assert!(entries(&interceptor).await.is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_result_records_nothing() {
        let interceptor = interceptor();
        let value = interceptor
            .intercept(AuditedOp::Create, async { Ok::<_, String>("unexpected".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "unexpected");

        // Only one layer of wrapping is unwrapped.
        interceptor
            .intercept(AuditedOp::Update, async {
                Ok::<_, String>(Reply::ok(Reply::ok(report(1, "Nested"))))
            })
            .await
            .unwrap();

        // A report without an id has no subject to point at.
        let mut unsaved = report(1, "Unsaved");
        unsaved.id = None;
        interceptor
            .intercept(AuditedOp::Create, async { Ok::<_, String>(unsaved) })
            .await
            .unwrap();

        assert!(entries(&interceptor).await.is_empty());
        assert_eq!(interceptor.dropped_entries(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_reach_caller() {
        let logger = AuditLogger::with_storage(AuditConfig::default(), Arc::new(FailingStorage));
        let interceptor = AuditInterceptor::new(Arc::new(logger));

        let result = interceptor
            .intercept(AuditedOp::Create, async { Ok::<_, String>(report(4, "Kept")) })
            .await;

        assert_eq!(result.unwrap().title, "Kept");
        assert_eq!(interceptor.dropped_entries(), 1);
    }

    #[tokio::test]
    async fn test_audited_generic_operation() {
        let interceptor = interceptor();
        const EXPORT: AuditTag = AuditTag::new(AuditAction::Export, "REPORT");

        let count = interceptor
            .audited("exportReports", EXPORT, async { Ok::<_, String>(3usize) })
            .await
            .unwrap();
        assert_eq!(count, 3);

        let entries = entries(&interceptor).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Export);
        assert_eq!(entries[0].entity_id, None);
        assert_eq!(entries[0].details, "Operation 'exportReports' executed");
    }

    #[tokio::test]
    async fn test_audited_generic_failure_records_nothing() {
        let interceptor = interceptor();
        let tag = AuditTag::new(AuditAction::Import, "SECURITY");

        let result = interceptor
            .audited("importSecurities", tag, async { Err::<(), _>("bad file") })
            .await;
        assert!(result.is_err());
        assert!(entries(&interceptor).await.is_empty());
    }

    #[tokio::test]
    async fn test_context_is_attached_and_counter_shared() {
        let storage = Arc::new(MemoryStorage::new());
        let logger = AuditLogger::with_storage(AuditConfig::default(), storage.clone());
        let base = AuditInterceptor::new(Arc::new(logger));

        let scoped = base.with_context(
            AuditContext::new()
                .with_actor(crate::entry::Actor::new("analyst-17"))
                .with_source_address("203.0.113.5"),
        );
        scoped
            .intercept(AuditedOp::View { id: 2 }, async { Ok::<_, String>(()) })
            .await
            .unwrap();

        let recent = storage.find_recent(1).await.unwrap();
        assert_eq!(recent[0].actor_id.as_deref(), Some("analyst-17"));
        assert_eq!(recent[0].source_address.as_deref(), Some("203.0.113.5"));
        assert_eq!(base.context(), &AuditContext::default());
        assert_eq!(base.dropped_entries(), scoped.dropped_entries());
    }
}

//! # portal-runtime
//!
//! Report use cases and their composition with the audit trail.
//!
//! - [`ReportRepository`]: persistence port for reports
//! - [`ReportService`]: create / update / delete / view plus read-only queries
//! - [`AuditedReports`]: the same operations, each recorded in the audit trail

pub mod audited;
pub mod repository;
pub mod service;

pub use audited::{AuditedReports, EXPORT_REPORTS};
pub use repository::{MemoryReportRepository, ReportRepository};
pub use service::{ReportOperations, ReportQueries, ReportService};

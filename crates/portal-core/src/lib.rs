//! # portal-core
//!
//! Shared domain types for the research portal.
//!
//! - [`model`]: ratings, report types, risk levels, submissions and reports
//! - [`policy`]: the derivation rules applied when a report is submitted
//! - [`error`]: validation and report errors
//! - [`decimal`]: exact JSON encoding of prices and the implied upside
//! - [`config`]: configuration shared by the audit trail and the server

pub mod config;
pub mod decimal;
pub mod error;
pub mod model;
pub mod policy;

pub use config::{AuditConfig, ConfigError, PortalConfig, ServerConfig};
pub use error::{ReportError, ValidationError};
pub use model::{Rating, ReportSubmission, ReportType, ResearchReport, RiskLevel};
pub use policy::{derive_report, derive_report_at};

/// Report identifier, assigned by the report store.
pub type ReportId = i64;

/// Entity type tag used for reports in the audit trail.
pub const REPORT_ENTITY: &str = "REPORT";

//! # portal-server
//!
//! HTTP boundary for research reports.
//!
//! Mutating report endpoints and single-report views go through
//! [`portal_runtime::AuditedReports`], so every successful call leaves one
//! entry in the audit trail. The trail itself is served under `/api/audit`.

pub mod config;
pub mod context;
pub mod error;
pub mod routes;
pub mod state;

pub use context::RequestContext;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

//! # portal-audit
//!
//! Compliance audit trail for the research portal.
//!
//! This crate provides:
//! - [`AuditEntry`]: one immutable record per successful auditable action
//! - [`AuditStorage`]: the persistence port, with in-memory, JSON Lines file
//!   and null backends
//! - [`AuditLogger`]: records entries with actor attribution and answers
//!   recency / per-entity queries
//! - [`AuditInterceptor`]: wraps operations so that each successful call
//!   yields exactly one entry without the call site knowing about auditing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portal_audit::{AuditInterceptor, AuditLogger, AuditedOp};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let interceptor = AuditInterceptor::new(Arc::new(AuditLogger::in_memory()));
//!
//! // Deleting report 7 records a DELETE entry for REPORT#7 once it succeeds.
//! interceptor
//!     .intercept(AuditedOp::Delete { id: 7 }, async { Ok::<_, std::io::Error>(()) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod error;
pub mod interceptor;
pub mod logger;
pub mod storage;

pub use entry::{Actor, AuditAction, AuditEntry, AuditEntryBuilder};
pub use error::AuditError;
pub use interceptor::{AuditInterceptor, AuditSubject, AuditTag, AuditedOp, Reply};
pub use logger::{AuditContext, AuditLogger};
pub use storage::{create_storage, AuditStorage, FileStorage, MemoryStorage, NullStorage};

//! Audit logger implementation.
//!
//! [`AuditLogger`] is the entry point for recording and querying the audit
//! trail. It fills in attribution (the request actor, or the configured
//! default actor) and bounds the details text before handing entries to the
//! storage backend.

use portal_core::AuditConfig;
use std::sync::Arc;

use crate::entry::{Actor, AuditAction, AuditEntry};
use crate::error::AuditError;
use crate::storage::{create_storage, AuditStorage, MemoryStorage, NullStorage};

/// Per-request attribution attached to audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditContext {
    /// Who performed the action, if known.
    pub actor: Option<Actor>,
    /// Where the request came from, if known.
    pub source_address: Option<String>,
}

impl AuditContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_source_address(mut self, address: impl Into<String>) -> Self {
        self.source_address = Some(address.into());
        self
    }
}

/// The main audit logger.
pub struct AuditLogger {
    config: AuditConfig,
    storage: Arc<dyn AuditStorage>,
    default_actor: Actor,
}

impl AuditLogger {
    /// Create a new audit logger with the given configuration.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        let storage = create_storage(&config)?;
        Ok(Self::with_storage(config, storage))
    }

    /// Create a logger with a custom storage backend.
    pub fn with_storage(config: AuditConfig, storage: Arc<dyn AuditStorage>) -> Self {
        let default_actor = Actor::new(config.default_actor.id.clone())
            .with_name(config.default_actor.name.clone())
            .with_role(config.default_actor.role.clone());

        Self {
            config,
            storage,
            default_actor,
        }
    }

    /// Create a disabled (no-op) logger.
    pub fn disabled() -> Self {
        Self::with_storage(
            AuditConfig {
                enabled: false,
                ..Default::default()
            },
            Arc::new(NullStorage),
        )
    }

    /// Create an in-memory logger (useful for development and tests).
    pub fn in_memory() -> Self {
        Self::with_storage(AuditConfig::default(), Arc::new(MemoryStorage::new()))
    }

    /// Check if logging is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Record an action.
    ///
    /// Returns the stored entry, or `None` when auditing is disabled.
    pub async fn log(
        &self,
        action: AuditAction,
        entity_type: &str,
        entity_id: Option<i64>,
        details: impl Into<String>,
        context: &AuditContext,
    ) -> Result<Option<AuditEntry>, AuditError> {
        let actor = context.actor.as_ref().unwrap_or(&self.default_actor);
        let mut builder = AuditEntry::builder(action, entity_type)
            .entity_id(entity_id)
            .actor(actor)
            .bounded_details(details, self.config.details_max_len);

        if let Some(ref source) = context.source_address {
            builder = builder.source_address(source.clone());
        }

        self.record(builder.build()).await
    }

    /// Store a fully built entry.
    pub async fn record(&self, entry: AuditEntry) -> Result<Option<AuditEntry>, AuditError> {
        if !self.config.enabled {
            return Ok(None);
        }

        let saved = self.storage.save(entry).await?;

        tracing::info!(
            audit_id = ?saved.id,
            action = %saved.action,
            entity_type = %saved.entity_type,
            entity_id = ?saved.entity_id,
            actor = ?saved.actor_id,
            details = %saved.details,
            "Audit entry recorded"
        );

        Ok(Some(saved))
    }

    /// Most recent entries, newest first.
    ///
    /// A `limit` of zero means the configured default.
    pub async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditError> {
        let limit = if limit == 0 {
            self.config.recent_limit
        } else {
            limit
        };
        self.storage.find_recent(limit).await
    }

    /// All entries for one entity, newest first.
    pub async fn for_entity(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<AuditEntry>, AuditError> {
        self.storage.find_by_entity(entity_type, entity_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_logger() {
        let logger = AuditLogger::disabled();
        assert!(!logger.is_enabled());

        let saved = logger
            .log(AuditAction::Create, "REPORT", Some(1), "created", &AuditContext::new())
            .await
            .unwrap();
        assert!(saved.is_none());
        assert!(logger.recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_actor_is_used_without_context() {
        let logger = AuditLogger::in_memory();

        let saved = logger
            .log(AuditAction::View, "REPORT", Some(4), "Report with ID 4 viewed", &AuditContext::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(saved.actor_id.as_deref(), Some("system"));
        assert_eq!(saved.actor_name.as_deref(), Some("System Administrator"));
        assert_eq!(saved.actor_role.as_deref(), Some("ADMIN"));
        assert_eq!(saved.source_address, None);
    }

    #[tokio::test]
    async fn test_context_actor_and_source() {
        let logger = AuditLogger::in_memory();
        let context = AuditContext::new()
            .with_actor(Actor::new("mmuster").with_role("ANALYST"))
            .with_source_address("192.168.1.20");

        let saved = logger
            .log(AuditAction::Delete, "REPORT", Some(9), "Report with ID 9 deleted", &context)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(saved.actor_id.as_deref(), Some("mmuster"));
        assert_eq!(saved.actor_name, None);
        assert_eq!(saved.actor_role.as_deref(), Some("ANALYST"));
        assert_eq!(saved.source_address.as_deref(), Some("192.168.1.20"));
    }

    #[tokio::test]
    async fn test_details_are_bounded() {
        let config = AuditConfig {
            details_max_len: 10,
            ..Default::default()
        };
        let logger = AuditLogger::with_storage(config, Arc::new(MemoryStorage::new()));

        let saved = logger
            .log(AuditAction::Create, "REPORT", Some(1), "x".repeat(50), &AuditContext::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.details.len(), 10);
    }

    #[tokio::test]
    async fn test_recent_zero_uses_configured_limit() {
        let config = AuditConfig {
            recent_limit: 3,
            ..Default::default()
        };
        let logger = AuditLogger::with_storage(config, Arc::new(MemoryStorage::new()));
        for id in 0..5 {
            logger
                .log(AuditAction::View, "REPORT", Some(id), "viewed", &AuditContext::new())
                .await
                .unwrap();
        }

        assert_eq!(logger.recent(0).await.unwrap().len(), 3);
        assert_eq!(logger.recent(4).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_for_entity() {
        let logger = AuditLogger::in_memory();
        let ctx = AuditContext::new();
        logger.log(AuditAction::Create, "REPORT", Some(1), "a", &ctx).await.unwrap();
        logger.log(AuditAction::Create, "REPORT", Some(2), "b", &ctx).await.unwrap();
        logger.log(AuditAction::View, "REPORT", Some(1), "c", &ctx).await.unwrap();

        let trail = logger.for_entity("REPORT", 1).await.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].details, "c");
    }
}

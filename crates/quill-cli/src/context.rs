use std::sync::Arc;

use anyhow::Context;
use quill_config::QuillConfig;
use quill_core::{StaticPermission, TypeRegistry};
use quill_db::service::AuditLogService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: AuditLogService,
    pub config: QuillConfig,
}

impl AppContext {
    /// Open the configured audit log.
    ///
    /// The CLI only reads, so it runs with an empty type registry and a
    /// principal that holds the read permission.
    pub async fn init(config: QuillConfig) -> anyhow::Result<Self> {
        let service = AuditLogService::from_config(
            &config,
            Arc::new(TypeRegistry::new()),
            Arc::new(StaticPermission::granted()),
        )
        .await
        .with_context(|| format!("failed to open audit log at {}", config.database.path))?;

        Ok(Self { service, config })
    }

    /// Drain the writer before exit.
    pub async fn close(self) {
        if let Err(error) = self.service.shutdown().await {
            tracing::warn!(%error, "audit log writer did not shut down cleanly");
        }
    }
}

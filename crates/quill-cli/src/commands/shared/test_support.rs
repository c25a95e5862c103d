use quill_config::QuillConfig;
use quill_core::{EntryCreationContext, Snapshot, TrackedState};

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;

pub fn flags() -> GlobalFlags {
    GlobalFlags {
        format: OutputFormat::Json,
        limit: None,
        page: 1,
        quiet: false,
        verbose: false,
        database: None,
    }
}

pub fn repository(name: &str, description: &str) -> TrackedState {
    TrackedState {
        type_name: "repository".to_string(),
        snapshot: Snapshot::builder("repository")
            .field("name", name)
            .field("description", description)
            .build(),
        entity_name: Some(name.to_string()),
    }
}

/// In-memory context seeded with three entries on two repositories.
pub async fn seeded_context() -> AppContext {
    let mut config = QuillConfig::default();
    config.database.path = ":memory:".to_string();
    let ctx = AppContext::init(config).await.expect("context should open");

    ctx.service
        .create_entry(
            Some("trillian"),
            EntryCreationContext::created(repository("HeartOfGold", "ship")).with_label("space"),
        )
        .await;
    ctx.service
        .create_entry(
            Some("dent"),
            EntryCreationContext::modified(
                repository("HeartOfGold", "ship"),
                repository("HeartOfGold", "improbable\nship"),
            ),
        )
        .await;
    ctx.service
        .create_entry(
            None,
            EntryCreationContext::deleted(repository("Vogon", "poetry")),
        )
        .await;
    ctx.service.flush().await.expect("flush should succeed");
    ctx
}

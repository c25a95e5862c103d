use quill_core::LogEntry;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::FilterArgs;
use crate::commands::shared::filter::page_filter;
use crate::context::AppContext;
use crate::output::{Tabular, output};

/// One page of entries plus the numbers needed to page through the rest.
#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub page: u32,
    pub page_total: u64,
    pub total: u64,
    pub entries: Vec<LogEntry>,
}

impl Tabular for EntriesResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["id", "timestamp", "username", "action", "entity", "summary"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|entry| {
                vec![
                    entry.id.to_string(),
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    entry.username.clone().unwrap_or_else(|| "-".to_string()),
                    entry.action.to_string(),
                    entry.entity.clone(),
                    entry.entry.lines().next().unwrap_or_default().to_string(),
                ]
            })
            .collect()
    }
}

/// Handle `quill entries`.
pub async fn handle(args: &FilterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = load(args, ctx, flags).await?;
    output(&response, flags.format)
}

pub async fn load(
    args: &FilterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<EntriesResponse> {
    let filter = page_filter(args, flags, ctx.config.general.default_limit)?;
    let entries = ctx.service.get_entries(&filter).await?;
    let total = ctx.service.get_total_entries(&filter).await?;

    Ok(EntriesResponse {
        page: filter.page_number(),
        page_total: total.div_ceil(u64::from(filter.limit())),
        total,
        entries,
    })
}

use anyhow::Context;
use quill_core::AuditLogFilterContext;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::FilterArgs;

/// Page size with precedence: global flag -> configured default.
#[must_use]
pub fn effective_limit(global: Option<u32>, fallback: u32) -> u32 {
    global.unwrap_or(fallback)
}

/// Filter for one page of results.
pub fn page_filter(
    args: &FilterArgs,
    flags: &GlobalFlags,
    default_limit: u32,
) -> anyhow::Result<AuditLogFilterContext> {
    build_filter(args, flags.page, effective_limit(flags.limit, default_limit))
}

/// Filter for everything matching `args`, bounded by `export_limit`.
pub fn export_filter(args: &FilterArgs, export_limit: u32) -> anyhow::Result<AuditLogFilterContext> {
    build_filter(args, 1, export_limit)
}

fn build_filter(
    args: &FilterArgs,
    page: u32,
    limit: u32,
) -> anyhow::Result<AuditLogFilterContext> {
    AuditLogFilterContext::parse(
        page,
        limit,
        args.entity.clone(),
        args.username.clone(),
        args.from.as_deref(),
        args.to.as_deref(),
        args.label.clone(),
        args.action.clone(),
    )
    .context("invalid filter")
}

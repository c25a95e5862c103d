use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::FilterArgs;
use crate::commands::shared::filter::page_filter;
use crate::context::AppContext;
use crate::output::{Tabular, output};

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total: u64,
}

impl Tabular for CountResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["total"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![self.total.to_string()]]
    }
}

/// Handle `quill count`. Pagination flags have no effect on the total.
pub async fn handle(args: &FilterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = page_filter(args, flags, ctx.config.general.default_limit)?;
    let total = ctx.service.get_total_entries(&filter).await?;
    output(&CountResponse { total }, flags.format)
}

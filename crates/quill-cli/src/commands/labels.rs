use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::{Tabular, output};

#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
}

impl Tabular for LabelsResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["label"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.labels.iter().map(|label| vec![label.clone()]).collect()
    }
}

/// Handle `quill labels`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let labels = ctx.service.get_labels().await?;
    let response = LabelsResponse {
        labels: labels.into_iter().collect(),
    };
    output(&response, flags.format)
}

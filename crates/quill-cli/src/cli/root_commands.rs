use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List one page of audit entries, newest first.
    Entries(FilterArgs),
    /// Count audit entries matching the filters.
    Count(FilterArgs),
    /// List every label attached to an entry.
    Labels,
    /// Export matching entries to stdout.
    Export(ExportArgs),
}

/// Filters shared by the read commands. Textual filters accept `*` wildcards.
#[derive(Clone, Debug, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub entity: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportKind {
    Csv,
    Text,
}

/// Arguments for `quill export`.
#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    #[arg(long = "as", value_enum, default_value = "csv")]
    pub kind: ExportKind,
    #[command(flatten)]
    pub filters: FilterArgs,
}

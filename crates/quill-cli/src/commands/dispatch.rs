use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: &Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Entries(filters) => commands::entries::handle(filters, ctx, flags).await,
        Commands::Count(filters) => commands::count::handle(filters, ctx, flags).await,
        Commands::Labels => commands::labels::handle(ctx, flags).await,
        Commands::Export(args) => commands::export::handle(args, ctx).await,
    }
}

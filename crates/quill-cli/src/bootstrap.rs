use anyhow::Context;

use crate::cli::GlobalFlags;

/// Load `.env`, layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<quill_config::QuillConfig> {
    load_project_dotenv()?;

    let mut config =
        quill_config::QuillConfig::load().context("failed to load quill configuration")?;

    if let Some(database) = &flags.database {
        tracing::debug!(database, "database path overridden on the command line");
        config.database.path.clone_from(database);
        config.validate()?;
    }

    Ok(config)
}

fn load_project_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

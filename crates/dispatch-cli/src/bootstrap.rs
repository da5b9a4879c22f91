use anyhow::Context;
use dispatch_config::DispatchConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then layered config, then apply CLI overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<DispatchConfig> {
    let mut config = DispatchConfig::load_with_dotenv().context("failed to load configuration")?;
    apply_overrides(&mut config, flags)?;
    Ok(config)
}

fn apply_overrides(config: &mut DispatchConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
        config
            .validate()
            .context("invalid --db override")?;
    }
    Ok(())
}

//! `unveil init`

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;
use unveil_split::SplitTextConfig;

pub const CONFIG_FILE: &str = "unveil.toml";

pub fn run(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config = SplitTextConfig::new("Unveil the text, one piece at a time");
    fs::write(&path, config.to_toml()?)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!("wrote {}", path.display());
    Ok(())
}

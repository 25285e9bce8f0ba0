use std::path::Path;

use anyhow::{bail, Result};

use bidilist_core::AppConfig;

pub fn show(config: &AppConfig, path: &Path) -> Result<()> {
    let origin = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("# {}{}", path.display(), origin);
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    AppConfig::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

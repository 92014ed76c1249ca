//! `saveas config` – show where the configuration lives and what it holds.

use anyhow::Result;
use saveas_core::config::{self, SaverConfig};

pub fn run_config(cfg: &SaverConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", cfg.to_toml()?);
    Ok(())
}

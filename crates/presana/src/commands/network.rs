use anyhow::{Context, Result};

use crate::config::Settings;

pub fn run(settings: &Settings, quiet: bool) -> Result<()> {
    let runtime = super::runtime()?;
    let mut controller = super::controller(settings, quiet);
    runtime
        .block_on(controller.load())
        .with_context(|| format!("Could not load the network from {}", settings.url))?;
    Ok(())
}

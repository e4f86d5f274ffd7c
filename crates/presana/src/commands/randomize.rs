use anyhow::Result;

use crate::config::Settings;
use crate::control::Intent;

pub fn run(settings: &Settings, quiet: bool) -> Result<()> {
    let runtime = super::runtime()?;
    let mut controller = super::controller(settings, quiet);
    runtime.block_on(controller.dispatch(Intent::Randomize));
    Ok(())
}

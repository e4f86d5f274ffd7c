use anyhow::Result;

use crate::config::Settings;
use crate::control::Intent;

/// One narrated run. Orchestrator failures end up in the transcript, not the exit code.
pub fn run(settings: &Settings, start: String, dest: String, quiet: bool) -> Result<()> {
    let runtime = super::runtime()?;
    let mut controller = super::controller(settings, quiet);
    runtime.block_on(controller.dispatch(Intent::Run { start, dest }));
    Ok(())
}

pub mod completion;
pub mod config;
pub mod network;
pub mod randomize;
pub mod run;
pub mod session;

use anyhow::{Context, Result};

use crate::backend::HttpBackend;
use crate::config::Settings;
use crate::control::Controller;
use crate::terminal::TerminalPresenter;

/// Single-threaded runtime: one actor, pacing via timers.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")
}

fn controller(settings: &Settings, quiet: bool) -> Controller<HttpBackend, TerminalPresenter> {
    Controller::new(
        HttpBackend::new(&settings.url, settings.timeout),
        TerminalPresenter::new(quiet),
        settings.model,
        settings.pacing,
    )
}

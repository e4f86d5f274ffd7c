mod app;
mod backend;
mod banner;
mod cli;
mod commands;
mod config;
mod control;
mod error;
mod logging;
mod metadata;
mod network;
mod session;
mod terminal;
mod theme;

use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::metadata::ModelKind;

#[derive(Parser)]
#[command(name = "presana")]
#[command(author, version, about)]
#[command(long_about = "Client for the PreSaNa route-planning demonstrator.\n\n\
    Shows the road network served by the PreSaNa backend, asks it for the\n\
    cheapest route under a learned cost model, and narrates the search.\n\n\
    Examples:\n  \
    presana network                 Show the network and model weights\n  \
    presana run A E --model rf      Search A -> E with the random forest\n  \
    presana session                 Interactive session\n  \
    presana gui                     Desktop window")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides PRESANA_BACKEND_URL and the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the network and show it with the selected model's metadata
    Network {
        /// Cost model whose metadata to summarise
        #[arg(long, value_enum)]
        model: Option<ModelKind>,
    },

    /// Search for the best route between two nodes
    Run {
        /// Start node
        start: String,

        /// Destination node
        dest: String,

        /// Cost model used by the backend
        #[arg(long, value_enum)]
        model: Option<ModelKind>,

        /// Print the transcript without the narration delay
        #[arg(long)]
        no_pacing: bool,
    },

    /// Randomize the network topology and show the new state
    Randomize,

    /// Interactive terminal session
    Session {
        /// Cost model selected at start
        #[arg(long, value_enum)]
        model: Option<ModelKind>,

        /// Print transcripts without the narration delay
        #[arg(long)]
        no_pacing: bool,
    },

    /// Open the desktop window
    Gui {
        /// Open a normal window instead of a maximized one
        #[arg(long)]
        windowed: bool,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. backend.url, defaults.model, pacing.enabled)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load_or_default();
        let mut settings = config.settings(self.url.as_deref());

        match self.command {
            Some(Commands::Network { model }) => {
                if let Some(model) = model {
                    settings.model = model;
                }
                crate::commands::network::run(&settings, self.quiet)
            }
            Some(Commands::Run {
                start,
                dest,
                model,
                no_pacing,
            }) => {
                if let Some(model) = model {
                    settings.model = model;
                }
                if no_pacing {
                    settings.pacing = crate::session::Pacing::immediate();
                }
                crate::commands::run::run(&settings, start, dest, self.quiet)
            }
            Some(Commands::Randomize) => crate::commands::randomize::run(&settings, self.quiet),
            Some(Commands::Session { model, no_pacing }) => {
                if let Some(model) = model {
                    settings.model = model;
                }
                if no_pacing {
                    settings.pacing = crate::session::Pacing::immediate();
                }
                crate::commands::session::run(&settings, self.quiet)
            }
            Some(Commands::Gui { windowed }) => crate::app::run(settings, windowed),
            Some(Commands::Config { command }) => crate::commands::config::run(command, &settings),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::banner::print_banner_with_version();
                Ok(())
            }
            None => {
                use clap::CommandFactory;
                let mut cmd = Self::command();
                cmd.print_help()?;
                println!();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["presana", "run", "A", "E", "--model", "rf", "--no-pacing"])
            .unwrap();
        match cli.command {
            Some(Commands::Run {
                start,
                dest,
                model,
                no_pacing,
            }) => {
                assert_eq!(start, "A");
                assert_eq!(dest, "E");
                assert_eq!(model, Some(ModelKind::RandomForest));
                assert!(no_pacing);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_global_url_after_subcommand() {
        let cli = Cli::try_parse_from(["presana", "network", "--url", "http://h:1", "-vv"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://h:1"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_quiet_reaches_one_shot_commands() {
        for args in [
            ["presana", "network", "-q"].as_slice(),
            ["presana", "randomize", "--quiet"].as_slice(),
            ["presana", "run", "A", "C", "-q"].as_slice(),
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert!(cli.quiet, "{args:?}");
        }
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(Cli::try_parse_from(["presana", "run", "A", "B", "--model", "gbm"]).is_err());
    }
}

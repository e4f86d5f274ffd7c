use std::fmt;

use anyhow::{Context, Result};
use colored::Colorize;
use inquire::{InquireError, Select};

use crate::config::Settings;
use crate::control::Intent;
use crate::metadata::ModelKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Run,
    Randomize,
    ChangeModel,
    End,
}

impl Action {
    fn all() -> Vec<Action> {
        vec![
            Action::Run,
            Action::Randomize,
            Action::ChangeModel,
            Action::End,
        ]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Run => "Run route search",
            Self::Randomize => "Randomize network",
            Self::ChangeModel => "Change cost model",
            Self::End => "End session",
        };
        f.write_str(label)
    }
}

/// Cancelled or interrupted prompts end the loop instead of failing.
fn answer<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Interactive control surface: read an intent, dispatch it, repeat.
pub fn run(settings: &Settings, quiet: bool) -> Result<()> {
    let runtime = super::runtime()?;
    let mut controller = super::controller(settings, quiet);

    runtime
        .block_on(controller.load())
        .with_context(|| format!("Could not load the network from {}", settings.url))?;

    loop {
        println!();
        let Some(action) = answer(Select::new("What next?", Action::all()).prompt())? else {
            break;
        };

        let intent = match action {
            Action::Run => {
                let nodes = controller
                    .snapshot()
                    .map(|s| s.nodes())
                    .unwrap_or_default();
                if nodes.is_empty() {
                    println!("{}", "The network has no nodes to route between.".yellow());
                    continue;
                }
                let Some(start) = answer(Select::new("Start node", nodes.clone()).prompt())? else {
                    continue;
                };
                let Some(dest) = answer(Select::new("Destination node", nodes).prompt())? else {
                    continue;
                };
                Intent::Run { start, dest }
            }
            Action::Randomize => Intent::Randomize,
            Action::ChangeModel => {
                let models = ModelKind::all().to_vec();
                let current = models
                    .iter()
                    .position(|m| *m == controller.session().model())
                    .unwrap_or(0);
                let Some(model) = answer(
                    Select::new("Cost model", models)
                        .with_starting_cursor(current)
                        .prompt(),
                )?
                else {
                    continue;
                };
                Intent::ChangeModel(model)
            }
            Action::End => Intent::End,
        };

        let ending = intent == Intent::End;
        runtime.block_on(controller.dispatch(intent));
        if ending {
            break;
        }
    }

    Ok(())
}

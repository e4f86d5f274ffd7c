use colored::{ColoredString, Colorize};

use crate::control::Presenter;
use crate::error::TransportError;
use crate::metadata::{MetadataSummary, ModelKind};
use crate::network::NetworkTable;
use crate::session::{LogLine, LogTag, Report, SessionEvent};

pub const END_MESSAGE: &str = "Session ended. Thank you for using PreSaNa.";

/// Prints control-surface output to the terminal.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    quiet: bool,
}

impl TerminalPresenter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

pub fn styled(line: &LogLine) -> ColoredString {
    let text = line.text.as_str();
    match line.tag {
        LogTag::Plain => text.normal(),
        LogTag::Header => text.cyan().bold(),
        LogTag::Success => text.green().bold(),
        LogTag::Error => text.red().bold(),
        LogTag::Placeholder => text.dimmed().italic(),
    }
}

fn print_report(report: &Report) {
    println!();
    let title = if report.is_success() {
        "Mission Report".green().bold()
    } else {
        "Mission Report".red().bold()
    };
    println!("{title}");
    for line in report.lines() {
        if report.is_success() {
            println!("  {line}");
        } else {
            println!("  {}", line.red());
        }
    }
    println!();
}

impl Presenter for TerminalPresenter {
    fn network(&mut self, table: &NetworkTable) {
        print!("{}", table.render());
    }

    fn metadata(&mut self, model: ModelKind, summary: &MetadataSummary) {
        if self.quiet {
            return;
        }
        println!("{} {}", "Model:".bold(), model);
        match summary {
            MetadataSummary::Available { .. } => println!("{summary}"),
            MetadataSummary::NoData => println!("{}", summary.to_string().dimmed()),
        }
    }

    fn session_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::TranscriptCleared => {
                if !self.quiet {
                    println!();
                }
            }
            SessionEvent::Logged(line) => println!("{}", styled(line)),
            SessionEvent::ReportOpened(report) => print_report(report),
            SessionEvent::ReportHidden => {}
            SessionEvent::Busy(true) => {
                if !self.quiet {
                    eprintln!("{}", "PreSaNa is searching...".dimmed());
                }
            }
            SessionEvent::Busy(false) => {}
            SessionEvent::Warning(message) => {
                eprintln!("{} {message}", "warning:".yellow().bold());
            }
            SessionEvent::ModelChanged(model) => {
                if !self.quiet {
                    println!("Cost model set to {}", model.to_string().bold());
                }
            }
            SessionEvent::EndScreen => {
                println!();
                println!("{}", END_MESSAGE.cyan().bold());
            }
        }
    }

    fn transport_error(&mut self, err: &TransportError) {
        eprintln!("{} {err}", "error:".red().bold());
    }
}

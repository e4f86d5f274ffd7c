mod narration;
mod outcomes;
mod reentrancy;
mod validation;

use super::{CueStatus, LogTag, Narration, Pacing, RunTicket, Session, SessionEvent};
use crate::backend::{BestRoute, RunResult};
use crate::metadata::ModelKind;

/// Helper to create a session with the linear model selected.
fn session() -> Session {
    Session::new(ModelKind::Linear)
}

/// Helper to build a successful run result.
fn success(logs: &[&str], path: &[&str], cost: f64) -> RunResult {
    RunResult::Success {
        logs: logs.iter().map(|s| s.to_string()).collect(),
        best: BestRoute {
            path: path.iter().map(|s| s.to_string()).collect(),
            cost,
        },
    }
}

fn unreachable(logs: &[&str]) -> RunResult {
    RunResult::Unreachable {
        logs: logs.iter().map(|s| s.to_string()).collect(),
    }
}

fn failure(error: &str) -> RunResult {
    RunResult::Failure {
        error: error.to_string(),
    }
}

/// Accept a run from A to C or fail the test.
fn accept(session: &mut Session) -> RunTicket {
    session
        .begin_run("A", "C")
        .unwrap_or_else(|e| panic!("run should be accepted: {e}"))
}

/// Apply every cue of a narration in order and return their statuses.
fn play(session: &mut Session, narration: &Narration) -> Vec<CueStatus> {
    narration
        .cues(Pacing::immediate())
        .map(|cue| session.apply(&cue))
        .collect()
}

/// Run A -> C to completion with the given backend result.
fn run_to_end(session: &mut Session, result: RunResult) {
    let ticket = accept(session);
    if let Some(narration) = session.receive(&ticket, Ok(result)) {
        play(session, &narration);
    }
}

fn tags(session: &Session) -> Vec<LogTag> {
    session.transcript().iter().map(|l| l.tag).collect()
}

fn texts(session: &Session) -> Vec<String> {
    session.transcript().iter().map(|l| l.text.clone()).collect()
}

fn drain(session: &mut Session) -> Vec<SessionEvent> {
    session.drain_events().collect()
}

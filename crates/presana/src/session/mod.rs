pub mod narration;
pub mod report;

#[cfg(test)]
mod tests;

use tracing::{debug, error, trace};

use crate::backend::{BestRoute, RunRequest, RunResult};
use crate::error::{RunRejected, TransportError};
use crate::metadata::ModelKind;

pub use narration::{Cue, CueAction, CueStatus, Narration, Pacing, RunToken};
pub use report::{LogLine, LogTag, Report};

/// Where the run state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    AwaitingBackend,
    Narrating,
    Reporting,
}

/// Something a view should reflect, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TranscriptCleared,
    Logged(LogLine),
    ReportOpened(Report),
    ReportHidden,
    Busy(bool),
    Warning(String),
    ModelChanged(ModelKind),
    EndScreen,
}

/// Proof that a run was accepted. Hand it back with the backend's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    pub token: RunToken,
    pub request: RunRequest,
}

/// How the active run will end once its transcript has played.
#[derive(Debug, Clone, PartialEq)]
enum Conclusion {
    Route(BestRoute),
    Unreachable,
    Failed(String),
}

/// Taken when a randomize is requested. Runs accepted after it are left alone
/// by the matching [`Session::reset_after_randomize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomizeMark {
    next_token: u64,
}

#[derive(Debug, Clone)]
struct ActiveRun {
    token: RunToken,
    model: ModelKind,
    conclusion: Option<Conclusion>,
}

/// The run orchestrator and the playback state it owns.
///
/// Single-actor: every mutation goes through `&mut self`. At most one run is
/// active; its [`RunToken`] gates responses and cues so a superseded run can
/// never write into the transcript.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    model: ModelKind,
    busy: bool,
    transcript: Vec<LogLine>,
    report: Option<Report>,
    end_screen: bool,
    next_token: u64,
    active: Option<ActiveRun>,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(model: ModelKind) -> Self {
        Self {
            phase: Phase::Idle,
            model,
            busy: false,
            transcript: Vec::new(),
            report: None,
            end_screen: false,
            next_token: 1,
            active: None,
            events: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn transcript(&self) -> &[LogLine] {
        &self.transcript
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn end_screen_visible(&self) -> bool {
        self.end_screen
    }

    pub fn active_token(&self) -> Option<RunToken> {
        self.active.as_ref().map(|run| run.token)
    }

    /// Take everything that happened since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SessionEvent> {
        self.events.drain(..)
    }

    /// Accept or refuse a run intent.
    ///
    /// Refusals issue no request and leave the phase untouched; a warning event is
    /// emitted instead. On acceptance the transcript and report are cleared, the
    /// busy flag is raised and a header line naming the model is logged.
    pub fn begin_run(&mut self, start: &str, dest: &str) -> Result<RunTicket, RunRejected> {
        if self.active.is_some() {
            return Err(self.reject(RunRejected::Busy));
        }
        if start == dest {
            return Err(self.reject(RunRejected::SameEndpoints));
        }

        self.transition(Phase::Validating);
        let token = RunToken(self.next_token);
        self.next_token += 1;

        self.clear_transcript();
        self.hide_report();
        self.set_busy(true);
        self.log(LogLine::header(self.model));

        self.active = Some(ActiveRun {
            token,
            model: self.model,
            conclusion: None,
        });
        self.transition(Phase::AwaitingBackend);
        debug!(%token, start, dest, model = self.model.id(), "run accepted");

        Ok(RunTicket {
            token,
            request: RunRequest {
                start: start.to_string(),
                dest: dest.to_string(),
                model: self.model,
            },
        })
    }

    /// Feed the backend's answer for `ticket`.
    ///
    /// Returns the narration to play back, or `None` when the run ended here
    /// (transport failure) or the ticket is stale.
    pub fn receive(
        &mut self,
        ticket: &RunTicket,
        response: Result<RunResult, TransportError>,
    ) -> Option<Narration> {
        if self.phase != Phase::AwaitingBackend || self.active_token() != Some(ticket.token) {
            debug!(token = %ticket.token, "dropping response for inactive run");
            return None;
        }

        let result = match response {
            Ok(result) => result,
            Err(err) => {
                error!(token = %ticket.token, "route request failed: {err}");
                self.active = None;
                self.log(LogLine::error(report::SYSTEM_ERROR_LINE));
                self.set_busy(false);
                self.transition(Phase::Idle);
                return None;
            }
        };

        let (lines, conclusion) = match result {
            RunResult::Success { logs, best } => (logs, Conclusion::Route(best)),
            RunResult::Unreachable { logs } => (logs, Conclusion::Unreachable),
            RunResult::Failure { error } => (Vec::new(), Conclusion::Failed(error)),
        };
        if let Some(run) = self.active.as_mut() {
            run.conclusion = Some(conclusion);
        }
        self.transition(Phase::Narrating);
        Some(Narration::new(ticket.token, lines))
    }

    /// Render one scheduled cue if it still belongs to the active run.
    pub fn apply(&mut self, cue: &Cue<'_>) -> CueStatus {
        if self.phase != Phase::Narrating || self.active_token() != Some(cue.token) {
            trace!(token = %cue.token, "stale cue dropped");
            return CueStatus::Stale;
        }
        match cue.action {
            CueAction::Line(text) => self.log(LogLine::plain(text)),
            CueAction::Conclude => self.conclude(),
        }
        CueStatus::Applied
    }

    fn conclude(&mut self) {
        let Some(run) = self.active.take() else {
            return;
        };
        self.transition(Phase::Reporting);

        match run.conclusion {
            Some(Conclusion::Failed(message)) => {
                self.log(LogLine::error(format!("ERROR: {message}")));
            }
            Some(Conclusion::Route(best)) => {
                self.open_report(Report::Route {
                    path: best.path,
                    cost: best.cost,
                    model: run.model,
                });
                self.log(LogLine::success(report::SUCCESS_LINE));
            }
            Some(Conclusion::Unreachable) | None => {
                self.open_report(Report::Unreachable);
                self.log(LogLine::error(report::UNREACHABLE_LINE));
            }
        }

        self.set_busy(false);
        self.transition(Phase::Idle);
        debug!(token = %run.token, "run concluded");
    }

    /// Note that a randomize was requested.
    pub fn mark_randomize(&self) -> RandomizeMark {
        RandomizeMark {
            next_token: self.next_token,
        }
    }

    /// Drop the run that was active at `mark` and reset the display after the
    /// topology changed.
    ///
    /// When a run was accepted after `mark` it owns the display and nothing is
    /// reset; returns whether the reset happened.
    pub fn reset_after_randomize(&mut self, mark: RandomizeMark) -> bool {
        if self.next_token != mark.next_token {
            debug!("run accepted since randomize; keeping display");
            return false;
        }
        if let Some(run) = self.active.take() {
            debug!(token = %run.token, "run invalidated by randomize");
        }
        self.clear_transcript();
        self.log(LogLine::placeholder(report::RANDOMIZED_LINE));
        self.hide_report();
        self.set_busy(false);
        if self.phase != Phase::Idle {
            self.transition(Phase::Idle);
        }
        true
    }

    /// Switch the model used by the next run. An active run keeps its model.
    pub fn select_model(&mut self, model: ModelKind) {
        if self.model != model {
            self.model = model;
            self.events.push(SessionEvent::ModelChanged(model));
        }
    }

    /// Show the end-of-session overlay. Does not touch the run state.
    pub fn end(&mut self) {
        if !self.end_screen {
            self.end_screen = true;
            self.events.push(SessionEvent::EndScreen);
        }
    }

    fn reject(&mut self, reason: RunRejected) -> RunRejected {
        debug!(?reason, "run rejected");
        self.events.push(SessionEvent::Warning(reason.to_string()));
        reason
    }

    fn transition(&mut self, to: Phase) {
        trace!(from = ?self.phase, ?to, "phase");
        self.phase = to;
    }

    fn log(&mut self, line: LogLine) {
        self.transcript.push(line.clone());
        self.events.push(SessionEvent::Logged(line));
    }

    fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.events.push(SessionEvent::TranscriptCleared);
    }

    fn open_report(&mut self, report: Report) {
        self.report = Some(report.clone());
        self.events.push(SessionEvent::ReportOpened(report));
    }

    fn hide_report(&mut self) {
        if self.report.take().is_some() {
            self.events.push(SessionEvent::ReportHidden);
        }
    }

    fn set_busy(&mut self, busy: bool) {
        if self.busy != busy {
            self.busy = busy;
            self.events.push(SessionEvent::Busy(busy));
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ModelKind::default())
    }
}

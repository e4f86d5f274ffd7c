use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::{Backend, RunRequest, RunResult};
use crate::error::TransportError;
use crate::metadata::{self, MetadataSummary, ModelKind};
use crate::network::{NetworkSnapshot, NetworkTable};
use crate::session::{Pacing, Session, SessionEvent};

/// A user intent routed by the control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Run { start: String, dest: String },
    Randomize,
    ChangeModel(ModelKind),
    End,
}

/// Output side of the control surface.
pub trait Presenter {
    /// Replace the network table wholesale.
    fn network(&mut self, table: &NetworkTable);

    fn metadata(&mut self, model: ModelKind, summary: &MetadataSummary);

    fn session_event(&mut self, event: &SessionEvent);

    fn transport_error(&mut self, err: &TransportError);
}

/// Routes intents to the session, the backend and the presenter.
///
/// Backend calls run on the blocking pool; pacing delays are `tokio` sleeps.
pub struct Controller<B, P> {
    backend: Arc<B>,
    presenter: P,
    session: Session,
    snapshot: Option<NetworkSnapshot>,
    pacing: Pacing,
}

impl<B, P> Controller<B, P>
where
    B: Backend + Send + Sync + 'static,
    P: Presenter,
{
    pub fn new(backend: B, presenter: P, model: ModelKind, pacing: Pacing) -> Self {
        Self {
            backend: Arc::new(backend),
            presenter,
            session: Session::new(model),
            snapshot: None,
            pacing,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> Option<&NetworkSnapshot> {
        self.snapshot.as_ref()
    }

    #[cfg(test)]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Fetch the network and render the table and metadata summary.
    pub async fn load(&mut self) -> Result<(), TransportError> {
        let backend = Arc::clone(&self.backend);
        let snapshot = blocking(move || backend.fetch_network()).await?;
        self.presenter.network(&NetworkTable::build(&snapshot));
        self.snapshot = Some(snapshot);
        self.show_metadata();
        Ok(())
    }

    pub async fn dispatch(&mut self, intent: Intent) {
        debug!(?intent, "dispatch");
        match intent {
            Intent::Run { start, dest } => self.run(&start, &dest).await,
            Intent::Randomize => self.randomize().await,
            Intent::ChangeModel(model) => {
                self.session.select_model(model);
                self.flush();
                self.show_metadata();
            }
            Intent::End => {
                self.session.end();
                self.flush();
            }
        }
    }

    async fn run(&mut self, start: &str, dest: &str) {
        let outcome = self.session.begin_run(start, dest);
        self.flush();
        let Ok(ticket) = outcome else {
            return;
        };

        let backend = Arc::clone(&self.backend);
        let request: RunRequest = ticket.request.clone();
        let response: Result<RunResult, TransportError> =
            blocking(move || backend.run_route(&request)).await;
        let narration = self.session.receive(&ticket, response);
        self.flush();
        let Some(narration) = narration else {
            return;
        };

        let arrived = tokio::time::Instant::now();
        for cue in narration.cues(self.pacing) {
            if !self.pacing.is_immediate() {
                tokio::time::sleep_until(arrived + cue.at).await;
            }
            self.session.apply(&cue);
            self.flush();
        }
    }

    async fn randomize(&mut self) {
        let mark = self.session.mark_randomize();
        let backend = Arc::clone(&self.backend);
        if let Err(err) = blocking(move || backend.randomize()).await {
            warn!("randomize failed: {err}");
            self.presenter.transport_error(&err);
            return;
        }
        if let Err(err) = self.load().await {
            warn!("network refresh failed: {err}");
            self.presenter.transport_error(&err);
        }
        self.session.reset_after_randomize(mark);
        self.flush();
    }

    fn show_metadata(&mut self) {
        let model = self.session.model();
        let summary = match &self.snapshot {
            Some(snapshot) => metadata::summary(model.id(), &snapshot.metadata),
            None => MetadataSummary::NoData,
        };
        self.presenter.metadata(model, &summary);
    }

    fn flush(&mut self) {
        for event in self.session.drain_events() {
            self.presenter.session_event(&event);
        }
    }
}

/// Run a blocking backend call off the async thread.
async fn blocking<T, F>(call: F) -> Result<T, TransportError>
where
    F: FnOnce() -> Result<T, TransportError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .unwrap_or_else(|e| Err(TransportError::Worker(e.to_string())))
}

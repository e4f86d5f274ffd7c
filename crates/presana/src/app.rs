use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Instant;

use eframe::egui;

use crate::backend::{Backend, HttpBackend, RunResult};
use crate::config::Settings;
use crate::error::TransportError;
use crate::metadata::{self, MetadataSummary, ModelKind};
use crate::network::view::HEADERS;
use crate::network::{NetworkSnapshot, NetworkTable};
use crate::session::{Narration, Pacing, RandomizeMark, RunTicket, Session, SessionEvent};
use crate::terminal::END_MESSAGE;
use crate::theme::Theme;

const TITLE: &str = "PreSaNa";

/// Answer from a background backend call.
enum Reply {
    Network {
        result: Result<NetworkSnapshot, TransportError>,
        after_randomize: Option<RandomizeMark>,
    },
    Run(RunTicket, Result<RunResult, TransportError>),
    Randomized(RandomizeMark, Result<(), TransportError>),
}

/// A narration being played back against the frame clock.
struct Playback {
    narration: Narration,
    arrived: Instant,
    next: usize,
}

struct PresanaApp {
    backend: HttpBackend,
    session: Session,
    snapshot: Option<NetworkSnapshot>,
    table: NetworkTable,
    nodes: Vec<String>,
    summary: MetadataSummary,
    theme: Theme,
    pacing: Pacing,
    start: String,
    dest: String,
    playback: Option<Playback>,
    warning: Option<String>,
    status: Option<String>,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
}

impl PresanaApp {
    fn new(ctx: &egui::Context, settings: &Settings) -> Self {
        let theme = Theme::from_name(&settings.theme);
        ctx.set_visuals(theme.visuals());
        let (tx, rx) = mpsc::channel();
        let app = Self {
            backend: HttpBackend::new(&settings.url, settings.timeout),
            session: Session::new(settings.model),
            snapshot: None,
            table: NetworkTable::default(),
            nodes: Vec::new(),
            summary: MetadataSummary::NoData,
            theme,
            pacing: settings.pacing,
            start: String::new(),
            dest: String::new(),
            playback: None,
            warning: None,
            status: Some(format!("Connecting to {}...", settings.url)),
            tx,
            rx,
        };
        app.fetch_network(ctx, None);
        app
    }

    /// Run a backend call on a worker thread; the reply wakes the frame loop.
    fn spawn<F>(&self, ctx: &egui::Context, job: F)
    where
        F: FnOnce(&HttpBackend) -> Reply + Send + 'static,
    {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let reply = job(&backend);
            if tx.send(reply).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn fetch_network(&self, ctx: &egui::Context, after_randomize: Option<RandomizeMark>) {
        self.spawn(ctx, move |backend| Reply::Network {
            result: backend.fetch_network(),
            after_randomize,
        });
    }

    fn run_intent(&mut self, ctx: &egui::Context) {
        let Ok(ticket) = self.session.begin_run(&self.start, &self.dest) else {
            return;
        };
        self.playback = None;
        self.spawn(ctx, move |backend| {
            let result = backend.run_route(&ticket.request);
            Reply::Run(ticket, result)
        });
    }

    fn randomize_intent(&mut self, ctx: &egui::Context) {
        self.status = Some("Randomizing network...".to_string());
        let mark = self.session.mark_randomize();
        self.spawn(ctx, move |backend| Reply::Randomized(mark, backend.randomize()));
    }

    fn change_model(&mut self, model: ModelKind) {
        self.session.select_model(model);
        self.refresh_summary();
    }

    fn refresh_summary(&mut self) {
        let id = self.session.model().id();
        self.summary = match &self.snapshot {
            Some(snapshot) => metadata::summary(id, &snapshot.metadata),
            None => MetadataSummary::NoData,
        };
    }

    fn install_snapshot(&mut self, snapshot: NetworkSnapshot) {
        self.table = NetworkTable::build(&snapshot);
        self.nodes = snapshot.nodes();
        if !self.nodes.contains(&self.start) {
            self.start = self.nodes.first().cloned().unwrap_or_default();
        }
        if !self.nodes.contains(&self.dest) {
            self.dest = self.nodes.last().cloned().unwrap_or_default();
        }
        self.snapshot = Some(snapshot);
        self.refresh_summary();
    }

    fn handle_replies(&mut self, ctx: &egui::Context) {
        while let Ok(reply) = self.rx.try_recv() {
            match reply {
                Reply::Network {
                    result,
                    after_randomize,
                } => {
                    match result {
                        Ok(snapshot) => {
                            self.install_snapshot(snapshot);
                            self.status = None;
                        }
                        Err(err) => {
                            tracing::error!("network fetch failed: {err}");
                            self.status = Some(format!("Network unavailable: {err}"));
                        }
                    }
                    if let Some(mark) = after_randomize {
                        if self.session.reset_after_randomize(mark) {
                            self.playback = None;
                        }
                    }
                }
                Reply::Randomized(mark, Ok(())) => self.fetch_network(ctx, Some(mark)),
                Reply::Randomized(_, Err(err)) => {
                    tracing::warn!("randomize failed: {err}");
                    self.status = Some(format!("Randomize failed: {err}"));
                }
                Reply::Run(ticket, result) => {
                    if let Some(narration) = self.session.receive(&ticket, result) {
                        self.playback = Some(Playback {
                            narration,
                            arrived: Instant::now(),
                            next: 0,
                        });
                    }
                }
            }
        }
    }

    /// Apply every cue whose offset has elapsed, then schedule the next frame.
    fn advance_playback(&mut self, ctx: &egui::Context) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        let elapsed = playback.arrived.elapsed();
        let mut wait = None;
        for (i, cue) in playback
            .narration
            .cues(self.pacing)
            .enumerate()
            .skip(playback.next)
        {
            if cue.at > elapsed {
                wait = Some(cue.at - elapsed);
                break;
            }
            self.session.apply(&cue);
            playback.next = i + 1;
        }
        match wait {
            Some(delay) => ctx.request_repaint_after(delay),
            None => self.playback = None,
        }
    }

    fn handle_session_events(&mut self) {
        for event in self.session.drain_events() {
            if let SessionEvent::Warning(message) = event {
                self.warning = Some(message);
            }
        }
    }

    fn draw_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(TITLE)
                        .size(self.theme.heading_size)
                        .strong()
                        .color(self.theme.accent),
                );
                ui.add_space(16.0);
                ui.label("Cost model:");
                let mut model = self.session.model();
                egui::ComboBox::from_id_salt("model")
                    .selected_text(model.display_name())
                    .show_ui(ui, |ui| {
                        for kind in ModelKind::all() {
                            ui.selectable_value(&mut model, *kind, kind.display_name());
                        }
                    });
                if model != self.session.model() {
                    self.change_model(model);
                }
            });
            let summary = egui::RichText::new(self.summary.to_string()).size(self.theme.body_size);
            if self.summary.is_available() {
                ui.label(summary.color(self.theme.foreground));
            } else {
                ui.label(summary.italics().color(self.theme.muted));
            }
            ui.add_space(8.0);
        });
    }

    fn draw_controls(&mut self, ctx: &egui::Context) {
        let busy = self.session.is_busy();
        let mut run_clicked = false;
        let mut randomize_clicked = false;
        let mut end_clicked = false;

        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(egui::RichText::new("Route").strong());
                node_selector(ui, "start-node", "Start", &mut self.start, &self.nodes);
                node_selector(ui, "dest-node", "Destination", &mut self.dest, &self.nodes);
                ui.add_space(12.0);

                run_clicked = ui
                    .add_enabled(!busy && !self.nodes.is_empty(), egui::Button::new("Run PreSaNa"))
                    .clicked();
                randomize_clicked = ui.button("Randomize network").clicked();
                ui.add_space(12.0);
                end_clicked = ui.button("End session").clicked();

                if let Some(status) = &self.status {
                    ui.add_space(12.0);
                    ui.label(egui::RichText::new(status).small().color(self.theme.muted));
                }
            });

        if run_clicked {
            self.run_intent(ctx);
        }
        if randomize_clicked {
            self.randomize_intent(ctx);
        }
        if end_clicked {
            self.session.end();
        }
    }

    fn draw_console(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("console")
            .resizable(true)
            .default_height(220.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.label(egui::RichText::new("Console").strong());
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if self.session.transcript().is_empty() {
                            ui.label(
                                egui::RichText::new("Waiting for a run...")
                                    .italics()
                                    .color(self.theme.muted),
                            );
                        }
                        for line in self.session.transcript() {
                            ui.label(
                                egui::RichText::new(line.text.as_str())
                                    .monospace()
                                    .size(self.theme.console_size)
                                    .color(self.theme.log_color(line.tag)),
                            );
                        }
                    });
            });
    }

    fn draw_network(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(egui::RichText::new("Network").strong());
            egui::Grid::new("network-table")
                .striped(true)
                .num_columns(HEADERS.len())
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    for header in HEADERS {
                        ui.label(egui::RichText::new(header).strong());
                    }
                    ui.end_row();
                    for (row, cells) in self.table.rows.iter().zip(self.table.cells()) {
                        for (i, cell) in cells.into_iter().enumerate() {
                            if i == 4 {
                                ui.colored_label(self.theme.blocked_color(row.blocked), cell);
                            } else {
                                ui.label(cell);
                            }
                        }
                        ui.end_row();
                    }
                });

            if let Some(report) = self.session.report() {
                ui.add_space(16.0);
                ui.separator();
                let color = if report.is_success() {
                    self.theme.success
                } else {
                    self.theme.error
                };
                ui.label(egui::RichText::new("Mission Report").strong().color(color));
                for line in report.lines() {
                    ui.label(line);
                }
            }
        });
    }

    fn draw_overlays(&mut self, ctx: &egui::Context) {
        if self.session.is_busy() {
            egui::Area::new(egui::Id::new("busy-overlay"))
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    egui::Frame::new()
                        .fill(Theme::with_opacity(self.theme.panel, 0.95))
                        .inner_margin(24.0)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.add(egui::Spinner::new());
                                ui.label("PreSaNa is searching...");
                            });
                        });
                });
        }

        let mut dismissed = false;
        if let Some(message) = &self.warning {
            egui::Window::new("Warning")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message.as_str());
                    dismissed = ui.button("OK").clicked();
                });
        }
        if dismissed {
            self.warning = None;
        }
    }

    fn draw_end_screen(&self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.theme.background).inner_margin(0.0))
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(END_MESSAGE)
                            .size(self.theme.heading_size)
                            .color(self.theme.accent),
                    );
                });
            });
    }
}

fn node_selector(ui: &mut egui::Ui, id: &str, label: &str, value: &mut String, nodes: &[String]) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(value.clone())
        .show_ui(ui, |ui| {
            for node in nodes {
                ui.selectable_value(value, node.clone(), node.as_str());
            }
        });
}

impl eframe::App for PresanaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_replies(ctx);
        self.advance_playback(ctx);
        self.handle_session_events();

        if self.session.end_screen_visible() {
            self.draw_end_screen(ctx);
            return;
        }

        self.draw_header(ctx);
        self.draw_controls(ctx);
        self.draw_console(ctx);
        self.draw_network(ctx);
        self.draw_overlays(ctx);
        self.handle_session_events();
    }
}

pub fn run(settings: Settings, windowed: bool) -> anyhow::Result<()> {
    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title(TITLE)
    } else {
        egui::ViewportBuilder::default()
            .with_maximized(true)
            .with_title(TITLE)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(PresanaApp::new(&cc.egui_ctx, &settings)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

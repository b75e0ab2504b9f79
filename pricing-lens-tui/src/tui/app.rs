use crate::run::{SimOutcome, SimRequest};
use crate::tui::session::Session;
use crate::tui::theme::Theme;
use pricing_lens_common::Config;
use std::sync::mpsc::{Receiver, TryRecvError};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Chart,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressState {
    Idle,
    Running,
    Done,
    Failed,
}

pub struct App {
    pub base_url: String,
    pub request: SimRequest,
    pub outcome: Option<SimOutcome>,
    pub error: Option<String>, // replaces the chart when set
    pub view: View,
    pub progress: ProgressState,
    pub pending_submit: bool, // main loop spawns the request on next tick
    pub result_rx: Option<Receiver<Result<SimOutcome, String>>>,
    pub status_msg: String,
    pub should_quit: bool,
    pub config: Config,
    pub theme: Theme,
}

impl App {
    pub fn new(base_url: String, request: SimRequest, config: Config) -> Self {
        Self {
            base_url,
            request,
            outcome: None,
            error: None,
            view: View::Chart,
            progress: ProgressState::Idle,
            pending_submit: true,
            result_rx: None,
            status_msg: String::from("Submitting..."),
            should_quit: false,
            theme: Theme::from_name(&config.display.theme),
            config,
        }
    }

    pub fn restore_from_session(&mut self, s: &Session) {
        if let Some(t) = &s.theme { self.theme = Theme::from_name(t); }
    }

    pub fn to_session(&self) -> Session {
        Session { request: self.request.clone(), theme: Some(self.theme.name.to_string()) }
    }

    pub fn in_flight(&self) -> bool {
        self.progress == ProgressState::Running
    }

    /// queue a re-submit; ignored while one request is already in flight
    pub fn request_submit(&mut self) {
        if self.in_flight() {
            self.status_msg = "Request already in flight".into();
            return;
        }
        self.pending_submit = true;
    }

    pub fn mark_dispatched(&mut self, rx: Receiver<Result<SimOutcome, String>>) {
        self.pending_submit = false;
        self.progress = ProgressState::Running;
        self.result_rx = Some(rx);
        self.status_msg = "Running simulation...".into();
    }

    /// called every tick; a sender dropped without a result counts as a failure
    pub fn poll_result(&mut self) {
        let Some(rx) = &self.result_rx else { return };
        match rx.try_recv() {
            Ok(result) => self.apply_result(result),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.apply_result(Err("simulation task ended without a result".into()))
            }
        }
    }

    /// whole result or whole error; never a mix of old outcome and new error
    pub fn apply_result(&mut self, result: Result<SimOutcome, String>) {
        self.result_rx = None;
        match result {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.error = None;
                self.progress = ProgressState::Done;
                self.status_msg = "Ready".into();
            }
            Err(e) => {
                self.outcome = None;
                self.error = Some(e);
                self.progress = ProgressState::Failed;
                self.status_msg = "Request failed".into();
            }
        }
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status_msg = format!("Theme: {}", self.theme.name);
    }
}

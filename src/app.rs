use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;

use crate::config::BrowserConfig;
use crate::data::loader::DirectoryResolver;
use crate::data::worker::{LoadTicket, LoadWorker};
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ProblemBrowserApp {
    pub state: AppState,
    worker: LoadWorker,
    source_label: String,
}

impl ProblemBrowserApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: BrowserConfig) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let ctx = cc.egui_ctx.clone();
        let worker = LoadWorker::new(config.resolver()).with_notify(move || ctx.request_repaint());

        let mut app = Self {
            state: AppState::default(),
            worker,
            source_label: config.source_label(),
        };
        if let Some(ticket) = app.state.select_window(config.initial_window.clone()) {
            app.fetch(ticket);
        }
        app
    }

    fn fetch(&self, ticket: LoadTicket) {
        self.worker.submit(ticket);
    }

    /// Point the browser at another snapshot folder and reload the current window.
    fn switch_folder(&mut self, folder: PathBuf) {
        let resolver = DirectoryResolver::new(folder);
        log::info!("Reading snapshots from {}", resolver.root().display());
        self.source_label = resolver.root().display().to_string();
        self.worker.set_resolver(Arc::new(resolver));
        let ticket = self.state.reload();
        self.fetch(ticket);
    }
}

impl eframe::App for ProblemBrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for completion in self.worker.poll() {
            self.state.complete_load(completion);
        }

        // ---- Top panel: menu bar + controls ----
        let mut picked_folder = None;
        let mut ticket = None;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            picked_folder = panels::top_bar(ui, &self.state, &self.source_label);
            ui.separator();
            ticket = panels::controls(ui, &mut self.state);
            ui.add_space(4.0);
        });

        // ---- Central panel: problem list ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(retry) = table::problem_list(ui, &mut self.state) {
                ticket = Some(retry);
            }
        });

        if let Some(folder) = picked_folder {
            self.switch_folder(folder);
        } else if let Some(ticket) = ticket {
            self.fetch(ticket);
        }
    }
}

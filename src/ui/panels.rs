use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::TimeWindow;
use crate::data::query::{DifficultyFilter, SortKey};
use crate::data::worker::LoadTicket;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu. Returns a snapshot folder picked by the user.
pub fn top_bar(ui: &mut Ui, state: &AppState, source_label: &str) -> Option<PathBuf> {
    let mut picked = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open snapshot folder…").clicked() {
                picked = pick_snapshot_folder();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new(format!("Source: {source_label}")).weak());

        if let Some(summary) = state.summary() {
            ui.separator();
            ui.label(format!("{} of {} problems shown", summary.shown, summary.total));
        }
    });

    picked
}

fn pick_snapshot_folder() -> Option<PathBuf> {
    let folder = rfd::FileDialog::new()
        .set_title("Open snapshot folder")
        .pick_folder();
    if let Some(path) = &folder {
        log::info!("Snapshot folder selected: {}", path.display());
    }
    folder
}

// ---------------------------------------------------------------------------
// Query controls
// ---------------------------------------------------------------------------

/// Render the time-window, search, difficulty and sort controls.
/// Returns a ticket when the user picked a window that must be fetched.
pub fn controls(ui: &mut Ui, state: &mut AppState) -> Option<LoadTicket> {
    let mut chosen_window: Option<TimeWindow> = None;

    ui.horizontal_wrapped(|ui: &mut Ui| {
        // ---- Time window (locked while a fetch is in flight) ----
        ui.label(RichText::new("Time Frame:").strong());
        let current = state.params().time_window.clone();
        ui.add_enabled_ui(!state.is_loading(), |ui: &mut Ui| {
            egui::ComboBox::from_id_salt("time_window")
                .selected_text(current.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for window in TimeWindow::SELECTABLE {
                        if ui
                            .selectable_label(current == window, window.label())
                            .clicked()
                        {
                            chosen_window = Some(window);
                        }
                    }
                });
        });

        ui.separator();

        // ---- Search ----
        let mut search = state.params().search_text.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut search)
                .hint_text("Search problems or topics...")
                .desired_width(220.0),
        );
        if response.changed() {
            state.set_search_text(search);
        }

        ui.separator();

        // ---- Difficulty ----
        let current_filter = state.params().difficulty_filter;
        egui::ComboBox::from_id_salt("difficulty_filter")
            .selected_text(current_filter.label())
            .show_ui(ui, |ui: &mut Ui| {
                for filter in DifficultyFilter::CHOICES {
                    if ui
                        .selectable_label(current_filter == filter, filter.label())
                        .clicked()
                    {
                        state.set_difficulty_filter(filter);
                    }
                }
            });

        ui.separator();

        // ---- Sort ----
        ui.label(RichText::new("Sort by:").strong());
        let current_key = state.params().sort_key;
        egui::ComboBox::from_id_salt("sort_key")
            .selected_text(current_key.label())
            .show_ui(ui, |ui: &mut Ui| {
                for key in SortKey::ALL {
                    if ui.selectable_label(current_key == key, key.label()).clicked() {
                        state.set_sort_key(key);
                    }
                }
            });
        if ui
            .button(state.params().sort_direction.arrow())
            .on_hover_text("Toggle sort direction")
            .clicked()
        {
            state.toggle_sort_direction();
        }
    });

    chosen_window.and_then(|window| state.select_window(window))
}

/// Red status line used for load failures.
pub fn error_banner(ui: &mut Ui, message: &str) {
    ui.label(RichText::new(message).color(Color32::from_rgb(252, 165, 165)));
}

use eframe::egui::{Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{self, TopicColors};
use crate::data::model::{Difficulty, ProblemCollection, ProblemRecord};
use crate::data::query::QueryResult;
use crate::data::worker::LoadTicket;
use crate::state::{AppState, View};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// Problem list (central panel)
// ---------------------------------------------------------------------------

/// Render the central panel for the current view. Returns a ticket when
/// the user asked to retry a failed load.
pub fn problem_list(ui: &mut Ui, state: &mut AppState) -> Option<LoadTicket> {
    let mut retry = false;

    match state.view() {
        View::Idle => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Pick a time frame to load problems");
            });
        }
        View::Loading { window } => {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label(format!("Loading {} problems...", window.label()));
            });
        }
        View::Error { message } => {
            panels::error_banner(ui, message);
            retry = ui.button("Retry").clicked();
        }
        View::NoResults { collection } => {
            summary_line(ui, collection, &QueryResult::default());
            ui.add_space(24.0);
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new("No problems found matching your criteria.").heading());
                ui.label(RichText::new("Try adjusting your filters or search terms.").weak());
            });
        }
        View::Results { collection, result } => {
            summary_line(ui, collection, result);
            ui.separator();
            problem_table(ui, collection, result, &state.topic_colors);
        }
    }

    retry.then(|| state.reload())
}

fn summary_line(ui: &mut Ui, collection: &ProblemCollection, result: &QueryResult) {
    let summary = result.summary(collection);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Showing");
        ui.label(RichText::new(summary.shown.to_string()).strong());
        ui.label(format!("problems from {}", collection.window().label()));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            for d in Difficulty::ALL.iter().rev() {
                ui.label(
                    RichText::new(format!("{} {}", d.label(), summary.count(*d)))
                        .color(color::difficulty_color(d.as_str())),
                );
            }
            ui.label(format!("Total in dataset: {}", summary.total));
        });
    });
}

fn problem_table(
    ui: &mut Ui,
    collection: &ProblemCollection,
    result: &QueryResult,
    topic_colors: &TopicColors,
) {
    let problems = collection.problems();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::initial(260.0).at_least(120.0).clip(true))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder().at_least(160.0).clip(true))
        .column(Column::auto())
        .header(22.0, |mut header| {
            for title in ["Title", "Difficulty", "Frequency", "Acceptance", "Topics", ""] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(26.0, result.len(), |mut row| {
                let Some(problem) = result
                    .indices
                    .get(row.index())
                    .and_then(|&i| problems.get(i))
                else {
                    return;
                };
                row.col(|ui: &mut Ui| {
                    ui.label(RichText::new(&problem.title).strong());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(&problem.difficulty)
                            .small()
                            .color(color::difficulty_color(&problem.difficulty)),
                    );
                });
                row.col(|ui: &mut Ui| {
                    ui.label(problem.frequency.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(problem.acceptance_percent());
                });
                row.col(|ui: &mut Ui| topic_chips(ui, problem, topic_colors));
                row.col(|ui: &mut Ui| {
                    if !problem.link.is_empty() {
                        ui.hyperlink_to("Solve ↗", &problem.link);
                    }
                });
            });
        });
}

fn topic_chips(ui: &mut Ui, problem: &ProblemRecord, topic_colors: &TopicColors) {
    ui.spacing_mut().item_spacing.x = 6.0;
    for topic in problem.topic_list() {
        ui.label(
            RichText::new(topic)
                .small()
                .color(topic_colors.color_for(topic)),
        );
    }
}

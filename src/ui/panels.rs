use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::format::{format_currency, format_currency_opt, format_years};
use crate::state::AppState;

const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(records) = state.records.clone() else {
        ui.label("No data loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Job Title");
            if let Some(choice) = category_combo(
                ui,
                "job_title_filter",
                state.criteria.job_title.as_deref(),
                records.job_titles.iter(),
            ) {
                state.set_job_title(choice);
            }
            ui.add_space(6.0);

            ui.strong("ZIP Code");
            if let Some(choice) = category_combo(
                ui,
                "zip_filter",
                state.criteria.zip.as_deref(),
                records.zips.iter(),
            ) {
                state.set_zip(choice);
            }
            ui.add_space(6.0);

            ui.strong("Start Date");
            let mut changed = ui
                .checkbox(&mut state.date_filter_enabled, "Limit to range")
                .changed();
            ui.add_enabled_ui(state.date_filter_enabled, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("From");
                    changed |= ui
                        .add(DatePickerButton::new(&mut state.date_from).id_salt("date_from"))
                        .changed();
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("To");
                    changed |= ui
                        .add(DatePickerButton::new(&mut state.date_to).id_salt("date_to"))
                        .changed();
                });
            });
            if changed {
                state.refilter();
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

/// `All` plus one entry per label. Returns the new selection when it changed
/// (`Some(None)` means `All`).
fn category_combo<'a>(
    ui: &mut Ui,
    id: &str,
    current: Option<&str>,
    labels: impl Iterator<Item = &'a String>,
) -> Option<Option<String>> {
    let mut choice = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or(ALL))
        .width(180.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), ALL).clicked() && current.is_some() {
                choice = Some(None);
            }
            for label in labels {
                let selected = current == Some(label.as_str());
                if ui.selectable_label(selected, label).clicked() && !selected {
                    choice = Some(Some(label.clone()));
                }
            }
        });
    choice
}

// ---------------------------------------------------------------------------
// Metric row
// ---------------------------------------------------------------------------

/// The four headline metrics over the filtered set.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let summary = &state.outcome.summary;
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total Employees", summary.count.to_string());
        metric(&mut cols[1], "Average Salary", format_currency_opt(summary.mean_salary));
        metric(&mut cols[2], "Avg Tenure (Years)", format_years(summary.mean_tenure));
        metric(&mut cols[3], "Total Salary Cost", format_currency(summary.total_salary));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).weak());
            ui.label(RichText::new(value).size(26.0).strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.loader.invalidate();
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(records) = &state.records {
            ui.label(format!(
                "{}: {} employees loaded, {} shown",
                records.source.display(),
                records.len(),
                state.outcome.indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if state.records.is_none() {
                Color32::RED
            } else {
                Color32::YELLOW
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open employee data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open(path);
    }
}

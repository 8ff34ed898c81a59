use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

const NO_DATA_HINT: &str = "Open a file to view employees (File → Open…), or run \
                            `cargo run --bin generate_sample` to create BusEmployeesInfo.xlsx.";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Nothing below depends on anything but the loaded data.
        if self.state.records.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    if let Some(msg) = &self.state.status_message {
                        ui.heading(msg);
                    }
                    ui.label(NO_DATA_HINT);
                });
            });
            return;
        }

        // ---- Bottom panel: detail table ----
        egui::TopBottomPanel::bottom("details")
            .resizable(true)
            .default_height(260.0)
            .show(ctx, |ui| {
                table::employee_table(ui, &self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("HR Analytics Dashboard");
            panels::metrics_row(ui, &self.state);
            ui.add_space(8.0);
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    charts::chart_tabs(ui, &mut self.state);
                });
        });
    }
}

use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::format::format_salary;
use crate::state::AppState;

const HEADERS: [&str; 6] = ["EMPID", "First Name", "Last Name", "Job Title", "Salary", "StartDate"];

/// Employee details for the filtered set, in source order.
pub fn employee_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Employee Details");

    let Some(records) = &state.records else {
        return;
    };
    let indices = &state.outcome.indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let e = &records.employees[indices[row.index()]];
                row.col(|ui| {
                    ui.label(&e.id);
                });
                row.col(|ui| {
                    ui.label(&e.first_name);
                });
                row.col(|ui| {
                    ui.label(&e.last_name);
                });
                row.col(|ui| {
                    ui.label(&e.job_title);
                });
                row.col(|ui| {
                    ui.label(format_salary(e.salary));
                });
                row.col(|ui| {
                    ui.label(e.start_date.to_string());
                });
            });
        });
}

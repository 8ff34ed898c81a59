use chrono::Datelike;
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, Points};

use crate::color::ColorMap;
use crate::data::model::Employee;
use crate::data::stats::{salary_by_job_title, Histogram};
use crate::data::summary::Summary;
use crate::state::{AppState, Tab};

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Tabbed chart area (central panel)
// ---------------------------------------------------------------------------

/// Render the tab strip and the charts of the selected tab.
pub fn chart_tabs(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Salary, "Salary Analysis");
        ui.selectable_value(&mut state.tab, Tab::Team, "Team Composition");
        ui.selectable_value(&mut state.tab, Tab::Tenure, "Tenure Insights");
    });
    ui.separator();

    let Some(records) = &state.records else {
        return;
    };
    let filtered: Vec<&Employee> = state.outcome.records(&records.employees).collect();
    if filtered.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No employees match the current filters.");
        });
        return;
    }

    match state.tab {
        Tab::Salary => {
            ui.heading("Salary Distribution");
            histogram_plot(
                ui,
                "salary_histogram",
                "Salary",
                Histogram::from_values(filtered.iter().map(|e| e.salary), state.histogram_bins),
            );
            ui.heading("Salary Range by Job Title");
            salary_box_plot(ui, &filtered, &state.job_colors);
        }
        Tab::Team => {
            ui.heading("Employee Distribution by Job Title");
            category_bars(ui, "job_title_bars", &state.outcome.summary.by_job_title, &state.job_colors);
            ui.heading("Employee Distribution by ZIP Code");
            category_bars(ui, "zip_bars", &state.outcome.summary.by_zip, &state.zip_colors);
        }
        Tab::Tenure => {
            ui.heading("Employee Tenure Distribution (Years)");
            histogram_plot(
                ui,
                "tenure_histogram",
                "Tenure (years)",
                Histogram::from_values(filtered.iter().map(|e| e.tenure_years), state.histogram_bins),
            );
            ui.heading("Employee Start Dates by Job Title");
            start_date_scatter(ui, &filtered, &state.job_colors);
        }
    }
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, id: &str, x_label: &str, histogram: Histogram) {
    // A single-valued input has zero bin width; draw it as a unit-wide bar.
    let width = if histogram.bin_width > 0.0 {
        histogram.bin_width
    } else {
        1.0
    };
    let bars: Vec<Bar> = histogram
        .centers()
        .map(|(center, n)| Bar::new(center, n as f64).width(width))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Employees")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

/// One bar per category, largest first, each its own legend entry.
fn category_bars(
    ui: &mut Ui,
    id: &str,
    groups: &std::collections::BTreeMap<String, usize>,
    colors: &ColorMap,
) {
    let charts: Vec<BarChart> = Summary::ranked(groups)
        .into_iter()
        .enumerate()
        .map(|(i, (label, n))| {
            let color = colors.color_for(label);
            BarChart::new(vec![Bar::new(i as f64, n as f64).name(label).fill(color)])
                .name(label)
                .color(color)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Employees")
        .show_x(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn salary_box_plot(ui: &mut Ui, filtered: &[&Employee], colors: &ColorMap) {
    let spreads = salary_by_job_title(filtered.iter().copied());

    Plot::new("salary_by_job_title")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Salary")
        .show_x(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (title, stats)) in spreads.iter().enumerate() {
                let color = colors.color_for(title);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(stats.min, stats.q1, stats.median, stats.q3, stats.max),
                )
                .name(title)
                .fill(color.gamma_multiply(0.4))
                .box_width(0.6);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(title).color(color));
            }
        });
}

/// Start date as a fractional year on x, one row per job title on y.
fn start_date_scatter(ui: &mut Ui, filtered: &[&Employee], colors: &ColorMap) {
    let mut by_title: std::collections::BTreeMap<&str, Vec<[f64; 2]>> = Default::default();
    for e in filtered {
        by_title.entry(e.job_title.as_str()).or_default().push([
            e.start_date.year() as f64 + e.start_date.ordinal0() as f64 / 365.0,
            0.0,
        ]);
    }

    Plot::new("start_dates")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Start date (year)")
        .show_y(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (row, (title, mut points)) in by_title.into_iter().enumerate() {
                for p in &mut points {
                    p[1] = row as f64;
                }
                plot_ui.points(
                    Points::new(points)
                        .name(title)
                        .color(colors.color_for(title))
                        .radius(3.0),
                );
            }
        });
}

use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

use crate::color::{ColorMap, BAR_COLOR, NO_COLOR, YES_COLOR};
use crate::data::aggregate::{FormatCounts, GroupCount, YearBucketCount, YearCount, YearFlagCounts};
use crate::error::ChartError;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current report, or the fallback message.
pub fn charts(ui: &mut Ui, state: &AppState) {
    let charts = match &state.report.charts {
        Ok(charts) => charts,
        Err(err) => {
            fallback(ui, err);
            return;
        }
    };
    let who = state.report.filters.selection.label();

    ui.columns(2, |cols: &mut [Ui]| {
        year_by_flag(&mut cols[0], &charts.year_by_flag, who);
        year_by_pct(&mut cols[1], &charts.year_by_pct, &state.pct_colors);
    });

    ui.add_space(8.0);
    top_groups(
        ui,
        "top_modules",
        &format!("Top {} modules with the most {who} duplication", state.options.top_n),
        &charts.top_modules,
    );
    top_groups(
        ui,
        "top_presses",
        &format!("Top {} presses with the most {who} duplication", state.options.top_n),
        &charts.top_presses,
    );

    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        formats(&mut cols[0], &charts.formats, who);
        missing(&mut cols[1], &charts.missing, who);
    });
}

fn fallback(ui: &mut Ui, err: &ChartError) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_height(80.0);
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(err.to_string()).color(Color32::from_rgb(230, 160, 0)).size(16.0));
        });
    });
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn year_by_flag(ui: &mut Ui, rows: &[YearFlagCounts], who: &str) {
    ui.strong(format!("{who} dups by year"));
    let bars = |offset: f64, pick: fn(&YearFlagCounts) -> usize| -> Vec<Bar> {
        rows.iter()
            .map(|r| {
                Bar::new(r.year as f64 + offset, pick(r) as f64)
                    .width(0.4)
                    .name(r.year)
            })
            .collect()
    };
    let no = BarChart::new(bars(-0.2, |r| r.no)).name("No").color(NO_COLOR);
    let yes = BarChart::new(bars(0.2, |r| r.yes)).name("Yes").color(YES_COLOR);

    Plot::new("year_by_flag")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Upload year")
        .y_axis_label("Titles")
        .x_axis_formatter(year_formatter)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(no);
            plot_ui.bar_chart(yes);
        });
}

fn year_by_pct(ui: &mut Ui, rows: &[YearBucketCount], colors: &ColorMap) {
    ui.strong("Dup pct by year");

    // Buckets arrive sorted by year then pct; regroup by bucket for stacking.
    let mut buckets: Vec<(f64, &str)> = rows.iter().map(|r| (r.pct, r.bucket.as_str())).collect();
    buckets.sort_by(|a, b| a.0.total_cmp(&b.0));
    buckets.dedup_by(|a, b| a.1 == b.1);

    let mut stacked: Vec<BarChart> = Vec::with_capacity(buckets.len());
    for (_, label) in buckets {
        let bars: Vec<Bar> = rows
            .iter()
            .filter(|r| r.bucket == label)
            .map(|r| Bar::new(r.year as f64, r.count as f64).width(0.6).name(r.year))
            .collect();
        let below: Vec<&BarChart> = stacked.iter().collect();
        let chart = BarChart::new(bars)
            .name(label)
            .color(colors.color_for(label))
            .stack_on(&below);
        stacked.push(chart);
    }

    Plot::new("year_by_pct")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Upload year")
        .y_axis_label("Count")
        .x_axis_formatter(year_formatter)
        .show(ui, |plot_ui| {
            for chart in stacked {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Horizontal bars, largest at the top.
fn top_groups(ui: &mut Ui, id: &str, title: &str, groups: &[GroupCount]) {
    ui.strong(title);
    let n = groups.len();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new((n - 1 - i) as f64, g.dups as f64)
                .width(0.7)
                .name(&g.key)
        })
        .collect();
    let labels: Vec<String> = groups.iter().rev().map(|g| g.key.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Number of dups")
        .y_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(BAR_COLOR));
        });
}

fn formats(ui: &mut Ui, counts: &FormatCounts, who: &str) {
    ui.strong(format!("Format of {who} duplicates ({} titles)", counts.total()));
    let bars: Vec<Bar> = counts
        .counts
        .iter()
        .enumerate()
        .map(|(i, (class, n))| Bar::new(i as f64, *n as f64).width(0.6).name(class))
        .collect();
    let labels = counts.counts.iter().map(|(c, _)| c.label().to_string()).collect();

    Plot::new("formats")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(labels))
        .y_axis_label("Titles")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(YES_COLOR));
        });
    if counts.unclassified > 0 {
        ui.weak(format!("{} duplicates match no format rule", counts.unclassified));
    }
}

fn missing(ui: &mut Ui, rows: &[YearCount], who: &str) {
    ui.strong(format!("Titles with no {who} holdings, by year"));
    let bars: Vec<Bar> = rows
        .iter()
        .map(|r| Bar::new(r.year as f64, r.count as f64).width(0.6).name(r.year))
        .collect();

    Plot::new("missing")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Upload year")
        .y_axis_label("Titles")
        .x_axis_formatter(year_formatter)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(NO_COLOR));
        });
}

// ---------------------------------------------------------------------------
// Plot helpers
// ---------------------------------------------------------------------------

/// Whole years only; fractional grid lines get no label.
fn year_formatter(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract().abs() < 1e-6 {
        format!("{}", mark.value as i64)
    } else {
        String::new()
    }
}

/// Label integer grid marks with `labels[mark]`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

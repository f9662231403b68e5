use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::YearRange;
use crate::data::model::Selection;
use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (min_year, max_year) = {
        let ds = state.catalog.dataset();
        (ds.min_year, ds.max_year)
    };

    // ---- Upload year range ----
    ui.label(RichText::new("What upload years to include").strong());
    let mut years = state.filters.years;
    ui.add(egui::Slider::new(&mut years.lo, min_year..=max_year).text("from"));
    ui.add(egui::Slider::new(&mut years.hi, min_year..=max_year).text("to"));
    state.set_years(YearRange::new(years.lo, years.hi));
    ui.separator();

    // ---- Institution selector ----
    ui.label(RichText::new("Institution").strong());
    let current = state.filters.selection;
    let mut picked = current;
    egui::ComboBox::from_id_salt("institution")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in Selection::ALL_CHOICES {
                ui.selectable_value(&mut picked, choice, choice.label());
            }
        });
    state.set_selection(picked);
    ui.separator();

    ui.label(format!(
        "{} of {} titles uploaded {}",
        state.report.visible,
        state.catalog.dataset().len(),
        state.report.filters.years
    ));
}

// ---------------------------------------------------------------------------
// Central panel – charts, table, download
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("OUP-UPSO duplication in TRLN");
            ui.add_space(6.0);

            plot::charts(ui, state);

            ui.add_space(12.0);
            ui.separator();
            ui.heading(
                "Dataset with duplicate flags and percent duplication per title across schools",
            );
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Download data as csv").clicked() {
                    save_dialog(state);
                }
                ui.weak("Full dataset, all upload years");
            });
            ui.add_space(4.0);
            table::detail_table(ui, &state.report.table);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Download CSV…").clicked() {
                save_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} titles loaded, {} visible",
            state.catalog.dataset().len(),
            state.report.visible
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save duplication data")
        .set_file_name(state.report.csv.file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_download(&path) {
            log::error!("Failed to save CSV: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

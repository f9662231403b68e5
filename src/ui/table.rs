use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::DisplayTable;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable detail table of the filtered titles.
pub fn detail_table(ui: &mut Ui, table: &DisplayTable) {
    if table.is_empty() {
        ui.label("No titles in the selected upload years.");
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt("detail_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(400.0)
                .columns(Column::auto().at_least(60.0).clip(true), table.headers.len())
                .header(22.0, |mut header| {
                    for name in &table.headers {
                        header.col(|ui: &mut Ui| {
                            ui.label(RichText::new(name).strong());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.len(), |mut row| {
                        let cells = &table.rows[row.index()];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}

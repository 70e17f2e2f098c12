use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::FareRow;

const ROW_HEIGHT: f32 = 18.0;

fn optional(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| "–".to_string())
}

/// The highest-fare passengers: name, class, sex, age, fare, outcome.
pub fn fare_table(ui: &mut Ui, rows: &[FareRow]) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(120.0).clip(true))
        .columns(Column::auto(), 5)
        .header(20.0, |mut header| {
            for title in ["Name", "Class", "Sex", "Age", "Fare", "Survived"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(ROW_HEIGHT, |mut tr| {
                    tr.col(|ui| {
                        ui.label(&row.name).on_hover_text(&row.name);
                    });
                    tr.col(|ui| {
                        ui.label(row.class.to_string());
                    });
                    tr.col(|ui| {
                        ui.label(row.sex.as_str());
                    });
                    tr.col(|ui| {
                        ui.label(optional(row.age, 0));
                    });
                    tr.col(|ui| {
                        ui.label(optional(row.fare, 2));
                    });
                    tr.col(|ui| {
                        ui.label(if row.survived { "1" } else { "0" });
                    });
                });
            }
        });
}

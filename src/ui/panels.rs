use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::color::Theme;
use crate::data::aggregate::{format_percent, DerivedViews};
use crate::data::filter::{NumericRange, SliderBounds};
use crate::data::model::{PassengerClass, Sex};
use crate::state::AppState;
use crate::ui::{plot, table};

pub const NO_MATCH: &str = "⚠ No passengers match the current filters.";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🚢 Titanic Survival");
    ui.label(RichText::new("Passenger data filters").weak());
    ui.separator();

    let (Some(dataset), Some(bounds)) = (state.dataset.clone(), state.bounds) else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Theme selector ----
            ui.strong("Colour theme");
            let mut theme = state.theme;
            egui::ComboBox::from_id_salt("theme")
                .selected_text(theme.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for t in Theme::ALL {
                        ui.selectable_value(&mut theme, t, t.to_string());
                    }
                });
            if theme != state.theme {
                state.set_theme(theme);
            }
            ui.separator();

            // ---- Categorical multi-selects ----
            ui.strong("Port of embarkation");
            for &port in &dataset.ports {
                let mut checked = state.criteria.embarked.contains(&port);
                let label = format!("{port} ({})", port.town());
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_port(port);
                }
            }
            ui.add_space(4.0);

            ui.strong("Sex");
            for sex in Sex::ALL {
                let mut checked = state.criteria.sex.contains(&sex);
                if ui.checkbox(&mut checked, sex.as_str()).changed() {
                    state.toggle_sex(sex);
                }
            }
            ui.add_space(4.0);

            ui.strong("Class");
            for class in PassengerClass::ALL {
                let mut checked = state.criteria.class.contains(&class);
                if ui.checkbox(&mut checked, format!("Class {class}")).changed() {
                    state.toggle_class(class);
                }
            }
            ui.separator();

            // ---- Numeric ranges ----
            let mut next = state.criteria.clone();
            ui.strong("Age");
            let age_changed = range_sliders(ui, &mut next.age, &bounds.age);
            ui.add_space(4.0);
            ui.strong("Fare");
            let fare_changed = range_sliders(ui, &mut next.fare, &bounds.fare);
            if age_changed || fare_changed {
                state.apply_criteria(next);
            }
            ui.add_space(8.0);

            let reset = ui.add_sized(
                [ui.available_width(), 24.0],
                egui::Button::new("Reset filters"),
            );
            if reset.clicked() {
                state.reset_filters();
            }

            ui.separator();
            ui.strong("Current filter result");
            metric_card(ui, "Filtered rows", &state.visible_indices.len().to_string(), None);
            ui.label(
                RichText::new(format!("of {} passengers in the dataset", dataset.len())).weak(),
            );
        });
}

/// Two sliders for an inclusive range. Keeps `min <= max`.
fn range_sliders(ui: &mut Ui, range: &mut NumericRange, bounds: &SliderBounds) -> bool {
    let domain = bounds.lo..=bounds.hi;
    let min = ui.add(
        Slider::new(&mut range.min, domain.clone())
            .step_by(bounds.step)
            .text("min"),
    );
    let max = ui.add(Slider::new(&mut range.max, domain).step_by(bounds.step).text("max"));
    if range.min > range.max {
        if min.changed() {
            range.max = range.min;
        } else {
            range.min = range.max;
        }
    }
    min.changed() || max.changed()
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// A bordered card with a label, a large value and an optional delta line.
pub fn metric_card(ui: &mut Ui, label: &str, value: &str, delta: Option<&str>) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(label).weak());
                ui.label(RichText::new(value).size(24.0).strong());
                if let Some(delta) = delta {
                    ui.label(RichText::new(format!("↑ {delta}")).color(Color32::from_rgb(9, 171, 59)));
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Dashboard columns
// ---------------------------------------------------------------------------

/// Column 1: headline counts and the survival rate per sex.
pub fn insights_column(ui: &mut Ui, views: &DerivedViews) {
    ui.heading("⚓ Survival Insights");
    ui.add_space(4.0);

    let s = &views.summary;
    metric_card(ui, "Passengers", &s.total.to_string(), None);
    metric_card(
        ui,
        "Survivors",
        &s.survived.to_string(),
        Some(&format_percent(s.survival_rate)),
    );
    metric_card(ui, "Deaths", &s.died.to_string(), None);

    ui.separator();
    ui.strong("👥 Survival rate by sex");
    ui.columns(Sex::ALL.len(), |cols: &mut [Ui]| {
        for (col, sex) in cols.iter_mut().zip(Sex::ALL) {
            metric_card(col, sex.as_str(), &format_percent(views.by_sex.rate(sex)), None);
        }
    });
}

/// Column 2: heatmap and embarkation chart, or a notice when nothing matches.
pub fn patterns_column(ui: &mut Ui, views: &DerivedViews, theme: Theme) {
    ui.heading("📊 Distribution & Patterns");
    if views.is_empty() {
        ui.colored_label(Color32::from_rgb(200, 140, 0), NO_MATCH);
        return;
    }
    ScrollArea::vertical()
        .id_salt("patterns")
        .show(ui, |ui: &mut Ui| {
            ui.strong("🔥 Survival rate by age group × class");
            plot::heatmap(ui, &views.heatmap, theme);
            ui.add_space(8.0);
            ui.strong("🛳 Survival rate by port of embarkation");
            plot::embarkation_bars(ui, &views.embarkation);
        });
}

/// Column 3: survivor ranking, fare table and a short description of the data.
pub fn details_column(ui: &mut Ui, views: &DerivedViews) {
    ui.heading("🏅 Detailed Analysis");
    ScrollArea::vertical()
        .id_salt("details")
        .show(ui, |ui: &mut Ui| {
            if views.is_empty() {
                ui.colored_label(Color32::from_rgb(200, 140, 0), NO_MATCH);
            } else {
                ui.strong(format!("👶 Top {} age groups by survivors", views.top_age_groups.len()));
                plot::top_age_group_bars(ui, &views.top_age_groups);
                ui.add_space(8.0);
                ui.strong(format!("💰 Top {} fares", views.top_fares.len()));
                table::fare_table(ui, &views.top_fares);
            }
            ui.separator();
            about(ui);
        });
}

fn about(ui: &mut Ui) {
    egui::CollapsingHeader::new(RichText::new("ℹ About").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Dataset: Titanic passenger list (Kaggle).");
            ui.label("• Survived: 0 = died, 1 = survived");
            ui.label("• Pclass: ticket class 1, 2 or 3");
            ui.label("• Sex, Age, Fare");
            ui.label("• Embarked: C = Cherbourg, Q = Queenstown, S = Southampton");
            ui.label(
                RichText::new(
                    "Passengers with unknown age, fare or port are kept by the range filters.",
                )
                .weak(),
            );
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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} passengers loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open passenger data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(Arc::new(dataset)),
            Err(e) => {
                // Keep showing the previous dataset.
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

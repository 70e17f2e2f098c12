use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, GridMark, Plot, PlotPoint, PlotPoints, Polygon, Text,
};

use crate::color::{qualitative_palette, Theme};
use crate::data::aggregate::{format_percent, AgeGroup, AgeGroupSurvivors, EmbarkationRate, HeatmapCell};
use crate::data::model::PassengerClass;

const CHART_HEIGHT: f32 = 260.0;

/// A plot with navigation disabled; these charts are read, not explored.
fn static_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
}

/// Label for integral grid marks inside `0..len`, empty otherwise.
fn category_label(mark: &GridMark, len: usize, label: impl Fn(usize) -> String) -> String {
    let v = mark.value.round();
    if (mark.value - v).abs() > 1e-6 || v < 0.0 || v as usize >= len {
        return String::new();
    }
    label(v as usize)
}

// ---------------------------------------------------------------------------
// Heatmap: age group (y) × class (x)
// ---------------------------------------------------------------------------

/// Draw one tile per observed cell. Unobserved pairs stay blank.
pub fn heatmap(ui: &mut Ui, cells: &[HeatmapCell], theme: Theme) {
    let scale = theme.scale();

    static_plot("heatmap")
        .show_grid(false)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
        .x_axis_formatter(|mark, _range| {
            category_label(&mark, PassengerClass::ALL.len(), |i| {
                format!("Class {}", PassengerClass::ALL[i])
            })
        })
        .y_axis_formatter(|mark, _range| {
            category_label(&mark, AgeGroup::ALL.len(), |i| AgeGroup::ALL[i].label().to_string())
        })
        .include_x(-0.5)
        .include_x(PassengerClass::ALL.len() as f64 - 0.5)
        .include_y(-0.5)
        .include_y(AgeGroup::ALL.len() as f64 - 0.5)
        .show(ui, |plot_ui| {
            for cell in cells {
                let x = (cell.class.number() - 1) as f64;
                let y = cell.age_group.index() as f64;
                let tile = PlotPoints::new(vec![
                    [x - 0.5, y - 0.5],
                    [x + 0.5, y - 0.5],
                    [x + 0.5, y + 0.5],
                    [x - 0.5, y + 0.5],
                ]);
                plot_ui.polygon(
                    Polygon::new(tile)
                        .fill_color(scale.color_for_percent(cell.survival_rate))
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(format!("{:.1}", cell.survival_rate))
                            .color(scale.label_color_for_percent(cell.survival_rate)),
                    )
                    .anchor(Align2::CENTER_CENTER),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Vertical bars, one per port, labelled with the rate.
pub fn embarkation_bars(ui: &mut Ui, rows: &[EmbarkationRate]) {
    let colors = qualitative_palette(rows.len(), 140.0);
    let labels: Vec<String> = rows.iter().map(|r| r.port.to_string()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .zip(&colors)
        .enumerate()
        .map(|(i, (row, &color))| {
            Bar::new(i as f64, row.survival_rate)
                .name(format!("{} ({})", row.port, row.port.town()))
                .fill(color)
                .width(0.6)
        })
        .collect();

    static_plot("embarkation")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
        .x_axis_formatter(move |mark, _range| {
            category_label(&mark, labels.len(), |i| labels[i].clone())
        })
        .y_axis_formatter(|mark, _range| format!("{:.0}%", mark.value))
        .include_y(0.0)
        .include_y(110.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            for (i, row) in rows.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(i as f64, row.survival_rate + 4.0),
                        format_percent(row.survival_rate),
                    )
                    .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

/// Horizontal bars, highest first at the top.
pub fn top_age_group_bars(ui: &mut Ui, ranking: &[AgeGroupSurvivors]) {
    let colors = qualitative_palette(ranking.len(), 40.0);
    let n = ranking.len();
    // First entry gets the highest y so the ranking reads top-down.
    let y_of = move |i: usize| (n - 1 - i) as f64;
    let labels: Vec<String> = ranking.iter().map(|r| r.age_group.label().to_string()).collect();
    let max = ranking.iter().map(|r| r.survivors).max().unwrap_or(0) as f64;

    let bars: Vec<Bar> = ranking
        .iter()
        .zip(&colors)
        .enumerate()
        .map(|(i, (row, &color))| {
            Bar::new(y_of(i), row.survivors as f64)
                .name(row.age_group.label())
                .fill(color)
                .width(0.6)
        })
        .collect();

    static_plot("top_age_groups")
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
        .y_axis_formatter(move |mark, _range| {
            category_label(&mark, labels.len(), |y| labels[n - 1 - y].clone())
        })
        .include_x(0.0)
        .include_x(max * 1.2 + 1.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
            for (i, row) in ranking.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(row.survivors as f64 + max * 0.03 + 0.1, y_of(i)),
                        row.survivors.to_string(),
                    )
                    .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}

use eframe::egui;
use egui_extras::{Size, StripBuilder};

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SurvivalDashboardApp {
    pub state: AppState,
}

impl SurvivalDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SurvivalDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: three dashboard columns ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(views) = &self.state.views else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a passenger file to start  (File → Open…)");
                });
                return;
            };
            let theme = self.state.theme;

            StripBuilder::new(ui)
                .size(Size::relative(0.19))
                .size(Size::relative(0.56))
                .size(Size::remainder())
                .horizontal(|mut strip| {
                    strip.cell(|ui| panels::insights_column(ui, views));
                    strip.cell(|ui| panels::patterns_column(ui, views, theme));
                    strip.cell(|ui| panels::details_column(ui, views));
                });
        });
    }
}

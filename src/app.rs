use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinsApp {
    pub state: AppState,
}

impl PenguinsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

/// Run `draw` over the session inputs and request another frame if it
/// changed them, so panels drawn earlier in this frame catch up at once.
fn track_input_change(
    ctx: &egui::Context,
    state: &mut AppState,
    draw: impl FnOnce(&mut AppState),
) -> bool {
    let before = state.filter_state();
    draw(state);
    let changed = state.filter_state() != before;
    if changed {
        ctx.request_repaint();
    }
    changed
}

impl eframe::App for PenguinsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        let view = self.state.view();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &view);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                track_input_change(ctx, &mut self.state, |state| {
                    panels::side_panel(ui, state);
                });
            });

        // Inputs may have changed above; every consumer below shares this read.
        let view = self.state.view();

        // ---- Central panel: value boxes, chart, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::value_boxes(ui, &view);
            ui.add_space(8.0);

            let state = &mut self.state;
            ui.columns(2, |cols| {
                egui::Frame::group(cols[0].style()).show(&mut cols[0], |ui| {
                    ui.strong("Relationship Between Bill Length and Depth");
                    plot::scatter_plot(ui, &view, &state.color_map);
                });
                egui::Frame::group(cols[1].style()).show(&mut cols[1], |ui| {
                    ui.strong("Penguin Data Table");
                    table::data_table(ui, &view, &mut state.table_sort, &mut state.table_filters);
                });
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::FilterConfig;
    use crate::data::model::fixtures::three_species;

    fn session() -> AppState {
        AppState::new(Arc::new(three_species()), FilterConfig::default())
    }

    #[test]
    fn test_changed_inputs_request_a_repaint() {
        let ctx = egui::Context::default();
        let mut state = session();
        let mut changed = false;
        let mut repaint = false;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changed = track_input_change(ctx, &mut state, |s| s.toggle_species("Gentoo"));
            repaint = ctx.has_requested_repaint();
        });
        assert!(changed);
        assert!(repaint);
        assert_eq!(state.view().len(), 2);
    }

    #[test]
    fn test_untouched_inputs_report_no_change() {
        let ctx = egui::Context::default();
        let mut state = session();
        let mut changed = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changed = track_input_change(ctx, &mut state, |s| {
                s.set_mass_threshold(6000.0);
                s.toggle_species("Adelie");
                s.toggle_species("Adelie");
            });
        });
        assert!(!changed);
    }
}

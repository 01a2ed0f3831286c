use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::filter::FilteredView;
use crate::data::stats;
use crate::state::AppState;

/// Links listed under "Resources and References".
const RESOURCE_LINKS: [(&str, &str); 6] = [
    (
        "View the Source Code on GitHub",
        "https://github.com/evandobler98/cintel-07-tdash",
    ),
    (
        "Explore the Live App",
        "https://evandobler98.github.io/cintel-07-tdash/",
    ),
    (
        "Report Issues or Suggestions",
        "https://github.com/evandobler98/cintel-07-tdash/issues",
    ),
    ("Learn More About PyShiny", "https://shiny.posit.co/py/"),
    (
        "Start with a Basic Dashboard Template",
        "https://shiny.posit.co/py/templates/dashboard/",
    ),
    (
        "Visit the Enhanced Penguins Dashboard Example",
        "https://github.com/denisecase/pyshiny-penguins-dashboard-express",
    ),
];

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Customize Your View");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Body mass slider ----
            ui.strong("Filter by Body Mass (grams)");
            let bounds = state.bounds().clone();
            let mut threshold = state.mass_threshold();
            let slider = egui::Slider::new(&mut threshold, bounds.mass_min..=bounds.mass_max)
                .step_by(bounds.mass_step)
                .suffix(" g");
            if ui.add(slider).changed() {
                state.set_mass_threshold(threshold);
            }
            ui.add_space(8.0);

            // ---- Species checkboxes ----
            let species = state.dataset().species_in_order().to_vec();
            let n_selected = state.selected_species().len();
            ui.strong(format!(
                "Select Penguin Species to Display  ({n_selected}/{})",
                species.len()
            ));

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_species();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_species();
                }
            });

            for sp in &species {
                let mut checked = state.selected_species().contains(sp);
                let text = RichText::new(sp).color(state.color_map.color_for(sp));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_species(sp);
                }
            }

            ui.separator();

            // ---- Links ----
            ui.label(RichText::new("Resources and References").strong().small());
            for (text, url) in RESOURCE_LINKS {
                ui.hyperlink_to(text, url);
            }
        });
}

// ---------------------------------------------------------------------------
// Value boxes
// ---------------------------------------------------------------------------

/// Render the three summary boxes side by side.
pub fn value_boxes(ui: &mut Ui, view: &FilteredView) {
    let count = stats::format_count(stats::row_count(view));
    let length = stats::format_mean(stats::mean_bill_length(view));
    let depth = stats::format_mean(stats::mean_bill_depth(view));

    ui.columns(3, |cols| {
        value_box(&mut cols[0], "Total Penguins Displayed", &count);
        value_box(&mut cols[1], "Average Bill Length (mm)", &length);
        value_box(&mut cols[2], "Average Bill Depth (mm)", &depth);
    });
}

fn value_box(ui: &mut Ui, title: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).small());
        ui.label(RichText::new(value).heading().strong());
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with row counts and the active filter.
pub fn top_bar(ui: &mut Ui, state: &AppState, view: &FilteredView) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Penguins Dashboard: Insights and Trends");

        ui.separator();

        ui.label(format!(
            "{} penguins loaded, {} visible",
            state.dataset().len(),
            view.len()
        ));

        ui.separator();
        ui.label(format!(
            "body mass < {} g, {} species",
            state.mass_threshold(),
            state.selected_species().len()
        ));
    });
}

use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Legend, Plot, Points};

use crate::color::ColorMap;
use crate::data::filter::FilteredView;

// ---------------------------------------------------------------------------
// Bill length vs. depth scatterplot
// ---------------------------------------------------------------------------

/// Group the view's `[bill_length, bill_depth]` points by species.
/// Rows missing either coordinate are skipped.
pub fn scatter_series(view: &FilteredView) -> BTreeMap<String, Vec<[f64; 2]>> {
    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for p in view.iter() {
        if let (Some(x), Some(y)) = (p.bill_length_mm, p.bill_depth_mm) {
            series.entry(p.species.clone()).or_default().push([x, y]);
        }
    }
    series
}

/// Render the scatterplot, one coloured series per species.
pub fn scatter_plot(ui: &mut Ui, view: &FilteredView, color_map: &ColorMap) {
    let series = scatter_series(view);

    Plot::new("length_depth_plot")
        .legend(Legend::default())
        .x_axis_label("bill_length_mm")
        .y_axis_label("bill_depth_mm")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (species, points) in series {
                let color = color_map.color_for(&species);
                plot_ui.points(
                    Points::new(points)
                        .name(&species)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

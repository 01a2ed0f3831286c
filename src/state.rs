use std::collections::BTreeSet;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::FilterConfig;
use crate::data::filter::{FilterEngine, FilterState, FilteredView};
use crate::data::model::Dataset;
use crate::ui::table::{ColumnFilters, TableSort};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The state of one dashboard session, independent of rendering.
///
/// Raw widget values are validated here before they reach the filter engine.
pub struct AppState {
    /// Slider bounds the threshold is clamped and snapped to.
    bounds: FilterConfig,

    /// Current body-mass threshold (grams).
    mass_threshold: f64,

    /// Species whose checkbox is ticked.
    selected_species: BTreeSet<String>,

    /// Memoised filter owned by this session.
    engine: FilterEngine,

    /// Colour per species for checkboxes and plot.
    pub color_map: ColorMap,

    /// Table ordering chosen by clicking a header (display only).
    pub table_sort: Option<TableSort>,

    /// Per-column table filters (display only).
    pub table_filters: ColumnFilters,
}

impl AppState {
    /// Start a session with every species selected and the default threshold.
    pub fn new(dataset: Arc<Dataset>, bounds: FilterConfig) -> Self {
        let selected_species = dataset.species().clone();
        let color_map = ColorMap::new(dataset.species());
        let mass_threshold = bounds.mass_default;

        Self {
            bounds,
            mass_threshold,
            selected_species,
            engine: FilterEngine::new(dataset),
            color_map,
            table_sort: None,
            table_filters: ColumnFilters::default(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        self.engine.dataset()
    }

    pub fn bounds(&self) -> &FilterConfig {
        &self.bounds
    }

    pub fn mass_threshold(&self) -> f64 {
        self.mass_threshold
    }

    pub fn selected_species(&self) -> &BTreeSet<String> {
        &self.selected_species
    }

    /// Accept a raw slider value.  Non-finite values are ignored; anything
    /// else is clamped to the slider range and snapped to its step.
    pub fn set_mass_threshold(&mut self, value: f64) {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite mass threshold {value}");
            return;
        }
        let FilterConfig {
            mass_min,
            mass_max,
            mass_step,
            ..
        } = self.bounds;
        let snapped = mass_min + ((value - mass_min) / mass_step).round() * mass_step;
        self.mass_threshold = snapped.clamp(mass_min, mass_max);
    }

    /// Toggle one species checkbox.  Labels outside the dataset are ignored.
    pub fn toggle_species(&mut self, species: &str) {
        if !self.dataset().species().contains(species) {
            log::warn!("Ignoring unknown species '{species}'");
            return;
        }
        if !self.selected_species.remove(species) {
            self.selected_species.insert(species.to_string());
        }
    }

    pub fn select_all_species(&mut self) {
        self.selected_species = self.dataset().species().clone();
    }

    pub fn select_no_species(&mut self) {
        self.selected_species.clear();
    }

    /// Snapshot both inputs as one value.
    pub fn filter_state(&self) -> FilterState {
        FilterState::new(self.mass_threshold, self.selected_species.iter().cloned())
    }

    /// The filtered view for the current inputs, shared by every consumer
    /// that reads it before the inputs change again.
    pub fn view(&mut self) -> Arc<FilteredView> {
        let state = self.filter_state();
        self.engine.compute(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::three_species;

    fn session() -> AppState {
        AppState::new(Arc::new(three_species()), FilterConfig::default())
    }

    #[test]
    fn test_starts_with_everything_selected() {
        let mut state = session();
        assert_eq!(state.mass_threshold(), 6000.0);
        assert_eq!(state.selected_species().len(), 3);
        assert_eq!(state.view().len(), 3);
    }

    #[test]
    fn test_threshold_is_clamped_and_snapped() {
        let mut state = session();
        state.set_mass_threshold(3949.0);
        assert_eq!(state.mass_threshold(), 3900.0);
        state.set_mass_threshold(100.0);
        assert_eq!(state.mass_threshold(), 2000.0);
        state.set_mass_threshold(1e7);
        assert_eq!(state.mass_threshold(), 6000.0);
    }

    #[test]
    fn test_non_finite_threshold_is_ignored() {
        let mut state = session();
        state.set_mass_threshold(4000.0);
        state.set_mass_threshold(f64::NAN);
        state.set_mass_threshold(f64::INFINITY);
        assert_eq!(state.mass_threshold(), 4000.0);
    }

    #[test]
    fn test_consumers_in_one_frame_share_one_computation() {
        let mut state = session();
        let count_box = state.view();
        let chart = state.view();
        let table = state.view();
        assert!(Arc::ptr_eq(&count_box, &chart));
        assert!(Arc::ptr_eq(&chart, &table));
        assert_eq!(state.engine.generation(), 1);
    }

    #[test]
    fn test_input_change_is_seen_on_next_read() {
        let mut state = session();
        let before = state.view();
        state.toggle_species("Gentoo");
        state.set_mass_threshold(3800.0);
        let after = state.view();

        assert_eq!(before.len(), 3);
        assert_eq!(after.indices(), &[0]);
        assert_eq!(state.engine.generation(), 2);
    }

    #[test]
    fn test_setting_same_value_does_not_recompute() {
        let mut state = session();
        state.view();
        state.set_mass_threshold(6000.0);
        state.toggle_species("Adelie");
        state.toggle_species("Adelie");
        state.view();
        assert_eq!(state.engine.generation(), 1);
    }

    #[test]
    fn test_select_none_then_all() {
        let mut state = session();
        state.select_no_species();
        assert!(state.view().is_empty());
        state.select_all_species();
        assert_eq!(state.view().len(), 3);
    }

    #[test]
    fn test_table_filters_leave_the_shared_view_alone() {
        let mut state = session();
        let before = state.view();
        state.table_filters.species = "gentoo".to_string();
        let after = state.view();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 3);
        assert_eq!(state.engine.generation(), 1);
    }

    #[test]
    fn test_unknown_species_is_ignored() {
        let mut state = session();
        state.toggle_species("Emperor");
        assert!(!state.selected_species().contains("Emperor"));
        assert_eq!(state.selected_species().len(), 3);
    }
}

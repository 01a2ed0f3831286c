use std::collections::BTreeSet;
use std::sync::Arc;

use super::model::{Dataset, Penguin};

// ---------------------------------------------------------------------------
// Filter inputs
// ---------------------------------------------------------------------------

/// Both dashboard inputs captured together, so a view is never computed from
/// a threshold and a species selection taken at different moments.
#[derive(Debug, Clone)]
pub struct FilterState {
    /// Rows must weigh strictly less than this (grams).
    pub mass_threshold: f64,
    /// Species labels to keep.  Empty means nothing is shown.
    pub selected_species: BTreeSet<String>,
}

impl FilterState {
    pub fn new<I, S>(mass_threshold: f64, species: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterState {
            mass_threshold,
            selected_species: species.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a single row passes both predicates.
    ///
    /// A row with no recorded body mass never passes.
    pub fn matches(&self, penguin: &Penguin) -> bool {
        self.selected_species.contains(&penguin.species)
            && penguin
                .body_mass_g
                .is_some_and(|mass| mass < self.mass_threshold)
    }
}

/// Thresholds compare by bit pattern, so a NaN threshold equals itself and an
/// unchanged state always hits the engine cache.
impl PartialEq for FilterState {
    fn eq(&self, other: &Self) -> bool {
        self.mass_threshold.to_bits() == other.mass_threshold.to_bits()
            && self.selected_species == other.selected_species
    }
}

/// Return indices of rows that pass the filter, in dataset order.
pub fn filter_rows(dataset: &Dataset, state: &FilterState) -> Vec<usize> {
    if state.selected_species.is_empty() {
        return Vec::new();
    }
    dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, p)| state.matches(p))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – the shared result every consumer renders from
// ---------------------------------------------------------------------------

/// The rows of a dataset matching one [`FilterState`].
#[derive(Debug)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Dataset indices of the matching rows, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Matching rows in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &Penguin> + '_ {
        self.indices
            .iter()
            .filter_map(move |&idx| self.dataset.get(idx))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilterEngine – memoised filter owned by one session
// ---------------------------------------------------------------------------

/// Computes [`FilteredView`]s and keeps the most recent one.
///
/// The cache holds a single `(state, view)` entry.  Calling [`compute`] with a
/// state equal to the cached one returns the very same `Arc`, so every
/// consumer reading within one input generation sees identical data and the
/// dataset is scanned once per change.
///
/// [`compute`]: FilterEngine::compute
pub struct FilterEngine {
    dataset: Arc<Dataset>,
    cache: Option<(FilterState, Arc<FilteredView>)>,
    generation: u64,
}

impl FilterEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            cache: None,
            generation: 0,
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Number of recomputations performed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Return the view for `state`, recomputing only if it differs from the
    /// state of the cached view.
    pub fn compute(&mut self, state: &FilterState) -> Arc<FilteredView> {
        if let Some((cached_state, view)) = &self.cache {
            if cached_state == state {
                return Arc::clone(view);
            }
        }

        self.generation += 1;
        let indices = filter_rows(&self.dataset, state);
        log::debug!(
            "Filter generation {}: {} of {} rows (mass < {}, species {:?})",
            self.generation,
            indices.len(),
            self.dataset.len(),
            state.mass_threshold,
            state.selected_species
        );

        let view = Arc::new(FilteredView {
            dataset: Arc::clone(&self.dataset),
            indices,
        });
        self.cache = Some((state.clone(), Arc::clone(&view)));
        view
    }
}

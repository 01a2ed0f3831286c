use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Penguin – one row of the source table
// ---------------------------------------------------------------------------

/// A single penguin observation (one row of the Palmer Penguins table).
///
/// Measurements are optional because the source data marks some of them
/// as `NA`.
#[derive(Debug, Clone, PartialEq)]
pub struct Penguin {
    pub species: String,
    pub island: String,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<String>,
    pub year: Option<i64>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with the category domains found in it.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// mutate it after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    penguins: Vec<Penguin>,
    species: BTreeSet<String>,
    species_order: Vec<String>,
    islands: BTreeSet<String>,
}

impl Dataset {
    /// Build the category indices from the loaded rows.
    pub fn from_rows(penguins: Vec<Penguin>) -> Self {
        let mut species = BTreeSet::new();
        let mut species_order = Vec::new();
        for p in &penguins {
            if species.insert(p.species.clone()) {
                species_order.push(p.species.clone());
            }
        }
        let islands = penguins.iter().map(|p| p.island.clone()).collect();
        Dataset {
            penguins,
            species,
            species_order,
            islands,
        }
    }

    /// All rows in source order.
    pub fn rows(&self) -> &[Penguin] {
        &self.penguins
    }

    pub fn get(&self, index: usize) -> Option<&Penguin> {
        self.penguins.get(index)
    }

    /// Sorted set of species labels present in the data.
    pub fn species(&self) -> &BTreeSet<String> {
        &self.species
    }

    /// Species labels in the order they first appear in the data.
    pub fn species_in_order(&self) -> &[String] {
        &self.species_order
    }

    /// Sorted set of island labels present in the data.
    pub fn islands(&self) -> &BTreeSet<String> {
        &self.islands
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.penguins.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.penguins.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Test fixtures shared by the data-layer tests
// ---------------------------------------------------------------------------

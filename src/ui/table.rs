use std::cmp::Ordering;

use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::Penguin;

// ---------------------------------------------------------------------------
// Columns shown in the data table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Species,
    Island,
    BillLength,
    BillDepth,
    BodyMass,
}

impl TableColumn {
    pub const ALL: [TableColumn; 5] = [
        TableColumn::Species,
        TableColumn::Island,
        TableColumn::BillLength,
        TableColumn::BillDepth,
        TableColumn::BodyMass,
    ];

    pub fn header(self) -> &'static str {
        match self {
            TableColumn::Species => "species",
            TableColumn::Island => "island",
            TableColumn::BillLength => "bill_length_mm",
            TableColumn::BillDepth => "bill_depth_mm",
            TableColumn::BodyMass => "body_mass_g",
        }
    }

    /// Cell text; missing measurements render blank.
    pub fn cell(self, p: &Penguin) -> String {
        let number = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        match self {
            TableColumn::Species => p.species.clone(),
            TableColumn::Island => p.island.clone(),
            TableColumn::BillLength => number(p.bill_length_mm),
            TableColumn::BillDepth => number(p.bill_depth_mm),
            TableColumn::BodyMass => number(p.body_mass_g),
        }
    }

    fn compare(self, a: &Penguin, b: &Penguin) -> Ordering {
        match self {
            TableColumn::Species => a.species.cmp(&b.species),
            TableColumn::Island => a.island.cmp(&b.island),
            TableColumn::BillLength => compare_measure(a.bill_length_mm, b.bill_length_mm),
            TableColumn::BillDepth => compare_measure(a.bill_depth_mm, b.bill_depth_mm),
            TableColumn::BodyMass => compare_measure(a.body_mass_g, b.body_mass_g),
        }
    }
}

/// Missing values sort after present ones.
fn compare_measure(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Per-column filters (display only, applied on top of the filtered view)
// ---------------------------------------------------------------------------

/// Min/max bounds typed into a numeric column's filter fields.  Blank or
/// unparsable text leaves that side open; bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeFilter {
    pub min: String,
    pub max: String,
}

impl RangeFilter {
    fn bound(text: &str) -> Option<f64> {
        text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }

    pub fn limits(&self) -> (Option<f64>, Option<f64>) {
        (Self::bound(&self.min), Self::bound(&self.max))
    }

    pub fn is_active(&self) -> bool {
        self.limits() != (None, None)
    }

    /// A missing value passes only while neither bound is set.
    pub fn accepts(&self, value: Option<f64>) -> bool {
        let (min, max) = self.limits();
        if min.is_none() && max.is_none() {
            return true;
        }
        value.is_some_and(|v| min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m))
    }
}

/// Filter row of the table: a case-insensitive substring for each text
/// column and a range for each measurement column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFilters {
    pub species: String,
    pub island: String,
    pub bill_length: RangeFilter,
    pub bill_depth: RangeFilter,
    pub body_mass: RangeFilter,
}

fn contains_text(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ColumnFilters {
    pub fn is_active(&self) -> bool {
        !self.species.trim().is_empty()
            || !self.island.trim().is_empty()
            || self.bill_length.is_active()
            || self.bill_depth.is_active()
            || self.body_mass.is_active()
    }

    pub fn accepts(&self, p: &Penguin) -> bool {
        contains_text(&p.species, &self.species)
            && contains_text(&p.island, &self.island)
            && self.bill_length.accepts(p.bill_length_mm)
            && self.bill_depth.accepts(p.bill_depth_mm)
            && self.body_mass.accepts(p.body_mass_g)
    }

    pub fn clear(&mut self) {
        *self = ColumnFilters::default();
    }
}

// ---------------------------------------------------------------------------
// Sorting (display only, the filtered view keeps dataset order)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub column: TableColumn,
    pub descending: bool,
}

impl TableSort {
    /// Next sort after clicking `column`: a new column sorts ascending, the
    /// same column flips direction.
    pub fn clicked(current: Option<TableSort>, column: TableColumn) -> TableSort {
        match current {
            Some(sort) if sort.column == column => TableSort {
                column,
                descending: !sort.descending,
            },
            _ => TableSort {
                column,
                descending: false,
            },
        }
    }
}

/// Dataset indices of the view's rows that pass the column filters, in
/// display order.  Ties keep dataset order.
pub fn display_order(
    view: &FilteredView,
    sort: Option<TableSort>,
    filters: &ColumnFilters,
) -> Vec<usize> {
    let ds = view.dataset();
    let mut rows: Vec<usize> = view
        .indices()
        .iter()
        .copied()
        .filter(|&i| ds.get(i).is_some_and(|p| filters.accepts(p)))
        .collect();
    if let Some(sort) = sort {
        rows.sort_by(|&a, &b| match (ds.get(a), ds.get(b)) {
            (Some(pa), Some(pb)) => {
                let ord = sort.column.compare(pa, pb);
                if sort.descending {
                    ord.reverse()
                } else {
                    ord
                }
            }
            _ => Ordering::Equal,
        });
    }
    rows
}

// ---------------------------------------------------------------------------
// Table widget
// ---------------------------------------------------------------------------

/// Filter widget shown under a column's header button.
fn filter_input(ui: &mut Ui, column: TableColumn, filters: &mut ColumnFilters) {
    let text = |ui: &mut Ui, value: &mut String| {
        ui.add(egui::TextEdit::singleline(value).hint_text("filter").desired_width(80.0));
    };
    let range = |ui: &mut Ui, range: &mut RangeFilter| {
        ui.horizontal(|ui: &mut Ui| {
            ui.add(egui::TextEdit::singleline(&mut range.min).hint_text("min").desired_width(38.0));
            ui.add(egui::TextEdit::singleline(&mut range.max).hint_text("max").desired_width(38.0));
        });
    };
    match column {
        TableColumn::Species => text(ui, &mut filters.species),
        TableColumn::Island => text(ui, &mut filters.island),
        TableColumn::BillLength => range(ui, &mut filters.bill_length),
        TableColumn::BillDepth => range(ui, &mut filters.bill_depth),
        TableColumn::BodyMass => range(ui, &mut filters.body_mass),
    }
}

/// Render the filtered rows.  An empty view shows the header only.
pub fn data_table(
    ui: &mut Ui,
    view: &FilteredView,
    sort: &mut Option<TableSort>,
    filters: &mut ColumnFilters,
) {
    let rows = display_order(view, *sort, filters);

    if view.is_empty() {
        ui.label("No penguins match the current filters.");
    } else if filters.is_active() {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format!("{} of {} rows match the column filters", rows.len(), view.len()));
            if ui.small_button("Clear").clicked() {
                filters.clear();
            }
        });
    }

    let row_height = egui::TextStyle::Body.resolve(ui.style()).size + 6.0;
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(90.0), TableColumn::ALL.len())
        .min_scrolled_height(0.0)
        .header(48.0, |mut header| {
            for column in TableColumn::ALL {
                header.col(|ui| {
                    ui.vertical(|ui: &mut Ui| {
                        let arrow = match *sort {
                            Some(s) if s.column == column && s.descending => " ⬇",
                            Some(s) if s.column == column => " ⬆",
                            _ => "",
                        };
                        let label = RichText::new(format!("{}{arrow}", column.header())).strong();
                        if ui.button(label).clicked() {
                            clicked = Some(column);
                        }
                        filter_input(ui, column, filters);
                    });
                });
            }
        })
        .body(|body| {
            body.rows(row_height, rows.len(), |mut row| {
                let Some(p) = view.dataset().get(rows[row.index()]) else {
                    return;
                };
                for column in TableColumn::ALL {
                    row.col(|ui| {
                        ui.label(column.cell(p));
                    });
                }
            });
        });

    if let Some(column) = clicked {
        *sort = Some(TableSort::clicked(*sort, column));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::{FilterEngine, FilterState};
    use crate::data::model::fixtures::{penguin, three_species};
    use crate::data::model::Dataset;

    fn full_view(ds: Dataset) -> Arc<FilteredView> {
        FilterEngine::new(Arc::new(ds))
            .compute(&FilterState::new(6000.0, ["Adelie", "Gentoo", "Chinstrap"]))
    }

    #[test]
    fn test_unsorted_keeps_view_order() {
        let view = full_view(three_species());
        assert_eq!(display_order(&view, None, &ColumnFilters::default()), vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_by_mass_both_directions() {
        let view = full_view(three_species());
        let asc = TableSort { column: TableColumn::BodyMass, descending: false };
        let desc = TableSort { column: TableColumn::BodyMass, descending: true };
        assert_eq!(display_order(&view, Some(asc), &ColumnFilters::default()), vec![0, 2, 1]);
        assert_eq!(display_order(&view, Some(desc), &ColumnFilters::default()), vec![1, 2, 0]);
        // the shared view itself is untouched
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_missing_values_sort_last_and_render_blank() {
        let mut unknown = penguin("Gentoo", 48.0, 15.0, 5000.0);
        unknown.bill_length_mm = None;
        let view = full_view(Dataset::from_rows(vec![
            unknown,
            penguin("Adelie", 39.1, 18.7, 3750.0),
        ]));
        let asc = TableSort { column: TableColumn::BillLength, descending: false };
        assert_eq!(display_order(&view, Some(asc), &ColumnFilters::default()), vec![1, 0]);

        let first = view.dataset().get(0).unwrap();
        assert_eq!(TableColumn::BillLength.cell(first), "");
        assert_eq!(TableColumn::BodyMass.cell(first), "5000");
    }

    #[test]
    fn test_header_clicks_cycle_direction() {
        let first = TableSort::clicked(None, TableColumn::Island);
        assert!(!first.descending);
        let second = TableSort::clicked(Some(first), TableColumn::Island);
        assert!(second.descending);
        let other = TableSort::clicked(Some(second), TableColumn::Species);
        assert_eq!(other, TableSort { column: TableColumn::Species, descending: false });
    }

    fn range(min: &str, max: &str) -> RangeFilter {
        RangeFilter { min: min.to_string(), max: max.to_string() }
    }

    #[test]
    fn test_text_filters_match_substrings_ignoring_case() {
        let mut dream = penguin("Chinstrap", 49.0, 18.0, 3700.0);
        dream.island = "Dream".to_string();
        let view = full_view(Dataset::from_rows(vec![
            penguin("Adelie", 39.1, 18.7, 3750.0),
            penguin("Gentoo", 46.1, 13.2, 4500.0),
            dream,
        ]));

        let species = ColumnFilters { species: " gEn ".to_string(), ..Default::default() };
        assert_eq!(display_order(&view, None, &species), vec![1]);

        let island = ColumnFilters { island: "dream".to_string(), ..Default::default() };
        assert_eq!(display_order(&view, None, &island), vec![2]);

        let nothing = ColumnFilters { species: "emperor".to_string(), ..Default::default() };
        assert!(display_order(&view, None, &nothing).is_empty());
    }

    #[test]
    fn test_range_filters_are_inclusive_and_narrow_only_the_table() {
        let view = full_view(three_species());
        let filters = ColumnFilters { body_mass: range("3900", "4500"), ..Default::default() };
        assert!(filters.is_active());
        assert_eq!(display_order(&view, None, &filters), vec![1, 2]);

        let open_max = ColumnFilters { bill_length: range("46.1", ""), ..Default::default() };
        assert_eq!(display_order(&view, None, &open_max), vec![1, 2]);

        // the shared view keeps every row
        assert_eq!(view.indices(), &[0, 1, 2]);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_filters_compose_with_sort() {
        let view = full_view(three_species());
        let filters = ColumnFilters { bill_depth: range("18", ""), ..Default::default() };
        let desc = TableSort { column: TableColumn::BodyMass, descending: true };
        assert_eq!(display_order(&view, Some(desc), &filters), vec![2, 0]);
    }

    #[test]
    fn test_active_range_excludes_missing_values() {
        let mut unknown = penguin("Gentoo", 48.0, 15.0, 5000.0);
        unknown.bill_depth_mm = None;
        let view = full_view(Dataset::from_rows(vec![
            unknown,
            penguin("Adelie", 39.1, 18.7, 3750.0),
        ]));

        let inactive = ColumnFilters::default();
        assert_eq!(display_order(&view, None, &inactive), vec![0, 1]);

        let active = ColumnFilters { bill_depth: range("", "100"), ..Default::default() };
        assert_eq!(display_order(&view, None, &active), vec![1]);
    }

    #[test]
    fn test_blank_or_unparsable_bounds_are_open() {
        let typo = range("abc", " ");
        assert!(!typo.is_active());
        assert!(typo.accepts(None));
        assert_eq!(range(" 10 ", "nan").limits(), (Some(10.0), None));

        let mut filters = ColumnFilters { species: "x".to_string(), body_mass: range("1", "2"), ..Default::default() };
        filters.clear();
        assert_eq!(filters, ColumnFilters::default());
        assert!(!filters.is_active());
    }
}

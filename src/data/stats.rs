use super::filter::FilteredView;

// ---------------------------------------------------------------------------
// Summary statistics over a filtered view
// ---------------------------------------------------------------------------

/// Number of rows in the view.
pub fn row_count(view: &FilteredView) -> usize {
    view.len()
}

/// Mean bill length of the rows that have one, `None` if there are none.
pub fn mean_bill_length(view: &FilteredView) -> Option<f64> {
    mean(view.iter().map(|p| p.bill_length_mm))
}

/// Mean bill depth of the rows that have one, `None` if there are none.
pub fn mean_bill_depth(view: &FilteredView) -> Option<f64> {
    mean(view.iter().map(|p| p.bill_depth_mm))
}

/// Arithmetic mean skipping missing values.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// -- Value box text --

pub fn format_count(count: usize) -> String {
    format!("{count} penguins selected")
}

/// One decimal place in millimetres; an absent mean renders as `N/A`.
pub fn format_mean(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1} mm"),
        None => "N/A".to_string(),
    }
}

/// Rendering: side panel, value boxes, scatterplot and data table.
pub mod panels;
pub mod plot;
pub mod table;

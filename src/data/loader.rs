use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Dataset, Penguin};

/// Sample table compiled into the binary, used when no file is configured.
const BUNDLED_CSV: &str = include_str!("../../assets/penguins.csv");

/// Columns every source must provide.
const REQUIRED_COLUMNS: [&str; 5] = [
    "species",
    "island",
    "bill_length_mm",
    "bill_depth_mm",
    "body_mass_g",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("dataset contains no rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// The sample table shipped inside the binary.
    Bundled,
    /// A file on disk, dispatched by extension.
    File(PathBuf),
}

/// Load the dataset once.  An empty table is rejected so the dashboard never
/// starts without data.
pub fn load(source: &DataSource) -> Result<Dataset, LoadError> {
    let dataset = match source {
        DataSource::Bundled => load_csv_reader(BUNDLED_CSV.as_bytes())?,
        DataSource::File(path) => load_file(path)?,
    };
    if dataset.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(dataset)
}

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – palmerpenguins layout, `NA` marks a missing value
/// * `.json`    – `[{ "species": "Adelie", "bill_length_mm": 39.1, ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(|source| io_error(path, source))?;
            load_csv_reader(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column positions resolved from the CSV header.
struct CsvColumns {
    species: usize,
    island: usize,
    bill_length: usize,
    bill_depth: usize,
    body_mass: usize,
    flipper_length: Option<usize>,
    sex: Option<usize>,
    year: Option<usize>,
}

impl CsvColumns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

        Ok(CsvColumns {
            species: require(REQUIRED_COLUMNS[0])?,
            island: require(REQUIRED_COLUMNS[1])?,
            bill_length: require(REQUIRED_COLUMNS[2])?,
            bill_depth: require(REQUIRED_COLUMNS[3])?,
            body_mass: require(REQUIRED_COLUMNS[4])?,
            flipper_length: find("flipper_length_mm"),
            sex: find("sex"),
            year: find("year"),
        })
    }
}

fn load_csv_reader<R: Read>(source: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let cols = CsvColumns::resolve(reader.headers()?)?;

    let mut penguins = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();
        let optional_cell = |idx: Option<usize>| idx.map(|i| cell(i)).unwrap_or("");

        let species = parse_label(cell(cols.species), row, "species")?;
        let island = parse_label(cell(cols.island), row, "island")?;

        penguins.push(Penguin {
            species,
            island,
            bill_length_mm: parse_measure(cell(cols.bill_length), row, "bill_length_mm")?,
            bill_depth_mm: parse_measure(cell(cols.bill_depth), row, "bill_depth_mm")?,
            flipper_length_mm: parse_measure(
                optional_cell(cols.flipper_length),
                row,
                "flipper_length_mm",
            )?,
            body_mass_g: parse_measure(cell(cols.body_mass), row, "body_mass_g")?,
            sex: parse_optional_label(optional_cell(cols.sex)),
            year: parse_measure(optional_cell(cols.year), row, "year")?.map(|y| y as i64),
        });
    }

    Ok(Dataset::from_rows(penguins))
}

fn is_missing(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan")
}

fn parse_label(s: &str, row: usize, col: &str) -> Result<String, LoadError> {
    if is_missing(s) {
        return Err(LoadError::InvalidRow {
            row,
            message: format!("'{col}' is empty"),
        });
    }
    Ok(s.to_string())
}

fn parse_optional_label(s: &str) -> Option<String> {
    (!is_missing(s)).then(|| s.to_string())
}

fn parse_measure(s: &str, row: usize, col: &str) -> Result<Option<f64>, LoadError> {
    if is_missing(s) {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| LoadError::InvalidRow {
            row,
            message: format!("{col}: '{s}' is not a number"),
        })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One record of `df.to_json(orient="records")`; `null` is a missing value.
#[derive(Debug, Deserialize)]
struct PenguinRecord {
    species: String,
    island: String,
    bill_length_mm: Option<f64>,
    bill_depth_mm: Option<f64>,
    #[serde(default)]
    flipper_length_mm: Option<f64>,
    body_mass_g: Option<f64>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    year: Option<i64>,
}

impl From<PenguinRecord> for Penguin {
    fn from(r: PenguinRecord) -> Self {
        Penguin {
            species: r.species,
            island: r.island,
            bill_length_mm: r.bill_length_mm,
            bill_depth_mm: r.bill_depth_mm,
            flipper_length_mm: r.flipper_length_mm,
            body_mass_g: r.body_mass_g,
            sex: r.sex,
            year: r.year,
        }
    }
}

fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let records: Vec<PenguinRecord> = serde_json::from_str(&text)?;
    Ok(Dataset::from_rows(records.into_iter().map(Penguin::from).collect()))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Strings may be Utf8 or LargeUtf8, measurements any of Float64 / Float32 /
/// Int64 / Int32.  Nulls and NaN both count as missing, which covers files
/// written by Pandas as well as Polars.
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| io_error(path, source))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut penguins = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let column = |name: &str| -> Result<ArrayRef, LoadError> {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx).clone())
                .map_err(|_| LoadError::MissingColumn(name.to_string()))
        };
        let optional_column = |name: &str| schema.index_of(name).ok().map(|idx| batch.column(idx).clone());

        let species = column("species")?;
        let island = column("island")?;
        let bill_length = column("bill_length_mm")?;
        let bill_depth = column("bill_depth_mm")?;
        let body_mass = column("body_mass_g")?;
        let flipper_length = optional_column("flipper_length_mm");
        let sex = optional_column("sex");
        let year = optional_column("year");

        for i in 0..batch.num_rows() {
            let row = offset + i;
            let label = |col: &ArrayRef, name: &str| -> Result<String, LoadError> {
                string_at(col, i, row, name)?.ok_or_else(|| LoadError::InvalidRow {
                    row,
                    message: format!("'{name}' is null"),
                })
            };
            let measure = |col: &Option<ArrayRef>, name: &str| -> Result<Option<f64>, LoadError> {
                match col {
                    Some(col) => number_at(col, i, row, name),
                    None => Ok(None),
                }
            };

            penguins.push(Penguin {
                species: label(&species, "species")?,
                island: label(&island, "island")?,
                bill_length_mm: number_at(&bill_length, i, row, "bill_length_mm")?,
                bill_depth_mm: number_at(&bill_depth, i, row, "bill_depth_mm")?,
                flipper_length_mm: measure(&flipper_length, "flipper_length_mm")?,
                body_mass_g: number_at(&body_mass, i, row, "body_mass_g")?,
                sex: match &sex {
                    Some(col) => string_at(col, i, row, "sex")?,
                    None => None,
                },
                year: measure(&year, "year")?.map(|y| y as i64),
            });
        }

        offset += batch.num_rows();
    }

    Ok(Dataset::from_rows(penguins))
}

// -- Arrow helpers --

fn unsupported_type(row: usize, name: &str, data_type: &DataType) -> LoadError {
    LoadError::InvalidRow {
        row,
        message: format!("column '{name}' has unsupported type {data_type:?}"),
    }
}

/// Read a string cell; `row` is the absolute row number used in errors.
fn string_at(col: &ArrayRef, idx: usize, row: usize, name: &str) -> Result<Option<String>, LoadError> {
    if col.is_null(idx) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(idx),
        DataType::LargeUtf8 => col.as_string::<i64>().value(idx),
        other => return Err(unsupported_type(row, name, other)),
    };
    Ok(parse_optional_label(value.trim()))
}

/// Read a numeric cell as `f64`; `row` is the absolute row number used in errors.
fn number_at(col: &ArrayRef, idx: usize, row: usize, name: &str) -> Result<Option<f64>, LoadError> {
    if col.is_null(idx) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(idx),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(idx) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(idx) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(idx) as f64,
        other => return Err(unsupported_type(row, name, other)),
    };
    Ok((!value.is_nan()).then_some(value))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str =
        "species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_bundled_dataset_loads() {
        let ds = load(&DataSource::Bundled).unwrap();
        assert_eq!(ds.len(), 344);
        let species: Vec<&str> = ds.species().iter().map(String::as_str).collect();
        assert_eq!(species, vec!["Adelie", "Chinstrap", "Gentoo"]);
        assert_eq!(ds.species_in_order(), &["Adelie", "Gentoo", "Chinstrap"]);
        assert!(ds.rows().iter().any(|p| p.body_mass_g.is_none()));
    }

    #[test]
    fn test_csv_na_becomes_none() {
        let csv = format!("{HEADER}\nAdelie,Torgersen,NA,NA,NA,NA,NA,2007\n");
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        let p = &ds.rows()[0];
        assert_eq!(p.species, "Adelie");
        assert_eq!(p.bill_length_mm, None);
        assert_eq!(p.body_mass_g, None);
        assert_eq!(p.sex, None);
        assert_eq!(p.year, Some(2007));
    }

    #[test]
    fn test_csv_without_optional_columns() {
        let csv = "species,island,bill_length_mm,bill_depth_mm,body_mass_g\n\
                   Gentoo,Biscoe,46.1,13.2,4500\n";
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        let p = &ds.rows()[0];
        assert_eq!(p.body_mass_g, Some(4500.0));
        assert_eq!(p.flipper_length_mm, None);
        assert_eq!(p.year, None);
    }

    #[test]
    fn test_csv_missing_column_is_an_error() {
        let csv = "species,island,bill_length_mm,bill_depth_mm\nAdelie,Dream,39.1,18.7\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "body_mass_g"));
    }

    #[test]
    fn test_csv_malformed_number_reports_row() {
        let csv = format!(
            "{HEADER}\nAdelie,Dream,39.1,18.7,181,3750,male,2007\nAdelie,Dream,heavy,18.7,181,3750,male,2007\n"
        );
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::InvalidRow { row, message } => {
                assert_eq!(row, 1);
                assert!(message.contains("bill_length_mm"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let file = write_temp(".csv", &format!("{HEADER}\n"));
        let err = load(&DataSource::File(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("penguins.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ref e) if e == "xlsx"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file(Path::new("/nonexistent/penguins.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_json_records() {
        let json = r#"[
            {"species": "Chinstrap", "island": "Dream", "bill_length_mm": 50.0,
             "bill_depth_mm": 19.8, "flipper_length_mm": 195.0, "body_mass_g": 3900.0,
             "sex": "male", "year": 2009},
            {"species": "Adelie", "island": "Torgersen", "bill_length_mm": null,
             "bill_depth_mm": null, "body_mass_g": null}
        ]"#;
        let file = write_temp(".json", json);
        let ds = load(&DataSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].body_mass_g, Some(3900.0));
        assert_eq!(ds.rows()[1].bill_length_mm, None);
        assert_eq!(ds.rows()[1].year, None);
    }

    #[test]
    fn test_parquet_flat_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, false),
            Field::new("island", DataType::Utf8, false),
            Field::new("bill_length_mm", DataType::Float64, true),
            Field::new("bill_depth_mm", DataType::Float64, true),
            Field::new("body_mass_g", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Adelie", "Gentoo"])),
                Arc::new(StringArray::from(vec!["Dream", "Biscoe"])),
                Arc::new(Float64Array::from(vec![Some(39.1), Some(f64::NAN)])),
                Arc::new(Float64Array::from(vec![Some(18.7), None])),
                Arc::new(Int64Array::from(vec![Some(3750), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].body_mass_g, Some(3750.0));
        assert_eq!(ds.rows()[1].bill_length_mm, None);
        assert_eq!(ds.rows()[1].body_mass_g, None);
        assert_eq!(ds.rows()[1].flipper_length_mm, None);
    }
}

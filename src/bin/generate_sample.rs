use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Per-species measurement distributions: (mean, standard deviation).
struct SpeciesProfile {
    name: &'static str,
    count: usize,
    islands: &'static [&'static str],
    bill_length: (f64, f64),
    bill_depth: (f64, f64),
    flipper_length: (f64, f64),
    body_mass: (f64, f64),
}

const PROFILES: [SpeciesProfile; 3] = [
    SpeciesProfile {
        name: "Adelie",
        count: 152,
        islands: &["Torgersen", "Biscoe", "Dream"],
        bill_length: (38.8, 2.7),
        bill_depth: (18.3, 1.2),
        flipper_length: (190.0, 6.5),
        body_mass: (3700.0, 460.0),
    },
    SpeciesProfile {
        name: "Gentoo",
        count: 124,
        islands: &["Biscoe"],
        bill_length: (47.5, 3.1),
        bill_depth: (15.0, 1.0),
        flipper_length: (217.0, 6.5),
        body_mass: (5076.0, 504.0),
    },
    SpeciesProfile {
        name: "Chinstrap",
        count: 68,
        islands: &["Dream"],
        bill_length: (48.8, 3.3),
        bill_depth: (18.4, 1.1),
        flipper_length: (196.0, 7.0),
        body_mass: (3733.0, 384.0),
    },
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, (mean, std_dev): (f64, f64)) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Columns of the generated table; `None` is a missing value.
#[derive(Default)]
struct Columns {
    species: Vec<String>,
    island: Vec<String>,
    bill_length: Vec<Option<f64>>,
    bill_depth: Vec<Option<f64>>,
    flipper_length: Vec<Option<f64>>,
    body_mass: Vec<Option<f64>>,
    sex: Vec<Option<String>>,
    year: Vec<i64>,
}

/// Snap to a multiple of `step`, then to one decimal so CSV output stays tidy.
fn round_to(v: f64, step: f64) -> f64 {
    ((v / step).round() * step * 10.0).round() / 10.0
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns::default();

    for profile in &PROFILES {
        for i in 0..profile.count {
            let island = profile.islands[i * profile.islands.len() / profile.count];
            let year = 2007 + (i * 3 / profile.count) as i64;

            // Every 40th bird was not measured at all.
            let measured = i % 40 != 3;
            let male = rng.next_f64() < 0.5;
            let shift = if male { 1.0 } else { -1.0 };

            let mut draw = |(mean, sd): (f64, f64), offset: f64, step: f64| {
                measured.then(|| round_to(rng.gauss((mean + offset * shift, sd * 0.8)), step))
            };
            let bill_length = draw(profile.bill_length, 1.5, 0.1);
            let bill_depth = draw(profile.bill_depth, 0.6, 0.1);
            let flipper_length = draw(profile.flipper_length, 3.0, 1.0);
            let body_mass = draw(profile.body_mass, 250.0, 25.0);

            cols.species.push(profile.name.to_string());
            cols.island.push(island.to_string());
            cols.bill_length.push(bill_length);
            cols.bill_depth.push(bill_depth);
            cols.flipper_length.push(flipper_length);
            cols.body_mass.push(body_mass);
            let sex = if male { "male" } else { "female" };
            cols.sex.push(measured.then(|| sex.to_string()));
            cols.year.push(year);
        }
    }

    cols
}

fn write_parquet(cols: &Columns, path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
        Field::new("bill_length_mm", DataType::Float64, true),
        Field::new("bill_depth_mm", DataType::Float64, true),
        Field::new("flipper_length_mm", DataType::Float64, true),
        Field::new("body_mass_g", DataType::Float64, true),
        Field::new("sex", DataType::Utf8, true),
        Field::new("year", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(cols.species.clone())),
            Arc::new(StringArray::from(cols.island.clone())),
            Arc::new(Float64Array::from(cols.bill_length.clone())),
            Arc::new(Float64Array::from(cols.bill_depth.clone())),
            Arc::new(Float64Array::from(cols.flipper_length.clone())),
            Arc::new(Float64Array::from(cols.body_mass.clone())),
            Arc::new(StringArray::from(cols.sex.clone())),
            Arc::new(Int64Array::from(cols.year.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(cols: &Columns, path: &str) -> Result<()> {
    let na = |v: &Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string());

    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "species",
        "island",
        "bill_length_mm",
        "bill_depth_mm",
        "flipper_length_mm",
        "body_mass_g",
        "sex",
        "year",
    ])?;
    for i in 0..cols.species.len() {
        writer.write_record([
            cols.species[i].clone(),
            cols.island[i].clone(),
            na(&cols.bill_length[i]),
            na(&cols.bill_depth[i]),
            na(&cols.flipper_length[i]),
            na(&cols.body_mass[i]),
            cols.sex[i].clone().unwrap_or_else(|| "NA".to_string()),
            cols.year[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let cols = generate(&mut rng);

    write_parquet(&cols, "sample_penguins.parquet")?;
    write_csv(&cols, "sample_penguins.csv")?;

    println!(
        "Wrote {} penguins to sample_penguins.parquet and sample_penguins.csv",
        cols.species.len()
    );
    Ok(())
}

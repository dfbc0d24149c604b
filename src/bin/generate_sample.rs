use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const OUTPUT_DIR: &str = "data";
const STEM: &str = "website_emissions_summary";
const YEARS: std::ops::RangeInclusive<i32> = 2016..=2024;

/// (category, baseline gCO2 per page view, yearly drift)
const CATEGORIES: [(&str, f64, f64); 8] = [
    ("E-commerce", 1.10, -0.04),
    ("News & Media", 1.60, -0.02),
    ("Education", 0.55, -0.03),
    ("Government", 0.45, -0.05),
    ("Technology", 0.80, -0.06),
    ("Entertainment", 2.10, 0.01),
    ("Finance", 0.70, -0.02),
    ("Travel", 1.30, -0.01),
];

#[derive(Debug, Serialize)]
struct Row {
    site: String,
    category: &'static str,
    year: i32,
    emissions: f64,
    page_weight_kb: f64,
}

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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Zero to three sites per (category, year): empty cells exercise the
/// dashboard's zero fill, repeated cells its averaging.
fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for year in YEARS {
        for (cat_idx, &(category, baseline, drift)) in CATEGORIES.iter().enumerate() {
            let sites = rng.below(4);
            let trend = baseline * (1.0 + drift * (year - YEARS.start()) as f64);
            for site_idx in 0..sites {
                let emissions = rng.gauss(trend, trend * 0.15).max(0.05);
                rows.push(Row {
                    site: format!("site-{cat_idx}-{site_idx}.example"),
                    category,
                    year,
                    emissions: (emissions * 1000.0).round() / 1000.0,
                    // ~0.8 gCO2 per MB transferred
                    page_weight_kb: (emissions / 0.8 * 1024.0).round(),
                });
            }
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("site", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("emissions", DataType::Float64, false),
        Field::new("page_weight_kb", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.site.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.category))),
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.emissions))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.page_weight_kb))),
        ],
    )
    .context("building record batch")?;

    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    fs::create_dir_all(OUTPUT_DIR).with_context(|| format!("creating {OUTPUT_DIR}/"))?;
    let csv_path = Path::new(OUTPUT_DIR).join(format!("{STEM}.csv"));
    let parquet_path = Path::new(OUTPUT_DIR).join(format!("{STEM}.parquet"));

    write_csv(&rows, &csv_path)?;
    write_parquet(&rows, &parquet_path)?;

    log::info!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    println!(
        "Wrote {} rows ({} categories, years {}–{})",
        rows.len(),
        CATEGORIES.len(),
        YEARS.start(),
        YEARS.end()
    );
    Ok(())
}

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{Dataset, Record};
use crate::config::DATA_PATH;

const CATEGORY: &str = "category";
const YEAR: &str = "year";
const EMISSIONS: &str = "emissions";
const REQUIRED_COLUMNS: [&str; 3] = [CATEGORY, YEAR, EMISSIONS];

// ---------------------------------------------------------------------------
// Memoized loader
// ---------------------------------------------------------------------------

/// Reads one dataset file at most once and hands out the cached result.
///
/// The first successful [`load`](Self::load) populates the cache while holding
/// the lock, so concurrent first callers never read the file twice. Failed
/// loads are not cached.
#[derive(Debug)]
pub struct DatasetLoader {
    path: PathBuf,
    cache: Mutex<Option<Arc<Dataset>>>,
    reads: AtomicUsize,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
            reads: AtomicUsize::new(0),
        }
    }

    /// Return the dataset, reading the file only on the first call.
    pub fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = cache.as_ref() {
            debug!(
                "Dataset cache hit for {} (reads: {})",
                self.path.display(),
                self.load_count()
            );
            return Ok(Arc::clone(dataset));
        }

        self.reads.fetch_add(1, Ordering::Relaxed);
        let dataset = Arc::new(load_file(&self.path)?);
        info!(
            "Loaded {} records from {} ({} categories, years {})",
            dataset.len(),
            self.path.display(),
            dataset.categories().len(),
            dataset
                .year_bounds()
                .map(|b| b.to_string())
                .unwrap_or_default()
        );
        *cache = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// How many times the source file has actually been read.
    pub fn load_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

/// Process-wide loader for the bundled dataset path.
pub fn shared_loader() -> &'static DatasetLoader {
    static LOADER: OnceLock<DatasetLoader> = OnceLock::new();
    LOADER.get_or_init(|| DatasetLoader::new(DATA_PATH))
}

// ---------------------------------------------------------------------------
// Format dispatch
// ---------------------------------------------------------------------------

/// Load an emissions dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `category`, `year`, `emissions` (extra columns ignored)
/// * `.json`    – `[{ "category": "...", "year": 2020, "emissions": 0.4, ... }, ...]`
/// * `.parquet` – columns `category` (string), `year` (integer), `emissions` (numeric)
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    };

    let dataset = Dataset::from_records(records);
    if dataset.is_empty() {
        return Err(LoadError::NoRecords {
            path: path.to_path_buf(),
        });
    }
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Record>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    let headers = reader.headers().map_err(csv_err)?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    reader
        .deserialize::<Record>()
        .map(|row| row.map_err(csv_err))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape of `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<Record>, LoadError> {
    let rows: Vec<Map<String, JsonValue>> =
        serde_json::from_reader(std::io::BufReader::new(open(path)?)).map_err(|source| {
            LoadError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;

    rows.iter()
        .enumerate()
        .map(|(row, obj)| -> Result<Record, LoadError> {
            let field = |column: &'static str| {
                obj.get(column).ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
            };
            let invalid = |column: &'static str, value: &JsonValue| LoadError::InvalidValue {
                path: path.to_path_buf(),
                row,
                column,
                value: value.to_string(),
            };

            let category = field(CATEGORY)?;
            let year = field(YEAR)?;
            let emissions = field(EMISSIONS)?;

            Ok(Record::new(
                category
                    .as_str()
                    .ok_or_else(|| invalid(CATEGORY, category))?,
                year.as_i64()
                    .and_then(|y| i32::try_from(y).ok())
                    .ok_or_else(|| invalid(YEAR, year))?,
                emissions
                    .as_f64()
                    .ok_or_else(|| invalid(EMISSIONS, emissions))?,
            ))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); column types are cast to
/// Utf8 / Int64 / Float64 before reading.
fn load_parquet(path: &Path) -> Result<Vec<Record>, LoadError> {
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let arrow_err = |source| LoadError::Arrow {
        path: path.to_path_buf(),
        source,
    };

    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?).map_err(parquet_err)?;
    let schema = builder.schema().clone();
    let mut indices = [0usize; 3];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = schema.index_of(column).map_err(|_| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })?;
    }
    let [cat_idx, year_idx, em_idx] = indices;

    let reader = builder.build().map_err(parquet_err)?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(arrow_err)?;

        let categories = cast(batch.column(cat_idx), &DataType::Utf8).map_err(arrow_err)?;
        let years = cast(batch.column(year_idx), &DataType::Int64).map_err(arrow_err)?;
        let emissions = cast(batch.column(em_idx), &DataType::Float64).map_err(arrow_err)?;

        let categories = categories.as_string::<i32>();
        let years = years.as_primitive::<Int64Type>();
        let emissions = emissions.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            let row = records.len();
            let null = |column: &'static str| LoadError::InvalidValue {
                path: path.to_path_buf(),
                row,
                column,
                value: "null".to_string(),
            };

            if categories.is_null(i) {
                return Err(null(CATEGORY));
            }
            if years.is_null(i) {
                return Err(null(YEAR));
            }
            if emissions.is_null(i) {
                return Err(null(EMISSIONS));
            }

            let year = i32::try_from(years.value(i)).map_err(|_| LoadError::InvalidValue {
                path: path.to_path_buf(),
                row,
                column: YEAR,
                value: years.value(i).to_string(),
            })?;

            records.push(Record::new(categories.value(i), year, emissions.value(i)));
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::{
        ArrayRef, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
        LargeStringArray, StringArray,
    };
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut tmp = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(tmp, "{contents}").unwrap();
        tmp
    }

    fn parquet_with(columns: Vec<(&str, ArrayRef)>) -> NamedTempFile {
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        tmp
    }

    #[test]
    fn csv_loads_and_ignores_extra_columns() {
        let tmp = temp_with(
            ".csv",
            "site,category,year,emissions,bytes\n\
             a.com,news,2020,0.5,1200\n\
             b.com,shop,2021,1.25,900\n\
             c.com,news,2021,0.75,400\n",
        );
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[1], Record::new("shop", 2021, 1.25));
        assert_eq!(ds.categories(), ["news", "shop"]);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let tmp = temp_with(".csv", "category,year\nnews,2020\n");
        match load_file(tmp.path()) {
            Err(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "emissions"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_malformed_value_fails_whole_load() {
        let tmp = temp_with(".csv", "category,year,emissions\nnews,2020,0.5\nnews,soon,1.0\n");
        assert!(matches!(load_file(tmp.path()), Err(LoadError::Csv { .. })));
    }

    #[test]
    fn header_only_csv_has_no_records() {
        let tmp = temp_with(".csv", "category,year,emissions\n");
        assert!(matches!(load_file(tmp.path()), Err(LoadError::NoRecords { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let tmp = temp_with(".xlsx", "");
        assert!(matches!(
            load_file(tmp.path()),
            Err(LoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn json_records_load() {
        let tmp = temp_with(
            ".json",
            r#"[{"category":"news","year":2020,"emissions":0.5,"site":"a.com"},
                {"category":"blog","year":2022,"emissions":2}]"#,
        );
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(
            ds.records(),
            [Record::new("news", 2020, 0.5), Record::new("blog", 2022, 2.0)]
        );
    }

    #[test]
    fn json_wrong_type_is_invalid_value() {
        let tmp = temp_with(".json", r#"[{"category":"news","year":"2020","emissions":0.5}]"#);
        match load_file(tmp.path()) {
            Err(LoadError::InvalidValue { row, column, .. }) => {
                assert_eq!((row, column), (0, "year"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn loader_reads_file_once() {
        let tmp = temp_with(".csv", "category,year,emissions\nnews,2020,0.5\nshop,2021,1.0\n");
        let loader = DatasetLoader::new(tmp.path());
        assert_eq!(loader.load_count(), 0);

        let first = loader.load().unwrap();
        let second = loader.load().unwrap();

        assert_eq!(loader.load_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn cached_dataset_survives_file_removal() {
        let tmp = temp_with(".csv", "category,year,emissions\nnews,2020,0.5\n");
        let loader = DatasetLoader::new(tmp.path());
        let first = loader.load().unwrap();
        tmp.close().unwrap();

        let again = loader.load().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(loader.load_count(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let loader = DatasetLoader::new("does/not/exist.csv");
        assert!(loader.load().is_err());
        assert!(loader.load().is_err());
        assert_eq!(loader.load_count(), 2);
    }

    #[test]
    fn concurrent_first_loads_read_once() {
        let tmp = temp_with(".csv", "category,year,emissions\nnews,2020,0.5\n");
        let loader = DatasetLoader::new(tmp.path());
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| loader.load().unwrap());
            }
        });
        assert_eq!(loader.load_count(), 1);
    }

    #[test]
    fn json_missing_field_is_missing_column() {
        let tmp = temp_with(".json", r#"[{"category":"news","emissions":0.5}]"#);
        match load_file(tmp.path()) {
            Err(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "year"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parquet_loads_and_ignores_extra_columns() {
        let tmp = parquet_with(vec![
            ("site", Arc::new(StringArray::from(vec!["a.com", "b.com"])) as ArrayRef),
            ("category", Arc::new(StringArray::from(vec!["news", "shop"])) as ArrayRef),
            ("year", Arc::new(Int32Array::from(vec![2020, 2021])) as ArrayRef),
            ("emissions", Arc::new(Float64Array::from(vec![0.5, 1.25])) as ArrayRef),
            ("bytes", Arc::new(Int64Array::from(vec![1200, 900])) as ArrayRef),
        ]);
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(
            ds.records(),
            [Record::new("news", 2020, 0.5), Record::new("shop", 2021, 1.25)]
        );
    }

    #[test]
    fn parquet_casts_narrow_and_large_types() {
        let tmp = parquet_with(vec![
            ("category", Arc::new(LargeStringArray::from(vec!["blog"])) as ArrayRef),
            ("year", Arc::new(Int16Array::from(vec![2022])) as ArrayRef),
            ("emissions", Arc::new(Float32Array::from(vec![0.75])) as ArrayRef),
        ]);
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.records(), [Record::new("blog", 2022, 0.75)]);
    }

    #[test]
    fn parquet_missing_column_is_reported() {
        let tmp = parquet_with(vec![
            ("category", Arc::new(StringArray::from(vec!["news"])) as ArrayRef),
            ("year", Arc::new(Int32Array::from(vec![2020])) as ArrayRef),
        ]);
        match load_file(tmp.path()) {
            Err(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "emissions"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parquet_null_cell_is_invalid_value() {
        let tmp = parquet_with(vec![
            ("category", Arc::new(StringArray::from(vec!["news", "shop"])) as ArrayRef),
            ("year", Arc::new(Int32Array::from(vec![2020, 2021])) as ArrayRef),
            ("emissions", Arc::new(Float64Array::from(vec![Some(0.5), None])) as ArrayRef),
        ]);
        match load_file(tmp.path()) {
            Err(LoadError::InvalidValue { row, column, .. }) => {
                assert_eq!((row, column), (1, "emissions"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn parquet_year_out_of_range_is_invalid_value() {
        let tmp = parquet_with(vec![
            ("category", Arc::new(StringArray::from(vec!["news"])) as ArrayRef),
            ("year", Arc::new(Int64Array::from(vec![3_000_000_000])) as ArrayRef),
            ("emissions", Arc::new(Float64Array::from(vec![0.5])) as ArrayRef),
        ]);
        match load_file(tmp.path()) {
            Err(LoadError::InvalidValue { column, value, .. }) => {
                assert_eq!(column, "year");
                assert_eq!(value, "3000000000");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }
}

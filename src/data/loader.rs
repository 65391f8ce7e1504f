use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{ProblemCollection, ProblemRecord, Snapshot, TimeWindow};

// ---------------------------------------------------------------------------
// Resolver capability: time window → ProblemCollection
// ---------------------------------------------------------------------------

/// Failure to produce a collection for a requested window. The message
/// always names the window the user asked for, not the snapshot serving it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load {window} data: no {stem} snapshot in {}", .dir.display())]
    Missing {
        window: TimeWindow,
        stem: &'static str,
        dir: PathBuf,
    },
    #[error("Failed to load {window} data: {source:#}")]
    Unreadable {
        window: TimeWindow,
        #[source]
        source: anyhow::Error,
    },
}

impl LoadError {
    pub fn window(&self) -> &TimeWindow {
        match self {
            LoadError::Missing { window, .. } | LoadError::Unreadable { window, .. } => window,
        }
    }
}

/// Maps a window identifier to its snapshot. Implementations may block;
/// callers that need responsiveness go through [`super::worker::LoadWorker`].
pub trait SnapshotResolver: Send + Sync {
    fn resolve(&self, window: &TimeWindow) -> Result<ProblemCollection, LoadError>;
}

/// Reads snapshots from `<root>/<stem>.{json,csv,parquet}`.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    /// Lookup order when several formats of one snapshot are present.
    pub const EXTENSIONS: [&'static str; 3] = ["json", "csv", "parquet"];

    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryResolver { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First existing file for the snapshot, if any.
    pub fn locate(&self, snapshot: Snapshot) -> Option<PathBuf> {
        Self::EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{ext}", snapshot.file_stem())))
            .find(|p| p.is_file())
    }
}

impl SnapshotResolver for DirectoryResolver {
    fn resolve(&self, window: &TimeWindow) -> Result<ProblemCollection, LoadError> {
        let snapshot = window.snapshot();
        let path = self.locate(snapshot).ok_or_else(|| LoadError::Missing {
            window: window.clone(),
            stem: snapshot.file_stem(),
            dir: self.root.clone(),
        })?;

        log::debug!("Resolving window {window} from {}", path.display());
        let problems = load_file(&path).map_err(|source| LoadError::Unreadable {
            window: window.clone(),
            source,
        })?;
        Ok(ProblemCollection::new(window.clone(), problems))
    }
}

/// In-memory snapshots, e.g. the built-in demo data.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    snapshots: BTreeMap<Snapshot, Vec<ProblemRecord>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot, problems: Vec<ProblemRecord>) -> Self {
        self.snapshots.insert(snapshot, problems);
        self
    }
}

impl SnapshotResolver for StaticResolver {
    fn resolve(&self, window: &TimeWindow) -> Result<ProblemCollection, LoadError> {
        let snapshot = window.snapshot();
        match self.snapshots.get(&snapshot) {
            Some(problems) => Ok(ProblemCollection::new(window.clone(), problems.clone())),
            None => Err(LoadError::Missing {
                window: window.clone(),
                stem: snapshot.file_stem(),
                dir: PathBuf::from("<memory>"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// File entry-point
// ---------------------------------------------------------------------------

/// Load snapshot records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "Title": ..., "Difficulty": ..., ... }, ...]`
/// * `.csv`     – header row with the same field names
/// * `.parquet` – one column per field, same names
pub fn load_file(path: &Path) -> Result<Vec<ProblemRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Top-level array of records. An object wrapping the array under
/// `"default"` (module-export style) is accepted too. Entries that are
/// not objects are skipped.
fn load_json(path: &Path) -> Result<Vec<ProblemRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = match root {
        JsonValue::Array(records) => records,
        JsonValue::Object(mut obj) => match obj.remove("default") {
            Some(JsonValue::Array(records)) => records,
            _ => bail!("Expected top-level JSON array"),
        },
        _ => bail!("Expected top-level JSON array"),
    };

    let mut problems = Vec::with_capacity(records.len());
    for (i, rec) in records.into_iter().enumerate() {
        if !rec.is_object() {
            log::debug!("Skipping row {i}: not a JSON object");
            continue;
        }
        let problem: ProblemRecord =
            serde_json::from_value(rec).with_context(|| format!("Row {i}"))?;
        problems.push(problem);
    }
    Ok(problems)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV row as raw cells. Every cell is read as text so that titles
/// like `007` or `1.50` are not reinterpreted as numbers.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Difficulty")]
    difficulty: Option<String>,
    #[serde(rename = "Frequency")]
    frequency: Option<String>,
    #[serde(rename = "Acceptance Rate")]
    acceptance_rate: Option<String>,
    #[serde(rename = "Topics")]
    topics: Option<String>,
    #[serde(rename = "Link")]
    link: Option<String>,
}

fn cell_number(cell: Option<String>) -> f64 {
    cell.and_then(|c| c.trim().parse().ok()).unwrap_or(0.0)
}

impl From<CsvRow> for ProblemRecord {
    fn from(row: CsvRow) -> Self {
        ProblemRecord {
            title: row.title.unwrap_or_default(),
            difficulty: row.difficulty.unwrap_or_default(),
            frequency: cell_number(row.frequency),
            acceptance_rate: cell_number(row.acceptance_rate),
            topics: row.topics.unwrap_or_default(),
            link: row.link.unwrap_or_default(),
        }
    }
}

/// CSV layout: header row naming the fields (`Title`, `Difficulty`,
/// `Frequency`, `Acceptance Rate`, `Topics`, `Link`). Missing columns and
/// short rows fall back to empty values.
fn load_csv(path: &Path) -> Result<Vec<ProblemRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(row_no, result)| {
            result
                .map(ProblemRecord::from)
                .with_context(|| format!("CSV row {row_no}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet snapshot. Columns are looked up by field name; absent
/// columns and null cells yield empty values.
fn load_parquet(path: &Path) -> Result<Vec<ProblemRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut problems = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let title = batch.column_by_name("Title");
        let difficulty = batch.column_by_name("Difficulty");
        let frequency = batch.column_by_name("Frequency");
        let acceptance = batch.column_by_name("Acceptance Rate");
        let topics = batch.column_by_name("Topics");
        let link = batch.column_by_name("Link");

        for row in 0..batch.num_rows() {
            problems.push(ProblemRecord {
                title: text_at(title, row),
                difficulty: text_at(difficulty, row),
                frequency: number_at(frequency, row),
                acceptance_rate: number_at(acceptance, row),
                topics: text_at(topics, row),
                link: text_at(link, row),
            });
        }
    }

    Ok(problems)
}

// -- Parquet / Arrow helpers --

fn text_at(col: Option<&ArrayRef>, row: usize) -> String {
    let Some(col) = col else {
        return String::new();
    };
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        _ => array_value_to_string(col, row).unwrap_or_default(),
    }
}

fn number_at(col: Option<&ArrayRef>, row: usize) -> f64 {
    let Some(col) = col else {
        return 0.0;
    };
    if col.is_null(row) {
        return 0.0;
    }
    match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        _ => text_at(Some(col), row).trim().parse().unwrap_or(0.0),
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::{Parser, ValueEnum};
use parquet::arrow::ArrowWriter;

use problem_browser::data::model::{ProblemRecord, Snapshot};
use problem_browser::data::sample::generate_snapshot;

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Format {
    Json,
    Csv,
    Parquet,
}

/// Write deterministic demo snapshots for the problem browser.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// output directory
    #[clap(default_value = "data")]
    out_dir: PathBuf,

    /// snapshot file format
    #[clap(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn write_json(path: &Path, problems: &[ProblemRecord]) -> Result<()> {
    let data = serde_json::to_vec_pretty(problems).context("serializing snapshot")?;
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

fn write_csv(path: &Path, problems: &[ProblemRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for p in problems {
        writer.serialize(p).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn text_column(problems: &[ProblemRecord], field: impl Fn(&ProblemRecord) -> &str) -> StringArray {
    StringArray::from(problems.iter().map(field).collect::<Vec<_>>())
}

fn write_parquet(path: &Path, problems: &[ProblemRecord]) -> Result<()> {
    let title = text_column(problems, |p| p.title.as_str());
    let difficulty = text_column(problems, |p| p.difficulty.as_str());
    let topics = text_column(problems, |p| p.topics.as_str());
    let link = text_column(problems, |p| p.link.as_str());
    let frequency = Float64Array::from(problems.iter().map(|p| p.frequency).collect::<Vec<_>>());
    let acceptance =
        Float64Array::from(problems.iter().map(|p| p.acceptance_rate).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, false),
        Field::new("Difficulty", DataType::Utf8, false),
        Field::new("Frequency", DataType::Float64, false),
        Field::new("Acceptance Rate", DataType::Float64, false),
        Field::new("Topics", DataType::Utf8, false),
        Field::new("Link", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(title),
            Arc::new(difficulty),
            Arc::new(frequency),
            Arc::new(acceptance),
            Arc::new(topics),
            Arc::new(link),
        ],
    )
    .context("building record batch")?;

    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    for snapshot in Snapshot::ALL {
        let problems = generate_snapshot(snapshot);
        let (ext, write): (&str, fn(&Path, &[ProblemRecord]) -> Result<()>) = match args.format {
            Format::Json => ("json", write_json),
            Format::Csv => ("csv", write_csv),
            Format::Parquet => ("parquet", write_parquet),
        };
        let path = args.out_dir.join(format!("{}.{ext}", snapshot.file_stem()));
        write(&path, &problems)?;
        println!("Wrote {} problems to {}", problems.len(), path.display());
    }

    Ok(())
}

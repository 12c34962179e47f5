//! Reading and writing dataset files.
//!
//! Records are read from JSON Lines (one object per line) or from a JSON
//! array when the file ends in `.json`. Output is always JSON Lines.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Record, Split};
use crate::error::{CleanupError, Result};

/// Path of the split file when `input` is a directory, otherwise `input` itself.
pub fn resolve_input(input: &Path, split: Split) -> PathBuf {
    if input.is_dir() {
        input.join(split.input_file_name())
    } else {
        input.to_path_buf()
    }
}

/// Loads every record from `path`.
///
/// A row that is not a valid record (missing `question` or `cypher`, wrong
/// types) fails the whole load.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    info!("Loading records from {}", path.display());

    let file = File::open(path).map_err(|e| {
        CleanupError::dataset(format!("Cannot open {}: {}", path.display(), e))
    })?;

    let mut records = if is_json_array(path) {
        load_json_array(BufReader::new(file), path)?
    } else {
        load_json_lines(BufReader::new(file), path)?
    };

    for record in &mut records {
        // An `issues` column from a previous annotated run is recomputed.
        record.extra.remove("issues");
    }

    debug!("Loaded {} records", records.len());
    Ok(records)
}

fn is_json_array(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn load_json_lines<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            CleanupError::dataset(format!("{}:{}: {}", path.display(), index + 1, e))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            CleanupError::dataset(format!("{}:{}: {}", path.display(), index + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}

fn load_json_array<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Record>> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)
        .map_err(|e| CleanupError::dataset(format!("{}: {}", path.display(), e)))?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|e| {
                CleanupError::dataset(format!("{}: record {}: {}", path.display(), index + 1, e))
            })
        })
        .collect()
}

/// `<dir>/<split>_split_cleaned.jsonl`
pub fn cleaned_path(dir: &Path, split: Split) -> PathBuf {
    dir.join(format!("{}_split_cleaned.jsonl", split))
}

/// `<dir>/<split>_split_annotated.jsonl`
pub fn annotated_path(dir: &Path, split: Split) -> PathBuf {
    dir.join(format!("{}_split_annotated.jsonl", split))
}

/// Writes the records without issues, dropping the `issues` column.
///
/// Returns the output path and the number of records written.
pub fn write_cleaned(dir: &Path, split: Split, records: &[Record]) -> Result<(PathBuf, usize)> {
    let path = cleaned_path(dir, split);
    let written = write_jsonl(
        &path,
        records.iter().filter(|record| !record.has_issues()),
        false,
    )?;
    info!("Wrote {} clean records to {}", written, path.display());
    Ok((path, written))
}

/// Writes every record with its `issues` column.
pub fn write_annotated(dir: &Path, split: Split, records: &[Record]) -> Result<(PathBuf, usize)> {
    let path = annotated_path(dir, split);
    let written = write_jsonl(&path, records.iter(), true)?;
    info!("Wrote {} annotated records to {}", written, path.display());
    Ok((path, written))
}

fn write_jsonl<'a, I>(path: &Path, records: I, with_issues: bool) -> Result<usize>
where
    I: Iterator<Item = &'a Record>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CleanupError::dataset(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }

    let write_error =
        |e: std::io::Error| CleanupError::dataset(format!("Cannot write {}: {}", path.display(), e));

    let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
    let mut written = 0;
    for record in records {
        let value = record.to_output_value(with_issues)?;
        serde_json::to_writer(&mut writer, &value)
            .map_err(|e| CleanupError::dataset(format!("Cannot write {}: {}", path.display(), e)))?;
        writer.write_all(b"\n").map_err(write_error)?;
        written += 1;
    }
    writer.flush().map_err(write_error)?;
    Ok(written)
}

//! Export of labeled pairs as a zip of JSON records
//!
//! Each labeled entry becomes `<pair key>.json` holding the entry's original
//! fields plus `preferred`. Keys are emitted sorted and every zip member has
//! the same fixed timestamp, so the same labels always produce the same bytes.

use crate::error::ExportError;
use crate::model::entry::{Entry, Label, PairKey};
use chrono::{DateTime, Local};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Field added to every exported record
pub const PREFERRED_FIELD: &str = "preferred";

/// Extension of each record inside the archive
pub const RECORD_EXTENSION: &str = "json";

/// Output record for one entry: all original fields plus `preferred`
pub fn build_record(entry: &Entry, label: Label) -> Result<Value, ExportError> {
    let mut record = serde_json::to_value(entry)?;
    match record.as_object_mut() {
        Some(fields) => {
            fields.insert(PREFERRED_FIELD.to_string(), Value::from(label.0));
        }
        None => {
            return Err(ExportError::ArchiveBuild(format!(
                "entry {} did not serialize to an object",
                entry.pair_key()
            )))
        }
    }
    Ok(record)
}

/// Labeled entries in dataset order, each serialized to its record text
pub fn render_records(
    entries: &[Entry],
    labels: &BTreeMap<PairKey, Label>,
) -> Result<Vec<(String, String)>, ExportError> {
    entries
        .iter()
        .filter_map(|entry| {
            let key = entry.pair_key();
            labels.get(&key).map(|label| (key, entry, *label))
        })
        .map(|(key, entry, label)| -> Result<(String, String), ExportError> {
            let record = build_record(entry, label)?;
            let text = serde_json::to_string_pretty(&record)?;
            Ok((format!("{}.{}", key, RECORD_EXTENSION), text))
        })
        .collect()
}

/// Build the whole archive in memory
///
/// Fails with `ExportError::Empty` when no entry carries a label, so an
/// export never produces an archive without records.
pub fn build_archive(
    entries: &[Entry],
    labels: &BTreeMap<PairKey, Label>,
) -> Result<Vec<u8>, ExportError> {
    let records = render_records(entries, labels)?;
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut archive = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut archive));
        let options = SimpleFileOptions::default()
            .last_modified_time(zip::DateTime::default())
            .compression_method(CompressionMethod::Deflated);

        for (name, text) in &records {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(text.as_bytes())
                .map_err(|e| ExportError::ArchiveBuild(format!("{}: {}", name, e)))?;
        }

        zip.finish()?;
    }

    tracing::info!(records = records.len(), bytes = archive.len(), "archive built");
    Ok(archive)
}

fn write_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Archive file name for an export started at `at`
pub fn archive_file_name(at: DateTime<Local>) -> String {
    format!("labels-{}.zip", at.format("%Y%m%d-%H%M%S"))
}

/// Write `archive` into `dir`, going through a temporary file so a failed
/// write never leaves a truncated zip behind
pub fn write_archive(dir: &Path, file_name: &str, archive: &[u8]) -> Result<PathBuf, ExportError> {
    let target = dir.join(file_name);
    let partial = dir.join(format!("{}.partial", file_name));

    fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;
    fs::write(&partial, archive).map_err(|e| write_error(&partial, e))?;
    if let Err(e) = fs::rename(&partial, &target) {
        let _ = fs::remove_file(&partial);
        return Err(write_error(&target, e));
    }

    Ok(target)
}

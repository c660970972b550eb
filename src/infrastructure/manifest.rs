//! Training manifests: headerless CSV rows of `label,file_path,page`.

use std::io::Read;
use std::path::Path;

use crate::domain::{ClassLabel, DocumentSource, ManifestEntry, ValidationError};

const COLUMNS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("reading manifest: {0}")]
    Read(#[from] csv::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<ManifestEntry>, ManifestError> {
    let path = path.as_ref();
    let reader = reader_builder().from_path(path)?;
    let entries = read_entries(reader)?;
    tracing::info!(path = %path.display(), samples = entries.len(), "Loaded manifest");
    Ok(entries)
}

/// Parses every row; the first invalid row fails the whole manifest.
///
/// Page numbers are 1-based and must be at least 1. Negative pages are rejected
/// here even though other manifest producers allow any non-zero integer, since no
/// rasterizer can render them.
pub fn parse_manifest<R: Read>(input: R) -> Result<Vec<ManifestEntry>, ManifestError> {
    read_entries(reader_builder().from_reader(input))
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

fn read_entries<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<ManifestEntry>, ManifestError> {
    let mut entries = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 1;

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != COLUMNS {
            return Err(row_error(
                line,
                format!("expected {COLUMNS} columns, found {}", record.len()),
            ));
        }

        entries.push(parse_row(line, &record[0], &record[1], &record[2])?);
    }

    if entries.is_empty() {
        return Err(ValidationError::EmptyManifest.into());
    }
    Ok(entries)
}

fn parse_row(line: usize, label: &str, file_path: &str, page: &str) -> Result<ManifestEntry, ManifestError> {
    let label = ClassLabel::new(label).map_err(|e| row_error(line, e.to_string()))?;

    let source = DocumentSource::parse(file_path).map_err(|e| row_error(line, e.to_string()))?;
    if let DocumentSource::Local(path) = &source {
        if path.is_absolute() {
            return Err(row_error(
                line,
                format!("local paths must be relative: {}", path.display()),
            ));
        }
    }

    let page: i64 = page
        .parse()
        .map_err(|_| row_error(line, format!("page number should be a number: {page:?}")))?;
    if page < 1 {
        return Err(row_error(line, format!("page number must be 1 or greater, got {page}")));
    }
    let page = u32::try_from(page).map_err(|_| row_error(line, format!("page number too large: {page}")))?;

    Ok(ManifestEntry { label, source, page })
}

fn row_error(line: usize, reason: String) -> ManifestError {
    ValidationError::ManifestRow { line, reason }.into()
}

//! Document text extraction for prompt augmentation
//!
//! Attached PDF / CSV / XLSX files are rendered to plain text and
//! concatenated ahead of the user's query. Extraction is best-effort:
//! a file that cannot be read contributes nothing to the prompt and
//! surfaces only as a warning, never as a turn-aborting error.

use crate::error::{InfoFlowError, Result};
use calamine::{open_workbook_auto, Reader};
use std::path::Path;

/// Extract text from a single attachment, dispatching on extension
///
/// # Arguments
///
/// * `path` - File to extract; `.pdf`, `.csv` and `.xlsx` are supported
///
/// # Errors
///
/// Returns [`InfoFlowError::Extraction`] for unsupported extensions or
/// when the underlying parser fails.
pub fn extract_file_text(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => extract_pdf(path),
        "csv" => extract_csv(path),
        "xlsx" => extract_xlsx(path),
        other => Err(InfoFlowError::Extraction(format!(
            "unsupported extension: {} ({})",
            if other.is_empty() { "<none>" } else { other },
            path.display()
        ))
        .into()),
    }
}

/// Extract text from every attachment, best effort
///
/// Per-file failures are logged and skipped; the turn proceeds with
/// whatever text the remaining files yield. Returns an empty string when
/// nothing could be extracted.
pub fn extract_documents(paths: &[std::path::PathBuf]) -> String {
    let mut combined = String::new();
    for path in paths {
        match extract_file_text(path) {
            Ok(text) if text.trim().is_empty() => {
                tracing::warn!("No text extracted from {}", path.display());
            }
            Ok(text) => {
                if !combined.is_empty() {
                    combined.push('\n');
                }
                combined.push_str(&text);
            }
            Err(e) => {
                tracing::warn!("Skipping attachment {}: {}", path.display(), e);
            }
        }
    }
    combined
}

fn extract_pdf(path: &Path) -> Result<String> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| InfoFlowError::Extraction(format!("{}: {}", path.display(), e)))?;

    // Pages with no extractable text come back as blank lines; drop them
    // the way the original concatenation did.
    let cleaned: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    Ok(cleaned.join("\n"))
}

fn extract_csv(path: &Path) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| InfoFlowError::Extraction(format!("{}: {}", path.display(), e)))?;

    let mut lines = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| InfoFlowError::Extraction(format!("{}: {}", path.display(), e)))?;
        lines.push(record.iter().collect::<Vec<_>>().join("\t"));
    }
    Ok(lines.join("\n"))
}

fn extract_xlsx(path: &Path) -> Result<String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| InfoFlowError::Extraction(format!("{}: {}", path.display(), e)))?;

    let mut lines = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| InfoFlowError::Extraction(format!("{}: {}", path.display(), e)))?;
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            lines.push(cells.join("\t"));
        }
    }
    Ok(lines.join("\n"))
}

/// Prefix the user query with extracted document text
///
/// With no extracted text the query passes through unchanged.
pub fn augment_prompt(file_text: &str, query: &str) -> String {
    if file_text.trim().is_empty() {
        query.to_string()
    } else {
        format!("{}\n\n{}", file_text, query)
    }
}

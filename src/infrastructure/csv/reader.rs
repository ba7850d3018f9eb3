// ============================================================
// CSV READER
// ============================================================
// Read CSV files into header-addressable tables, with encoding
// detection and Excel `sep=` declaration handling.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use encoding_rs::Encoding;
use tracing::info;

use crate::domain::error::{AppError, Result};

/// A parsed CSV file: headers plus rows addressable by header name.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Load a CSV file, decoding BOM-marked or non-UTF-8 content.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
        let content = decode_bytes(&bytes);
        Self::from_content(&content)
    }

    /// Parse CSV content from a string.
    pub fn from_content(content: &str) -> Result<Self> {
        let content = skip_sep_declaration(content);

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::CsvError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if headers
            .first()
            .map(|h| h.to_lowercase().contains("sep="))
            .unwrap_or(false)
        {
            return Err(AppError::CsvError(
                "sep= declaration not properly skipped. Please resave your CSV file.".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result
                .map_err(|e| AppError::CsvError(format!("Failed to parse CSV row {}: {}", index + 2, e)))?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Value of a named column in a row, empty-string default.
    pub fn get<'a>(&'a self, row: &'a [String], column: &str) -> &'a str {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|idx| row.get(idx))
            .map(|v| v.as_str())
            .unwrap_or("")
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// Decode raw bytes: honor a BOM if present, then try strict UTF-8,
/// then fall back to Windows-1252 (the usual Excel export encoding).
fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }

    if let Ok(content) = std::str::from_utf8(bytes) {
        return content.to_string();
    }

    let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    decoded.into_owned()
}

/// Spreadsheet tools prepend a `sep=<char>` line; drop it when present.
fn skip_sep_declaration(content: &str) -> &str {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.trim().starts_with("sep=") {
        info!(declaration = first_line.trim(), "Skipping separator declaration");
        match content.find('\n') {
            Some(pos) => &content[pos + 1..],
            None => "",
        }
    } else {
        content
    }
}

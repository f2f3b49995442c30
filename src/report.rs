//! Loading of Play Store review exports.
//!
//! The console exports reviews as UTF-16 comma-separated files with a header
//! row. Only two columns matter here, everything else is ignored.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use log::{debug, info};
use serde::Deserialize;

use crate::error::LoadError;

pub const LANGUAGE_COLUMN: &str = "Reviewer Language";
pub const TEXT_COLUMN: &str = "Review Text";

/// Text encoding of the report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputEncoding {
    /// UTF-16, endianness from the byte-order mark (little-endian without one)
    #[default]
    Utf16,
    /// UTF-8, for exports re-saved by spreadsheet tools
    Utf8,
}

impl InputEncoding {
    fn name(self) -> &'static str {
        match self {
            InputEncoding::Utf16 => "UTF-16",
            InputEncoding::Utf8 => "UTF-8",
        }
    }
}

/// One row of the export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "Reviewer Language", default)]
    pub reviewer_language: String,
    #[serde(rename = "Review Text", default)]
    pub review_text: Option<String>,
}

impl ReviewRecord {
    fn has_text(&self) -> bool {
        self.review_text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Reads the report at `path` and returns the rows that carry review text.
///
/// When `language` is given, only rows whose `Reviewer Language` equals it
/// are kept. Rows come back in file order.
pub fn load_reviews<P: AsRef<Path>>(
    path: P,
    language: Option<&str>,
    encoding: InputEncoding,
) -> Result<Vec<ReviewRecord>, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(&bytes, encoding).map_err(|reason| LoadError::Encoding {
        path: path.to_path_buf(),
        encoding: encoding.name(),
        reason,
    })?;
    debug!("decoded {} bytes of {} from {}", bytes.len(), encoding.name(), path.display());

    parse_reviews(&text, language).map_err(|err| err.at(path))
}

/// Parses already decoded CSV text. Split out so callers holding the text in
/// memory do not need a file.
pub fn parse_reviews(text: &str, language: Option<&str>) -> Result<Vec<ReviewRecord>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(ParseError::Csv)?.clone();
    for column in [LANGUAGE_COLUMN, TEXT_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(ParseError::MissingColumn(column));
        }
    }

    let mut total = 0usize;
    let mut kept = Vec::new();
    for row in reader.deserialize::<ReviewRecord>() {
        let record = row.map_err(ParseError::Csv)?;
        total += 1;
        if language.is_none_or(|lang| record.reviewer_language == lang) && record.has_text() {
            kept.push(record);
        }
    }

    info!(
        "kept {} of {} reviews (language filter: {})",
        kept.len(),
        total,
        language.unwrap_or("none")
    );
    Ok(kept)
}

/// Path-less parse failure, turned into a [`LoadError`] by [`load_reviews`].
#[derive(Debug)]
pub enum ParseError {
    MissingColumn(&'static str),
    Csv(csv::Error),
}

impl ParseError {
    pub fn at(self, path: &Path) -> LoadError {
        let path = path.to_path_buf();
        match self {
            ParseError::MissingColumn(column) => LoadError::MissingColumn { path, column },
            ParseError::Csv(source) => LoadError::Csv { path, source },
        }
    }
}

fn decode(bytes: &[u8], encoding: InputEncoding) -> Result<String, String> {
    match encoding {
        InputEncoding::Utf16 => decode_utf16(bytes),
        InputEncoding::Utf8 => {
            let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8(body.to_vec()).map_err(|e| e.to_string())
        }
    }
}

fn decode_utf16(bytes: &[u8]) -> Result<String, String> {
    let (body, big_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        _ => (bytes, false),
    };
    if body.len() % 2 != 0 {
        return Err(format!("odd number of bytes ({})", bytes.len()));
    }

    let units = body.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| format!("unpaired surrogate 0x{:04X}", e.unpaired_surrogate()))
}

//! Reading record files
//!
//! Detects the file encoding, transcodes to UTF-8 and decodes the JSON
//! array of records.

use crate::dedup::Record;
use crate::error::{CleanError, Result};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::fs;
use std::io;
use std::path::Path;

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// Whether a byte order mark was present
    pub had_bom: bool,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            had_bom: false,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Records loaded from one file
#[derive(Debug)]
pub struct LoadedRecords {
    pub records: Vec<Record>,
    pub encoding: EncodingInfo,
    /// Size of the file on disk
    pub bytes: u64,
}

/// Detect the encoding of raw file content
pub fn detect_encoding(content: &[u8]) -> EncodingInfo {
    if content.is_empty() {
        return EncodingInfo::default();
    }

    // Check for BOM first
    if let Some((encoding, _)) = Encoding::for_bom(content) {
        return EncodingInfo {
            name: encoding.name(),
            had_bom: true,
            encoding,
        };
    }

    if std::str::from_utf8(content).is_ok() {
        return EncodingInfo::default();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(content, true);
    let encoding = detector.guess(None, true);

    EncodingInfo {
        name: encoding.name(),
        had_bom: false,
        encoding,
    }
}

/// Decode raw content to UTF-8 text, stripping any BOM
pub fn decode_text(content: &[u8]) -> (String, EncodingInfo) {
    let info = detect_encoding(content);

    // decode() sniffs and removes the BOM itself
    let (decoded, actual, had_errors) = info.encoding.decode(content);
    if had_errors {
        log::warn!("Malformed {} sequences replaced while decoding", actual.name());
    }

    (decoded.into_owned(), info)
}

/// Parse a JSON array of objects
pub fn parse_records(text: &str) -> serde_json::Result<Vec<Record>> {
    serde_json::from_str(text)
}

/// Read and decode the records stored at `path`
pub fn read_records(path: &Path) -> Result<LoadedRecords> {
    let content = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CleanError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => CleanError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let (text, encoding) = decode_text(&content);
    if encoding.encoding != encoding_rs::UTF_8 || encoding.had_bom {
        log::info!("Decoded {:?} as {}", path, encoding.name);
    }

    let records = parse_records(&text).map_err(|source| CleanError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(LoadedRecords {
        records,
        encoding,
        bytes: content.len() as u64,
    })
}

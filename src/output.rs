//! Output management module
//!
//! Writes cleaned records as indented JSON and derives output file names.

use crate::dedup::Record;
use crate::error::{CleanError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix inserted before `.json` in generated names
pub const CLEAN_SUFFIX: &str = "_clean";

/// Indentation used for written JSON
const INDENT: &[u8] = b"    ";

/// Output file writer with buffering
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl OutputWriter {
    /// Create (or truncate) the output file
    pub fn new(path: PathBuf) -> io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Write records as a 4-space indented JSON array
    ///
    /// Non-ASCII characters are written as is.
    pub fn write_records(&mut self, records: &[Record]) -> io::Result<()> {
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut self.writer, formatter);
        records.serialize(&mut ser)?;
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `records` to `path`, returning the number of bytes written
pub fn write_records(path: &Path, records: &[Record]) -> Result<u64> {
    let wrap = |source: io::Error| CleanError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = OutputWriter::new(path.to_path_buf()).map_err(wrap)?;
    writer.write_records(records).map_err(wrap)?;
    writer.flush().map_err(wrap)?;

    let size = std::fs::metadata(writer.path()).map_err(wrap)?.len();
    log::debug!("Wrote {} records ({} bytes) to {:?}", records.len(), size, path);
    Ok(size)
}

/// Generate the cleaned file name for an input
///
/// `gare.json` becomes `gare_clean.json`; names without a `.json`
/// extension get `_clean` appended.
pub fn generate_output_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    match name.strip_suffix(".json") {
        Some(stem) => format!("{}{}.json", stem, CLEAN_SUFFIX),
        None => format!("{}{}", name, CLEAN_SUFFIX),
    }
}

/// Where the cleaned version of `input` is written
///
/// Next to the input unless an output directory is given.
pub fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let name = generate_output_name(input);
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Whether `path` looks like a file this tool generated
pub fn is_clean_output(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.ends_with(&format!("{}.json", CLEAN_SUFFIX)))
        .unwrap_or(false)
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_output_writer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gare_clean.json");

        let records: Vec<Record> = serde_json::from_value(json!([
            {"Code UIC": "87113001", "Nom Gare": "Paris Est"},
            {"Code UIC": "87471003", "Nom Gare": "Évreux Normandie"}
        ]))
        .unwrap();

        let size = write_records(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(size, content.len() as u64);
        assert_eq!(
            content,
            "[\n    {\n        \"Code UIC\": \"87113001\",\n        \"Nom Gare\": \"Paris Est\"\n    },\n    {\n        \"Code UIC\": \"87471003\",\n        \"Nom Gare\": \"Évreux Normandie\"\n    }\n]"
        );
    }

    #[test]
    fn test_field_order_is_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.json");

        let records: Vec<Record> =
            serde_json::from_str(r#"[{"z": 1, "a": 2, "m": 3}]"#).unwrap();
        write_records(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let z = content.find("\"z\"").unwrap();
        let a = content.find("\"a\"").unwrap();
        let m = content.find("\"m\"").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn test_number_literals_written_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big_clean.json");

        let records: Vec<Record> = serde_json::from_str(
            r#"[{"id": 12345678901234567890123, "lat": 48.8566140000, "n": "a"}]"#,
        )
        .unwrap();
        write_records(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"id\": 12345678901234567890123,"));
        assert!(content.contains("\"lat\": 48.8566140000,"));
    }

    #[test]
    fn test_empty_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");

        write_records(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.json");

        let err = write_records(&path, &[]).unwrap_err();
        assert!(matches!(err, CleanError::Write { .. }));
    }

    #[test]
    fn test_generate_output_name() {
        assert_eq!(generate_output_name(Path::new("public/gare.json")), "gare_clean.json");
        assert_eq!(generate_output_name(Path::new("a.json.json")), "a.json_clean.json");
        assert_eq!(generate_output_name(Path::new("export.txt")), "export.txt_clean");
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("public/output.json");
        assert_eq!(output_path(input, None), PathBuf::from("public/output_clean.json"));
        assert_eq!(
            output_path(input, Some(Path::new("/tmp/out"))),
            PathBuf::from("/tmp/out/output_clean.json")
        );
    }

    #[test]
    fn test_is_clean_output() {
        assert!(is_clean_output(Path::new("data/gare_clean.json")));
        assert!(!is_clean_output(Path::new("data/gare.json")));
    }
}

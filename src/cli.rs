//! Command-line interface definition for record-dedup

use crate::profile::FieldProfile;
use clap::Parser;
use std::path::PathBuf;

/// Files cleaned when none are given on the command line
pub const DEFAULT_FILES: [&str; 2] = ["public/gare.json", "public/output.json"];

/// Remove duplicate records from JSON array files
///
/// Each file is matched to a field profile by name, deduplicated on the
/// profile's unique key (first occurrence wins) and written next to the
/// original with a `_clean` suffix.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "record-dedup",
    version,
    about = "Remove duplicate records from JSON array files",
    long_about = r#"
Remove duplicate records from JSON array files. The first record seen for
each unique key is kept; later ones are dropped and reported. Records
without the key are skipped.

BUILT-IN PROFILES:
    gare.json      key "Code UIC"    display "Nom Gare"   (gares SNCF)
    output.json    key "CODE INSEE"  display "COMMUNE"    (communes françaises)

EXAMPLES:
    # Clean the default files (public/gare.json, public/output.json)
    record-dedup

    # Clean specific files
    record-dedup data/gare.json data/output.json

    # Any file, with an explicit key
    record-dedup stops.json --key stop_id --display stop_name

    # Extra profiles from a file
    record-dedup exports/ --recursive --profiles profiles.json
"#
)]
pub struct Args {
    /// Files or directories to clean (default: public/gare.json public/output.json)
    #[arg(value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Clean all default files
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Descend into subdirectories of directory inputs
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Directory for cleaned files (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON file with extra filename-to-field profiles
    #[arg(long, value_name = "FILE")]
    pub profiles: Option<PathBuf>,

    /// Unique key field, applied to every file
    #[arg(short, long, value_name = "FIELD")]
    pub key: Option<String>,

    /// Field shown when reporting duplicates (default: the key field)
    #[arg(short, long, value_name = "FIELD", requires = "key")]
    pub display: Option<String>,

    /// Description of the records, used in reports (default: records)
    #[arg(long, value_name = "TEXT", requires = "key")]
    pub description: Option<String>,

    /// Report duplicates without writing cleaned files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Inputs to process, falling back to the defaults
    pub fn input_paths(&self) -> Vec<PathBuf> {
        if self.all || self.files.is_empty() {
            DEFAULT_FILES.iter().map(PathBuf::from).collect()
        } else {
            self.files.clone()
        }
    }

    /// Profile built from `--key`, if given
    pub fn explicit_profile(&self) -> Option<FieldProfile> {
        let key = self.key.as_deref()?;
        let display = self.display.as_deref().unwrap_or(key);
        let description = self.description.as_deref().unwrap_or("records");
        Some(FieldProfile::new(key, display, description))
    }

    /// Validate field names given on the command line
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(ref key) = self.key {
            if key.trim().is_empty() {
                anyhow::bail!("--key must not be empty");
            }
        }
        if let Some(ref display) = self.display {
            if display.trim().is_empty() {
                anyhow::bail!("--display must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("record-dedup").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_files() {
        let args = parse(&[]);
        assert_eq!(
            args.input_paths(),
            vec![PathBuf::from("public/gare.json"), PathBuf::from("public/output.json")]
        );
        assert!(args.explicit_profile().is_none());
    }

    #[test]
    fn test_all_overrides_files() {
        let args = parse(&["data/foo.json", "--all"]);
        assert_eq!(args.input_paths().len(), 2);
        assert_eq!(args.input_paths()[0], PathBuf::from("public/gare.json"));
    }

    #[test]
    fn test_explicit_files() {
        let args = parse(&["a.json", "b.json", "-o", "out"]);
        assert_eq!(args.input_paths(), vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_explicit_profile() {
        let args = parse(&["stops.json", "--key", "stop_id"]);
        let profile = args.explicit_profile().unwrap();
        assert_eq!(profile.key_field, "stop_id");
        assert_eq!(profile.display_field, "stop_id");
        assert_eq!(profile.description, "records");

        let args = parse(&["stops.json", "-k", "stop_id", "-d", "stop_name"]);
        assert_eq!(args.explicit_profile().unwrap().display_field, "stop_name");
    }

    #[test]
    fn test_display_requires_key() {
        let result = Args::try_parse_from(["record-dedup", "--display", "name"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_empty_key() {
        let args = parse(&["x.json", "--key", " "]);
        assert!(args.validate().is_err());
    }
}

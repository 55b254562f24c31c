//! Field profiles
//!
//! A profile names the field that identifies a record, the field shown in
//! reports, and a human description of the dataset. Profiles are selected
//! per input file by a case-insensitive substring match on its path.

use crate::error::{CleanError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Fields used to deduplicate one kind of file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProfile {
    /// Field holding the identity key
    pub key_field: String,
    /// Field shown when reporting duplicates
    pub display_field: String,
    /// What the records are, e.g. "gares SNCF"
    pub description: String,
}

impl FieldProfile {
    pub fn new(key_field: &str, display_field: &str, description: &str) -> Self {
        Self {
            key_field: key_field.to_string(),
            display_field: display_field.to_string(),
            description: description.to_string(),
        }
    }

    /// Train stations, keyed by UIC code
    pub fn stations() -> Self {
        Self::new("Code UIC", "Nom Gare", "gares SNCF")
    }

    /// Municipalities, keyed by INSEE code
    pub fn municipalities() -> Self {
        Self::new("CODE INSEE", "COMMUNE", "communes françaises")
    }
}

/// On-disk form of a profile entry
#[derive(Debug, Deserialize)]
struct ProfileEntry {
    unique_key: String,
    #[serde(default)]
    display_name_key: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<ProfileEntry> for FieldProfile {
    fn from(entry: ProfileEntry) -> Self {
        let display_field = entry
            .display_name_key
            .unwrap_or_else(|| entry.unique_key.clone());
        Self {
            key_field: entry.unique_key,
            display_field,
            description: entry.description.unwrap_or_else(|| "records".to_string()),
        }
    }
}

/// Immutable filename-pattern to profile table
///
/// Entries are matched in order; the first pattern contained in the
/// lowercased path wins.
#[derive(Debug, Clone, Default)]
pub struct ProfileTable {
    entries: Vec<(String, FieldProfile)>,
}

impl ProfileTable {
    /// Table with no entries; every file needs an explicit profile
    pub fn empty() -> Self {
        Self::default()
    }

    /// The two built-in registries
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                ("gare.json".to_string(), FieldProfile::stations()),
                ("output.json".to_string(), FieldProfile::municipalities()),
            ],
        }
    }

    /// Built-ins extended with the profiles in `path`
    ///
    /// The file holds a JSON object mapping filename patterns to
    /// `{"unique_key", "display_name_key", "description"}`. Loaded entries
    /// are checked before the built-ins.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CleanError::ProfileConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let parsed: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| CleanError::ProfileConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut entries = Vec::with_capacity(parsed.len() + 2);
        for (pattern, value) in parsed {
            let entry: ProfileEntry =
                serde_json::from_value(value).map_err(|e| CleanError::ProfileConfig {
                    path: path.to_path_buf(),
                    reason: format!("profile '{}': {}", pattern, e),
                })?;
            if pattern.trim().is_empty() {
                return Err(CleanError::ProfileConfig {
                    path: path.to_path_buf(),
                    reason: "empty filename pattern".to_string(),
                });
            }
            entries.push((pattern.to_lowercase(), entry.into()));
        }

        log::debug!("Loaded {} profiles from {:?}", entries.len(), path);
        entries.extend(Self::builtin().entries);
        Ok(Self { entries })
    }

    /// First profile whose pattern appears in the lowercased path
    pub fn detect(&self, path: &Path) -> Option<&FieldProfile> {
        let name = path.to_string_lossy().to_lowercase();
        self.entries
            .iter()
            .find(|(pattern, _)| name.contains(pattern.as_str()))
            .map(|(_, profile)| profile)
    }

    /// Explicit profile if given, otherwise detection by filename
    pub fn resolve<'a>(
        &'a self,
        path: &Path,
        explicit: Option<&'a FieldProfile>,
    ) -> Result<&'a FieldProfile> {
        if let Some(profile) = explicit {
            return Ok(profile);
        }

        self.detect(path)
            .ok_or_else(|| CleanError::UnrecognizedProfile {
                path: path.to_path_buf(),
                supported: self.patterns().join(", "),
            })
    }

    /// Known filename patterns, in match order
    pub fn patterns(&self) -> Vec<&str> {
        self.entries.iter().map(|(p, _)| p.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_builtin() {
        let table = ProfileTable::builtin();

        let gare = table.detect(Path::new("public/gare.json")).unwrap();
        assert_eq!(gare.key_field, "Code UIC");
        assert_eq!(gare.display_field, "Nom Gare");

        let communes = table.detect(Path::new("public/output.json")).unwrap();
        assert_eq!(communes.key_field, "CODE INSEE");
        assert_eq!(communes.display_field, "COMMUNE");
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        let table = ProfileTable::builtin();
        let profile = table.detect(Path::new("exports/Liste-GARE.JSON")).unwrap();
        assert_eq!(*profile, FieldProfile::stations());
    }

    #[test]
    fn test_detect_unknown() {
        let table = ProfileTable::builtin();
        assert!(table.detect(Path::new("stations.csv")).is_none());
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let table = ProfileTable::builtin();
        let explicit = FieldProfile::new("id", "name", "things");

        let profile = table.resolve(Path::new("gare.json"), Some(&explicit)).unwrap();
        assert_eq!(profile.key_field, "id");
    }

    #[test]
    fn test_resolve_unrecognized() {
        let table = ProfileTable::builtin();
        let err = table.resolve(&PathBuf::from("foo.json"), None).unwrap_err();
        assert!(matches!(err, CleanError::UnrecognizedProfile { .. }));
        assert!(err.to_string().contains("gare.json, output.json"));
    }

    #[test]
    fn test_load_profiles_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "Arrets.json": {{"unique_key": "stop_id", "display_name_key": "stop_name", "description": "arrêts"}},
                "gare.json": {{"unique_key": "UIC"}}
            }}"#
        )
        .unwrap();

        let table = ProfileTable::load(file.path()).unwrap();
        assert_eq!(table.patterns().len(), 4);
        assert_eq!(table.patterns()[0], "arrets.json");

        let stops = table.detect(Path::new("data/arrets.json")).unwrap();
        assert_eq!(stops.key_field, "stop_id");
        assert_eq!(stops.description, "arrêts");

        // Loaded entries shadow built-ins
        let gare = table.detect(Path::new("gare.json")).unwrap();
        assert_eq!(gare.key_field, "UIC");
        assert_eq!(gare.display_field, "UIC");
        assert_eq!(gare.description, "records");
    }

    #[test]
    fn test_load_rejects_missing_key() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"foo.json": {{"description": "no key"}}}}"#).unwrap();

        let err = ProfileTable::load(file.path()).unwrap_err();
        assert!(matches!(err, CleanError::ProfileConfig { .. }));
    }
}

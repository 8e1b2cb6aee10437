//! wml-save: Save/restore of scenario variables
//!
//! Persists a [`VariableStore`] as JSON behind a versioned header.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wml_core::VariableStore;

/// Current save file format version
pub const SAVE_VERSION: u32 = 1;

const LOG_TARGET: &str = "wml::save";

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found")]
    NotFound,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid save file header")]
    InvalidHeader,
}

/// Save file header for versioning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Save format version
    pub version: u32,
    /// Free-form name of the saved store (scenario id, campaign...)
    pub label: String,
    /// Top-level attributes plus top-level children
    pub variable_count: usize,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "WMLV";

    pub fn new(store: &VariableStore, label: &str) -> Self {
        let variables = store.variables();
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            label: label.to_string(),
            variable_count: variables.attribute_count() + variables.all_children_count(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete save file structure
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub store: VariableStore,
}

#[derive(Serialize)]
struct SaveFileRef<'a> {
    header: SaveHeader,
    store: &'a VariableStore,
}

fn write_store(
    store: &VariableStore,
    label: &str,
    path: &Path,
    pretty: bool,
) -> Result<(), SaveError> {
    let save_file = SaveFileRef {
        header: SaveHeader::new(store, label),
        store,
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(writer, &save_file)?;
    } else {
        serde_json::to_writer(writer, &save_file)?;
    }
    tracing::debug!(
        target: LOG_TARGET,
        path = %path.display(),
        label,
        variables = save_file.header.variable_count,
        "store saved"
    );
    Ok(())
}

/// Save a variable store to a file
pub fn save_store(
    store: &VariableStore,
    label: &str,
    path: impl AsRef<Path>,
) -> Result<(), SaveError> {
    write_store(store, label, path.as_ref(), true)
}

/// Save a variable store to a compact file (no pretty printing)
pub fn save_store_compact(
    store: &VariableStore,
    label: &str,
    path: impl AsRef<Path>,
) -> Result<(), SaveError> {
    write_store(store, label, path.as_ref(), false)
}

fn read_save_file(path: &Path) -> Result<SaveFile, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let save_file: SaveFile = serde_json::from_reader(reader)?;
    save_file.header.validate()?;
    Ok(save_file)
}

/// Load a variable store from a file
pub fn load_store(path: impl AsRef<Path>) -> Result<VariableStore, SaveError> {
    let path = path.as_ref();
    let save_file = read_save_file(path)?;
    tracing::debug!(
        target: LOG_TARGET,
        path = %path.display(),
        label = %save_file.header.label,
        "store loaded"
    );
    Ok(save_file.store)
}

/// Load only the header from a save file
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    // Reads the whole file; stores are small enough that this does not matter
    read_save_file(path.as_ref()).map(|save_file| save_file.header)
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a save file
pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

/// Get the default save path for a store label
pub fn default_save_path(label: &str) -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("wml-vars");
    path.push("saves");
    if let Err(err) = std::fs::create_dir_all(&path) {
        tracing::warn!(target: LOG_TARGET, path = %path.display(), %err, "cannot create save directory");
    }
    path.push(format!("{}.json", label));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use wml_core::{Config, Limits};

    fn sample_store() -> VariableStore {
        let mut store = VariableStore::with_limits(Limits::with_max_loop(100));
        store.set_variable("turn", 3);
        store.set_variable("side[1].gold", "100");
        store.set_variable("side[1].name", "Konrad");
        store
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("wml_vars_test_save.json");

        let store = sample_store();
        save_store(&store, "test", &path).unwrap();
        assert!(save_exists(&path));

        let loaded = load_store(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.get_variable("side[1].name").str(), "Konrad");
        assert_eq!(loaded.limits().max_loop, 100);

        // Cleanup
        delete_save(&path).unwrap();
        assert!(!save_exists(&path));
    }

    #[test]
    fn test_compact_save_and_header() {
        let path = std::env::temp_dir().join("wml_vars_test_compact.json");

        let store = sample_store();
        save_store_compact(&store, "compact", &path).unwrap();

        let header = load_header(&path).unwrap();
        assert_eq!(header.label, "compact");
        // turn attribute plus two side children
        assert_eq!(header.variable_count, 3);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_header_validation() {
        let header = SaveHeader::new(&VariableStore::new(), "x");
        assert!(header.validate().is_ok());

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(
            bad_header.validate(),
            Err(SaveError::InvalidHeader)
        ));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_store("/nonexistent/path/variables.json");
        assert!(matches!(result, Err(SaveError::NotFound)));
    }

    #[test]
    fn test_load_garbage() {
        let path = std::env::temp_dir().join("wml_vars_test_garbage.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_store(&path),
            Err(SaveError::Serialization(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_empty_store_roundtrip() {
        let path = std::env::temp_dir().join("wml_vars_test_empty.json");
        let store = VariableStore::from_config(Config::new(), Limits::default());
        save_store(&store, "empty", &path).unwrap();
        assert_eq!(load_store(&path).unwrap(), store);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_non_finite_double_roundtrip() {
        let path = std::env::temp_dir().join("wml_vars_test_non_finite.json");
        let mut store = VariableStore::new();
        store.set_variable("x", f64::INFINITY);
        store.set_variable("side[0].ratio", f64::NAN);
        save_store(&store, "non-finite", &path).unwrap();

        let loaded = load_store(&path).unwrap();
        assert_eq!(loaded.get_variable("x").str(), "inf");
        assert_eq!(loaded.get_variable("side[0].ratio").str(), "NaN");
        assert!(loaded.has_variable("x"));
        std::fs::remove_file(&path).ok();
    }
}

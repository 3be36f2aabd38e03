use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{builtin, CatalogError, FactorCatalog};

/// Backing store for factor tables. Loading may touch the filesystem; everything after it is
/// in-memory.
pub trait CatalogSource: Send + Sync {
    fn versions(&self) -> Vec<String>;
    fn load(&self, version: &str) -> Result<FactorCatalog, CatalogError>;
}

/// Factor tables compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalogSource;

impl CatalogSource for BuiltinCatalogSource {
    fn versions(&self) -> Vec<String> {
        builtin::versions()
    }

    fn load(&self, version: &str) -> Result<FactorCatalog, CatalogError> {
        builtin::catalog(version)
    }
}

/// Directory holding one `<version>.csv` file per formula version.
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    dir: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, version: &str) -> PathBuf {
        self.dir.join(format!("{version}.csv"))
    }
}

impl CatalogSource for CsvCatalogSource {
    fn versions(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %self.dir.display(), error = %err, "factor catalog directory unreadable");
                return Vec::new();
            }
        };

        let mut versions: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        versions.sort();
        versions
    }

    fn load(&self, version: &str) -> Result<FactorCatalog, CatalogError> {
        // versions are file stems; anything path-like cannot name one
        if version.is_empty() || version.contains(['/', '\\']) || version.starts_with('.') {
            return Err(CatalogError::UnknownVersion(version.to_string()));
        }

        match std::fs::File::open(self.path_for(version)) {
            Ok(file) => FactorCatalog::from_reader(version, file),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(CatalogError::UnknownVersion(version.to_string()))
            }
            Err(err) => Err(CatalogError::Io(err)),
        }
    }
}

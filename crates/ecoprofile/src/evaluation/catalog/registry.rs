use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::source::{BuiltinCatalogSource, CatalogSource};
use super::{CatalogError, Factor, FactorCatalog, FactorTable};
use crate::evaluation::domain::ReferenceId;
use crate::evaluation::error::EvaluationError;

/// Process-wide cache of loaded catalogs, keyed by version id.
pub struct CatalogRegistry {
    source: Box<dyn CatalogSource>,
    loaded: RwLock<HashMap<String, Arc<FactorCatalog>>>,
}

impl CatalogRegistry {
    pub fn new<S>(source: S) -> Self
    where
        S: CatalogSource + 'static,
    {
        Self {
            source: Box::new(source),
            loaded: RwLock::new(HashMap::new()),
        }
    }

    pub fn builtin() -> Self {
        Self::new(BuiltinCatalogSource)
    }

    pub fn list_versions(&self) -> Vec<String> {
        self.source.versions()
    }

    /// Return the cached catalog for `version`, loading it on first use.
    ///
    /// Concurrent first loads may both read the source; the first one stored wins and every
    /// caller receives that same instance.
    pub fn get_or_load(&self, version: &str) -> Result<Arc<FactorCatalog>, CatalogError> {
        if let Some(catalog) = self
            .loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(version)
        {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(self.source.load(version)?);
        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        let stored = loaded
            .entry(version.to_string())
            .or_insert_with(|| {
                info!(version, factors = catalog.len(), "factor catalog loaded");
                Arc::clone(&catalog)
            });
        Ok(Arc::clone(stored))
    }

    pub fn lookup(
        &self,
        version: &str,
        table: FactorTable,
        reference: Option<&ReferenceId>,
    ) -> Result<Option<Factor>, EvaluationError> {
        self.get_or_load(version)?.lookup(table, reference)
    }

    pub fn is_loaded(&self, version: &str) -> bool {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(version)
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::catalog::Unit;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        loads: Arc<AtomicUsize>,
    }

    impl CatalogSource for CountingSource {
        fn versions(&self) -> Vec<String> {
            vec!["7.0.0".to_string()]
        }

        fn load(&self, version: &str) -> Result<FactorCatalog, CatalogError> {
            if version != "7.0.0" {
                return Err(CatalogError::UnknownVersion(version.to_string()));
            }
            self.loads.fetch_add(1, Ordering::SeqCst);
            FactorCatalog::new(version).with_factor(
                FactorTable::Recycling,
                "TYPE_1",
                Factor::new(1.0, Unit::Kilogram),
            )
        }
    }

    #[test]
    fn repeated_loads_are_served_from_cache() {
        let source = CountingSource::default();
        let loads = Arc::clone(&source.loads);
        let registry = CatalogRegistry::new(source);

        let first = registry.get_or_load("7.0.0").expect("loads");
        let second = registry.get_or_load("7.0.0").expect("loads again");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(registry.is_loaded("7.0.0"));
    }

    #[test]
    fn unknown_version_maps_to_evaluation_error() {
        let registry = CatalogRegistry::new(CountingSource::default());

        match registry.lookup("8.0.0", FactorTable::Recycling, None) {
            Err(EvaluationError::UnknownVersion(version)) => assert_eq!(version, "8.0.0"),
            other => panic!("expected unknown version, got {other:?}"),
        }
        assert!(!registry.is_loaded("8.0.0"));
    }

    #[test]
    fn builtin_registry_lists_v1() {
        assert_eq!(CatalogRegistry::builtin().list_versions(), vec!["1.0.0"]);
    }
}

use crate::dataset::Dataset;
use crate::error::DatasetError;
use crate::loader::load_csv;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

type LoadFn = Box<dyn Fn() -> Result<Dataset, DatasetError> + Send + Sync>;

/// Load-once holder for the process-wide sales table.
///
/// The first `get` runs the loader; later calls hand out the same `Arc`
/// until `invalidate` or `reload` is called.
pub struct DatasetCache {
    loader: LoadFn,
    slot: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetCache {
    /// A cache backed by a CSV file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::with_loader(move || load_csv(&path))
    }

    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Dataset, DatasetError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            slot: RwLock::new(None),
        }
    }

    /// Returns the cached dataset, loading it on first access.
    pub fn get(&self) -> Result<Arc<Dataset>, DatasetError> {
        {
            let slot = self.slot.read().map_err(|_| DatasetError::CachePoisoned)?;
            if let Some(dataset) = slot.as_ref() {
                return Ok(Arc::clone(dataset));
            }
        }

        let mut slot = self.slot.write().map_err(|_| DatasetError::CachePoisoned)?;
        // Another caller may have loaded it while we waited for the write lock.
        if let Some(dataset) = slot.as_ref() {
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new((self.loader)()?);
        *slot = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Re-reads the source now and replaces the cached copy.
    ///
    /// On failure the previously cached dataset is left in place.
    pub fn reload(&self) -> Result<Arc<Dataset>, DatasetError> {
        let dataset = Arc::new((self.loader)()?);
        let mut slot = self.slot.write().map_err(|_| DatasetError::CachePoisoned)?;
        *slot = Some(Arc::clone(&dataset));
        tracing::info!(rows = dataset.len(), "Dataset cache reloaded");
        Ok(dataset)
    }

    /// Drops the cached copy; the next `get` loads again.
    pub fn invalidate(&self) -> Result<(), DatasetError> {
        let mut slot = self.slot.write().map_err(|_| DatasetError::CachePoisoned)?;
        *slot = None;
        tracing::debug!("Dataset cache invalidated");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

impl std::fmt::Debug for DatasetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

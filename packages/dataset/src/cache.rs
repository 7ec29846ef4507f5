//! Session-lifetime dataset cache.
//!
//! The enriched dataset is loaded at most once per cache lifetime and then
//! shared read-only (`Arc`) with every filter evaluation. Invalidation drops
//! the cached value; the next access reloads it.

use std::sync::{Arc, PoisonError, RwLock, TryLockError};

use crate::{DatasetError, LoadedDataset, load_dataset};
use incident_panel_source::DatasetConfig;

/// Lifecycle of a [`DatasetCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheState {
    /// Nothing has been loaded yet.
    Uninitialized,
    /// A dataset is cached.
    Loaded,
    /// A dataset was cached and then dropped; the next access reloads.
    Invalidated,
}

enum Slot {
    Uninitialized,
    Loaded(Arc<LoadedDataset>),
    Invalidated,
}

type Loader = dyn Fn() -> Result<LoadedDataset, DatasetError> + Send + Sync;

/// Load-once cache for the enriched dataset.
pub struct DatasetCache {
    loader: Box<Loader>,
    slot: RwLock<Slot>,
}

impl std::fmt::Debug for DatasetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl DatasetCache {
    /// Creates a cache that loads from the files named in `config`.
    #[must_use]
    pub fn from_config(config: DatasetConfig) -> Self {
        Self::with_loader(move || load_dataset(&config))
    }

    /// Creates a cache around an arbitrary loader.
    pub fn with_loader(
        loader: impl Fn() -> Result<LoadedDataset, DatasetError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            loader: Box::new(loader),
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> CacheState {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Uninitialized => CacheState::Uninitialized,
            Slot::Loaded(_) => CacheState::Loaded,
            Slot::Invalidated => CacheState::Invalidated,
        }
    }

    /// The cached dataset, if one is loaded. Never triggers a load.
    #[must_use]
    pub fn get(&self) -> Option<Arc<LoadedDataset>> {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Loaded(dataset) => Some(Arc::clone(dataset)),
            Slot::Uninitialized | Slot::Invalidated => None,
        }
    }

    /// Returns the cached dataset, loading it first if needed.
    ///
    /// Concurrent callers block on the same load; the loader runs once.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`DatasetError`]. The cache stays empty and the
    /// next call retries.
    pub fn get_or_load(&self) -> Result<Arc<LoadedDataset>, DatasetError> {
        if let Some(dataset) = self.get() {
            return Ok(dataset);
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Slot::Loaded(dataset) = &*slot {
            return Ok(Arc::clone(dataset));
        }

        log::info!("Loading incident dataset");
        let dataset = Arc::new((self.loader)()?);
        *slot = Slot::Loaded(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drops the cached dataset. Readers holding an `Arc` keep their copy.
    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if matches!(*slot, Slot::Loaded(_)) {
            log::info!("Invalidating cached incident dataset");
            *slot = Slot::Invalidated;
        }
    }

    /// Loads a fresh dataset and swaps it in.
    ///
    /// The previous dataset stays cached until the new load succeeds.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`DatasetError`]. The cache is left as it was.
    pub fn reload(&self) -> Result<Arc<LoadedDataset>, DatasetError> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);

        log::info!("Reloading incident dataset");
        let dataset = match (self.loader)() {
            Ok(dataset) => Arc::new(dataset),
            Err(e) => {
                if matches!(*slot, Slot::Loaded(_)) {
                    log::warn!("Reload failed, keeping the cached dataset: {e}");
                }
                return Err(e);
            }
        };
        *slot = Slot::Loaded(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Current lifecycle state, or [`None`] while a load or reload holds the
    /// lock. Never blocks.
    #[must_use]
    pub fn try_state(&self) -> Option<CacheState> {
        let slot = match self.slot.try_read() {
            Ok(slot) => slot,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        Some(match &*slot {
            Slot::Uninitialized => CacheState::Uninitialized,
            Slot::Loaded(_) => CacheState::Loaded,
            Slot::Invalidated => CacheState::Invalidated,
        })
    }
}

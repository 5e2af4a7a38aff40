//! Process-wide index with guarded re-initialization

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use super::FlatIndex;
use crate::config::KontrolleConfig;
use crate::error::Result;

/// Holds the current [`FlatIndex`] for concurrent readers
///
/// Readers take an `Arc` snapshot and query it without holding any lock.
/// Re-initialization builds the new index first and only then swaps it in,
/// so a failing configuration leaves the installed index untouched.
///
/// # Examples
///
/// ```
/// use kontrolle::{KontrolleConfig, SharedIndex};
///
/// let shared = SharedIndex::init(&KontrolleConfig::builder().role("admin").build()).unwrap();
/// assert!(shared.snapshot().has_role("admin").is_some());
///
/// shared.reinit(&KontrolleConfig::builder().role("auditor").build()).unwrap();
/// assert!(shared.snapshot().has_role("admin").is_none());
/// assert_eq!(shared.generation(), 1);
/// ```
#[derive(Debug)]
pub struct SharedIndex {
    current: RwLock<Arc<FlatIndex>>,
    generation: AtomicU64,
}

impl SharedIndex {
    pub fn init(config: &KontrolleConfig) -> Result<Self> {
        let index = FlatIndex::init(config)?;
        info!(roles = index.roles().len(), "index installed");
        Ok(Self::from_index(index))
    }

    pub fn from_index(index: FlatIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
            generation: AtomicU64::new(0),
        }
    }

    /// Builds a new index from `config` and replaces the current one
    pub fn reinit(&self, config: &KontrolleConfig) -> Result<()> {
        let index = Arc::new(FlatIndex::init(config)?);

        let mut current = self.current.write();
        *current = index;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        info!(generation, roles = current.roles().len(), "index replaced");
        Ok(())
    }

    /// The index installed at the time of the call
    pub fn snapshot(&self) -> Arc<FlatIndex> {
        Arc::clone(&self.current.read())
    }

    /// Number of successful re-initializations
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

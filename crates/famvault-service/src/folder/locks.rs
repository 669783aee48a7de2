//! Per-family mutation locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use famvault_core::types::FamilyId;

/// Registry of per-family async mutexes.
///
/// Structural folder mutations and inbox sweeps serialize per family by
/// holding the family's mutex for the duration of the operation; disjoint
/// families never contend. Locks are created on first use and kept for
/// the life of the process.
#[derive(Debug, Default)]
pub struct FamilyLocks {
    /// Family ID → mutex.
    locks: DashMap<FamilyId, Arc<Mutex<()>>>,
}

impl FamilyLocks {
    /// Creates an empty lock registry.
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Lock the family for a structural mutation, waiting until any
    /// in-flight mutation finishes.
    pub async fn lock_family(&self, family_id: FamilyId) -> OwnedMutexGuard<()> {
        self.mutex_for(family_id).lock_owned().await
    }

    /// Take the family lock without waiting. Returns `None` when a holder
    /// is already inside; the inbox sweep uses this to skip a family
    /// rather than queue behind another run.
    pub fn try_lock_family(&self, family_id: FamilyId) -> Option<OwnedMutexGuard<()>> {
        self.mutex_for(family_id).try_lock_owned().ok()
    }

    fn mutex_for(&self, family_id: FamilyId) -> Arc<Mutex<()>> {
        self.locks
            .entry(family_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

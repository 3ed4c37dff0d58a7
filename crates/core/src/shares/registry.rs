//! Serialised access to the share registry.
//!
//! Every operation here runs a full load → mutate → save cycle while holding one mutex, so two
//! requests in the same process can no longer lose each other's updates (for example two
//! concurrent resolves both writing `downloads = n + 1`).

use crate::shares::{ShareRecord, ShareStore};
use crate::{CoreError, CoreResult};
use sharebox_ids::ShareId;
use std::sync::Mutex;

pub struct ShareRegistry {
    store: Box<dyn ShareStore>,
    lock: Mutex<()>,
}

impl std::fmt::Debug for ShareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareRegistry").finish_non_exhaustive()
    }
}

impl ShareRegistry {
    pub fn new(store: impl ShareStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            lock: Mutex::new(()),
        }
    }

    /// Runs `f` against the current records and persists them afterwards.
    ///
    /// The closure returns `(changed, value)`; the collection is only written back when
    /// `changed` is true. Errors from `f` abort without saving.
    pub fn update<T>(
        &self,
        f: impl FnOnce(&mut Vec<ShareRecord>) -> CoreResult<(bool, T)>,
    ) -> CoreResult<T> {
        let _guard = self.lock.lock().map_err(|_| CoreError::RegistryPoisoned)?;
        let mut records = self.store.load()?;
        let (changed, value) = f(&mut records)?;
        if changed {
            self.store.save(&records)?;
        }
        Ok(value)
    }

    /// Returns a snapshot of every record, expired ones included.
    pub fn all(&self) -> CoreResult<Vec<ShareRecord>> {
        let _guard = self.lock.lock().map_err(|_| CoreError::RegistryPoisoned)?;
        self.store.load()
    }

    pub fn get(&self, id: &ShareId) -> CoreResult<Option<ShareRecord>> {
        Ok(self.all()?.into_iter().find(|r| &r.id == id))
    }

    /// Inserts `record`, replacing any existing record with the same id.
    pub fn upsert(&self, record: ShareRecord) -> CoreResult<()> {
        self.update(|records| {
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
            Ok((true, ()))
        })
    }

    /// Removes the record with this id, returning it if it existed.
    pub fn delete(&self, id: &ShareId) -> CoreResult<Option<ShareRecord>> {
        self.update(|records| match records.iter().position(|r| &r.id == id) {
            Some(idx) => Ok((true, Some(records.remove(idx)))),
            None => Ok((false, None)),
        })
    }
}

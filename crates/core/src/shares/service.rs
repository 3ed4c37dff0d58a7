//! Share link lifecycle: create, list, resolve.
//!
//! Records are ACTIVE until `expires_at` passes, then EXPIRED. There is no background sweep:
//! [`ShareService::list`] compacts the registry whenever it runs, and [`ShareService::resolve`]
//! reports an expired link as gone rather than missing.

use crate::catalog::CatalogService;
use crate::constants::MAX_EXPIRES_IN_SECONDS;
use crate::shares::{partition, JsonFileStore, ShareRecord, ShareRegistry, ShareStore};
use crate::{CoreConfig, CoreError, CoreResult};
use chrono::{DateTime, Utc};
use sharebox_ids::ShareId;
use std::sync::Arc;

/// What a client gets when following a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShare {
    pub file_name: String,
    pub file_url: String,
    /// Download count including this resolution.
    pub downloads: u64,
}

#[derive(Debug)]
pub struct ShareService {
    cfg: Arc<CoreConfig>,
    catalog: CatalogService,
    registry: ShareRegistry,
}

impl ShareService {
    /// Creates a service backed by the JSON registry file named in `cfg`.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let store = JsonFileStore::new(cfg.share_file());
        Self::with_store(cfg, store)
    }

    /// Creates a service backed by an arbitrary store.
    pub fn with_store(cfg: Arc<CoreConfig>, store: impl ShareStore + 'static) -> Self {
        Self {
            catalog: CatalogService::new(cfg.clone()),
            registry: ShareRegistry::new(store),
            cfg,
        }
    }

    pub fn registry(&self) -> &ShareRegistry {
        &self.registry
    }

    /// Creates (or returns the existing) share link for a stored file.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if:
    /// - `expires_in_seconds` is out of range (`InvalidInput`),
    /// - no stored file named `file_id` exists (`FileNotFound`),
    /// - the registry cannot be read or written.
    pub fn create(
        &self,
        file_id: &str,
        file_name: &str,
        expires_in_seconds: Option<i64>,
    ) -> CoreResult<ShareId> {
        self.create_at(file_id, file_name, expires_in_seconds, Utc::now())
    }

    /// [`Self::create`] evaluated at an explicit instant.
    ///
    /// An active record for `file_id` is returned unchanged, expiry included. Expired records
    /// for the same file are dropped and replaced by a fresh one.
    pub fn create_at(
        &self,
        file_id: &str,
        file_name: &str,
        expires_in_seconds: Option<i64>,
        now: DateTime<Utc>,
    ) -> CoreResult<ShareId> {
        if let Some(secs) = expires_in_seconds {
            if secs.unsigned_abs() > MAX_EXPIRES_IN_SECONDS.unsigned_abs() {
                return Err(CoreError::InvalidInput(format!(
                    "expiresIn must be within {} seconds",
                    MAX_EXPIRES_IN_SECONDS
                )));
            }
        }

        if !self.catalog.exists(file_id) {
            return Err(CoreError::FileNotFound(file_id.to_owned()));
        }

        self.registry.update(|records| {
            if let Some(existing) = records
                .iter()
                .find(|r| r.file_id == file_id && !r.is_expired(now))
            {
                return Ok((false, existing.id.clone()));
            }

            let before = records.len();
            records.retain(|r| r.file_id != file_id);
            if records.len() != before {
                tracing::info!(
                    "replacing {} expired share(s) for {}",
                    before - records.len(),
                    file_id
                );
            }

            let record = ShareRecord::new(
                file_id.to_owned(),
                file_name.to_owned(),
                expires_in_seconds,
                now,
            );
            let id = record.id.clone();
            tracing::info!("created share {} for {}", id, file_id);
            records.push(record);
            Ok((true, id))
        })
    }

    /// Returns every active share, persisting the registry without expired records.
    pub fn list(&self) -> CoreResult<Vec<ShareRecord>> {
        self.list_at(Utc::now())
    }

    pub fn list_at(&self, now: DateTime<Utc>) -> CoreResult<Vec<ShareRecord>> {
        self.compact(now).map(|(valid, _)| valid)
    }

    /// Removes expired records and returns how many were dropped.
    pub fn purge_expired(&self) -> CoreResult<usize> {
        self.compact(Utc::now()).map(|(_, removed)| removed)
    }

    fn compact(&self, now: DateTime<Utc>) -> CoreResult<(Vec<ShareRecord>, usize)> {
        self.registry.update(|records| {
            let (valid, expired) = partition(std::mem::take(records), now);
            *records = valid.clone();
            if !expired.is_empty() {
                tracing::info!("purged {} expired share(s)", expired.len());
            }
            Ok((!expired.is_empty(), (valid, expired.len())))
        })
    }

    /// Follows a share link, counting one download.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if:
    /// - the id is unknown or malformed (`ShareNotFound`),
    /// - the link has expired (`ShareExpired`),
    /// - the registry cannot be read or written.
    pub fn resolve(&self, share_id: &str) -> CoreResult<ResolvedShare> {
        self.resolve_at(share_id, Utc::now())
    }

    pub fn resolve_at(&self, share_id: &str, now: DateTime<Utc>) -> CoreResult<ResolvedShare> {
        let id = ShareId::from_stored(share_id)
            .map_err(|_| CoreError::ShareNotFound(share_id.to_owned()))?;

        let (resolved, file_id) = self.registry.update(|records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| CoreError::ShareNotFound(share_id.to_owned()))?;

            if record.is_expired(now) {
                return Err(CoreError::ShareExpired(share_id.to_owned()));
            }

            record.downloads += 1;
            let resolved = ResolvedShare {
                file_name: record.file_name.clone(),
                file_url: self.cfg.public_url(&record.file_id),
                downloads: record.downloads,
            };
            Ok((true, (resolved, record.file_id.clone())))
        })?;

        // Stale links still resolve; the blob may have been deleted after sharing.
        if !self.catalog.exists(&file_id) {
            tracing::warn!(
                "share {} points at a file that no longer exists: {}",
                id,
                file_id
            );
        }

        tracing::info!("resolved share {} ({} downloads)", id, resolved.downloads);
        Ok(resolved)
    }

    /// Deletes a share link regardless of its state.
    pub fn revoke(&self, share_id: &str) -> CoreResult<ShareRecord> {
        let id = ShareId::from_stored(share_id)
            .map_err(|_| CoreError::ShareNotFound(share_id.to_owned()))?;
        let removed = self
            .registry
            .delete(&id)?
            .ok_or_else(|| CoreError::ShareNotFound(share_id.to_owned()))?;
        tracing::info!("revoked share {}", id);
        Ok(removed)
    }
}

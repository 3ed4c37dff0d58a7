//! Share record type and expiry rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sharebox_ids::ShareId;

/// Metadata for one share link, stored as camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    pub id: ShareId,
    /// Stored name of the shared blob. Not owned: the blob may since have been deleted.
    pub file_id: String,
    /// Display name chosen by whoever created the share.
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub downloads: u64,
}

impl ShareRecord {
    /// Builds a fresh record with a new random id.
    ///
    /// `expires_in_seconds` of `None` or `Some(0)` means the link never expires; negative values
    /// produce a link that is already expired.
    pub fn new(
        file_id: String,
        file_name: String,
        expires_in_seconds: Option<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = expires_in_seconds
            .filter(|secs| *secs != 0)
            .map(|secs| now + Duration::seconds(secs));

        Self {
            id: ShareId::generate(),
            file_id,
            file_name,
            created_at: now,
            expires_at,
            downloads: 0,
        }
    }

    /// A record expires at the instant `expires_at` is reached.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Splits records into `(valid, expired)` as of `now`, preserving order within each half.
pub fn partition(
    records: Vec<ShareRecord>,
    now: DateTime<Utc>,
) -> (Vec<ShareRecord>, Vec<ShareRecord>) {
    records.into_iter().partition(|r| !r.is_expired(now))
}

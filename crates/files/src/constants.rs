//! Constants used by the blob store.

/// Name used when cleaning leaves nothing usable (empty, `.` or `..`).
pub const FALLBACK_NAME: &str = "upload";

/// Upper bound on `_N` suffixes tried before an upload is refused.
pub const MAX_NAME_ATTEMPTS: usize = 10_000;

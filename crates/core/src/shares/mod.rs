//! Share links.
//!
//! A share link is a [`ShareRecord`] pointing at a stored file by name. Records live in a single
//! registry document; see [`registry`] for how mutations are serialised and [`service`] for the
//! create/list/resolve lifecycle.

pub mod record;
pub mod registry;
pub mod service;
pub mod store;

pub use record::{partition, ShareRecord};
pub use registry::ShareRegistry;
pub use service::{ResolvedShare, ShareService};
pub use store::{InMemoryStore, JsonFileStore, ShareStore};

//! Local report store.
//!
//! Persists the report collection and its statistics snapshot as two JSON
//! values in a per-profile key-value backend. The backend is injected so
//! tests can run against [`MemoryBackend`] and the CLI against
//! [`FileBackend`].

pub mod backend;
pub mod error;
pub mod reports;
pub mod seed;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::StoreError;
pub use reports::ReportStore;

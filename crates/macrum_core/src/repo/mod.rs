//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the raw storage contract used by the persistence layer.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repositories only deal in opaque strings; JSON encoding lives in
//!   `crate::persistence`.

pub mod kv_repo;

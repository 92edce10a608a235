//! In-memory profile caching.
//!
//! This module provides the `ProfileCache`, a process-wide key/value store
//! for decoded profiles. Entries expire five minutes after insertion and
//! are purged lazily by the lookup that discovers them.
//!
//! The cache has no capacity bound and no per-entry eviction; the host can
//! register a `MemoryPressureHook` to drop the whole cache when the
//! operating system signals memory pressure.

pub mod manager;

pub use manager::{MemoryPressureHook, ProfileCache};

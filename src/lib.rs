//! Client-side data access for a GitHub-style user directory.
//!
//! This crate wraps the remote user-directory API in three operations —
//! fetch a single profile, fetch a page of a relationship list
//! (followers/following), and search users — and shortens repeat access
//! with an expiring in-memory profile cache.
//!
//! The pieces fit together like this:
//!
//! - [`models`]: immutable value types decoded from API responses.
//! - [`cache`]: the [`ProfileCache`], a TTL-bounded map shared across the
//!   process, plus the [`MemoryPressureHook`] the host registers to drop
//!   it under memory pressure.
//! - [`api`]: the [`ApiClient`] performing the three remote operations.
//!   The profile fetch consults and re-populates the cache; list and
//!   search fetches never touch it.
//! - [`list`]: the [`ListCoordinator`] owning pagination and debounced
//!   search state for one relationship list. Fetches run on background
//!   tasks; their completions are marshaled back to the owner through a
//!   channel and applied in `pump`/`process_next`.
//!
//! The presentation layer is a consumer of this crate: it constructs the
//! cache and client once at startup, hands clones to the views that need
//! them, and renders whatever the coordinator's `visible_rows` returns.

pub mod api;
pub mod cache;
pub mod config;
pub mod list;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use cache::{MemoryPressureHook, ProfileCache};
pub use config::Config;
pub use list::ListCoordinator;
pub use models::{RelationshipKind, SearchResponse, UserProfile, UserSummary};

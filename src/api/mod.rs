//! REST API client module for the user-directory service.
//!
//! This module provides the `ApiClient` for fetching user profiles,
//! relationship-list pages, and search results.
//!
//! Every operation resolves exactly once to either a decoded value or a
//! typed `ApiError`; nothing here retries. Only the profile fetch touches
//! the shared `ProfileCache`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

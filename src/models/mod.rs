//! Data models for user-directory entities.
//!
//! This module contains the value types decoded from API responses:
//!
//! - `UserProfile`: a full profile from the user endpoint
//! - `UserSummary`: the lightweight row shape used by relationship lists
//!   and search results
//! - `SearchResponse`: the search endpoint's result envelope
//! - `RelationshipKind`: which relationship list an operation targets
//!
//! All of these are immutable once decoded; profile and summary equality
//! is defined by `login` alone.

pub mod user;

pub use user::{RelationshipKind, SearchResponse, UserProfile, UserSummary};

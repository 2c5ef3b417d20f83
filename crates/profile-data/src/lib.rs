//! # Profile Data Crate
//!
//! Domain types shared by every other crate in the workspace.
//!
//! ## Main Components
//!
//! - **types**: `Candidate`, `CandidateFilter`, decision and tab types
//! - **normalize**: turn any backend response variant into canonical types
//! - **placeholder**: the static candidate set used when the backend is unavailable
//! - **error**: error types for normalization
//!
//! ## Example Usage
//!
//! ```ignore
//! use profile_data::normalize::candidates_from_page;
//!
//! let page: serde_json::Value = response.json().await?;
//! let candidates = candidates_from_page(&page, Some("https://api.example.com"))?;
//! ```

pub mod error;
pub mod normalize;
pub mod placeholder;
pub mod types;

pub use error::{ProfileDataError, Result};
pub use placeholder::placeholder_candidates;
pub use types::{
    // Type aliases
    ProfileId,
    UserId,
    // Core types
    Candidate,
    CandidateFilter,
    Decision,
    MatchRecord,
    // Enums
    DecisionKind,
    DecisionOutcome,
    SwipeDirection,
    Tab,
};

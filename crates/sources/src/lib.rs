//! # Sources Crate
//!
//! This crate implements the candidate sources the queue pulls from.
//!
//! ## Components
//!
//! ### DiscoverSource
//! `GET /api/profiles`, filtered server-side by city, university and
//! interests.
//!
//! ### IncomingLikesSource
//! `GET /api/profiles/incoming-likes`: people who liked the viewer first.
//!
//! ### StaticSource / FallbackSource
//! A fixed placeholder list, and a wrapper that serves it whenever the
//! primary source fails on the first page.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CandidateQuery, CandidateSource, DiscoverSource, FallbackSource, StaticSource};
//!
//! let discover = FallbackSource::new(DiscoverSource::new(client), StaticSource::placeholder());
//! let candidates = discover.fetch(&CandidateQuery::new(Some(viewer_id), filter, 50)).await?;
//! ```

pub mod discover;
pub mod fallback;
pub mod incoming;
pub mod placeholder;
pub mod types;

// Re-export commonly used types
pub use discover::DiscoverSource;
pub use fallback::FallbackSource;
pub use incoming::IncomingLikesSource;
pub use placeholder::StaticSource;
pub use types::{CandidateQuery, CandidateSource, SourceError};

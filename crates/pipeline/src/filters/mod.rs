//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_decided;
pub mod city;
pub mod interests;
pub mod university;

// Re-export for convenience
pub use already_decided::AlreadyDecidedFilter;
pub use city::CityFilter;
pub use interests::InterestsFilter;
pub use university::UniversityFilter;

/// Compares two display strings ignoring case and surrounding whitespace.
pub(crate) fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

//! Client-side filtering of the candidate queue.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - QueueContext, the per-epoch input the filters read
//!
//! ## Architecture
//! The queue's `available` list is computed by running the raw candidate
//! cache through the pipeline on every read:
//! 1. City, university and interest filters apply the viewer's criteria
//!    (the backend filters too, but the static fallback set does not)
//! 2. AlreadyDecidedFilter drops ids decided in this epoch
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, QueueContext};
//!
//! let pipeline = FilterPipeline::standard();
//! let context = QueueContext::new(filter).with_decided(decided_ids);
//! let available = pipeline.apply(candidates, &context)?;
//! ```

pub mod context;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use context::QueueContext;
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;

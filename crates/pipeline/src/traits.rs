//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to the candidate queue.

use crate::context::QueueContext;
use anyhow::Result;
use profile_data::Candidate;

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows a pipeline to be shared by the controller and
///   its background fetches
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - Filters must preserve the relative order of the candidates they keep;
///   the queue cursor indexes into their output
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - Active filter and the ids decided in this epoch
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates
    /// * `Err` - If filtering fails
    fn apply(&self, candidates: Vec<Candidate>, context: &QueueContext) -> Result<Vec<Candidate>>;
}

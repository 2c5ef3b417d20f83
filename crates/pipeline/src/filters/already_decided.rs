//! Filter to remove candidates the viewer already liked or passed.
//!
//! This is what keeps a decided candidate from ever coming back within
//! the same epoch, so it runs last: the other filters never see ids that
//! are about to be dropped anyway.

use crate::context::QueueContext;
use crate::traits::Filter;
use anyhow::Result;
use profile_data::Candidate;

/// Removes candidates whose id is in the epoch's decided-set.
///
/// ## Algorithm
/// Uses the HashSet in QueueContext.decided_ids for O(1) lookups.
pub struct AlreadyDecidedFilter;

impl Filter for AlreadyDecidedFilter {
    fn name(&self) -> &str {
        "AlreadyDecidedFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &QueueContext) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| !context.decided_ids.contains(&candidate.id))
            .collect();
        Ok(filtered)
    }
}

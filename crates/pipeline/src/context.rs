//! Per-epoch state the filters read.

use profile_data::{CandidateFilter, ProfileId};
use std::collections::HashSet;

/// What the filters need to know about the current epoch.
#[derive(Debug, Clone, Default)]
pub struct QueueContext {
    pub filter: CandidateFilter,
    /// Ids liked or passed since the epoch began
    pub decided_ids: HashSet<ProfileId>,
}

impl QueueContext {
    pub fn new(filter: CandidateFilter) -> Self {
        Self {
            filter,
            decided_ids: HashSet::new(),
        }
    }

    pub fn with_decided<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ProfileId>,
    {
        self.decided_ids.extend(ids);
        self
    }
}

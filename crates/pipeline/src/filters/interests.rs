//! Filter to keep candidates sharing at least one selected interest.
//!
//! A candidate passes when any of the selected tags appears among its
//! interests; with no tags selected the filter is a no-op.

use super::same_text;
use crate::context::QueueContext;
use crate::traits::Filter;
use anyhow::Result;
use profile_data::Candidate;

pub struct InterestsFilter;

impl Filter for InterestsFilter {
    fn name(&self) -> &str {
        "InterestsFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &QueueContext) -> Result<Vec<Candidate>> {
        let wanted = &context.filter.interests;
        if wanted.is_empty() {
            return Ok(candidates);
        }

        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                wanted.iter().any(|tag| {
                    candidate.interests.contains(tag)
                        || candidate.interests.iter().any(|own| same_text(own, tag))
                })
            })
            .collect();
        Ok(filtered)
    }
}

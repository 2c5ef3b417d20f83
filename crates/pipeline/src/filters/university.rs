//! Keep only candidates from the selected university.

use super::same_text;
use crate::context::QueueContext;
use crate::traits::Filter;
use anyhow::Result;
use profile_data::Candidate;

pub struct UniversityFilter;

impl Filter for UniversityFilter {
    fn name(&self) -> &str {
        "UniversityFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &QueueContext) -> Result<Vec<Candidate>> {
        let Some(university) = context.filter.university.as_deref() else {
            return Ok(candidates);
        };
        Ok(candidates
            .into_iter()
            .filter(|candidate| same_text(&candidate.university, university))
            .collect())
    }
}

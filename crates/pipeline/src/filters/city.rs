//! Keep only candidates from the selected city.

use super::same_text;
use crate::context::QueueContext;
use crate::traits::Filter;
use anyhow::Result;
use profile_data::Candidate;

pub struct CityFilter;

impl Filter for CityFilter {
    fn name(&self) -> &str {
        "CityFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &QueueContext) -> Result<Vec<Candidate>> {
        let Some(city) = context.filter.city.as_deref() else {
            return Ok(candidates);
        };
        Ok(candidates
            .into_iter()
            .filter(|candidate| same_text(&candidate.city, city))
            .collect())
    }
}

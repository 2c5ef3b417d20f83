//! Static source over a fixed candidate list.

use crate::types::{CandidateQuery, CandidateSource, SourceError};
use async_trait::async_trait;
use profile_data::{Candidate, placeholder_candidates};

/// Serves a fixed list, paged by `query.page` / `query.size`.
#[derive(Debug, Clone)]
pub struct StaticSource {
    candidates: Vec<Candidate>,
}

impl StaticSource {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// The built-in placeholder profiles.
    pub fn placeholder() -> Self {
        Self::new(placeholder_candidates())
    }
}

#[async_trait]
impl CandidateSource for StaticSource {
    fn name(&self) -> &str {
        "StaticSource"
    }

    async fn fetch(&self, query: &CandidateQuery) -> Result<Vec<Candidate>, SourceError> {
        let size = query.size.max(1) as usize;
        let start = (query.page as usize).saturating_mul(size);
        Ok(self
            .candidates
            .iter()
            .skip(start)
            .take(size)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_data::CandidateFilter;

    #[tokio::test]
    async fn test_static_source_pages() {
        let source = StaticSource::placeholder();
        let query = CandidateQuery::new(None, CandidateFilter::new(), 5);

        let first = source.fetch(&query).await.unwrap();
        let second = source.fetch(&query.clone().page(1)).await.unwrap();
        let third = source.fetch(&query.page(2)).await.unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 3);
        assert!(third.is_empty());
    }
}

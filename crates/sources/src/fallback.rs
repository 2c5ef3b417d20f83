//! Degrade a failing source to a static list.
//!
//! A candidate fetch failure must never block the swipe screen: when the
//! primary source errors on the first page, the fallback list is served
//! instead. Failures on later pages just end pagination.

use crate::types::{CandidateQuery, CandidateSource, SourceError};
use async_trait::async_trait;
use profile_data::Candidate;
use tracing::warn;

pub struct FallbackSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackSource<P, F>
where
    P: CandidateSource,
    F: CandidateSource,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P, F> CandidateSource for FallbackSource<P, F>
where
    P: CandidateSource,
    F: CandidateSource,
{
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn fetch(&self, query: &CandidateQuery) -> Result<Vec<Candidate>, SourceError> {
        match self.primary.fetch(query).await {
            Ok(candidates) => Ok(candidates),
            Err(err) if query.page == 0 => {
                warn!(
                    "{} failed, serving {} instead: {}",
                    self.primary.name(),
                    self.fallback.name(),
                    err
                );
                self.fallback.fetch(query).await
            }
            Err(err) => {
                warn!(
                    "{} failed on page {}, treating as last page: {}",
                    self.primary.name(),
                    query.page,
                    err
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::StaticSource;
    use profile_data::CandidateFilter;

    struct Failing;

    #[async_trait]
    impl CandidateSource for Failing {
        fn name(&self) -> &str {
            "Failing"
        }

        async fn fetch(&self, _query: &CandidateQuery) -> Result<Vec<Candidate>, SourceError> {
            Err(SourceError::NoViewer {
                source_name: "Failing".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_first_page_failure_serves_fallback() {
        let source = FallbackSource::new(Failing, StaticSource::placeholder());
        let query = CandidateQuery::new(None, CandidateFilter::new(), 50);

        let candidates = source.fetch(&query).await.unwrap();

        assert_eq!(candidates.len(), 8);
    }

    #[tokio::test]
    async fn test_later_page_failure_is_empty() {
        let source = FallbackSource::new(Failing, StaticSource::placeholder());
        let query = CandidateQuery::new(Some(1), CandidateFilter::new(), 50).page(1);

        assert!(source.fetch(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_primary_success_is_passed_through() {
        let primary = StaticSource::new(vec![Candidate::new(42, "Only")]);
        let source = FallbackSource::new(primary, StaticSource::placeholder());
        let query = CandidateQuery::new(Some(1), CandidateFilter::new(), 50);

        let candidates = source.fetch(&query).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, 42);
    }
}

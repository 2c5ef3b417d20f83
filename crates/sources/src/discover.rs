//! Discover source: everyone matching the viewer's filter.
//!
//! Backed by `GET /api/profiles`; the backend already excludes the viewer
//! and people they decided on in earlier sessions.

use crate::types::{CandidateQuery, CandidateSource, SourceError};
use api_client::ApiClient;
use async_trait::async_trait;
use profile_data::Candidate;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct DiscoverSource {
    client: ApiClient,
}

impl DiscoverSource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CandidateSource for DiscoverSource {
    fn name(&self) -> &str {
        "DiscoverSource"
    }

    #[instrument(skip(self, query), fields(page = query.page))]
    async fn fetch(&self, query: &CandidateQuery) -> Result<Vec<Candidate>, SourceError> {
        let viewer_id = query.viewer_id.ok_or_else(|| SourceError::NoViewer {
            source_name: self.name().to_string(),
        })?;

        let candidates = self
            .client
            .fetch_profiles(viewer_id, &query.filter, query.page, query.size)
            .await?;
        debug!("Discover returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

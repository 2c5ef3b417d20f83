//! Incoming-likes source: people who already liked the viewer.
//!
//! The backend ignores city/university/interest parameters here; the
//! queue's own filter pipeline still applies them client-side.

use crate::types::{CandidateQuery, CandidateSource, SourceError};
use api_client::ApiClient;
use async_trait::async_trait;
use profile_data::Candidate;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct IncomingLikesSource {
    client: ApiClient,
}

impl IncomingLikesSource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CandidateSource for IncomingLikesSource {
    fn name(&self) -> &str {
        "IncomingLikesSource"
    }

    #[instrument(skip(self, query), fields(page = query.page))]
    async fn fetch(&self, query: &CandidateQuery) -> Result<Vec<Candidate>, SourceError> {
        let viewer_id = query.viewer_id.ok_or_else(|| SourceError::NoViewer {
            source_name: self.name().to_string(),
        })?;

        let candidates = self
            .client
            .fetch_incoming_likes(viewer_id, query.page, query.size)
            .await?;
        debug!("Incoming likes returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

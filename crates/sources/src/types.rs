//! The Candidate Source contract.

use api_client::ApiClientError;
use async_trait::async_trait;
use profile_data::{Candidate, CandidateFilter, UserId};
use thiserror::Error;

/// Everything a source needs to produce one page of candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    /// `None` when the host platform did not tell us who the viewer is
    pub viewer_id: Option<UserId>,
    pub filter: CandidateFilter,
    pub page: u32,
    pub size: u32,
}

impl CandidateQuery {
    pub fn new(viewer_id: Option<UserId>, filter: CandidateFilter, size: u32) -> Self {
        Self {
            viewer_id,
            filter,
            page: 0,
            size,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No viewer id available for {source_name}")]
    NoViewer { source_name: String },

    #[error(transparent)]
    Api(#[from] ApiClientError),
}

/// Supplies an ordered list of candidates for a query.
///
/// The queue fetches through this trait only; it never knows whether the
/// list came from the network or the static set.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Returns the name of this source (for logging)
    fn name(&self) -> &str;

    async fn fetch(&self, query: &CandidateQuery) -> Result<Vec<Candidate>, SourceError>;
}

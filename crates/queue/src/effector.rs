//! The Decision Effector: sends a like/pass to wherever it has to go and
//! reports whether it produced a mutual match.
//!
//! The controller only sees `submit_decision`. Errors returned here are
//! logged by the controller and treated as "not matched"; they never stop
//! the queue from advancing.

use api_client::{ApiClient, ApiClientError};
use async_trait::async_trait;
use profile_data::{DecisionKind, ProfileId, Tab, UserId};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// One decision as the effector sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitRequest {
    pub tab: Tab,
    pub candidate_id: ProfileId,
    /// Owner of the candidate profile, used by the incoming-likes endpoint
    pub target_user_id: UserId,
    pub kind: DecisionKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitResponse {
    pub matched: bool,
}

#[derive(Error, Debug)]
pub enum EffectorError {
    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error("Decision rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait DecisionEffector: Send + Sync {
    async fn submit_decision(&self, request: &SubmitRequest) -> Result<SubmitResponse, EffectorError>;
}

// =============================================================================
// Backend effector
// =============================================================================

/// Submits decisions to the backend on behalf of `viewer_id`.
///
/// | Tab            | Like                      | Pass                      |
/// |----------------|---------------------------|---------------------------|
/// | Discover       | `POST /profiles/{id}/like` | `POST /profiles/{id}/pass` |
/// | IncomingLikes  | respond `accept` (match)  | respond `decline`         |
#[derive(Debug, Clone)]
pub struct ApiDecisionEffector {
    client: ApiClient,
    viewer_id: UserId,
}

impl ApiDecisionEffector {
    pub fn new(client: ApiClient, viewer_id: UserId) -> Self {
        Self { client, viewer_id }
    }
}

#[async_trait]
impl DecisionEffector for ApiDecisionEffector {
    #[instrument(skip(self, request), fields(candidate_id = request.candidate_id, kind = %request.kind))]
    async fn submit_decision(&self, request: &SubmitRequest) -> Result<SubmitResponse, EffectorError> {
        let matched = match (request.tab, request.kind) {
            (Tab::Discover, DecisionKind::Like) => {
                let response = self.client.like(self.viewer_id, request.candidate_id).await?;
                response.matched
            }
            (Tab::Discover, DecisionKind::Pass) => {
                self.client.pass(self.viewer_id, request.candidate_id).await?;
                false
            }
            (Tab::IncomingLikes, kind) => {
                self.client
                    .respond_to_like(self.viewer_id, request.target_user_id, kind)
                    .await?;
                // They already liked us, so accepting is mutual by definition.
                kind == DecisionKind::Like
            }
        };

        debug!("Backend accepted {} (matched: {})", request.kind, matched);
        Ok(SubmitResponse { matched })
    }
}

// =============================================================================
// Offline effector
// =============================================================================

/// Used when the host gave us no viewer id: nothing leaves the process and
/// every Like is kept as a local match.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineEffector;

#[async_trait]
impl DecisionEffector for OfflineEffector {
    async fn submit_decision(&self, request: &SubmitRequest) -> Result<SubmitResponse, EffectorError> {
        info!(
            "Offline {} on profile {}",
            request.kind, request.candidate_id
        );
        Ok(SubmitResponse {
            matched: request.kind == DecisionKind::Like,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: DecisionKind) -> SubmitRequest {
        SubmitRequest {
            tab: Tab::Discover,
            candidate_id: 1,
            target_user_id: 1,
            kind,
        }
    }

    #[tokio::test]
    async fn test_offline_like_is_local_match() {
        let like = OfflineEffector.submit_decision(&request(DecisionKind::Like)).await.unwrap();
        let pass = OfflineEffector.submit_decision(&request(DecisionKind::Pass)).await.unwrap();

        assert!(like.matched);
        assert!(!pass.matched);
    }
}

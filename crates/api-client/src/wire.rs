//! Request and response bodies of the decision endpoints.
//!
//! Listing endpoints go through `profile_data::normalize` instead, because
//! their shapes vary between backend versions.

use profile_data::UserId;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/profiles/{id}/like` and `/pass`.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRequest {
    pub user_id: UserId,
}

/// Body of `POST /api/likes/respond`.
#[derive(Debug, Clone, Serialize)]
pub struct RespondRequest {
    #[serde(rename = "targetUserId")]
    pub target_user_id: UserId,
    pub action: &'static str,
}

/// Response of the like endpoint. Only `matched` matters to the queue.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LikeResponse {
    #[serde(default)]
    pub matched: bool,
    #[serde(default)]
    pub match_id: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error envelope. FastAPI reports `detail`, older builds used `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or_else(|| {
            self.detail.map(|detail| match detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
        })
    }
}

//! # Queue Crate
//!
//! The candidate queue of a swipe session and the collaborators it drives.
//!
//! ## Main Components
//!
//! - **controller**: `QueueController`, the decide / advance state machine
//! - **effector**: where decisions are sent (`ApiDecisionEffector`, `OfflineEffector`)
//! - **animator**: the timing gate between a decision and the next candidate
//! - **matches**: the sink mutual matches are handed to
//! - **store**: the injected key/value store (`MemoryStore`, `JsonFileStore`)
//! - **config**: page size and timeouts
//!
//! ## Example Usage
//!
//! ```ignore
//! use queue::{Collaborators, QueueConfig, QueueController};
//!
//! let controller = QueueController::new(collaborators, Some(viewer_id), QueueConfig::default());
//! controller.refresh().await?;
//! controller.like_current().await;
//! ```

pub mod animator;
pub mod config;
pub mod controller;
pub mod effector;
pub mod matches;
pub mod store;

pub use animator::{TimedAnimator, TransitionAnimator};
pub use config::QueueConfig;
pub use controller::{
    Collaborators, DecideOutcome, FetchOutcome, IgnoreReason, QueueController, QueueSnapshot,
};
pub use effector::{
    ApiDecisionEffector, DecisionEffector, EffectorError, OfflineEffector, SubmitRequest,
    SubmitResponse,
};
pub use matches::{MatchSink, StoredMatches};
pub use store::{JsonFileStore, MemoryStore, ProfileStore, StoreError};

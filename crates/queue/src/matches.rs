//! The Match collaborator.
//!
//! The queue hands a candidate over when a Like comes back mutual and has
//! no further obligation to it.

use crate::store::{ProfileStore, load_json, save_json};
use anyhow::{Context, Result};
use async_trait::async_trait;
use profile_data::Candidate;
use std::sync::Arc;
use tracing::info;

/// Store key of the locally kept match list
pub const MATCHES_KEY: &str = "matched_profiles";

#[async_trait]
pub trait MatchSink: Send + Sync {
    async fn add_match(&self, candidate: &Candidate) -> Result<()>;
}

/// Appends matched candidates to a list kept in a `ProfileStore`.
///
/// This is the local contacts list shown when the backend's matches
/// endpoint is unreachable.
#[derive(Clone)]
pub struct StoredMatches {
    store: Arc<dyn ProfileStore>,
}

impl StoredMatches {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Locally known matches, oldest first.
    pub fn list(&self) -> Result<Vec<Candidate>> {
        let matches: Option<Vec<Candidate>> =
            load_json(self.store.as_ref(), MATCHES_KEY).context("Failed to read local matches")?;
        Ok(matches.unwrap_or_default())
    }
}

#[async_trait]
impl MatchSink for StoredMatches {
    async fn add_match(&self, candidate: &Candidate) -> Result<()> {
        let mut matches = self.list()?;
        if matches.iter().any(|m| m.id == candidate.id) {
            return Ok(());
        }
        matches.push(candidate.clone());
        save_json(self.store.as_ref(), MATCHES_KEY, &matches)
            .context("Failed to save local matches")?;
        info!("Stored match with {} ({} total)", candidate.name, matches.len());
        Ok(())
    }
}

//! # Queue Controller
//!
//! Owns the working queue of one swipe session and sequences every
//! decision through its collaborators:
//! 1. Guard against re-entry (a transition or a submission in flight)
//! 2. Submit the decision to the effector, bounded by a timeout
//! 3. Record the decided id and compute the pending cursor
//! 4. Hand mutual matches to the match sink
//! 5. Await the transition animator, bounded by a timeout
//! 6. Commit the pending cursor
//!
//! State lives behind a std `Mutex` that is never held across an await.
//! Every filter change or tab switch starts a new epoch; results that
//! arrive for an older epoch are discarded.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use profile_data::{
    Candidate, CandidateFilter, Decision, DecisionKind, DecisionOutcome, ProfileId, Tab, UserId,
};
use pipeline::{FilterPipeline, QueueContext};
use sources::{CandidateQuery, CandidateSource, SourceError};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::animator::TransitionAnimator;
use crate::config::QueueConfig;
use crate::effector::{DecisionEffector, SubmitRequest};
use crate::matches::MatchSink;
use crate::store::{ProfileStore, load_json, save_json};

/// Store key of the last applied filter
pub const FILTER_KEY: &str = "queue.filter";

/// Everything the controller talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub discover: Arc<dyn CandidateSource>,
    pub incoming_likes: Arc<dyn CandidateSource>,
    pub effector: Arc<dyn DecisionEffector>,
    pub animator: Arc<dyn TransitionAnimator>,
    pub matches: Arc<dyn MatchSink>,
    pub store: Arc<dyn ProfileStore>,
}

/// Why a decision was not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    TransitionActive,
    Submitting,
    EmptyQueue,
}

/// Result of one `decide` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecideOutcome {
    /// Guarded out; nothing was submitted.
    Ignored(IgnoreReason),
    /// Submitted and its cursor advance committed.
    Completed(Decision),
    /// Submitted, but the epoch changed before the cursor advance was
    /// committed. If the epoch ended during submission nothing was
    /// recorded; if it ended during the transition the old epoch's
    /// decided-set (and any match hand-off) already saw it.
    Stale(Decision),
}

impl DecideOutcome {
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            DecideOutcome::Ignored(_) => None,
            DecideOutcome::Completed(decision) | DecideOutcome::Stale(decision) => Some(decision),
        }
    }
}

/// Result of a fetch into the candidate cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { fetched: usize, available: usize },
    /// The epoch changed while the fetch was in flight.
    Stale,
}

/// Read-only view of the queue for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub tab: Tab,
    pub epoch: u64,
    /// The displayed candidate. During a transition this is the candidate
    /// being decided, which is no longer part of `available`.
    pub current: Option<Candidate>,
    pub available_len: usize,
    pub cursor: usize,
    pub decided_len: usize,
    pub transition_active: bool,
    pub submitting: bool,
    pub filter: CandidateFilter,
}

/// How far a decision got before its future finished or was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecisionPhase {
    Submitting,
    Transition,
    Done,
}

/// Owns a decision's claim on the queue.
///
/// If the `decide` future is dropped part-way, `Drop` releases the claim:
/// a dropped submission clears `submitting`, a dropped transition commits
/// its pending cursor. Either only applies within the claiming epoch.
struct DecisionGuard<'a> {
    controller: &'a QueueController,
    epoch: u64,
    phase: DecisionPhase,
}

impl DecisionGuard<'_> {
    /// Finish the current phase. Returns true when a pending cursor was
    /// committed.
    fn settle(&mut self) -> bool {
        let committed = match self.phase {
            DecisionPhase::Submitting => {
                self.controller.release_submission(self.epoch);
                false
            }
            DecisionPhase::Transition => self.controller.commit_transition(self.epoch),
            DecisionPhase::Done => false,
        };
        self.phase = DecisionPhase::Done;
        committed
    }
}

impl Drop for DecisionGuard<'_> {
    fn drop(&mut self) {
        if self.phase != DecisionPhase::Done {
            warn!(
                "Decision of epoch {} dropped while {:?}, releasing the queue",
                self.epoch, self.phase
            );
            self.settle();
        }
    }
}

#[derive(Debug)]
struct PendingTransition {
    candidate: Candidate,
    pending_cursor: usize,
}

#[derive(Debug)]
struct QueueState {
    tab: Tab,
    epoch: u64,
    all_candidates: Vec<Candidate>,
    filter: CandidateFilter,
    decided_ids: HashSet<ProfileId>,
    cursor: usize,
    next_page: u32,
    exhausted: bool,
    submitting: bool,
    transition: Option<PendingTransition>,
}

impl QueueState {
    fn new(filter: CandidateFilter) -> Self {
        Self {
            tab: Tab::default(),
            epoch: 0,
            all_candidates: Vec::new(),
            filter,
            decided_ids: HashSet::new(),
            cursor: 0,
            next_page: 0,
            exhausted: false,
            submitting: false,
            transition: None,
        }
    }

    /// Start a new epoch: forget decisions, rewind the cursor and drop any
    /// in-flight submission or pending commit.
    fn begin_epoch(&mut self) {
        self.epoch += 1;
        self.decided_ids.clear();
        self.cursor = 0;
        self.next_page = 0;
        self.exhausted = false;
        self.submitting = false;
        self.transition = None;
    }
}

pub struct QueueController {
    collaborators: Collaborators,
    pipeline: FilterPipeline,
    viewer_id: Option<UserId>,
    config: QueueConfig,
    state: Mutex<QueueState>,
}

impl QueueController {
    /// Build a controller on the discover tab.
    ///
    /// The last filter saved in the store is restored; a missing or
    /// unreadable value starts from an empty filter.
    pub fn new(collaborators: Collaborators, viewer_id: Option<UserId>, config: QueueConfig) -> Self {
        let filter = match load_json::<CandidateFilter>(collaborators.store.as_ref(), FILTER_KEY) {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring saved filter: {}", e);
                CandidateFilter::default()
            }
        };

        Self {
            collaborators,
            pipeline: FilterPipeline::standard(),
            viewer_id,
            config,
            state: Mutex::new(QueueState::new(filter)),
        }
    }

    pub fn viewer_id(&self) -> Option<UserId> {
        self.viewer_id
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    // =========================================================================
    // Decisions
    // =========================================================================

    pub async fn like_current(&self) -> DecideOutcome {
        self.decide(DecisionKind::Like).await
    }

    pub async fn pass_current(&self) -> DecideOutcome {
        self.decide(DecisionKind::Pass).await
    }

    /// Like or pass the current candidate.
    ///
    /// ## Algorithm
    /// 1. Under the lock: reject if a transition is active, a submission is
    ///    in flight, or the queue is empty; otherwise mark submitting
    /// 2. Submit without the lock. Errors and timeouts count as no match
    /// 3. Under the lock: drop the result if the epoch moved on; otherwise
    ///    add the id to the decided-set and park the next cursor in a
    ///    pending transition
    /// 4. Hand a mutual match to the match sink
    /// 5. Play the transition (bounded by `transition_timeout`)
    /// 6. Under the lock: commit the pending cursor if still in the epoch
    ///
    /// Dropping the returned future never wedges the queue, see
    /// `DecisionGuard`.
    #[instrument(skip(self))]
    pub async fn decide(&self, kind: DecisionKind) -> DecideOutcome {
        // Phase 1: guard and claim
        let (epoch, tab, candidate) = {
            let mut state = self.lock();
            if state.transition.is_some() {
                debug!("Ignoring {}: transition active", kind);
                return DecideOutcome::Ignored(IgnoreReason::TransitionActive);
            }
            if state.submitting {
                debug!("Ignoring {}: submission in flight", kind);
                return DecideOutcome::Ignored(IgnoreReason::Submitting);
            }
            let available = self.available_in(&state);
            let Some(candidate) = current_in(&available, state.cursor).cloned() else {
                debug!("Ignoring {}: queue is empty", kind);
                return DecideOutcome::Ignored(IgnoreReason::EmptyQueue);
            };
            state.submitting = true;
            (state.epoch, state.tab, candidate)
        };
        let mut guard = DecisionGuard {
            controller: self,
            epoch,
            phase: DecisionPhase::Submitting,
        };

        // Phase 2: submit
        let matched = self.submit(tab, &candidate, kind).await;
        let mut decision = Decision::pending(candidate.id, kind);
        decision.outcome = if matched {
            DecisionOutcome::Matched
        } else {
            DecisionOutcome::NotMatched
        };

        // Phase 3: record
        {
            let mut state = self.lock();
            if state.epoch != epoch {
                info!(
                    "Discarding {} on {}: epoch {} ended",
                    kind, candidate.id, epoch
                );
                guard.phase = DecisionPhase::Done;
                return DecideOutcome::Stale(decision);
            }

            let position = self
                .available_in(&state)
                .iter()
                .position(|c| c.id == candidate.id)
                .unwrap_or(state.cursor);
            state.decided_ids.insert(candidate.id);
            let remaining = self.available_in(&state).len();
            // The next candidate slides into the decided one's slot.
            let pending_cursor = if position < remaining { position } else { 0 };

            debug!(
                "Decided {} on {}, pending cursor {} of {}",
                kind, candidate.id, pending_cursor, remaining
            );
            state.submitting = false;
            state.transition = Some(PendingTransition {
                candidate: candidate.clone(),
                pending_cursor,
            });
            guard.phase = DecisionPhase::Transition;
        }

        // Phase 4: match hand-off
        if decision.is_match() {
            info!("Matched with {} ({})", candidate.name, candidate.id);
            if let Err(e) = self.collaborators.matches.add_match(&candidate).await {
                warn!("Failed to record match with {}: {:#}", candidate.id, e);
            }
        }

        // Phase 5: transition
        let animation = self.collaborators.animator.play(kind.direction());
        if tokio::time::timeout(self.config.transition_timeout, animation)
            .await
            .is_err()
        {
            warn!(
                "Transition for {} did not finish within {:?}, advancing anyway",
                candidate.id, self.config.transition_timeout
            );
        }

        // Phase 6: commit
        if guard.settle() {
            DecideOutcome::Completed(decision)
        } else {
            debug!("Pending cursor of epoch {} cancelled", epoch);
            DecideOutcome::Stale(decision)
        }
    }

    /// Clear the submission claim of `epoch`, if that epoch is still live.
    fn release_submission(&self, epoch: u64) {
        let mut state = self.lock();
        if state.epoch == epoch {
            state.submitting = false;
        }
    }

    /// Move the cursor to the pending slot of `epoch`'s transition,
    /// re-clamped against the current queue. False if the epoch ended.
    fn commit_transition(&self, epoch: u64) -> bool {
        let mut state = self.lock();
        if state.epoch != epoch {
            return false;
        }
        if let Some(transition) = state.transition.take() {
            let len = self.available_in(&state).len();
            state.cursor = if transition.pending_cursor < len {
                transition.pending_cursor
            } else {
                0
            };
        }
        true
    }

    /// Submit through the effector. Never fails: errors and timeouts are
    /// logged and reported as no match, and Pass never matches.
    async fn submit(&self, tab: Tab, candidate: &Candidate, kind: DecisionKind) -> bool {
        let request = SubmitRequest {
            tab,
            candidate_id: candidate.id,
            target_user_id: candidate.user_id,
            kind,
        };

        let submission = self.collaborators.effector.submit_decision(&request);
        match tokio::time::timeout(self.config.submit_timeout, submission).await {
            Ok(Ok(response)) => response.matched && kind == DecisionKind::Like,
            Ok(Err(e)) => {
                warn!("Submitting {} on {} failed: {}", kind, candidate.id, e);
                false
            }
            Err(_) => {
                warn!(
                    "Submitting {} on {} timed out after {:?}",
                    kind, candidate.id, self.config.submit_timeout
                );
                false
            }
        }
    }

    // =========================================================================
    // Filters and tabs
    // =========================================================================

    /// Replace the filter and start a new epoch against the cached
    /// candidates. Fetching for the new filter is left to the caller, see
    /// `set_filter_and_refresh`.
    pub fn set_filter(&self, filter: CandidateFilter) {
        {
            let mut state = self.lock();
            state.filter = filter.clone();
            state.begin_epoch();
            info!("Filter changed, epoch {}", state.epoch);
        }

        if let Err(e) = save_json(self.collaborators.store.as_ref(), FILTER_KEY, &filter) {
            warn!("Failed to save filter: {}", e);
        }
    }

    /// `set_filter`, then re-fetch in the background.
    ///
    /// Returns as soon as the filter is applied; the fetch result is
    /// discarded if another epoch starts first.
    pub fn set_filter_and_refresh(
        self: &Arc<Self>,
        filter: CandidateFilter,
    ) -> JoinHandle<Result<FetchOutcome, SourceError>> {
        self.set_filter(filter);
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.refresh().await })
    }

    pub fn reset_filters(&self) {
        self.set_filter(CandidateFilter::default());
    }

    /// Switch between discover and incoming likes. Always starts a fresh
    /// epoch with an empty cache; call `refresh` to populate it.
    pub fn switch_tab(&self, tab: Tab) {
        let mut state = self.lock();
        state.tab = tab;
        state.all_candidates.clear();
        state.begin_epoch();
        info!("Switched to {}, epoch {}", tab, state.epoch);
    }

    /// Move the cursor to `index` in the available queue.
    ///
    /// Returns false, leaving the cursor alone, while a transition is
    /// active or when `index` is out of range.
    pub fn move_to(&self, index: usize) -> bool {
        let mut state = self.lock();
        if state.transition.is_some() {
            return false;
        }
        if index >= self.available_in(&state).len() {
            return false;
        }
        state.cursor = index;
        true
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch the first page for the current epoch and replace the cache.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<FetchOutcome, SourceError> {
        let (epoch, source, query) = self.prepare_fetch(Some(0));
        let fetched = source.fetch(&query).await?;
        let count = fetched.len();

        let mut state = self.lock();
        if state.epoch != epoch {
            debug!("Discarding refresh of epoch {}", epoch);
            return Ok(FetchOutcome::Stale);
        }

        state.all_candidates = dedupe_by_id(Vec::new(), fetched);
        state.cursor = 0;
        if let Some(transition) = state.transition.as_mut() {
            transition.pending_cursor = 0;
        }
        state.next_page = 1;
        state.exhausted = count < self.config.page_size as usize;

        let available = self.available_in(&state).len();
        info!(
            "Fetched {} candidates for {}, {} available",
            count, state.tab, available
        );
        Ok(FetchOutcome::Applied {
            fetched: count,
            available,
        })
    }

    /// Fetch the next page and append the candidates not seen yet.
    ///
    /// Does nothing once a short page has been seen in this epoch.
    #[instrument(skip(self))]
    pub async fn load_more(&self) -> Result<FetchOutcome, SourceError> {
        {
            let state = self.lock();
            if state.exhausted {
                debug!("No more pages for epoch {}", state.epoch);
                return Ok(FetchOutcome::Applied {
                    fetched: 0,
                    available: self.available_in(&state).len(),
                });
            }
        }

        let (epoch, source, query) = self.prepare_fetch(None);
        let page = query.page;
        let fetched = source.fetch(&query).await?;
        let count = fetched.len();

        let mut state = self.lock();
        if state.epoch != epoch {
            debug!("Discarding page {} of epoch {}", page, epoch);
            return Ok(FetchOutcome::Stale);
        }

        let existing = std::mem::take(&mut state.all_candidates);
        state.all_candidates = dedupe_by_id(existing, fetched);
        state.next_page = page + 1;
        state.exhausted = count < self.config.page_size as usize;

        let available = self.available_in(&state).len();
        info!(
            "Loaded page {} ({} candidates), {} available",
            page, count, available
        );
        Ok(FetchOutcome::Applied {
            fetched: count,
            available,
        })
    }

    /// Epoch, source and query for a fetch. `page` defaults to the next
    /// unfetched page.
    fn prepare_fetch(&self, page: Option<u32>) -> (u64, Arc<dyn CandidateSource>, CandidateQuery) {
        let state = self.lock();
        let source = match state.tab {
            Tab::Discover => Arc::clone(&self.collaborators.discover),
            Tab::IncomingLikes => Arc::clone(&self.collaborators.incoming_likes),
        };
        let query = CandidateQuery::new(self.viewer_id, state.filter.clone(), self.config.page_size)
            .page(page.unwrap_or(state.next_page));
        (state.epoch, source, query)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.lock();
        let available = self.available_in(&state);
        let cursor = state.cursor.min(available.len().saturating_sub(1));
        let current = match &state.transition {
            Some(transition) => Some(transition.candidate.clone()),
            None => current_in(&available, state.cursor).cloned(),
        };

        QueueSnapshot {
            tab: state.tab,
            epoch: state.epoch,
            current,
            available_len: available.len(),
            cursor,
            decided_len: state.decided_ids.len(),
            transition_active: state.transition.is_some(),
            submitting: state.submitting,
            filter: state.filter.clone(),
        }
    }

    /// The available queue: cached candidates minus filtered-out minus
    /// decided.
    pub fn available(&self) -> Vec<Candidate> {
        let state = self.lock();
        self.available_in(&state)
    }

    pub fn is_decided(&self, id: ProfileId) -> bool {
        self.lock().decided_ids.contains(&id)
    }

    fn available_in(&self, state: &QueueState) -> Vec<Candidate> {
        let context = QueueContext::new(state.filter.clone())
            .with_decided(state.decided_ids.iter().copied());
        match self.pipeline.apply(state.all_candidates.clone(), &context) {
            Ok(available) => available,
            Err(e) => {
                warn!("Filter pipeline failed, showing an empty queue: {:#}", e);
                Vec::new()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Candidate at `cursor`, clamped into range.
fn current_in(available: &[Candidate], cursor: usize) -> Option<&Candidate> {
    if available.is_empty() {
        return None;
    }
    available.get(cursor.min(available.len() - 1))
}

/// Append `incoming` to `existing`, skipping ids already present.
fn dedupe_by_id(mut existing: Vec<Candidate>, incoming: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<ProfileId> = existing.iter().map(|c| c.id).collect();
    for candidate in incoming {
        if seen.insert(candidate.id) {
            existing.push(candidate);
        }
    }
    existing
}

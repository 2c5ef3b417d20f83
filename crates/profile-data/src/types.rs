//! Core domain types for the candidate queue.
//!
//! Everything that crosses a crate boundary lives here: the canonical
//! `Candidate` shape that the normalization layer produces, the viewer's
//! filter, and the small value types describing a like/pass decision.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a profile record (the backend's `id`)
pub type ProfileId = u64;

/// Identifier of the messaging-platform user that owns a profile
pub type UserId = u64;

// =============================================================================
// Candidate
// =============================================================================

/// A profile presentable to the viewer for a like/pass decision.
///
/// Candidates are immutable for the lifetime of one queue. Tag collections
/// are ordered sets so that rendering and comparisons are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ProfileId,
    /// Owning user. Incoming-like responses are addressed by this id.
    pub user_id: UserId,
    pub name: String,
    pub age: Option<u32>,
    pub city: String,
    pub university: String,
    pub bio: String,
    pub interests: BTreeSet<String>,
    pub goals: BTreeSet<String>,
    /// Fully resolved photo URL, if the profile has one
    pub photo_url: Option<String>,
}

impl Candidate {
    /// Create a bare candidate whose owning user id equals its profile id.
    pub fn new(id: ProfileId, name: impl Into<String>) -> Self {
        Self {
            id,
            user_id: id,
            name: name.into(),
            age: None,
            city: String::new(),
            university: String::new(),
            bio: String::new(),
            interests: BTreeSet::new(),
            goals: BTreeSet::new(),
            photo_url: None,
        }
    }

    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_university(mut self, university: impl Into<String>) -> Self {
        self.university = university.into();
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goals = goals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }
}

// =============================================================================
// Filter
// =============================================================================

/// The viewer's search criteria.
///
/// Empty strings are never stored: the setters treat a blank value as
/// "no constraint", the same as a cleared field in the filter form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilter {
    pub city: Option<String>,
    pub university: Option<String>,
    pub interests: BTreeSet<String>,
}

impl CandidateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = non_blank(city.into());
        self
    }

    pub fn with_university(mut self, university: impl Into<String>) -> Self {
        self.university = non_blank(university.into());
        self
    }

    pub fn with_interest(mut self, interest: impl Into<String>) -> Self {
        if let Some(interest) = non_blank(interest.into()) {
            self.interests.insert(interest);
        }
        self
    }

    /// True when no component constrains the queue.
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.university.is_none() && self.interests.is_empty()
    }

    /// Comma-joined interests as the profiles endpoint expects them.
    pub fn interests_param(&self) -> Option<String> {
        if self.interests.is_empty() {
            None
        } else {
            Some(
                self.interests
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            )
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Decisions
// =============================================================================

/// What the viewer did with the current candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    Like,
    Pass,
}

impl DecisionKind {
    /// Swipe direction the transition effect plays in.
    pub fn direction(self) -> SwipeDirection {
        match self {
            DecisionKind::Like => SwipeDirection::Right,
            DecisionKind::Pass => SwipeDirection::Left,
        }
    }

    /// Path segment of `POST /api/profiles/{id}/{segment}`.
    pub fn path_segment(self) -> &'static str {
        match self {
            DecisionKind::Like => "like",
            DecisionKind::Pass => "pass",
        }
    }

    /// `action` value of `POST /api/likes/respond`.
    pub fn respond_action(self) -> &'static str {
        match self {
            DecisionKind::Like => "accept",
            DecisionKind::Pass => "decline",
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionKind::Like => write!(f, "like"),
            DecisionKind::Pass => write!(f, "pass"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwipeDirection::Left => write!(f, "left"),
            SwipeDirection::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionOutcome {
    Pending,
    Matched,
    NotMatched,
}

/// One submit/animate/advance cycle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub candidate_id: ProfileId,
    pub kind: DecisionKind,
    pub outcome: DecisionOutcome,
}

impl Decision {
    pub fn pending(candidate_id: ProfileId, kind: DecisionKind) -> Self {
        Self {
            candidate_id,
            kind,
            outcome: DecisionOutcome::Pending,
        }
    }

    pub fn is_match(&self) -> bool {
        self.outcome == DecisionOutcome::Matched
    }
}

// =============================================================================
// Tabs and matches
// =============================================================================

/// Which candidate list the queue is presenting. Each tab is its own epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tab {
    /// Everyone matching the filter
    #[default]
    Discover,
    /// People who already liked the viewer
    IncomingLikes,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Discover => write!(f, "discover"),
            Tab::IncomingLikes => write!(f, "incoming likes"),
        }
    }
}

/// A mutual match as reported by `GET /api/matches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: Option<u64>,
    pub profile: Candidate,
    pub matched_at: Option<String>,
}

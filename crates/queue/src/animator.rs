//! The Transition Animator: a timing gate between a decision and the
//! cursor moving on.

use async_trait::async_trait;
use profile_data::SwipeDirection;
use std::time::Duration;
use tracing::debug;

/// Duration of the like effect
pub const DEFAULT_LIKE_EFFECT: Duration = Duration::from_millis(2000);

/// Duration of the pass effect
pub const DEFAULT_PASS_EFFECT: Duration = Duration::from_millis(1500);

#[async_trait]
pub trait TransitionAnimator: Send + Sync {
    /// Resolves once the effect for `direction` has finished.
    async fn play(&self, direction: SwipeDirection);
}

/// Waits a fixed time per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedAnimator {
    right: Duration,
    left: Duration,
}

impl TimedAnimator {
    pub fn new(right: Duration, left: Duration) -> Self {
        Self { right, left }
    }

    /// No delay at all, for scripted sessions.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn duration(&self, direction: SwipeDirection) -> Duration {
        match direction {
            SwipeDirection::Right => self.right,
            SwipeDirection::Left => self.left,
        }
    }
}

impl Default for TimedAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_LIKE_EFFECT, DEFAULT_PASS_EFFECT)
    }
}

#[async_trait]
impl TransitionAnimator for TimedAnimator {
    async fn play(&self, direction: SwipeDirection) {
        let duration = self.duration(direction);
        debug!("Playing {} effect for {:?}", direction, duration);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

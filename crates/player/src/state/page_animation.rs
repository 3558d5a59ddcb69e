//! Page-turn animation gate.
//!
//! A turn holds the book in a turning state for a fixed duration. Only one
//! turn runs at a time; a request made while a page is turning is refused
//! immediately rather than queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::infrastructure::config::DEFAULT_PAGE_TURN_MS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageAnimationState {
    #[default]
    Idle,
    TurningForward,
    TurningBackward,
}

/// Shared handle to the book's page-turn state.
///
/// Clones observe and gate the same state.
#[derive(Debug, Clone)]
pub struct PageAnimator {
    state: Arc<watch::Sender<PageAnimationState>>,
    duration: Duration,
}

impl Default for PageAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_PAGE_TURN_MS))
    }
}

impl PageAnimator {
    pub fn new(duration: Duration) -> Self {
        let (tx, _rx) = watch::channel(PageAnimationState::Idle);
        Self {
            state: Arc::new(tx),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn state(&self) -> PageAnimationState {
        *self.state.borrow()
    }

    pub fn is_animating(&self) -> bool {
        self.state() != PageAnimationState::Idle
    }

    /// Observe state changes, e.g. to render the turning page.
    pub fn subscribe(&self) -> watch::Receiver<PageAnimationState> {
        self.state.subscribe()
    }

    /// Turn forward. Resolves `false` at once if a turn is already running.
    pub async fn turn_forward(&self) -> bool {
        self.turn(PageAnimationState::TurningForward).await
    }

    /// Turn backward. Resolves `false` at once if a turn is already running.
    pub async fn turn_backward(&self) -> bool {
        self.turn(PageAnimationState::TurningBackward).await
    }

    async fn turn(&self, direction: PageAnimationState) -> bool {
        let started = self.state.send_if_modified(|state| {
            if *state != PageAnimationState::Idle {
                return false;
            }
            *state = direction;
            true
        });
        if !started {
            tracing::debug!(?direction, "Page turn ignored, already animating");
            return false;
        }

        // Back to idle even if the caller stops waiting mid-turn.
        let _idle = IdleOnDrop(&self.state);
        tokio::time::sleep(self.duration).await;
        true
    }
}

struct IdleOnDrop<'a>(&'a watch::Sender<PageAnimationState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(PageAnimationState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Instant};

    #[tokio::test(start_paused = true)]
    async fn turn_lasts_configured_duration() {
        let animator = PageAnimator::default();
        let start = Instant::now();

        assert!(animator.turn_forward().await);

        assert_eq!(start.elapsed(), Duration::from_millis(600));
        assert_eq!(animator.state(), PageAnimationState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_turn_is_refused() {
        let animator = PageAnimator::new(Duration::from_millis(600));
        let other = animator.clone();
        let mut states = animator.subscribe();

        let (forward, backward) = tokio::join!(animator.turn_forward(), async {
            states.changed().await.expect("state change");
            assert_eq!(*states.borrow(), PageAnimationState::TurningForward);
            assert!(other.is_animating());
            other.turn_backward().await
        });

        assert!(forward);
        assert!(!backward);
        assert!(!animator.is_animating());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_turn_returns_to_idle() {
        let animator = PageAnimator::new(Duration::from_secs(1));

        let abandoned = timeout(Duration::from_millis(100), animator.turn_backward()).await;

        assert!(abandoned.is_err());
        assert_eq!(animator.state(), PageAnimationState::Idle);
        assert!(animator.turn_forward().await);
    }
}

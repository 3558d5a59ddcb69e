//! Timed illustration sequencing.
//!
//! At most one timer is armed at a time. Each timer carries the scene and
//! image index it was armed for plus a generation number; rescheduling bumps
//! the generation so a timer that fired just before being replaced is dropped
//! on receipt instead of advancing the wrong image.

use std::time::Duration;

use talebook_domain::{Scene, SceneId};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// A fired image timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageAdvance {
    pub scene_id: SceneId,
    pub from_index: usize,
    generation: u64,
}

#[derive(Debug)]
struct ArmedTimer {
    scene_id: SceneId,
    from_index: usize,
    delay: Duration,
    deadline: Instant,
    cancel: CancellationToken,
}

/// Owns the single pending image timer.
#[derive(Debug)]
pub struct ImageSequencer {
    tx: mpsc::UnboundedSender<ImageAdvance>,
    rx: mpsc::UnboundedReceiver<ImageAdvance>,
    generation: u64,
    armed: Option<ArmedTimer>,
}

impl Default for ImageSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSequencer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            generation: 0,
            armed: None,
        }
    }

    /// How long the image at `index` stays up before advancing, if it advances.
    ///
    /// The last image never advances, and neither does one without a positive
    /// timeout.
    pub fn delay_for(scene: &Scene, index: usize) -> Option<Duration> {
        let images = scene.sorted_images();
        if index + 1 >= images.len() {
            return None;
        }
        images.get(index)?.display_duration()
    }

    /// Replace any pending timer with one for `index` of `scene`.
    pub fn reschedule(&mut self, scene: Option<&Scene>, index: usize) {
        self.cancel();

        let Some(scene) = scene else {
            return;
        };
        let Some(delay) = Self::delay_for(scene, index) else {
            return;
        };
        let Some(deadline) = Instant::now().checked_add(delay) else {
            tracing::warn!(
                scene_id = %scene.id(),
                from_index = index,
                "Image timeout out of range, treating image as resting frame"
            );
            return;
        };
        self.arm(scene, index, delay, deadline);
    }

    /// Like [`ImageSequencer::reschedule`], but keeps an earlier deadline.
    ///
    /// A deadline already in the past fires right away.
    pub fn resume(&mut self, scene: Option<&Scene>, index: usize, deadline: Instant) {
        self.cancel();

        let Some(scene) = scene else {
            return;
        };
        let Some(delay) = Self::delay_for(scene, index) else {
            return;
        };
        self.arm(scene, index, delay, deadline);
    }

    fn arm(&mut self, scene: &Scene, index: usize, delay: Duration, deadline: Instant) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(scene_id = %scene.id(), "No async runtime, image sequence will not advance");
            return;
        };

        let advance = ImageAdvance {
            scene_id: scene.id(),
            from_index: index,
            generation: self.generation,
        };
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let tx = self.tx.clone();
        runtime.spawn(async move {
            tokio::select! {
                _ = task_cancel.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    // Receiver lives as long as the sequencer; a closed channel
                    // means it was dropped and nobody is waiting.
                    let _ = tx.send(advance);
                }
            }
        });

        tracing::debug!(
            scene_id = %scene.id(),
            from_index = index,
            delay_ms = delay.as_millis() as u64,
            "Image timer armed"
        );
        self.armed = Some(ArmedTimer {
            scene_id: scene.id(),
            from_index: index,
            delay,
            deadline,
            cancel,
        });
    }

    /// Disarm the pending timer, if any.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.armed.take() {
            timer.cancel.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.armed.is_some()
    }

    /// `(scene, index, delay)` of the armed timer.
    pub fn pending(&self) -> Option<(SceneId, usize, Duration)> {
        self.armed
            .as_ref()
            .map(|t| (t.scene_id, t.from_index, t.delay))
    }

    /// When the armed timer fires.
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|t| t.deadline)
    }

    /// Wait for the armed timer to fire.
    ///
    /// Pends forever when nothing is armed; callers race it against other
    /// input. Cancel safe.
    pub async fn fired(&mut self) -> ImageAdvance {
        loop {
            // `tx` is owned by `self`, so the channel never closes here.
            let Some(advance) = self.rx.recv().await else {
                return std::future::pending().await;
            };
            if advance.generation == self.generation {
                self.armed = None;
                return advance;
            }
            tracing::debug!(
                scene_id = %advance.scene_id,
                from_index = advance.from_index,
                "Dropping superseded image timer"
            );
        }
    }
}

impl Drop for ImageSequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}

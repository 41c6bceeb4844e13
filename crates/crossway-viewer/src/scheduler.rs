//! Poll scheduling
//!
//! The render loop ticks this once per frame. It only tracks when the next
//! server poll is due; per-entity interpolation progress lives with each
//! entity, so the two cadences can never get tangled. A poll that is due
//! while another is still in flight stays due - the effect of a hung poll
//! is a delayed next poll, not a pile-up.

/// Frame-countdown trigger for server polls
pub struct PollScheduler {
    interval_frames: u32,
    countdown: u32,
}

impl PollScheduler {
    pub fn new(interval_frames: u32) -> Self {
        let interval_frames = interval_frames.max(1);
        Self {
            interval_frames,
            countdown: interval_frames,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval_frames
    }

    /// Count one frame down; the due state saturates at zero
    pub fn tick(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
    }

    /// True when a poll should be dispatched
    pub fn is_due(&self) -> bool {
        self.countdown == 0
    }

    /// Restart the countdown after a poll was actually dispatched
    pub fn rearm(&mut self) {
        self.countdown = self.interval_frames;
    }
}

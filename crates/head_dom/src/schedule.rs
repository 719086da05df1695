//! Frame scheduling for deferred commits.
//!
//! The committer never blocks: it requests a frame, and the host later asks the
//! scheduler which frames have arrived.

use core_types::FrameHandle;
use std::time::{Duration, Instant};

/// ~60Hz, the browser frame cadence.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(16);

pub trait FrameScheduler {
    /// Never returns `FrameHandle::INVALID`.
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancelling an unknown or already-fired handle is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Frames that have arrived, in request order. Each handle is reported once.
    fn take_due(&mut self) -> Vec<FrameHandle>;
}

/// Every live request is due on the next `take_due`. Tests drive frames by hand.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next: u64,
    live: Vec<FrameHandle>,
    cancelled: usize,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> &[FrameHandle] {
        &self.live
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.live.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.live.len();
        self.live.retain(|live| *live != handle);
        if self.live.len() != before {
            self.cancelled += 1;
        }
    }

    fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.live)
    }
}

/// Fires a request once `delay` has passed since it was made. Time only moves
/// through `tick`.
#[derive(Debug)]
pub struct IntervalFrames {
    delay: Duration,
    now: Instant,
    next: u64,
    requests: Vec<(FrameHandle, Instant)>,
}

impl IntervalFrames {
    pub fn new(now: Instant) -> Self {
        Self::with_delay(now, DEFAULT_FRAME_DELAY)
    }

    pub fn with_delay(now: Instant, delay: Duration) -> Self {
        Self {
            delay,
            now,
            next: 0,
            requests: Vec::new(),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.requests.len()
    }
}

impl FrameScheduler for IntervalFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.requests.push((handle, self.now + self.delay));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.requests.retain(|(live, _)| *live != handle);
    }

    fn take_due(&mut self) -> Vec<FrameHandle> {
        let now = self.now;
        let mut due = Vec::new();
        self.requests.retain(|(handle, deadline)| {
            if *deadline <= now {
                due.push(*handle);
                false
            } else {
                true
            }
        });
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_frames_fire_once() {
        let mut frames = ManualFrames::new();
        let a = frames.request_frame();
        let b = frames.request_frame();
        assert_ne!(a, FrameHandle::INVALID);
        frames.cancel_frame(a);
        frames.cancel_frame(a);
        assert_eq!(frames.cancelled(), 1);
        assert_eq!(frames.take_due(), vec![b]);
        assert!(frames.take_due().is_empty());
    }

    #[test]
    fn interval_frames_wait_for_delay() {
        let start = Instant::now();
        let mut frames = IntervalFrames::new(start);
        let handle = frames.request_frame();
        frames.tick(start + Duration::from_millis(5));
        assert!(frames.take_due().is_empty());
        frames.tick(start + DEFAULT_FRAME_DELAY);
        assert_eq!(frames.take_due(), vec![handle]);
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn interval_clock_never_moves_back() {
        let start = Instant::now();
        let mut frames = IntervalFrames::with_delay(start + Duration::from_millis(10), Duration::ZERO);
        frames.tick(start);
        assert_eq!(frames.now(), start + Duration::from_millis(10));
    }
}

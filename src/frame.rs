use std::time::{Duration, Instant};

/// Identifies one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// One-callback-per-refresh capability used by the animated widgets.
///
/// The host loop owns the clock: a widget requests a frame, and on every turn
/// of the loop asks whether that request has become due. A due request is
/// consumed, so the widget has to request again to keep animating.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a pending request. Unknown or already-canceled handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Returns true (and consumes the request) if `handle` is pending and its
    /// frame has come.
    fn take_due(&mut self, handle: FrameHandle, now: Instant) -> bool;
}

/// Fixed-rate scheduler: a frame comes once per `interval`.
#[derive(Debug)]
pub struct IntervalFrameScheduler {
    interval: Duration,
    next_frame_at: Instant,
    pending: Option<FrameHandle>,
    next_id: u64,
}

impl IntervalFrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_frame_at: Instant::now(),
            pending: None,
            next_id: 1,
        }
    }

    pub fn with_fps(fps: u32) -> Self {
        let fps = fps.max(1);
        Self::new(Duration::from_secs(1) / fps)
    }
}

impl FrameScheduler for IntervalFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn take_due(&mut self, handle: FrameHandle, now: Instant) -> bool {
        if self.pending != Some(handle) || now < self.next_frame_at {
            return false;
        }
        self.pending = None;
        // Don't try to catch up on frames missed while the loop was busy.
        self.next_frame_at = (self.next_frame_at + self.interval).max(now);
        true
    }
}

/// Scheduler for tests: every pending request is due on the next query.
#[derive(Debug, Default)]
pub struct ManualFrameScheduler {
    pending: Option<FrameHandle>,
    next_id: u64,
    pub canceled: usize,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.canceled += 1;
        }
    }

    fn take_due(&mut self, handle: FrameHandle, _now: Instant) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_scheduler_waits_for_interval() {
        let mut scheduler = IntervalFrameScheduler::new(Duration::from_millis(16));
        let start = Instant::now();
        let handle = scheduler.request_frame();

        assert!(scheduler.take_due(handle, start + Duration::from_millis(1)));
        let handle = scheduler.request_frame();
        assert!(!scheduler.take_due(handle, start + Duration::from_millis(2)));
        assert!(scheduler.take_due(handle, start + Duration::from_millis(40)));
    }

    #[test]
    fn test_canceled_handle_is_never_due() {
        let mut scheduler = IntervalFrameScheduler::with_fps(60);
        let handle = scheduler.request_frame();
        scheduler.cancel_frame(handle);
        scheduler.cancel_frame(handle);

        assert!(!scheduler.take_due(handle, Instant::now() + Duration::from_secs(1)));
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut scheduler = ManualFrameScheduler::new();
        let old = scheduler.request_frame();
        let new = scheduler.request_frame();

        assert!(!scheduler.take_due(old, Instant::now()));
        assert!(scheduler.take_due(new, Instant::now()));
        assert!(!scheduler.has_pending());
    }
}

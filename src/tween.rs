//! Value tweens for page transitions.
//!
//! A tween moves one [`Channel`] from a start value to an end value. Owners
//! feed the sampled values back into their own state on every frame, and get
//! back the completion [`Tween::on_complete`] cue of each tween that finished.
//! [`Immediate`] is the fallback used when animations are turned off: it jumps
//! straight to the end values.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    SectionOpacity,
    SectionOffsetY,
    TitleOpacity,
    TitleOffsetY,
    ScrollArrowsOpacity,
    DetailOpacity,
    ContentScroll,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^(n + 1)`; `PowerOut(1)` is a quadratic ease-out.
    PowerOut(i32),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::PowerOut(1)
    }
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::PowerOut(power) => 1.0 - (1.0 - t).powi(power + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween<C> {
    pub channel: Channel,
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
    pub on_complete: Option<C>,
}

impl<C> Tween<C> {
    pub fn new(channel: Channel, from: f64, to: f64) -> Self {
        Self {
            channel,
            from,
            to,
            duration: Duration::ZERO,
            delay: Duration::ZERO,
            easing: Easing::default(),
            on_complete: None,
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_complete(mut self, cue: C) -> Self {
        self.on_complete = Some(cue);
        self
    }

    /// Value at `elapsed` since the tween was started, and whether it's done.
    pub fn sample(&self, elapsed: Duration) -> (f64, bool) {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return (self.from, false);
        };
        if active >= self.duration {
            return (self.to, true);
        }
        let t = active.as_secs_f64() / self.duration.as_secs_f64();
        let eased = self.easing.apply(t);
        (self.from + (self.to - self.from) * eased, false)
    }
}

/// Result of one `advance` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenFrame<C> {
    pub values: Vec<(Channel, f64)>,
    pub completed: Vec<C>,
}

impl<C> Default for TweenFrame<C> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            completed: Vec::new(),
        }
    }
}

impl<C> TweenFrame<C> {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.completed.is_empty()
    }
}

pub trait TweenScheduler<C> {
    /// Start a tween. A running tween on the same channel is dropped together
    /// with its cue.
    fn start(&mut self, tween: Tween<C>);

    /// Stop whatever runs on `channel` without completing it.
    fn kill(&mut self, channel: Channel);

    fn advance(&mut self, now: Instant) -> TweenFrame<C>;

    fn is_idle(&self) -> bool;
}

struct Running<C> {
    tween: Tween<C>,
    started_at: Option<Instant>,
}

/// Time-based scheduler. A tween's clock starts at the first `advance` after
/// it was started.
pub struct Timeline<C> {
    running: Vec<Running<C>>,
}

impl<C> Default for Timeline<C> {
    fn default() -> Self {
        Self {
            running: Vec::new(),
        }
    }
}

impl<C> Timeline<C> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> TweenScheduler<C> for Timeline<C> {
    fn start(&mut self, tween: Tween<C>) {
        self.kill(tween.channel);
        self.running.push(Running {
            tween,
            started_at: None,
        });
    }

    fn kill(&mut self, channel: Channel) {
        self.running.retain(|r| r.tween.channel != channel);
    }

    fn advance(&mut self, now: Instant) -> TweenFrame<C> {
        let mut frame = TweenFrame::default();
        let mut still_running = Vec::with_capacity(self.running.len());

        for mut running in self.running.drain(..) {
            let started_at = *running.started_at.get_or_insert(now);
            let (value, done) = running
                .tween
                .sample(now.saturating_duration_since(started_at));
            frame.values.push((running.tween.channel, value));
            if done {
                if let Some(cue) = running.tween.on_complete.take() {
                    frame.completed.push(cue);
                }
            } else {
                still_running.push(running);
            }
        }

        self.running = still_running;
        frame
    }

    fn is_idle(&self) -> bool {
        self.running.is_empty()
    }
}

/// Fallback scheduler: every tween finishes on the next `advance`.
pub struct Immediate<C> {
    queued: VecDeque<Tween<C>>,
}

impl<C> Default for Immediate<C> {
    fn default() -> Self {
        Self {
            queued: VecDeque::new(),
        }
    }
}

impl<C> Immediate<C> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> TweenScheduler<C> for Immediate<C> {
    fn start(&mut self, tween: Tween<C>) {
        self.kill(tween.channel);
        self.queued.push_back(tween);
    }

    fn kill(&mut self, channel: Channel) {
        self.queued.retain(|t| t.channel != channel);
    }

    fn advance(&mut self, _now: Instant) -> TweenFrame<C> {
        let mut frame = TweenFrame::default();
        for tween in self.queued.drain(..) {
            frame.values.push((tween.channel, tween.to));
            frame.completed.extend(tween.on_complete);
        }
        frame
    }

    fn is_idle(&self) -> bool {
        self.queued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Cue {
        Done,
        Other,
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::PowerOut(1), Easing::PowerOut(2)] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert!((Easing::PowerOut(2).apply(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_sample_respects_delay() {
        let tween: Tween<Cue> = Tween::new(Channel::SectionOpacity, 0.0, 1.0)
            .duration(Duration::from_millis(100))
            .delay(Duration::from_millis(50))
            .ease(Easing::Linear);

        assert_eq!(tween.sample(Duration::from_millis(20)), (0.0, false));
        let (mid, done) = tween.sample(Duration::from_millis(100));
        assert!((mid - 0.5).abs() < 1e-9);
        assert!(!done);
        assert_eq!(tween.sample(Duration::from_millis(150)), (1.0, true));
    }

    #[test]
    fn test_timeline_completes_with_cue() {
        let mut timeline = Timeline::new();
        timeline.start(
            Tween::new(Channel::TitleOpacity, 0.0, 1.0)
                .duration(Duration::from_millis(500))
                .on_complete(Cue::Done),
        );
        let start = Instant::now();

        let first = timeline.advance(start);
        assert_eq!(first.values, vec![(Channel::TitleOpacity, 0.0)]);
        assert!(first.completed.is_empty());

        let last = timeline.advance(start + Duration::from_millis(600));
        assert_eq!(last.values, vec![(Channel::TitleOpacity, 1.0)]);
        assert_eq!(last.completed, vec![Cue::Done]);
        assert!(timeline.is_idle());
    }

    #[test]
    fn test_restart_on_channel_drops_previous_cue() {
        let mut timeline = Timeline::new();
        timeline.start(
            Tween::new(Channel::SectionOpacity, 1.0, 0.0)
                .duration(Duration::from_millis(300))
                .on_complete(Cue::Other),
        );
        timeline.start(
            Tween::new(Channel::SectionOpacity, 1.0, 0.0)
                .duration(Duration::from_millis(300))
                .on_complete(Cue::Done),
        );
        let start = Instant::now();
        timeline.advance(start);

        let frame = timeline.advance(start + Duration::from_secs(1));
        assert_eq!(frame.completed, vec![Cue::Done]);
    }

    #[test]
    fn test_immediate_jumps_to_end() {
        let mut immediate = Immediate::new();
        immediate.start(
            Tween::new(Channel::ContentScroll, 12.0, 0.0)
                .duration(Duration::from_secs(1))
                .on_complete(Cue::Done),
        );
        immediate.start(Tween::new(Channel::DetailOpacity, 0.0, 1.0));

        let frame = immediate.advance(Instant::now());
        assert_eq!(
            frame.values,
            vec![(Channel::ContentScroll, 0.0), (Channel::DetailOpacity, 1.0)]
        );
        assert_eq!(frame.completed, vec![Cue::Done]);
        assert!(immediate.is_idle());
    }

    #[test]
    fn test_kill_discards_without_cue() {
        let mut immediate = Immediate::new();
        immediate.start(Tween::new(Channel::ScrollArrowsOpacity, 0.0, 1.0).on_complete(Cue::Done));
        immediate.kill(Channel::ScrollArrowsOpacity);

        assert!(immediate.advance(Instant::now()).is_empty());
    }
}

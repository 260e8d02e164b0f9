use std::time::Instant;

use log::debug;

use crate::frame::{FrameHandle, FrameScheduler};
use crate::page_manager::BlurMask;

pub const FOLLOW_EASING: f64 = 0.1;

/// Spotlight over the blurred backdrop that trails the pointer.
///
/// Positions are in pixels. Until the pointer has moved, the spotlight rests
/// at the center of the screen.
pub struct BlurEffect {
    scheduler: Box<dyn FrameScheduler>,
    position: (f64, f64),
    target: (f64, f64),
    pointer_seen: bool,
    animation_id: Option<FrameHandle>,
    is_active: bool,
    visible: bool,
    mask: BlurMask,
}

impl BlurEffect {
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            position: (0.0, 0.0),
            target: (0.0, 0.0),
            pointer_seen: false,
            animation_id: None,
            is_active: true,
            visible: true,
            mask: BlurMask::Spotlight,
        }
    }

    pub fn init(&mut self) {
        self.start_animation();
    }

    /// Rest the spotlight at the middle of a `width` x `height` screen.
    /// Ignored once the pointer has been seen.
    pub fn center_on(&mut self, width: f64, height: f64) {
        if self.pointer_seen {
            return;
        }
        self.position = (width / 2.0, height / 2.0);
        self.target = self.position;
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer_seen = true;
        self.target = (x, y);
    }

    pub fn frame(&mut self) {
        self.position.0 += (self.target.0 - self.position.0) * FOLLOW_EASING;
        self.position.1 += (self.target.1 - self.position.1) * FOLLOW_EASING;
    }

    /// Run a frame if one is due, then request the next. Returns true if a
    /// frame ran.
    pub fn pump(&mut self, now: Instant) -> bool {
        if !self.is_active {
            return false;
        }
        let Some(handle) = self.animation_id else {
            return false;
        };
        if !self.scheduler.take_due(handle, now) {
            return false;
        }
        self.frame();
        self.animation_id = Some(self.scheduler.request_frame());
        true
    }

    pub fn set_mask(&mut self, mask: BlurMask) {
        self.mask = mask;
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.is_active = true;
        self.start_animation();
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.is_active = false;
        self.cancel_animation();
    }

    pub fn destroy(&mut self) {
        self.cancel_animation();
        self.is_active = false;
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn target(&self) -> (f64, f64) {
        self.target
    }

    pub fn mask(&self) -> BlurMask {
        self.mask
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_animating(&self) -> bool {
        self.animation_id.is_some()
    }

    fn start_animation(&mut self) {
        if self.animation_id.is_some() {
            return;
        }
        self.frame();
        self.animation_id = Some(self.scheduler.request_frame());
    }

    fn cancel_animation(&mut self) {
        if let Some(handle) = self.animation_id.take() {
            self.scheduler.cancel_frame(handle);
            debug!("Blur frame loop canceled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualFrameScheduler;

    fn effect() -> BlurEffect {
        let mut effect = BlurEffect::new(Box::new(ManualFrameScheduler::new()));
        effect.center_on(800.0, 480.0);
        effect.init();
        effect
    }

    #[test]
    fn test_rests_at_screen_center() {
        let effect = effect();
        assert_eq!(effect.position(), (400.0, 240.0));
        assert!(effect.is_animating());
    }

    #[test]
    fn test_follows_pointer_by_a_tenth_per_frame() {
        let mut effect = effect();
        effect.pointer_moved(500.0, 140.0);

        assert!(effect.pump(Instant::now()));
        let (x, y) = effect.position();
        assert!((x - 410.0).abs() < 1e-9);
        assert!((y - 230.0).abs() < 1e-9);

        for _ in 0..200 {
            effect.pump(Instant::now());
        }
        let (x, y) = effect.position();
        assert!((x - 500.0).abs() < 1e-6 && x <= 500.0);
        assert!((y - 140.0).abs() < 1e-6 && y >= 140.0);
    }

    #[test]
    fn test_center_is_ignored_after_pointer_moved() {
        let mut effect = effect();
        effect.pointer_moved(10.0, 10.0);
        effect.center_on(2000.0, 2000.0);
        assert_eq!(effect.target(), (10.0, 10.0));
        assert_eq!(effect.position(), (400.0, 240.0));
    }

    #[test]
    fn test_hide_stops_and_show_restarts() {
        let mut effect = effect();
        effect.hide();
        assert!(!effect.is_visible());
        assert!(!effect.is_animating());
        assert!(!effect.pump(Instant::now()));

        effect.show();
        assert!(effect.is_visible());
        assert!(effect.is_animating());
        assert!(effect.pump(Instant::now()));
    }

    #[test]
    fn test_destroy_twice_stops_loop() {
        let mut effect = effect();
        effect.pointer_moved(0.0, 0.0);
        effect.destroy();
        effect.destroy();

        assert!(!effect.is_animating());
        assert!(!effect.is_active());
        let before = effect.position();
        assert!(!effect.pump(Instant::now()));
        assert_eq!(effect.position(), before);
    }

    #[test]
    fn test_mask_follows_page() {
        let mut effect = effect();
        assert_eq!(effect.mask(), BlurMask::Spotlight);
        effect.set_mask(BlurMask::None);
        assert_eq!(effect.mask(), BlurMask::None);
    }
}

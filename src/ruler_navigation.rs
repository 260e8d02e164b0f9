use std::time::Instant;

use log::debug;

use crate::frame::{FrameHandle, FrameScheduler};

pub const PAGE_COUNT: usize = 3;
pub const DRAG_THRESHOLD_PX: f64 = 150.0;
pub const IDLE_EASING: f64 = 0.1;
pub const DRAG_EASING: f64 = 0.15;
pub const TICK_COUNT: usize = 600;
pub const DEFAULT_SNAP_POINTS: [f64; PAGE_COUNT] = [250.0, -300.0, -850.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Contact,
}

impl Page {
    pub const ALL: [Page; PAGE_COUNT] = [Page::Home, Page::About, Page::Contact];

    pub fn index(self) -> usize {
        match self {
            Page::Home => 0,
            Page::About => 1,
            Page::Contact => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Page> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Contact => "Contact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Long,
    Medium,
    Short,
}

/// Tick pattern of the ruler: a long tick every 10, a medium one every 5.
pub fn ruler_ticks(count: usize) -> Vec<TickKind> {
    (0..count)
        .map(|i| {
            if i % 10 == 0 {
                TickKind::Long
            } else if i % 5 == 0 {
                TickKind::Medium
            } else {
                TickKind::Short
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RulerConfig {
    /// Resting offset of the ruler for each page, in pixels.
    pub snap_points: [f64; PAGE_COUNT],
    pub drag_threshold: f64,
    pub idle_easing: f64,
    pub drag_easing: f64,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            snap_points: DEFAULT_SNAP_POINTS,
            drag_threshold: DRAG_THRESHOLD_PX,
            idle_easing: IDLE_EASING,
            drag_easing: DRAG_EASING,
        }
    }
}

/// Where the widget writes its visual state.
pub trait RulerSink {
    /// False when the elements the widget draws into are missing.
    fn is_mounted(&self) -> bool {
        true
    }

    fn build_ticks(&mut self, ticks: Vec<TickKind>);

    /// Horizontal translation of the ruler relative to its centered position.
    fn set_offset(&mut self, offset_px: f64);

    fn set_active_label(&mut self, page: Page);

    fn set_grabbing(&mut self, grabbing: bool);
}

/// Pointer input already converted to pixels. `Down` is only delivered for
/// presses on the ruler container, `Move` and `Up` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(f64),
    Move(f64),
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    start_x: f64,
    target_delta_x: f64,
}

pub type PageChangeListener = Box<dyn FnMut(usize)>;

pub struct RulerNavigation<S: RulerSink> {
    sink: S,
    scheduler: Box<dyn FrameScheduler>,
    config: RulerConfig,
    current_page: usize,
    drag: Option<DragSession>,
    current_delta_x: f64,
    snap_target_x: f64,
    animation_id: Option<FrameHandle>,
    wired: bool,
    on_page_change: Option<PageChangeListener>,
}

impl<S: RulerSink> RulerNavigation<S> {
    pub fn new(sink: S, scheduler: Box<dyn FrameScheduler>, config: RulerConfig) -> Self {
        let rest = config.snap_points[0];
        Self {
            sink,
            scheduler,
            config,
            current_page: 0,
            drag: None,
            current_delta_x: rest,
            snap_target_x: rest,
            animation_id: None,
            wired: false,
            on_page_change: None,
        }
    }

    /// Build the ruler, start listening for input and start the frame loop.
    /// Does nothing when the sink isn't mounted.
    pub fn init(&mut self) -> bool {
        if !self.sink.is_mounted() {
            debug!("Ruler sink not mounted, skipping init");
            return false;
        }

        self.sink.build_ticks(ruler_ticks(TICK_COUNT));
        self.wired = true;
        self.start_animation();
        self.update_labels();
        true
    }

    pub fn set_on_page_change(&mut self, listener: impl FnMut(usize) + 'static) {
        self.on_page_change = Some(Box::new(listener));
    }

    /// Route pointer input. Ignored until `init` succeeded.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.wired {
            return;
        }
        match event {
            PointerEvent::Down(x) => self.drag_start(x),
            PointerEvent::Move(x) => self.drag_move(x),
            PointerEvent::Up => self.drag_end(),
        }
    }

    pub fn drag_start(&mut self, x: f64) {
        self.drag = Some(DragSession {
            start_x: x,
            target_delta_x: 0.0,
        });
        self.sink.set_grabbing(true);
    }

    pub fn drag_move(&mut self, x: f64) {
        if let Some(drag) = self.drag.as_mut() {
            drag.target_delta_x = x - drag.start_x;
        }
    }

    pub fn drag_end(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.sink.set_grabbing(false);

        let threshold = self.config.drag_threshold;
        let last_page = self.config.snap_points.len() - 1;
        let previous_page = self.current_page;

        if drag.target_delta_x < -threshold && self.current_page < last_page {
            self.current_page += 1;
        } else if drag.target_delta_x > threshold && self.current_page > 0 {
            self.current_page -= 1;
        }
        debug!(
            "Drag released at delta {:.1}px, page {}",
            drag.target_delta_x, self.current_page
        );

        self.snap_target_x = self.config.snap_points[self.current_page];
        if self.current_page != previous_page {
            self.notify_page_change();
        }
    }

    pub fn navigate_next(&mut self) {
        if self.current_page + 1 < self.config.snap_points.len() {
            self.current_page += 1;
            self.snap_target_x = self.config.snap_points[self.current_page];
            self.notify_page_change();
        }
    }

    pub fn navigate_prev(&mut self) {
        if self.current_page > 0 {
            self.current_page -= 1;
            self.snap_target_x = self.config.snap_points[self.current_page];
            self.notify_page_change();
        }
    }

    /// Follow a page change made elsewhere. Never notifies the listener;
    /// out-of-range indices are ignored.
    pub fn update_current_page(&mut self, page_index: usize) {
        if page_index < self.config.snap_points.len() {
            self.current_page = page_index;
            self.snap_target_x = self.config.snap_points[page_index];
            self.update_labels();
        }
    }

    /// Advance the interpolation by one frame and render.
    pub fn frame(&mut self) {
        match self.drag {
            None => {
                self.current_delta_x +=
                    (self.snap_target_x - self.current_delta_x) * self.config.idle_easing;
            }
            Some(drag) => {
                let desired_x = self.config.snap_points[self.current_page] + drag.target_delta_x;
                self.current_delta_x +=
                    (desired_x - self.current_delta_x) * self.config.drag_easing;
            }
        }

        self.sink.set_offset(self.current_delta_x);
        self.update_labels();
    }

    /// Run a frame if the scheduler says one is due, then request the next.
    pub fn pump(&mut self, now: Instant) -> bool {
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

    /// Stop the frame loop. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.animation_id.take() {
            self.scheduler.cancel_frame(handle);
            debug!("Ruler frame loop canceled");
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn target_delta_x(&self) -> f64 {
        self.drag.map_or(0.0, |drag| drag.target_delta_x)
    }

    pub fn current_delta_x(&self) -> f64 {
        self.current_delta_x
    }

    pub fn snap_target_x(&self) -> f64 {
        self.snap_target_x
    }

    pub fn is_animating(&self) -> bool {
        self.animation_id.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn start_animation(&mut self) {
        if self.animation_id.is_some() {
            return;
        }
        // First frame renders right away.
        self.frame();
        self.animation_id = Some(self.scheduler.request_frame());
    }

    fn update_labels(&mut self) {
        if let Some(page) = Page::from_index(self.current_page) {
            self.sink.set_active_label(page);
        }
    }

    fn notify_page_change(&mut self) {
        if let Some(listener) = self.on_page_change.as_mut() {
            listener(self.current_page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualFrameScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingSink {
        detached: bool,
        ticks: usize,
        offsets: Vec<f64>,
        active: Option<Page>,
        grabbing: bool,
    }

    impl RulerSink for RecordingSink {
        fn is_mounted(&self) -> bool {
            !self.detached
        }

        fn build_ticks(&mut self, ticks: Vec<TickKind>) {
            self.ticks = ticks.len();
        }

        fn set_offset(&mut self, offset_px: f64) {
            self.offsets.push(offset_px);
        }

        fn set_active_label(&mut self, page: Page) {
            self.active = Some(page);
        }

        fn set_grabbing(&mut self, grabbing: bool) {
            self.grabbing = grabbing;
        }
    }

    fn ruler() -> RulerNavigation<RecordingSink> {
        let mut ruler = RulerNavigation::new(
            RecordingSink::default(),
            Box::new(ManualFrameScheduler::new()),
            RulerConfig::default(),
        );
        assert!(ruler.init());
        ruler
    }

    fn record_pages(ruler: &mut RulerNavigation<RecordingSink>) -> Rc<RefCell<Vec<usize>>> {
        let pages = Rc::new(RefCell::new(Vec::new()));
        let sink = pages.clone();
        ruler.set_on_page_change(move |page| sink.borrow_mut().push(page));
        pages
    }

    fn drag(ruler: &mut RulerNavigation<RecordingSink>, from: f64, to: f64) {
        ruler.handle_pointer(PointerEvent::Down(from));
        ruler.handle_pointer(PointerEvent::Move(to));
        ruler.handle_pointer(PointerEvent::Up);
    }

    #[test]
    fn test_ticks_pattern() {
        let ticks = ruler_ticks(TICK_COUNT);
        assert_eq!(ticks.len(), 600);
        assert_eq!(ticks[0], TickKind::Long);
        assert_eq!(ticks[5], TickKind::Medium);
        assert_eq!(ticks[7], TickKind::Short);
        assert_eq!(ticks[590], TickKind::Long);
    }

    #[test]
    fn test_init_renders_initial_state() {
        let ruler = ruler();
        assert_eq!(ruler.sink().ticks, TICK_COUNT);
        assert_eq!(ruler.sink().active, Some(Page::Home));
        assert_eq!(ruler.sink().offsets, vec![250.0]);
        assert!(ruler.is_animating());
    }

    #[test]
    fn test_init_without_mounted_sink_is_noop() {
        let sink = RecordingSink {
            detached: true,
            ..Default::default()
        };
        let mut ruler = RulerNavigation::new(
            sink,
            Box::new(ManualFrameScheduler::new()),
            RulerConfig::default(),
        );
        assert!(!ruler.init());
        assert!(!ruler.is_animating());

        ruler.handle_pointer(PointerEvent::Down(500.0));
        assert!(!ruler.is_dragging());
    }

    #[test]
    fn test_drag_left_past_threshold_advances() {
        let mut ruler = ruler();
        let pages = record_pages(&mut ruler);

        drag(&mut ruler, 500.0, 300.0);

        assert_eq!(ruler.current_page(), 1);
        assert_eq!(*pages.borrow(), vec![1]);
        assert_eq!(ruler.snap_target_x(), -300.0);
        assert!(!ruler.is_dragging());
    }

    #[test]
    fn test_drag_right_past_threshold_retreats() {
        let mut ruler = ruler();
        ruler.update_current_page(2);

        drag(&mut ruler, 100.0, 260.0);

        assert_eq!(ruler.current_page(), 1);
        assert_eq!(ruler.snap_target_x(), -300.0);
    }

    #[test]
    fn test_short_drags_keep_page() {
        for delta in [-149.0, -150.0, 0.0, 149.0, 150.0] {
            let mut ruler = ruler();
            ruler.update_current_page(1);
            drag(&mut ruler, 400.0, 400.0 + delta);
            assert_eq!(ruler.current_page(), 1, "delta {delta}");
        }
    }

    #[test]
    fn test_release_without_page_change_is_silent() {
        let mut ruler = ruler();
        let pages = record_pages(&mut ruler);

        drag(&mut ruler, 500.0, 450.0);
        assert_eq!(ruler.current_page(), 0);
        assert!(pages.borrow().is_empty());

        // Clamped at the first page: a long drag right changes nothing either
        drag(&mut ruler, 300.0, 700.0);
        assert!(pages.borrow().is_empty());
        assert_eq!(ruler.snap_target_x(), 250.0);
    }

    #[test]
    fn test_drag_cannot_leave_page_range() {
        let mut ruler = ruler();
        drag(&mut ruler, 300.0, 700.0);
        assert_eq!(ruler.current_page(), 0);

        ruler.update_current_page(2);
        drag(&mut ruler, 700.0, 100.0);
        assert_eq!(ruler.current_page(), 2);
    }

    #[test]
    fn test_move_and_end_without_drag_are_ignored() {
        let mut ruler = ruler();
        let pages = record_pages(&mut ruler);

        ruler.handle_pointer(PointerEvent::Move(10.0));
        ruler.handle_pointer(PointerEvent::Up);

        assert!(!ruler.is_dragging());
        assert_eq!(ruler.target_delta_x(), 0.0);
        assert!(pages.borrow().is_empty());
    }

    #[test]
    fn test_drag_toggles_grabbing() {
        let mut ruler = ruler();
        ruler.handle_pointer(PointerEvent::Down(10.0));
        assert!(ruler.sink().grabbing);
        ruler.handle_pointer(PointerEvent::Up);
        assert!(!ruler.sink().grabbing);
    }

    #[test]
    fn test_navigate_next_twice() {
        let mut ruler = ruler();
        let pages = record_pages(&mut ruler);

        ruler.navigate_next();
        ruler.navigate_next();

        assert_eq!(ruler.current_page(), 2);
        assert_eq!(*pages.borrow(), vec![1, 2]);
        assert_eq!(ruler.snap_target_x(), -850.0);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut ruler = ruler();
        let pages = record_pages(&mut ruler);

        ruler.navigate_prev();
        assert_eq!(ruler.current_page(), 0);

        ruler.update_current_page(2);
        ruler.navigate_next();
        assert_eq!(ruler.current_page(), 2);
        assert!(pages.borrow().is_empty());
    }

    #[test]
    fn test_update_current_page_does_not_notify() {
        let mut ruler = ruler();
        let pages = record_pages(&mut ruler);

        ruler.update_current_page(1);

        assert_eq!(ruler.current_page(), 1);
        assert_eq!(ruler.snap_target_x(), -300.0);
        assert_eq!(ruler.sink().active, Some(Page::About));
        assert!(pages.borrow().is_empty());
    }

    #[test]
    fn test_update_current_page_out_of_range() {
        let mut ruler = ruler();
        ruler.update_current_page(1);

        ruler.update_current_page(5);

        assert_eq!(ruler.current_page(), 1);
        assert_eq!(ruler.snap_target_x(), -300.0);
        assert_eq!(ruler.sink().active, Some(Page::About));
    }

    #[test]
    fn test_idle_interpolation_converges_without_overshoot() {
        let mut ruler = ruler();
        ruler.current_delta_x = 0.0;

        ruler.frame();
        assert!((ruler.current_delta_x() - 25.0).abs() < 1e-12);

        for _ in 0..400 {
            ruler.frame();
            assert!(ruler.current_delta_x() <= 250.0);
        }
        assert!((ruler.current_delta_x() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_interpolation_follows_pointer() {
        let mut ruler = ruler();
        ruler.handle_pointer(PointerEvent::Down(500.0));
        ruler.handle_pointer(PointerEvent::Move(400.0));

        ruler.frame();

        // desired = 250 - 100 = 150, from 250 at 0.15
        assert!((ruler.current_delta_x() - 235.0).abs() < 1e-12);
    }

    #[test]
    fn test_pump_runs_one_frame_per_due_request() {
        let mut ruler = ruler();
        ruler.navigate_next();

        assert!(ruler.pump(Instant::now()));
        assert!(ruler.current_delta_x() < 250.0);
        assert!(ruler.is_animating());
    }

    #[test]
    fn test_destroy_twice_cancels_loop() {
        let mut ruler = ruler();

        ruler.destroy();
        ruler.destroy();

        assert!(!ruler.is_animating());
        assert!(!ruler.pump(Instant::now()));
    }
}

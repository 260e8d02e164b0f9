use std::time::{Duration, Instant};

use log::debug;

use crate::ruler_navigation::{PAGE_COUNT, Page, PageChangeListener};
use crate::tween::{Channel, Easing, Tween, TweenScheduler};

/// Cues can start new tweens; bounds the rounds of one update.
const MAX_CUE_ROUNDS: usize = 8;
/// Rows between the top of the About detail block and where scrolling stops.
const DETAIL_SCROLL_MARGIN: f64 = 2.0;

/// Completion cues of the tweens the page manager starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCue {
    ShowCurrentPage,
    AboutScrollReset,
    HideScrollArrows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    /// Photo backdrop of the landing page.
    Photo,
    Slate,
    Ocean,
}

impl Backdrop {
    pub fn for_page(page: Page) -> Self {
        match page {
            Page::Home => Backdrop::Photo,
            Page::About => Backdrop::Slate,
            Page::Contact => Backdrop::Ocean,
        }
    }
}

/// Mask of the blur layer drawn over the backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurMask {
    /// Clear circle around the pointer, blurred elsewhere.
    Spotlight,
    None,
}

/// Animated properties of the visible page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelValues {
    pub section_opacity: f64,
    pub section_offset_y: f64,
    pub title_opacity: f64,
    pub title_offset_y: f64,
    pub scroll_arrows_opacity: f64,
    pub detail_opacity: f64,
    pub content_scroll: f64,
}

impl Default for ChannelValues {
    fn default() -> Self {
        Self {
            section_opacity: 1.0,
            section_offset_y: 0.0,
            title_opacity: 1.0,
            title_offset_y: 0.0,
            scroll_arrows_opacity: 0.0,
            detail_opacity: 0.0,
            content_scroll: 0.0,
        }
    }
}

impl ChannelValues {
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::SectionOpacity => self.section_opacity,
            Channel::SectionOffsetY => self.section_offset_y,
            Channel::TitleOpacity => self.title_opacity,
            Channel::TitleOffsetY => self.title_offset_y,
            Channel::ScrollArrowsOpacity => self.scroll_arrows_opacity,
            Channel::DetailOpacity => self.detail_opacity,
            Channel::ContentScroll => self.content_scroll,
        }
    }

    fn set(&mut self, channel: Channel, value: f64) {
        let slot = match channel {
            Channel::SectionOpacity => &mut self.section_opacity,
            Channel::SectionOffsetY => &mut self.section_offset_y,
            Channel::TitleOpacity => &mut self.title_opacity,
            Channel::TitleOffsetY => &mut self.title_offset_y,
            Channel::ScrollArrowsOpacity => &mut self.scroll_arrows_opacity,
            Channel::DetailOpacity => &mut self.detail_opacity,
            Channel::ContentScroll => &mut self.content_scroll,
        };
        *slot = value;
    }
}

/// Shows one page at a time and animates the switch between pages.
pub struct PageManager {
    tweens: Box<dyn TweenScheduler<PageCue>>,
    owner_name: String,
    current_page: usize,
    is_about_detailed_view: bool,
    visible_page: Option<Page>,
    title: String,
    typing_visible: bool,
    scroll_arrows_interactive: bool,
    detail_anchor: f64,
    backdrop: Backdrop,
    blur_mask: BlurMask,
    values: ChannelValues,
    on_page_changed: Option<PageChangeListener>,
}

impl PageManager {
    pub fn new(tweens: Box<dyn TweenScheduler<PageCue>>, owner_name: impl Into<String>) -> Self {
        Self {
            tweens,
            owner_name: owner_name.into(),
            current_page: 0,
            is_about_detailed_view: false,
            visible_page: None,
            title: String::new(),
            typing_visible: false,
            scroll_arrows_interactive: false,
            detail_anchor: 0.0,
            backdrop: Backdrop::Photo,
            blur_mask: BlurMask::Spotlight,
            values: ChannelValues::default(),
            on_page_changed: None,
        }
    }

    /// Show the landing page. Does not notify.
    pub fn init(&mut self) {
        self.show_current_page();
    }

    pub fn set_on_page_changed(&mut self, listener: impl FnMut(usize) + 'static) {
        self.on_page_changed = Some(Box::new(listener));
    }

    /// Row of the About detail block inside the scrollable content.
    pub fn set_detail_anchor(&mut self, rows: f64) {
        self.detail_anchor = rows;
    }

    /// Switch to `page_index`.
    ///
    /// Re-selecting the current page is a no-op, except for About: selecting
    /// it again replays the transition so the detail view scrolls back to the
    /// summary.
    pub fn navigate_to_page(&mut self, page_index: usize, is_ruler_nav: bool) {
        if page_index >= PAGE_COUNT {
            return;
        }
        if page_index == self.current_page && page_index != Page::About.index() {
            return;
        }

        debug!("Navigating to page {page_index} (ruler: {is_ruler_nav})");
        self.current_page = page_index;

        if page_index == Page::About.index() && is_ruler_nav {
            self.tweens.start(
                Tween::new(Channel::ContentScroll, self.values.content_scroll, 0.0)
                    .duration(Duration::from_millis(500))
                    .on_complete(PageCue::AboutScrollReset),
            );
        }

        self.update_page_content();
        self.notify_page_changed();
    }

    /// Reveal the About detail block and scroll down to it. Only on About.
    pub fn scroll_to_about_detail(&mut self) {
        if self.current_page != Page::About.index() {
            return;
        }

        self.values.detail_opacity = 1.0;
        self.is_about_detailed_view = true;
        self.tweens.start(
            Tween::new(Channel::DetailOpacity, 0.0, 1.0)
                .duration(Duration::from_millis(500))
                .delay(Duration::from_millis(200)),
        );
        self.title = "My Story".to_string();

        let target = (self.detail_anchor - DETAIL_SCROLL_MARGIN).max(0.0);
        self.tweens.start(
            Tween::new(Channel::ContentScroll, self.values.content_scroll, target)
                .duration(Duration::from_secs(1))
                .ease(Easing::PowerOut(2))
                .on_complete(PageCue::HideScrollArrows),
        );
    }

    /// Sample running tweens and react to the ones that finished.
    pub fn update(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for _ in 0..MAX_CUE_ROUNDS {
            let frame = self.tweens.advance(now);
            if frame.is_empty() {
                break;
            }
            changed = true;
            for (channel, value) in frame.values {
                self.values.set(channel, value);
            }
            if frame.completed.is_empty() {
                break;
            }
            for cue in frame.completed {
                self.handle_cue(cue);
            }
        }
        changed
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_idle()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn visible_page(&self) -> Option<Page> {
        self.visible_page
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_about_detailed_view(&self) -> bool {
        self.is_about_detailed_view
    }

    pub fn is_typing_visible(&self) -> bool {
        self.typing_visible
    }

    pub fn are_scroll_arrows_interactive(&self) -> bool {
        self.scroll_arrows_interactive
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    pub fn blur_mask(&self) -> BlurMask {
        self.blur_mask
    }

    pub fn values(&self) -> &ChannelValues {
        &self.values
    }

    pub fn destroy(&mut self) {
        for channel in [
            Channel::SectionOpacity,
            Channel::SectionOffsetY,
            Channel::TitleOpacity,
            Channel::TitleOffsetY,
            Channel::ScrollArrowsOpacity,
            Channel::DetailOpacity,
            Channel::ContentScroll,
        ] {
            self.tweens.kill(channel);
        }
    }

    fn handle_cue(&mut self, cue: PageCue) {
        match cue {
            PageCue::ShowCurrentPage => self.show_current_page(),
            PageCue::AboutScrollReset => self.is_about_detailed_view = false,
            PageCue::HideScrollArrows => {
                self.scroll_arrows_interactive = false;
                self.tweens.start(
                    Tween::new(
                        Channel::ScrollArrowsOpacity,
                        self.values.scroll_arrows_opacity,
                        0.0,
                    )
                    .duration(Duration::from_millis(300)),
                );
            }
        }
    }

    fn update_page_content(&mut self) {
        self.tweens.start(
            Tween::new(Channel::SectionOpacity, self.values.section_opacity, 0.0)
                .duration(Duration::from_millis(300))
                .on_complete(PageCue::ShowCurrentPage),
        );
    }

    fn show_current_page(&mut self) {
        let Some(page) = Page::from_index(self.current_page) else {
            return;
        };

        self.visible_page = Some(page);
        self.typing_visible = false;
        self.set_now(Channel::ScrollArrowsOpacity, 0.0);
        self.scroll_arrows_interactive = false;

        self.set_page_specific_content(page);
        self.backdrop = Backdrop::for_page(page);
        self.blur_mask = match page {
            Page::About => BlurMask::None,
            _ => BlurMask::Spotlight,
        };
        self.animate_page_in(page);
    }

    fn set_page_specific_content(&mut self, page: Page) {
        match page {
            Page::Home => {
                self.title = self.owner_name.clone();
                self.typing_visible = true;
            }
            Page::About => {
                self.title = "About Me".to_string();
                self.set_now(Channel::DetailOpacity, 0.0);
                self.is_about_detailed_view = false;

                self.scroll_arrows_interactive = true;
                self.tweens.start(
                    Tween::new(Channel::ScrollArrowsOpacity, 0.0, 1.0)
                        .duration(Duration::from_millis(300))
                        .delay(Duration::from_millis(500)),
                );
            }
            Page::Contact => {
                self.title = "Get in Touch!".to_string();
            }
        }
    }

    fn animate_page_in(&mut self, page: Page) {
        if page == Page::Home {
            self.set_now(Channel::SectionOpacity, 1.0);
            self.set_now(Channel::TitleOpacity, 1.0);
            self.set_now(Channel::SectionOffsetY, 0.0);
            self.set_now(Channel::TitleOffsetY, 0.0);
            return;
        }

        let section = Duration::from_millis(700);
        let section_delay = Duration::from_millis(200);
        self.tweens.start(
            Tween::new(Channel::SectionOpacity, 0.0, 1.0)
                .duration(section)
                .delay(section_delay),
        );
        self.tweens.start(
            Tween::new(Channel::SectionOffsetY, 20.0, 0.0)
                .duration(section)
                .delay(section_delay),
        );

        let title = Duration::from_millis(500);
        self.tweens
            .start(Tween::new(Channel::TitleOpacity, 0.0, 1.0).duration(title));
        self.tweens
            .start(Tween::new(Channel::TitleOffsetY, -20.0, 0.0).duration(title));
    }

    /// Jump a channel to `value`, dropping any tween running on it.
    fn set_now(&mut self, channel: Channel, value: f64) {
        self.tweens.kill(channel);
        self.values.set(channel, value);
    }

    fn notify_page_changed(&mut self) {
        if let Some(listener) = self.on_page_changed.as_mut() {
            listener(self.current_page);
        }
    }

    #[cfg(test)]
    fn channel(&self, channel: Channel) -> f64 {
        self.values.get(channel)
    }
}

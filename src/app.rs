use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::blur_effect::BlurEffect;
use crate::contact_form::ContactForm;
use crate::event_source::EventSource;
use crate::frame::{FrameScheduler, IntervalFrameScheduler};
use crate::loading_screen::LoadingScreen;
use crate::page_manager::{BlurMask, PageCue, PageManager};
use crate::ruler_navigation::{Page, PointerEvent, RulerConfig, RulerNavigation};
use crate::settings::Settings;
use crate::theme::{Base16Palette, current_theme};
use crate::tween::{Immediate, Timeline, TweenScheduler};
use crate::typing_effect::TypingEffect;
use crate::widget::loading::render_loading;
use crate::widget::page_view::{PageHit, PageHits, PageView, about_detail_anchor};
use crate::widget::ruler::{RULER_HEIGHT, RulerHit, RulerView};
use crate::widget::spotlight::{area_px, cell_center_px, render_spotlight};

const MAX_EVENTS_PER_TURN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

/// Page changes reported by the components, handled by the app on its own turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageMessage {
    /// The ruler committed a page.
    Ruler(usize),
    /// The page manager switched page.
    Shown(usize),
}

pub struct App {
    settings: Settings,
    palette: &'static Base16Palette,
    ruler: RulerNavigation<RulerView>,
    pages: PageManager,
    typing: TypingEffect,
    form: ContactForm,
    blur: BlurEffect,
    loading: LoadingScreen,
    page_hits: PageHits,
    messages: Receiver<PageMessage>,
    editing: bool,
    initialized: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let ruler_frames = IntervalFrameScheduler::with_fps(settings.fps);
        let blur_frames = IntervalFrameScheduler::with_fps(settings.fps);
        let tweens: Box<dyn TweenScheduler<PageCue>> = if settings.animations {
            Box::new(Timeline::new())
        } else {
            Box::new(Immediate::new())
        };
        let form = ContactForm::new(
            settings.contact.failure_rate,
            Duration::from_millis(settings.contact.submit_delay_ms),
        );
        Self::with_parts(
            settings,
            Box::new(ruler_frames),
            Box::new(blur_frames),
            tweens,
            form,
        )
    }

    pub fn with_parts(
        settings: Settings,
        ruler_frames: Box<dyn FrameScheduler>,
        blur_frames: Box<dyn FrameScheduler>,
        tweens: Box<dyn TweenScheduler<PageCue>>,
        form: ContactForm,
    ) -> Self {
        let (tx, messages) = mpsc::channel();

        let mut ruler = RulerNavigation::new(
            RulerView::new(),
            ruler_frames,
            RulerConfig::from(&settings.ruler),
        );
        let ruler_tx = tx.clone();
        ruler.set_on_page_change(move |page| {
            let _ = ruler_tx.send(PageMessage::Ruler(page));
        });

        let mut pages = PageManager::new(tweens, settings.owner_name.clone());
        pages.set_detail_anchor(about_detail_anchor());
        pages.set_on_page_changed(move |page| {
            let _ = tx.send(PageMessage::Shown(page));
        });

        let typing = TypingEffect::new(settings.roles.clone());
        let loading = LoadingScreen::new(settings.loading_screen && settings.animations);

        Self {
            settings,
            palette: current_theme(),
            ruler,
            pages,
            typing,
            form,
            blur: BlurEffect::new(blur_frames),
            loading,
            page_hits: PageHits::default(),
            messages,
            editing: false,
            initialized: false,
        }
    }

    pub fn init(&mut self, now: Instant) {
        if self.initialized {
            return;
        }
        self.loading.start(now);
        self.blur.init();
        self.ruler.init();
        self.pages.init();
        self.blur.set_mask(self.pages.blur_mask());
        if !self.loading.is_hidden() {
            self.blur.hide();
        }
        self.typing.init(now);
        self.initialized = true;
        info!("Portfolio app initialized");
    }

    pub fn destroy(&mut self) {
        self.blur.destroy();
        self.ruler.destroy();
        self.pages.destroy();
        self.typing.destroy();
        self.form.destroy();
        self.initialized = false;
        debug!("Portfolio app destroyed");
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Option<AppAction> {
        let action = match event {
            Event::Key(key) => self.handle_key_event(*key, now),
            Event::Mouse(mouse) => {
                self.handle_mouse_event(*mouse);
                None
            }
            _ => None,
        };
        self.drain_messages(now);
        action
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Option<AppAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if self.editing {
            self.handle_form_key(key, now);
            return None;
        }

        let page = self.pages.current_page();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppAction::Quit),
            // The loading overlay swallows everything else
            _ if !self.loading.is_hidden() => {}
            KeyCode::Char('h') | KeyCode::Left => self.ruler.navigate_prev(),
            KeyCode::Char('l') | KeyCode::Right => self.ruler.navigate_next(),
            KeyCode::Char('j') | KeyCode::Down => self.activate(PageHit::ScrollArrows),
            KeyCode::Char('c') if page == Page::Home.index() => {
                self.activate(PageHit::ContactButton)
            }
            KeyCode::Char('i') | KeyCode::Enter | KeyCode::Tab if page == Page::Contact.index() => {
                self.editing = true;
            }
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.form.blur();
                self.editing = false;
            }
            KeyCode::Tab => self.form.focus_next(),
            KeyCode::Enter => {
                if self.form.submit(now) {
                    info!("Contact form submitted");
                }
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.insert_char(c),
            _ => {}
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if !self.loading.is_hidden() {
            return;
        }
        let cell_width_px = self.settings.cell_width_px;
        let x = mouse.column as f64 * cell_width_px;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.ruler.sink().hit(mouse.column, mouse.row) {
                    Some(RulerHit::Prev) => self.ruler.navigate_prev(),
                    Some(RulerHit::Next) => self.ruler.navigate_next(),
                    Some(RulerHit::Container) => self.ruler.handle_pointer(PointerEvent::Down(x)),
                    None => {
                        if let Some(hit) = self.page_hits.hit(mouse.column, mouse.row) {
                            self.activate(hit);
                        }
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                let (px, py) = cell_center_px(mouse.column, mouse.row, cell_width_px);
                self.blur.pointer_moved(px, py);
                self.ruler.handle_pointer(PointerEvent::Move(x));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.ruler.handle_pointer(PointerEvent::Up);
            }
            _ => {}
        }
    }

    /// Press one of the page's own controls. Controls that are hidden or
    /// belong to another page do nothing.
    fn activate(&mut self, hit: PageHit) {
        match hit {
            PageHit::ScrollArrows => {
                if self.pages.are_scroll_arrows_interactive() {
                    self.pages.scroll_to_about_detail();
                }
            }
            PageHit::ContactButton => {
                if self.pages.current_page() == Page::Home.index() {
                    self.pages.navigate_to_page(Page::Contact.index(), false);
                }
            }
        }
    }

    /// Run frame work that has come due. Returns true if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.loading.tick(now) {
            changed = true;
            if self.loading.is_hidden() {
                self.blur.show();
            }
        }
        changed |= self.ruler.pump(now);
        changed |= self.blur.pump(now);
        changed |= self.pages.update(now);
        self.blur.set_mask(self.pages.blur_mask());
        changed |= self.typing.tick(now);
        changed |= self.form.tick(now);
        self.drain_messages(now);
        changed
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.settings.fps.max(1)
    }

    fn drain_messages(&mut self, now: Instant) {
        while let Ok(message) = self.messages.try_recv() {
            match message {
                PageMessage::Ruler(page) => self.pages.navigate_to_page(page, true),
                PageMessage::Shown(page) => {
                    self.ruler.update_current_page(page);
                    if page == Page::Home.index() {
                        self.typing.start(now);
                    } else {
                        self.typing.pause();
                    }
                    if page != Page::Contact.index() {
                        self.editing = false;
                    }
                }
            }
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(RULER_HEIGHT),
                Constraint::Length(1),
            ])
            .split(f.area());

        let page_area = chunks[0];
        self.page_hits = PageView {
            pages: &self.pages,
            typing: &self.typing,
            form: &self.form,
            palette: self.palette,
        }
        .render(f, page_area);

        let cell_width_px = self.settings.cell_width_px;
        let (width_px, height_px) = area_px(page_area, cell_width_px);
        self.blur.center_on(width_px, height_px);
        if self.blur.is_visible() && self.blur.mask() == BlurMask::Spotlight {
            render_spotlight(
                f.buffer_mut(),
                page_area,
                self.blur.position(),
                cell_width_px,
                self.palette.spotlight(self.pages.backdrop()),
            );
        }

        self.ruler
            .sink_mut()
            .render(f, chunks[1], cell_width_px, self.palette);

        let page = self.pages.current_page();
        let help = if self.editing {
            "Tab next field · Enter send · Esc stop editing"
        } else if page == Page::Contact.index() {
            "drag the ruler or h/l · i edit form · q quit"
        } else if page == Page::About.index() {
            "drag the ruler or h/l · j more · q quit"
        } else {
            "drag the ruler or h/l · c contact · q quit"
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                help,
                Style::default().fg(self.palette.base_03),
            ))),
            chunks[2],
        );

        if !self.loading.is_hidden() {
            render_loading(f, f.area(), &self.loading, self.palette);
        }
    }

    pub fn current_page(&self) -> usize {
        self.ruler.current_page()
    }

    pub fn ruler(&self) -> &RulerNavigation<RulerView> {
        &self.ruler
    }

    pub fn pages(&self) -> &PageManager {
        &self.pages
    }

    pub fn typing(&self) -> &TypingEffect {
        &self.typing
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn blur(&self) -> &BlurEffect {
        &self.blur
    }

    pub fn is_loading(&self) -> bool {
        !self.loading.is_hidden()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    app.init(Instant::now());
    // Draw once so the ruler knows where it is before the first click.
    terminal.draw(|f| app.draw(f))?;

    loop {
        let mut events_processed = 0;
        let mut should_quit = false;
        while event_source.poll(Duration::from_millis(0))? && events_processed < MAX_EVENTS_PER_TURN
        {
            let event = event_source.read()?;
            events_processed += 1;
            if app.handle_event(&event, Instant::now()) == Some(AppAction::Quit) {
                should_quit = true;
                break;
            }
        }

        let now = Instant::now();
        let mut needs_redraw = events_processed > 0;
        needs_redraw |= app.tick(now);

        if needs_redraw {
            terminal.draw(|f| app.draw(f))?;
        }

        if should_quit {
            app.destroy();
            return Ok(());
        }

        // If no events were processed, wait for input until the next frame
        if events_processed == 0 {
            let _ = event_source.poll(app.frame_interval());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_source::SimulatedEventSource;
    use crate::frame::ManualFrameScheduler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app_with(settings: Settings) -> App {
        let form = ContactForm::with_rng(0.0, Duration::from_millis(1500), StdRng::seed_from_u64(1));
        let mut app = App::with_parts(
            settings,
            Box::new(ManualFrameScheduler::new()),
            Box::new(ManualFrameScheduler::new()),
            Box::new(Immediate::new()),
            form,
        );
        app.init(Instant::now());
        app
    }

    fn app() -> App {
        app_with(Settings {
            loading_screen: false,
            ..Settings::default()
        })
    }

    fn press(app: &mut App, code: KeyCode) -> Option<AppAction> {
        app.handle_event(
            &Event::Key(KeyEvent::new(code, crossterm::event::KeyModifiers::empty())),
            Instant::now(),
        )
    }

    #[test]
    fn test_ruler_navigation_drives_page_manager() {
        let mut app = app();

        press(&mut app, KeyCode::Char('l'));
        app.tick(Instant::now());

        assert_eq!(app.current_page(), 1);
        assert_eq!(app.pages().current_page(), 1);
        assert_eq!(app.pages().title(), "About Me");
        assert!(app.typing().is_paused());
    }

    #[test]
    fn test_contact_button_syncs_ruler() {
        let mut app = app();

        press(&mut app, KeyCode::Char('c'));

        assert_eq!(app.pages().current_page(), 2);
        assert_eq!(app.ruler().current_page(), 2);
        assert_eq!(app.ruler().snap_target_x(), -850.0);
    }

    #[test]
    fn test_returning_home_restarts_typing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('h'));

        assert_eq!(app.pages().current_page(), 0);
        assert!(!app.typing().is_paused());
        assert_eq!(app.typing().text(), "");
    }

    #[test]
    fn test_form_editing_captures_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('i'));
        assert!(app.is_editing());

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.form().data().name, "q");
        assert_eq!(app.current_page(), 2);

        assert_eq!(press(&mut app, KeyCode::Esc), None);
        assert!(!app.is_editing());
        assert_eq!(press(&mut app, KeyCode::Esc), Some(AppAction::Quit));
    }

    #[test]
    fn test_init_is_idempotent_and_destroy_stops_ruler() {
        let mut app = app();
        app.init(Instant::now());
        assert!(app.ruler().is_animating());

        app.destroy();
        app.destroy();
        assert!(!app.ruler().is_animating());
    }

    #[test]
    fn test_contact_key_only_works_on_home() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        app.tick(Instant::now());

        press(&mut app, KeyCode::Char('c'));
        app.tick(Instant::now());

        assert_eq!(app.pages().current_page(), 1);
        assert_eq!(app.pages().title(), "About Me");
    }

    #[test]
    fn test_detail_key_needs_visible_arrows() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        assert!(!app.pages().is_animating());

        press(&mut app, KeyCode::Char('l'));
        app.tick(Instant::now());
        press(&mut app, KeyCode::Char('j'));
        app.tick(Instant::now());
        assert!(app.pages().is_about_detailed_view());
        assert!(!app.pages().are_scroll_arrows_interactive());

        // Arrows are gone once the detail is open
        press(&mut app, KeyCode::Down);
        assert!(!app.pages().is_animating());
    }

    #[test]
    fn test_loading_screen_swallows_input_until_done() {
        let start = Instant::now();
        let mut app = app_with(Settings::default());
        assert!(app.is_loading());
        assert!(!app.blur().is_visible());

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.current_page(), 0);

        app.tick(start + Duration::from_secs(3));
        assert!(!app.is_loading());
        assert!(app.blur().is_visible());

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.current_page(), 1);
    }

    #[test]
    fn test_no_animations_skips_loading_screen() {
        let app = app_with(Settings {
            animations: false,
            ..Settings::default()
        });
        assert!(!app.is_loading());
    }

    #[test]
    fn test_spotlight_tracks_pointer_and_page_mask() {
        let mut app = app();
        app.handle_event(
            &SimulatedEventSource::mouse(MouseEventKind::Moved, 10, 5),
            Instant::now(),
        );
        assert_eq!(app.blur().target(), (105.0, 110.0));
        assert!(app.tick(Instant::now()));
        assert_eq!(app.blur().mask(), BlurMask::Spotlight);

        press(&mut app, KeyCode::Char('l'));
        app.tick(Instant::now());
        assert_eq!(app.blur().mask(), BlurMask::None);
    }
}

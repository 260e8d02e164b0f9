// Export modules for use in tests
pub mod app;
pub mod blur_effect;
pub mod contact_form;
pub mod event_source;
pub mod frame;
pub mod loading_screen;
pub mod page_manager;
pub mod panic_handler;
pub mod ruler_navigation;
pub mod settings;
pub mod theme;
pub mod tween;
pub mod typing_effect;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main app components
pub use app::{App, AppAction, run_app_with_event_source};
pub use ruler_navigation::{Page, PointerEvent, RulerConfig, RulerNavigation, RulerSink};

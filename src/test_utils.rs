pub mod test_helpers {
    use std::time::Duration;

    use crate::app::App;
    use crate::contact_form::ContactForm;
    use crate::event_source::{Event, KeyCode, KeyModifiers, SimulatedEventSource};
    use crate::frame::ManualFrameScheduler;
    use crate::settings::Settings;
    use crate::tween::Immediate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Builder for creating test scenarios with simulated user input
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl Default for TestScenarioBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self { events: Vec::new() }
        }

        /// Add a character key press
        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        pub fn press_key(mut self, code: KeyCode) -> Self {
            self.events
                .push(SimulatedEventSource::key_event(code, KeyModifiers::empty()));
            self
        }

        /// Left click (press and release) at a cell
        pub fn click(mut self, column: u16, row: u16) -> Self {
            self.events.push(SimulatedEventSource::mouse_down(column, row));
            self.events.push(SimulatedEventSource::mouse_up(column, row));
            self
        }

        /// Press at `from`, drag one column at a time to `to`, release there
        pub fn drag(mut self, from: u16, to: u16, row: u16) -> Self {
            self.events.push(SimulatedEventSource::mouse_down(from, row));
            let mut column = from;
            while column != to {
                column = if to > column { column + 1 } else { column - 1 };
                self.events.push(SimulatedEventSource::mouse_drag(column, row));
            }
            self.events.push(SimulatedEventSource::mouse_up(to, row));
            self
        }

        pub fn type_text(mut self, text: &str) -> Self {
            for c in text.chars() {
                self.events.push(SimulatedEventSource::char_key(c));
            }
            self
        }

        /// Quit the application (press 'q')
        pub fn quit(mut self) -> Self {
            self.events.push(SimulatedEventSource::char_key('q'));
            self
        }

        /// Build the simulated event source
        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// App with instant transitions, no loading screen, a frame on every tick and
    /// a form that never fails
    pub fn create_test_app() -> App {
        let form = ContactForm::with_rng(0.0, Duration::from_millis(1500), StdRng::seed_from_u64(7));
        let settings = Settings {
            loading_screen: false,
            ..Settings::default()
        };
        App::with_parts(
            settings,
            Box::new(ManualFrameScheduler::new()),
            Box::new(ManualFrameScheduler::new()),
            Box::new(Immediate::new()),
            form,
        )
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                if let Some(cell) = buffer.cell((x, y)) {
                    line.push_str(cell.symbol());
                }
            }
            // Trim trailing whitespace from each line
            lines.push(line.trim_end().to_string());
        }

        // Remove trailing empty lines
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;

    #[test]
    fn test_scenario_builder() {
        let scenario = TestScenarioBuilder::new()
            .press_char('l')
            .drag(50, 47, 20)
            .click(0, 18)
            .type_text("hi")
            .quit()
            .build();

        // 1 key, down + 3 drags + up, down + up, 2 chars, quit
        assert_eq!(scenario.remaining(), 12);
    }
}

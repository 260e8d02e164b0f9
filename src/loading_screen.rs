use std::time::{Duration, Instant};

/// One percent per step, so the screen clears after two seconds.
const STEP: Duration = Duration::from_millis(20);

/// Start-up progress screen counting from 0 to 100%.
#[derive(Debug, Clone)]
pub struct LoadingScreen {
    progress: u16,
    next_step_at: Option<Instant>,
    hidden: bool,
}

impl LoadingScreen {
    pub fn new(enabled: bool) -> Self {
        Self {
            progress: if enabled { 0 } else { 100 },
            next_step_at: None,
            hidden: !enabled,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if !self.hidden && self.next_step_at.is_none() {
            self.next_step_at = Some(now + STEP);
        }
    }

    /// Take every step that has come due. Returns true if the progress moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(at) = self.next_step_at {
            if now < at {
                break;
            }
            self.progress += 1;
            changed = true;
            if self.progress >= 100 {
                self.hidden = true;
                self.next_step_at = None;
            } else {
                self.next_step_at = Some(at + STEP);
            }
        }
        changed
    }

    pub fn progress(&self) -> u16 {
        self.progress
    }

    pub fn label(&self) -> String {
        format!("{}%", self.progress)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

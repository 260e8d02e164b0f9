use std::time::{Duration, Instant};

const TYPE_DELAY: Duration = Duration::from_millis(100);
const DELETE_DELAY: Duration = Duration::from_millis(50);
const NEXT_ROLE_PAUSE: Duration = Duration::from_millis(500);
const FULL_ROLE_PAUSE: Duration = Duration::from_millis(1000);

pub fn default_roles() -> Vec<String> {
    [
        "Graphic Designer",
        "Web Developer",
        "Creative Thinker",
        "Tech Explorer",
        "UI/UX Enthusiast",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Typewriter line that types a role, deletes it and moves on to the next.
#[derive(Debug, Clone)]
pub struct TypingEffect {
    roles: Vec<String>,
    role_index: usize,
    char_index: usize,
    is_deleting: bool,
    is_paused: bool,
    text: String,
    next_step_at: Option<Instant>,
}

impl TypingEffect {
    pub fn new(roles: Vec<String>) -> Self {
        Self {
            roles,
            role_index: 0,
            char_index: 0,
            is_deleting: false,
            is_paused: false,
            text: String::new(),
            next_step_at: None,
        }
    }

    pub fn init(&mut self, now: Instant) {
        self.start(now);
    }

    /// Restart from the first role.
    pub fn start(&mut self, now: Instant) {
        if self.roles.is_empty() {
            return;
        }
        self.role_index = 0;
        self.char_index = 0;
        self.is_deleting = false;
        self.is_paused = false;
        self.step(now);
    }

    pub fn pause(&mut self) {
        self.is_paused = true;
        self.next_step_at = None;
    }

    pub fn resume(&mut self, now: Instant) {
        if self.is_paused {
            self.is_paused = false;
            self.step(now);
        }
    }

    pub fn destroy(&mut self) {
        self.next_step_at = None;
        self.is_paused = true;
    }

    /// Run the pending step if its time has come. Returns true if the text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.next_step_at {
            Some(at) if now >= at => {
                self.step(now);
                true
            }
            _ => false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_running(&self) -> bool {
        self.next_step_at.is_some()
    }

    fn step(&mut self, now: Instant) {
        if self.is_paused {
            return;
        }
        let Some(current) = self.roles.get(self.role_index) else {
            return;
        };
        let role_len = current.chars().count();

        self.text = current.chars().take(self.char_index).collect();
        if self.is_deleting {
            self.char_index = self.char_index.saturating_sub(1);
        } else {
            self.char_index += 1;
        }

        let mut delay = if self.is_deleting {
            DELETE_DELAY
        } else {
            TYPE_DELAY
        };

        if self.is_deleting && self.char_index == 0 {
            self.is_deleting = false;
            self.role_index = (self.role_index + 1) % self.roles.len();
            delay = NEXT_ROLE_PAUSE;
        } else if !self.is_deleting && self.char_index == role_len + 1 {
            self.is_deleting = true;
            delay = FULL_ROLE_PAUSE;
        }

        self.next_step_at = Some(now + delay);
    }
}

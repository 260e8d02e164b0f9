use std::sync::LazyLock;
use std::time::{Duration, Instant};

use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
});

const BANNER_DURATION: Duration = Duration::from_secs(5);
pub const SUBMIT_LABEL: &str = "Send Message";
pub const SENDING_LABEL: &str = "Sending...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Message => "Message",
        }
    }

    pub fn next(self) -> Field {
        match self {
            Field::Name => Field::Email,
            Field::Email => Field::Message,
            Field::Message => Field::Name,
        }
    }

    fn slot(self) -> usize {
        match self {
            Field::Name => 0,
            Field::Email => 1,
            Field::Message => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Name must be at least 2 characters long")]
    NameTooShort,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Message must be at least 10 characters long")]
    MessageTooShort,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("simulated network error")]
    Network,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }
}

/// Rule applied on submit.
pub fn check_field(field: Field, value: &str) -> Result<(), FieldError> {
    match field {
        Field::Name if value.trim().chars().count() < 2 => Err(FieldError::NameTooShort),
        Field::Email if !EMAIL_RE.is_match(value) => Err(FieldError::InvalidEmail),
        Field::Message if value.trim().chars().count() < 10 => Err(FieldError::MessageTooShort),
        _ => Ok(()),
    }
}

/// Rule applied when leaving a field: empty is fine until submit.
pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    check_field(field, value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
    pub expires_at: Instant,
}

impl Banner {
    fn new(message: impl Into<String>, kind: BannerKind, now: Instant) -> Self {
        Self {
            message: message.into(),
            kind,
            expires_at: now + BANNER_DURATION,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug)]
struct Submission {
    data: FormData,
    completes_at: Instant,
}

/// Contact form with local validation. Sending is simulated: nothing leaves
/// the process.
pub struct ContactForm {
    data: FormData,
    errors: [Option<FieldError>; 3],
    focused: Field,
    pending: Option<Submission>,
    banner: Option<Banner>,
    failure_rate: f64,
    submit_delay: Duration,
    rng: StdRng,
}

impl ContactForm {
    pub fn new(failure_rate: f64, submit_delay: Duration) -> Self {
        Self::with_rng(failure_rate, submit_delay, StdRng::from_entropy())
    }

    pub fn with_rng(failure_rate: f64, submit_delay: Duration, rng: StdRng) -> Self {
        Self {
            data: FormData::default(),
            errors: [None; 3],
            focused: Field::Name,
            pending: None,
            banner: None,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            submit_delay,
            rng,
        }
    }

    pub fn focused(&self) -> Field {
        self.focused
    }

    pub fn focus(&mut self, field: Field) {
        self.blur();
        self.focused = field;
    }

    pub fn focus_next(&mut self) {
        self.focus(self.focused.next());
    }

    /// Validate the focused field as it loses focus.
    pub fn blur(&mut self) {
        let field = self.focused;
        self.errors[field.slot()] = validate_field(field, self.data.get(field)).err();
    }

    pub fn insert_char(&mut self, c: char) {
        if self.is_submitting() {
            return;
        }
        self.data.get_mut(self.focused).push(c);
        self.clear_field_error(self.focused);
    }

    pub fn backspace(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.data.get_mut(self.focused).pop();
        self.clear_field_error(self.focused);
    }

    /// Validate and start the simulated submission. Returns true if it started.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.is_submitting() {
            return false;
        }
        if !self.validate_form() {
            return false;
        }

        self.pending = Some(Submission {
            data: self.data.clone(),
            completes_at: now + self.submit_delay,
        });
        true
    }

    /// Finish a due submission and expire old banners. Returns true on change.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.pending.as_ref().is_some_and(|s| now >= s.completes_at) {
            if let Some(submission) = self.pending.take() {
                match self.simulate_submission(&submission.data) {
                    Ok(()) => {
                        self.banner = Some(Banner::new(
                            "Thank you! Your message has been sent successfully.",
                            BannerKind::Success,
                            now,
                        ));
                        self.reset();
                    }
                    Err(e) => {
                        error!("Form submission error: {e}");
                        self.banner = Some(Banner::new(
                            "Failed to send message. Please try again.",
                            BannerKind::Error,
                            now,
                        ));
                    }
                }
                changed = true;
            }
        }

        if self.banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.banner = None;
            changed = true;
        }

        changed
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors[field.slot()]
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            SENDING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn reset(&mut self) {
        self.data = FormData::default();
        self.errors = [None; 3];
        self.focused = Field::Name;
    }

    pub fn destroy(&mut self) {
        self.pending = None;
        self.banner = None;
    }

    fn validate_form(&mut self) -> bool {
        let mut is_valid = true;
        for field in Field::ALL {
            let result = check_field(field, self.data.get(field));
            self.errors[field.slot()] = result.err();
            is_valid &= result.is_ok();
        }
        is_valid
    }

    fn clear_field_error(&mut self, field: Field) {
        self.errors[field.slot()] = None;
    }

    fn simulate_submission(&mut self, data: &FormData) -> Result<(), SubmitError> {
        info!(
            "Form submitted: name={:?} email={:?} ({} chars of message)",
            data.name,
            data.email,
            data.message.chars().count()
        );
        if self.rng.gen_bool(self.failure_rate) {
            return Err(SubmitError::Network);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(failure_rate: f64) -> ContactForm {
        ContactForm::with_rng(
            failure_rate,
            Duration::from_millis(1500),
            StdRng::seed_from_u64(7),
        )
    }

    fn type_str(form: &mut ContactForm, text: &str) {
        for c in text.chars() {
            form.insert_char(c);
        }
    }

    fn fill(form: &mut ContactForm, name: &str, email: &str, message: &str) {
        form.focus(Field::Name);
        type_str(form, name);
        form.focus(Field::Email);
        type_str(form, email);
        form.focus(Field::Message);
        type_str(form, message);
    }

    #[test]
    fn test_email_rule() {
        assert!(check_field(Field::Email, "me@example.com").is_ok());
        assert_eq!(
            check_field(Field::Email, "me@example"),
            Err(FieldError::InvalidEmail)
        );
        assert_eq!(
            check_field(Field::Email, "me @example.com"),
            Err(FieldError::InvalidEmail)
        );
    }

    #[test]
    fn test_blur_validation_allows_empty() {
        assert!(validate_field(Field::Name, "   ").is_ok());
        assert_eq!(validate_field(Field::Name, " a "), Err(FieldError::NameTooShort));
        assert_eq!(
            validate_field(Field::Message, "too short"),
            Err(FieldError::MessageTooShort)
        );
    }

    #[test]
    fn test_submit_reports_every_invalid_field() {
        let mut form = form(0.0);
        fill(&mut form, "A", "nope", "short");

        assert!(!form.submit(Instant::now()));
        assert_eq!(form.error(Field::Name), Some(FieldError::NameTooShort));
        assert_eq!(form.error(Field::Email), Some(FieldError::InvalidEmail));
        assert_eq!(form.error(Field::Message), Some(FieldError::MessageTooShort));
        assert_eq!(
            form.error(Field::Name).map(|e| e.to_string()).as_deref(),
            Some("Name must be at least 2 characters long")
        );
    }

    #[test]
    fn test_typing_clears_field_error() {
        let mut form = form(0.0);
        form.focus(Field::Email);
        type_str(&mut form, "bad");
        form.focus(Field::Message);
        assert_eq!(form.error(Field::Email), Some(FieldError::InvalidEmail));

        form.focus(Field::Email);
        form.insert_char('x');
        assert_eq!(form.error(Field::Email), None);
    }

    #[test]
    fn test_successful_submission_resets_form() {
        let mut form = form(0.0);
        fill(&mut form, "Ada", "ada@example.com", "Hello there, nice site!");
        let now = Instant::now();

        assert!(form.submit(now));
        assert!(form.is_submitting());
        assert_eq!(form.submit_label(), SENDING_LABEL);
        assert!(!form.submit(now));

        assert!(!form.tick(now + Duration::from_millis(1000)));
        assert!(form.tick(now + Duration::from_millis(1500)));

        assert!(!form.is_submitting());
        assert_eq!(form.submit_label(), SUBMIT_LABEL);
        assert_eq!(form.data(), &FormData::default());
        let banner = form.banner().expect("success banner");
        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(
            banner.message,
            "Thank you! Your message has been sent successfully."
        );
    }

    #[test]
    fn test_failed_submission_keeps_data() {
        let mut form = form(1.0);
        fill(&mut form, "Ada", "ada@example.com", "Hello there, nice site!");
        let now = Instant::now();

        assert!(form.submit(now));
        form.tick(now + Duration::from_secs(2));

        assert_eq!(form.data().name, "Ada");
        let banner = form.banner().expect("error banner");
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(banner.message, "Failed to send message. Please try again.");
    }

    #[test]
    fn test_banner_expires() {
        let mut form = form(0.0);
        fill(&mut form, "Ada", "ada@example.com", "Hello there, nice site!");
        let now = Instant::now();
        form.submit(now);
        form.tick(now + Duration::from_secs(2));

        assert!(form.tick(now + Duration::from_secs(8)));
        assert!(form.banner().is_none());
    }

    #[test]
    fn test_input_ignored_while_sending() {
        let mut form = form(0.0);
        fill(&mut form, "Ada", "ada@example.com", "Hello there, nice site!");
        form.submit(Instant::now());

        form.insert_char('!');
        form.backspace();

        assert_eq!(form.data().message, "Hello there, nice site!");
    }
}

//! Pattern-driven cleanup of trip and service IDs.
//!
//! The feed vendor tags trip and service IDs with the schedule period they
//! were published for (`JAN26-`, `SEPT25-`). Stripping the tag keeps the IDs
//! stable from one schedule period to the next.

use std::borrow::Cow;

use regex::Regex;

/// Schedule period tag, e.g. `JAN26-` or `SEPT25-`
pub const SCHEDULE_PERIOD_PATTERN: &str = r"^[A-Z]+\d{2}-";

#[derive(Clone, Debug, Default)]
pub struct IdCleanup {
    pattern: Option<Regex>,
}

impl IdCleanup {
    pub fn new(pattern: Option<Regex>) -> Self {
        Self { pattern }
    }

    /// Leaves IDs untouched
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.pattern.is_some()
    }

    /// Remove the first match of the pattern. An ID that would become empty
    /// is returned unchanged.
    pub fn clean<'a>(&self, id: &'a str) -> Cow<'a, str> {
        let Some(pattern) = &self.pattern else {
            return Cow::Borrowed(id);
        };
        match pattern.replace(id, "") {
            Cow::Owned(cleaned) if cleaned.is_empty() => Cow::Borrowed(id),
            cleaned => cleaned,
        }
    }
}

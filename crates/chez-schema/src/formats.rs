//! Named string format checkers
//!
//! Each checker is a total predicate over strings. Checkers are looked up by
//! format name in a [`FormatRegistry`]; an unknown name is treated as a pure
//! annotation and always passes.
//!
//! Built-in formats: `email`, `uri`, `uuid`, `date`, `time`, `date-time`,
//! `ipv4`, `ipv6` and `hostname`.
//!
//! Copyright (c) 2025 Chez Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

/// A format predicate
pub type FormatChecker = fn(&str) -> bool;

static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static DATE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static PARTIAL_TIME_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn cached_match(cell: &'static OnceLock<Option<Regex>>, pattern: &str, text: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|regex| regex.is_match(text))
}

/// `local-part@domain` with a dot-atom local part and LDH domain labels
pub fn is_email(text: &str) -> bool {
    cached_match(
        &EMAIL_REGEX,
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
        text,
    ) && !text.starts_with('.')
        && !text.contains("..")
        && !text.contains(".@")
}

/// Absolute URI with a scheme
pub fn is_uri(text: &str) -> bool {
    url::Url::parse(text).is_ok()
}

/// Hyphenated UUID, e.g. `550e8400-e29b-41d4-a716-446655440000`
pub fn is_uuid(text: &str) -> bool {
    text.len() == 36 && uuid::Uuid::parse_str(text).is_ok()
}

/// RFC 3339 `full-date`
pub fn is_date(text: &str) -> bool {
    cached_match(&DATE_REGEX, r"^\d{4}-\d{2}-\d{2}$", text)
        && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// RFC 3339 `full-time`; a `partial-time` without offset is also accepted
pub fn is_time(text: &str) -> bool {
    if DateTime::parse_from_rfc3339(&format!("1970-01-01T{}", text)).is_ok() {
        return true;
    }
    cached_match(&PARTIAL_TIME_REGEX, r"^\d{2}:\d{2}:\d{2}(?:\.\d+)?$", text)
        && NaiveTime::parse_from_str(text, "%H:%M:%S%.f").is_ok()
}

/// RFC 3339 `date-time`
pub fn is_date_time(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
}

pub fn is_ipv4(text: &str) -> bool {
    text.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(text: &str) -> bool {
    text.parse::<Ipv6Addr>().is_ok()
}

/// RFC 1123 host name: dot-separated labels of 1-63 letters, digits or hyphens
pub fn is_hostname(text: &str) -> bool {
    let text = text.strip_suffix('.').unwrap_or(text);
    if text.is_empty() || text.len() > 253 {
        return false;
    }
    text.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Format checkers keyed by format name
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    checkers: HashMap<String, FormatChecker>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Registry with every built-in format
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .register("email", is_email)
            .register("uri", is_uri)
            .register("uuid", is_uuid)
            .register("date", is_date)
            .register("time", is_time)
            .register("date-time", is_date_time)
            .register("ipv4", is_ipv4)
            .register("ipv6", is_ipv6)
            .register("hostname", is_hostname);
        registry
    }

    /// Registry without any checker; every format passes
    pub fn empty() -> Self {
        Self {
            checkers: HashMap::new(),
        }
    }

    /// Add or replace a checker
    pub fn register(&mut self, name: impl Into<String>, checker: FormatChecker) -> &mut Self {
        self.checkers.insert(name.into(), checker);
        self
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with(mut self, name: impl Into<String>, checker: FormatChecker) -> Self {
        self.register(name, checker);
        self
    }

    pub fn get(&self, name: &str) -> Option<FormatChecker> {
        self.checkers.get(name).copied()
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.checkers.contains_key(name)
    }

    /// Check `text` against the named format; unknown formats pass
    pub fn check(&self, name: &str, text: &str) -> bool {
        match self.get(name) {
            Some(checker) => checker(text),
            None => {
                tracing::trace!(format = name, "Unknown format treated as annotation");
                true
            }
        }
    }

    /// Registered format names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.checkers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

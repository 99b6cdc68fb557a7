//! Validated value types: fully-qualified hostnames and numeric-range host patterns.

use crate::error::{InvalidHostPattern, InvalidHostname};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("valid label regex")
});

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9]+)-([0-9]+)\]").expect("valid range regex"));

const MAX_HOSTNAME_LEN: usize = 253;

// ─── Hostname ───────────────────────────────────────────────────────────────

/// A fully-qualified domain name, checked once at construction.
///
/// The original spelling is kept verbatim (including a trailing dot), so
/// `Hostname::new(s)?.as_str() == s` for every accepted `s`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hostname(String);

impl Hostname {
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidHostname> {
        let value = value.into();
        match check_fqdn(&value) {
            Ok(()) => Ok(Hostname(value)),
            Err(reason) => Err(InvalidHostname { value, reason }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The name as DNS compares it: ASCII-lowercased, without a trailing dot.
    ///
    /// `WEB01.example.com.` and `web01.example.com` share one key.
    pub fn dns_key(&self) -> String {
        self.0
            .strip_suffix('.')
            .unwrap_or(&self.0)
            .to_ascii_lowercase()
    }
}

fn check_fqdn(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("hostname must not be empty".to_string());
    }
    let body = value.strip_suffix('.').unwrap_or(value);
    if body.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "hostname exceeds {} characters ({})",
            MAX_HOSTNAME_LEN,
            body.len()
        ));
    }
    for label in body.split('.') {
        if label.is_empty() {
            return Err("hostname contains an empty label".to_string());
        }
        if !LABEL_RE.is_match(label) {
            return Err(format!(
                "label '{}' must be 1-63 letters, digits or hyphens and must not start or end with a hyphen",
                label
            ));
        }
    }
    Ok(())
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Hostname {
    type Err = InvalidHostname;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hostname::new(s)
    }
}

impl TryFrom<String> for Hostname {
    type Error = InvalidHostname;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Hostname::new(value)
    }
}

impl From<Hostname> for String {
    fn from(h: Hostname) -> Self {
        h.0
    }
}

// ─── HostPattern ────────────────────────────────────────────────────────────

/// A hostname template with at most one `[start-end]` numeric range.
///
/// Expanding `host[08-10].example.com` yields `host08`, `host09`, `host10`:
/// numbers are zero-padded to the digit count of `start` as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostPattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum PatternKind {
    Literal(Hostname),
    Range(NumberRange),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct NumberRange {
    prefix: String,
    suffix: String,
    start: u64,
    end: u64,
    width: usize,
}

impl NumberRange {
    fn render(&self, num: u64) -> Result<Hostname, InvalidHostname> {
        Hostname::new(format!(
            "{}{:0width$}{}",
            self.prefix,
            num,
            self.suffix,
            width = self.width
        ))
    }
}

impl HostPattern {
    /// Parse and eagerly validate a pattern.
    ///
    /// The shortest and longest names of a non-empty range are rendered and
    /// checked; every other name differs only in a digit run whose length lies
    /// between the two. A reversed range (`start > end`) is accepted and
    /// expands to nothing.
    pub fn parse(pattern: &str) -> Result<Self, InvalidHostPattern> {
        let invalid = |reason: String| InvalidHostPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let Some(caps) = RANGE_RE.captures(pattern) else {
            let host = Hostname::new(pattern).map_err(|e| invalid(e.reason))?;
            return Ok(HostPattern {
                raw: pattern.to_string(),
                kind: PatternKind::Literal(host),
            });
        };

        let (Some(marker), Some(start), Some(end)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            return Err(invalid("malformed range marker".to_string()));
        };
        let parse_bound = |digits: &str| {
            digits
                .parse::<u64>()
                .map_err(|_| invalid(format!("range bound '{}' is too large", digits)))
        };

        let range = NumberRange {
            prefix: pattern[..marker.start()].to_string(),
            suffix: pattern[marker.end()..].to_string(),
            start: parse_bound(start.as_str())?,
            end: parse_bound(end.as_str())?,
            width: start.as_str().len(),
        };

        if range.start <= range.end {
            for num in [range.start, range.end] {
                range.render(num).map_err(|e| invalid(e.to_string()))?;
            }
        }

        Ok(HostPattern {
            raw: pattern.to_string(),
            kind: PatternKind::Range(range),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the pattern carries a range marker.
    pub fn is_range(&self) -> bool {
        matches!(self.kind, PatternKind::Range(_))
    }

    /// Number of hostnames the pattern expands to.
    pub fn len(&self) -> u64 {
        match &self.kind {
            PatternKind::Literal(_) => 1,
            PatternKind::Range(r) if r.start <= r.end => (r.end - r.start).saturating_add(1),
            PatternKind::Range(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily expand the pattern, re-validating every produced name.
    ///
    /// Each call starts over; the iterator borrows the pattern and keeps no
    /// state beyond its own position.
    pub fn iter(&self) -> impl Iterator<Item = Result<Hostname, InvalidHostname>> + '_ {
        let (literal, range) = match &self.kind {
            PatternKind::Literal(host) => (Some(host.clone()), None),
            PatternKind::Range(range) => (None, Some(range)),
        };
        literal
            .into_iter()
            .map(Ok)
            .chain(range.into_iter().flat_map(|r| (r.start..=r.end).map(move |num| r.render(num))))
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for HostPattern {
    type Err = InvalidHostPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostPattern::parse(s)
    }
}

impl TryFrom<String> for HostPattern {
    type Error = InvalidHostPattern;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HostPattern::parse(&value)
    }
}

impl<'de> Deserialize<'de> for HostPattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        HostPattern::parse(&raw).map_err(serde::de::Error::custom)
    }
}

//! Job selectors
//!
//! Selectors encapsulate the matching logic used to pick jobs out of the
//! inventory. They can be composed with logical AND / OR to express
//! compound selection rules, and are pure values with no side effects so
//! they are reusable across the CLI, automation and tests.

use regex::Regex;

use crate::domain::job::Job;
use crate::error::SelectorError;

/// A composable predicate over a [`Job`].
///
/// The variant set is closed: name pattern and tag equality leaves,
/// combined by `And` / `Or`. Composites delegate to their children;
/// leaves never recurse.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Matches when the compiled pattern is found anywhere in the job name.
    NameRegex(Regex),
    /// Matches when the job carries exactly this tag key/value pair.
    TagEquals { key: String, value: String },
    /// Matches when every child matches.
    And(Vec<Selector>),
    /// Matches when at least one child matches.
    Or(Vec<Selector>),
}

impl Selector {
    /// Build a name selector, validating the pattern up front.
    ///
    /// An unparsable pattern fails here, not on first match.
    pub fn name_regex(pattern: &str) -> Result<Self, SelectorError> {
        Ok(Self::NameRegex(Regex::new(pattern)?))
    }

    /// Build a tag equality selector.
    pub fn tag_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TagEquals {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether the given job satisfies this selector.
    pub fn matches(&self, job: &Job) -> bool {
        match self {
            Self::NameRegex(regex) => regex.is_match(&job.name),
            Self::TagEquals { key, value } => job.tags.get(key) == Some(value),
            Self::And(children) => children.iter().all(|s| s.matches(job)),
            Self::Or(children) => children.iter().any(|s| s.matches(job)),
        }
    }
}

/// Build a selector from user-supplied criteria.
///
/// Converts an optional name pattern and zero or more `key=value` tag
/// filters into a single [`Selector`], combining multiple criteria with
/// OR when `use_or` is set and AND otherwise. A single criterion is
/// returned unwrapped, without a composite around it.
///
/// Fails when no criteria are given, when the name pattern does not
/// compile, or when a tag filter is not exactly one `=` separating a
/// non-empty key from a value.
pub fn build_selector(
    name: Option<&str>,
    tags: &[String],
    use_or: bool,
) -> Result<Selector, SelectorError> {
    let mut selectors = Vec::new();

    if let Some(pattern) = name.filter(|p| !p.is_empty()) {
        selectors.push(Selector::name_regex(pattern)?);
    }

    for tag in tags {
        let (key, value) = split_tag(tag).ok_or_else(|| SelectorError::InvalidTag(tag.clone()))?;
        selectors.push(Selector::tag_equals(key, value));
    }

    if selectors.is_empty() {
        return Err(SelectorError::Empty);
    }

    if selectors.len() == 1 {
        return Ok(selectors.remove(0));
    }

    Ok(if use_or {
        Selector::Or(selectors)
    } else {
        Selector::And(selectors)
    })
}

/// Split a `key=value` filter. Exactly one `=`, non-empty key.
fn split_tag(raw: &str) -> Option<(&str, &str)> {
    let (key, value) = raw.split_once('=')?;
    if key.is_empty() || value.contains('=') {
        return None;
    }
    Some((key, value))
}

//! Rule text parsing (made by FontLab https://www.fontlab.com/)
//!
//! Rule text is line oriented:
//!
//! ```text
//! # comment
//! match: any | all
//! name: <wildcard>
//! script: <tag>
//! category: <tag>
//! group: <wildcard>
//! macro: <name>
//! ```
//!
//! Predicate lines accumulate into sets, so order and duplicates do not
//! matter. `macro:` lines are expanded at parse time from a [`MacroTable`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::macros::MacroTable;

/// How the predicate votes of a filter combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Any voting predicate group succeeding is enough.
    #[default]
    Any,
    /// Every voting predicate group must succeed.
    All,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Any => "any",
            MatchPolicy::All => "all",
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported while parsing rule text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Unknown match type: {0}")]
    UnknownMatchType(String),

    #[error("Unknown tag: {0}.")]
    UnknownTag(String),

    #[error("Macros are not allowed.")]
    MacrosNotAllowed,

    #[error("Missing ':' in rule line: {0}")]
    MissingColon(String),
}

/// A parsed, fully macro-expanded rule filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFilter {
    #[serde(default)]
    policy: MatchPolicy,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    names: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    scripts: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    categories: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    groups: BTreeSet<String>,
}

impl RuleFilter {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_scripts<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts.extend(scripts.into_iter().map(Into::into));
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.extend(categories.into_iter().map(Into::into));
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Name wildcards.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn scripts(&self) -> &BTreeSet<String> {
        &self.scripts
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Group name wildcards.
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// True when no predicate set holds anything.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
            && self.scripts.is_empty()
            && self.categories.is_empty()
            && self.groups.is_empty()
    }

    /// Union another filter's predicates into this one. The policy is untouched.
    fn absorb(&mut self, other: &RuleFilter) {
        self.names.extend(other.names.iter().cloned());
        self.scripts.extend(other.scripts.iter().cloned());
        self.categories.extend(other.categories.iter().cloned());
        self.groups.extend(other.groups.iter().cloned());
    }
}

/// One `tag: content` line with comments and surrounding whitespace removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleLine<'a> {
    pub tag: &'a str,
    pub content: &'a str,
}

/// Strip a trailing `#` comment and surrounding whitespace.
pub(crate) fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or_default().trim()
}

/// Split rule text into `(tag, content)` pairs, skipping blanks and comments.
pub fn rule_lines(text: &str) -> impl Iterator<Item = Result<RuleLine<'_>, RuleError>> {
    text.lines().filter_map(|raw| {
        let line = strip_comment(raw);
        if line.is_empty() {
            return None;
        }
        Some(match line.split_once(':') {
            Some((tag, content)) => Ok(RuleLine {
                tag: tag.trim(),
                content: content.trim(),
            }),
            None => Err(RuleError::MissingColon(line.to_string())),
        })
    })
}

/// Parse rule text into a [`RuleFilter`].
///
/// Passing `None` for `macros` disallows `macro:` lines entirely; this is how
/// macro bodies are parsed, which keeps expansion one level deep. A macro
/// name missing from the table contributes nothing.
pub fn parse_rules(text: &str, macros: Option<&MacroTable>) -> Result<RuleFilter, RuleError> {
    let mut filter = RuleFilter::default();

    for line in rule_lines(text) {
        let RuleLine { tag, content } = line?;
        match tag {
            "match" => {
                filter.policy = match content {
                    "any" => MatchPolicy::Any,
                    "all" => MatchPolicy::All,
                    other => return Err(RuleError::UnknownMatchType(other.to_string())),
                };
            }
            "name" => {
                filter.names.insert(content.to_string());
            }
            "script" => {
                filter.scripts.insert(content.to_string());
            }
            "category" => {
                filter.categories.insert(content.to_string());
            }
            "group" => {
                filter.groups.insert(content.to_string());
            }
            "macro" => {
                let table = macros.ok_or(RuleError::MacrosNotAllowed)?;
                match table.get(content) {
                    Some(expansion) => filter.absorb(expansion),
                    None => {
                        tracing::debug!(macro_name = content, "unknown macro ignored");
                    }
                }
            }
            other => return Err(RuleError::UnknownTag(other.to_string())),
        }
    }

    Ok(filter)
}

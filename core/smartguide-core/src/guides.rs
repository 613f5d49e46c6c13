//! Rule-driven guide visibility (made by FontLab https://www.fontlab.com/)
//!
//! A guide may carry rule text. Whenever the current glyph or the macro
//! configuration changes, the caller runs [`apply_visibility`] to show the
//! guides whose rules match the glyph and hide the others.

use serde::{Deserialize, Serialize};

use crate::macros::MacroTable;
use crate::matcher::{matches, GlyphAttributes};
use crate::rules::{parse_rules, RuleError};

/// A guideline together with its stored rule text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    rules: Option<String>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl Default for Guide {
    fn default() -> Self {
        Self {
            name: None,
            rules: None,
            visible: true,
        }
    }
}

impl Guide {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn rules(&self) -> Option<&str> {
        self.rules.as_deref()
    }

    /// Replace the rule text after checking that it parses.
    ///
    /// Macro references are accepted without being resolved. On error the
    /// previous text is kept. Blank text removes the rules.
    pub fn set_rules(&mut self, text: &str) -> Result<(), RuleError> {
        if text.trim().is_empty() {
            self.rules = None;
            return Ok(());
        }
        parse_rules(text, Some(&MacroTable::new()))?;
        self.rules = Some(text.to_string());
        Ok(())
    }
}

/// A guide whose rule text could not be parsed during a visibility pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideFailure {
    pub index: usize,
    pub name: Option<String>,
    pub error: RuleError,
}

/// Outcome of one visibility pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    pub shown: usize,
    pub hidden: usize,
    pub skipped: usize,
    pub failures: Vec<GuideFailure>,
}

/// Set `visible` on every guide carrying rules, according to `glyph`.
///
/// Guides without rules are left alone; guides with unparsable rules keep
/// their current visibility and are listed in the report.
pub fn apply_visibility<A>(
    guides: &mut [Guide],
    glyph: &str,
    attrs: &A,
    macros: &MacroTable,
) -> VisibilityReport
where
    A: GlyphAttributes + ?Sized,
{
    let mut report = VisibilityReport::default();

    for (index, guide) in guides.iter_mut().enumerate() {
        let Some(text) = guide.rules.as_deref().filter(|t| !t.trim().is_empty()) else {
            report.skipped += 1;
            continue;
        };

        match parse_rules(text, Some(macros)) {
            Ok(filter) => {
                guide.visible = matches(&filter, glyph, attrs);
                if guide.visible {
                    report.shown += 1;
                } else {
                    report.hidden += 1;
                }
            }
            Err(error) => {
                tracing::debug!(index, %error, "guide rules failed to parse");
                report.failures.push(GuideFailure {
                    index,
                    name: guide.name.clone(),
                    error,
                });
            }
        }
    }

    report
}

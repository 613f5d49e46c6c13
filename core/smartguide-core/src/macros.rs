//! Named macro tables (made by FontLab https://www.fontlab.com/)
//!
//! Macro definitions are a single text block split into sections by `> name`
//! header lines. Each section body is ordinary rule text, parsed with macro
//! references disabled so that expansion never nests.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::rules::{parse_rules, strip_comment, RuleError, RuleFilter};

/// Stock macro definitions shipped with the guide tool.
pub const DEFAULT_MACROS: &str = "\
> lowercase
category: Ll

> uppercase
category: Lu
name: *.uc

> smallcaps
name: *.sc*

> accents
name: circumflex
name: caron
name: tilde
name: breve
name: dotaccent
name: ring
name: hungarumlaut
name: ogonek
name: grave
name: acute
name: dieresis
name: macron
name: cedilla

> numbers
category: Nd

> tabular
name: *.tab*

> currency
name: dollar
name: cent
name: sterling
name: yen
name: Euro
name: uni20A9
name: numbersign
name: degree

> fractions
name: percent
name: perthousand
name: fraction
name: *.num
name: *.den

> legal
name: section
name: paragraph
name: copyright
name: uni24C5

> math
name: minus
name: notequal
name: lessequal
name: greaterequal
name: approxequal
name: multiply
name: plus
name: less
name: equal
name: greater
name: plusminus
name: divide

> containers
name: parenleft
name: parenright
name: bracketleft
name: bracketright
name: braceleft
name: braceright

> slashes
name: slash
name: backslash
name: bar
name: brokenbar

> punctuation
name: comma
name: period
name: ellipsis
name: colon
name: semicolon
name: periodcentered
name: question
name: questiondown
name: exclam
name: exclamdown

> dashes
name: hyphen
name: endash
name: emdash
name: bullet
name: underscore

> asterisk
name: asterisk
name: dagger
name: daggerdbl

> quotes
name: quotedblleft
name: quotedblright
name: quoteleft
name: quoteright
name: quotesingle
name: quotedbl
name: quotesinglbase
name: quotedblbase

> guillemot
name: guillemotleft
name: guillemotright
name: guilsinglleft
name: guilsinglright
";

/// Errors reported while reading macro definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroError {
    #[error("rule line outside of a macro section: {0}")]
    OrphanLine(String),

    #[error("macro '{name}': {source}")]
    InvalidMacro {
        name: String,
        #[source]
        source: RuleError,
    },
}

/// Read-only mapping from macro name to its parsed filter.
///
/// Tables are rebuilt wholesale when configuration changes; filters parsed
/// against an older table keep their expanded predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTable {
    macros: BTreeMap<String, RuleFilter>,
}

impl MacroTable {
    /// An empty table: macro references are allowed but resolve to nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock macros from [`DEFAULT_MACROS`].
    pub fn defaults() -> Result<Self, MacroError> {
        parse_macro_sections(DEFAULT_MACROS)
    }

    pub fn get(&self, name: &str) -> Option<&RuleFilter> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.macros.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleFilter)> {
        self.macros.iter().map(|(name, filter)| (name.as_str(), filter))
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

impl FromIterator<(String, RuleFilter)> for MacroTable {
    fn from_iter<T: IntoIterator<Item = (String, RuleFilter)>>(iter: T) -> Self {
        Self {
            macros: iter.into_iter().collect(),
        }
    }
}

/// Parse `> name` delimited macro text into a [`MacroTable`].
///
/// A repeated section name restarts that section, so the last definition wins.
pub fn parse_macro_sections(text: &str) -> Result<MacroTable, MacroError> {
    let mut sections: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    let mut current: Option<String> = None;

    for raw in text.lines() {
        let line = strip_comment(raw);
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            let name = header.trim().to_string();
            sections.insert(name.clone(), Vec::new());
            current = Some(name);
            continue;
        }
        match current.as_ref().and_then(|name| sections.get_mut(name)) {
            Some(body) => body.push(line),
            None => return Err(MacroError::OrphanLine(line.to_string())),
        }
    }

    sections
        .into_iter()
        .map(|(name, body)| match parse_rules(&body.join("\n"), None) {
            Ok(filter) => Ok((name, filter)),
            Err(source) => Err(MacroError::InvalidMacro { name, source }),
        })
        .collect()
}

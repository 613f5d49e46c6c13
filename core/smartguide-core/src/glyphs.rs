//! Glyph sets and batch filtering (made by FontLab https://www.fontlab.com/)

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::matcher::{CompiledFilter, GlyphAttributes};
use crate::rules::RuleFilter;

/// Attributes of one glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unicodes: Vec<u32>,
}

impl GlyphRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: None,
            category: None,
            unicodes: Vec::new(),
        }
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_unicodes(mut self, unicodes: Vec<u32>) -> Self {
        self.unicodes = unicodes;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GlyphSetDocument {
    #[serde(default)]
    glyphs: Vec<GlyphRecord>,
    #[serde(default)]
    groups: BTreeMap<String, Vec<String>>,
}

/// A font's glyphs in glyph order together with its named groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GlyphSetDocument", into = "GlyphSetDocument")]
pub struct GlyphSet {
    glyphs: Vec<GlyphRecord>,
    groups: BTreeMap<String, Vec<String>>,
    index: HashMap<String, usize>,
    memberships: HashMap<String, BTreeSet<String>>,
}

impl From<GlyphSetDocument> for GlyphSet {
    fn from(doc: GlyphSetDocument) -> Self {
        Self::new(doc.glyphs, doc.groups)
    }
}

impl From<GlyphSet> for GlyphSetDocument {
    fn from(set: GlyphSet) -> Self {
        Self {
            glyphs: set.glyphs,
            groups: set.groups,
        }
    }
}

impl GlyphSet {
    /// Build a glyph set. A repeated glyph name keeps its first record.
    pub fn new(glyphs: Vec<GlyphRecord>, groups: BTreeMap<String, Vec<String>>) -> Self {
        let mut index = HashMap::with_capacity(glyphs.len());
        for (pos, glyph) in glyphs.iter().enumerate() {
            index.entry(glyph.name.clone()).or_insert(pos);
        }
        let mut memberships: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (group, members) in &groups {
            for member in members {
                memberships
                    .entry(member.clone())
                    .or_default()
                    .insert(group.clone());
            }
        }
        Self {
            glyphs,
            groups,
            index,
            memberships,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parsing glyph set JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading glyph set {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing glyph set {}", path.display()))
    }

    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    pub fn glyph(&self, name: &str) -> Option<&GlyphRecord> {
        self.index.get(name).map(|&pos| &self.glyphs[pos])
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<String>> {
        &self.groups
    }

    /// Groups containing `glyph`, in group name order.
    pub fn groups_containing<'a>(&'a self, glyph: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.memberships
            .get(glyph)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl GlyphAttributes for GlyphSet {
    fn script(&self, glyph: &str) -> Option<&str> {
        self.glyph(glyph)?.script.as_deref()
    }

    fn category(&self, glyph: &str) -> Option<&str> {
        self.glyph(glyph)?.category.as_deref()
    }

    fn group_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.groups.keys().map(String::as_str))
    }

    fn is_member(&self, group: &str, glyph: &str) -> bool {
        self.memberships
            .get(glyph)
            .is_some_and(|groups| groups.contains(group))
    }
}

/// One glyph that satisfied a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMatch {
    pub name: String,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl From<&GlyphRecord> for GlyphMatch {
    fn from(record: &GlyphRecord) -> Self {
        Self {
            name: record.name.clone(),
            script: record.script.clone(),
            category: record.category.clone(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct FilterOptions {
    pub jobs: Option<usize>,
}

/// Evaluate `filter` against every glyph of `set`, keeping glyph order.
pub fn filter_glyphs(
    set: &GlyphSet,
    filter: &RuleFilter,
    opts: &FilterOptions,
) -> Result<Vec<GlyphMatch>> {
    let compiled = CompiledFilter::new(filter);

    let run_filter = || -> Vec<GlyphMatch> {
        set.glyphs()
            .par_iter()
            .filter(|glyph| compiled.matches(&glyph.name, set))
            .map(GlyphMatch::from)
            .collect()
    };

    let matches = if let Some(jobs) = opts.jobs {
        let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(run_filter)
    } else {
        run_filter()
    };

    tracing::debug!(
        glyphs = set.len(),
        matched = matches.len(),
        policy = %filter.policy(),
        "filtered glyph set"
    );
    Ok(matches)
}

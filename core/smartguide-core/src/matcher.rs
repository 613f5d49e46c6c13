//! Rule matching against glyph attributes (made by FontLab https://www.fontlab.com/)

use crate::rules::{MatchPolicy, RuleFilter};
use crate::wildcard::Wildcard;

/// Read access to the attributes a rule filter inspects.
///
/// Lookups are infallible: missing data is reported as `None` or `false`
/// and simply cannot satisfy a predicate.
pub trait GlyphAttributes {
    fn script(&self, glyph: &str) -> Option<&str>;

    fn category(&self, glyph: &str) -> Option<&str>;

    /// Names of every group known to the source.
    fn group_names(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    fn is_member(&self, group: &str, glyph: &str) -> bool;
}

/// Predicate groups in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Predicate {
    Names,
    Scripts,
    Categories,
    Groups,
}

const EVALUATION_ORDER: [Predicate; 4] = [
    Predicate::Names,
    Predicate::Scripts,
    Predicate::Categories,
    Predicate::Groups,
];

/// A [`RuleFilter`] with its wildcard patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    filter: RuleFilter,
    names: Vec<Wildcard>,
    groups: Vec<Wildcard>,
}

impl CompiledFilter {
    pub fn new(filter: &RuleFilter) -> Self {
        Self {
            filter: filter.clone(),
            names: filter.names().iter().map(|p| Wildcard::new(p)).collect(),
            groups: filter.groups().iter().map(|p| Wildcard::new(p)).collect(),
        }
    }

    pub fn filter(&self) -> &RuleFilter {
        &self.filter
    }

    pub fn policy(&self) -> MatchPolicy {
        self.filter.policy()
    }

    /// Decide whether `glyph` satisfies the filter.
    ///
    /// Each non-empty predicate group casts one vote, in the order names,
    /// script, category, groups. `Any` stops at the first true vote and `All`
    /// at the first false one. With no votes at all, `Any` yields false and
    /// `All` yields true.
    pub fn matches<A>(&self, glyph: &str, attrs: &A) -> bool
    where
        A: GlyphAttributes + ?Sized,
    {
        let policy = self.filter.policy();
        for predicate in EVALUATION_ORDER {
            match (policy, self.vote(predicate, glyph, attrs)) {
                (MatchPolicy::Any, Some(true)) => return true,
                (MatchPolicy::All, Some(false)) => return false,
                _ => {}
            }
        }
        policy == MatchPolicy::All
    }

    fn vote<A>(&self, predicate: Predicate, glyph: &str, attrs: &A) -> Option<bool>
    where
        A: GlyphAttributes + ?Sized,
    {
        match predicate {
            Predicate::Names => {
                (!self.names.is_empty()).then(|| self.names.iter().any(|wc| wc.is_match(glyph)))
            }
            Predicate::Scripts => (!self.filter.scripts().is_empty()).then(|| {
                attrs
                    .script(glyph)
                    .is_some_and(|tag| self.filter.scripts().contains(tag))
            }),
            Predicate::Categories => (!self.filter.categories().is_empty()).then(|| {
                attrs
                    .category(glyph)
                    .is_some_and(|tag| self.filter.categories().contains(tag))
            }),
            Predicate::Groups => {
                (!self.groups.is_empty()).then(|| self.in_matching_group(glyph, attrs))
            }
        }
    }

    fn in_matching_group<A>(&self, glyph: &str, attrs: &A) -> bool
    where
        A: GlyphAttributes + ?Sized,
    {
        attrs.group_names().any(|group| {
            self.groups.iter().any(|wc| wc.is_match(group)) && attrs.is_member(group, glyph)
        })
    }
}

impl From<&RuleFilter> for CompiledFilter {
    fn from(filter: &RuleFilter) -> Self {
        Self::new(filter)
    }
}

/// Evaluate `filter` for a single glyph.
///
/// Compiles the filter's wildcards on every call; use [`CompiledFilter`] when
/// matching many glyphs against the same filter.
pub fn matches<A>(filter: &RuleFilter, glyph: &str, attrs: &A) -> bool
where
    A: GlyphAttributes + ?Sized,
{
    CompiledFilter::new(filter).matches(glyph, attrs)
}

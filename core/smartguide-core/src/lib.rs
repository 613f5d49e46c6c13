//! smartguide-core: rules that decide which glyphs a guide belongs to
//!
//! A guide in a font editor is often only useful for some glyphs: an
//! x-height overshoot line for lowercase, a figure height for numbers. This
//! crate lets a guide carry a short block of rule text and answers, for any
//! glyph, whether the guide should be shown.
//!
//! ## Rule Text
//!
//! ```text
//! match: all        # or "any", the default
//! name: *.sc        # shell-style wildcard on the glyph name
//! script: Latn      # glyph script tag
//! category: Ll      # Unicode general category
//! group: kern*      # wildcard on the names of groups containing the glyph
//! macro: accents    # expand a named bundle of predicates
//! ```
//!
//! Each predicate kind casts a single vote, evaluated in the order name,
//! script, category, group. `any` succeeds on the first true vote, `all`
//! fails on the first false one. Kinds with no lines do not vote.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use smartguide_core::glyphs::{GlyphRecord, GlyphSet};
//! use smartguide_core::macros::MacroTable;
//! use smartguide_core::matcher::matches;
//! use smartguide_core::rules::parse_rules;
//!
//! let macros = MacroTable::defaults()?;
//! let filter = parse_rules("match: any\nmacro: lowercase\nname: *.sc", Some(&macros))?;
//!
//! let glyphs = GlyphSet::new(
//!     vec![
//!         GlyphRecord::new("a").with_category("Ll"),
//!         GlyphRecord::new("A").with_category("Lu"),
//!         GlyphRecord::new("A.sc").with_category("Lu"),
//!     ],
//!     BTreeMap::new(),
//! );
//!
//! assert!(matches(&filter, "a", &glyphs));
//! assert!(!matches(&filter, "A", &glyphs));
//! assert!(matches(&filter, "A.sc", &glyphs));
//! #
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## The Cast of Characters
//!
//! - [`rules::RuleFilter`]: parsed, macro-expanded rule text
//! - [`macros::MacroTable`]: named predicate bundles, one level deep
//! - [`matcher::GlyphAttributes`]: where scripts, categories and groups come from
//! - [`glyphs::GlyphSet`]: a JSON-backed attribute source with batch filtering
//! - [`guides::Guide`]: rule text attached to a guideline
//!
//! ---
//!
//! Crafted with care at FontLab https://www.fontlab.com/

pub mod glyphs;
pub mod guides;
pub mod macros;
pub mod matcher;
pub mod output;
pub mod rules;
pub mod settings;
pub mod suggest;
pub mod wildcard;

//! Rule line suggestions for a glyph (made by FontLab https://www.fontlab.com/)

use serde::{Deserialize, Serialize};

use crate::glyphs::GlyphSet;
use crate::macros::MacroTable;
use crate::matcher::{CompiledFilter, GlyphAttributes};

/// Unicode general categories and their descriptions.
pub const CATEGORY_DESCRIPTIONS: [(&str, &str); 29] = [
    ("Cc", "Control"),
    ("Cf", "Format"),
    ("Co", "Private Use"),
    ("Cs", "Surrogate"),
    ("Ll", "Lowercase Letter"),
    ("Lm", "Modifier Letter"),
    ("Lo", "Other Letter"),
    ("Lt", "Titlecase Letter"),
    ("Lu", "Uppercase Letter"),
    ("Mc", "Spacing Mark"),
    ("Me", "Enclosing Mark"),
    ("Mn", "Nonspacing Mark"),
    ("Nd", "Decimal Number"),
    ("Nl", "Letter Number"),
    ("No", "Other Number"),
    ("Pc", "Connector Punctuation"),
    ("Pd", "Dash Punctuation"),
    ("Pe", "Close Punctuation"),
    ("Pf", "Final Punctuation"),
    ("Pi", "Initial Punctuation"),
    ("Po", "Other Punctuation"),
    ("Ps", "Open Punctuation"),
    ("Sc", "Currency Symbol"),
    ("Sk", "Modifier Symbol"),
    ("Sm", "Math Symbol"),
    ("So", "Other Symbol"),
    ("Zl", "Line Separator"),
    ("Zp", "Paragraph Separator"),
    ("Zs", "Space Separator"),
];

pub fn category_description(tag: &str) -> Option<&'static str> {
    CATEGORY_DESCRIPTIONS
        .iter()
        .find(|(code, _)| *code == tag)
        .map(|(_, desc)| *desc)
}

/// ISO 15924 script tags and their Unicode script names.
pub const SCRIPT_NAMES: [(&str, &str); 50] = [
    ("Adlm", "Adlam"),
    ("Arab", "Arabic"),
    ("Armn", "Armenian"),
    ("Bali", "Balinese"),
    ("Beng", "Bengali"),
    ("Bopo", "Bopomofo"),
    ("Brai", "Braille"),
    ("Cans", "Canadian_Aboriginal"),
    ("Cher", "Cherokee"),
    ("Copt", "Coptic"),
    ("Cyrl", "Cyrillic"),
    ("Deva", "Devanagari"),
    ("Ethi", "Ethiopic"),
    ("Geor", "Georgian"),
    ("Glag", "Glagolitic"),
    ("Goth", "Gothic"),
    ("Grek", "Greek"),
    ("Gujr", "Gujarati"),
    ("Guru", "Gurmukhi"),
    ("Hang", "Hangul"),
    ("Hani", "Han"),
    ("Hebr", "Hebrew"),
    ("Hira", "Hiragana"),
    ("Java", "Javanese"),
    ("Kana", "Katakana"),
    ("Khmr", "Khmer"),
    ("Knda", "Kannada"),
    ("Laoo", "Lao"),
    ("Latn", "Latin"),
    ("Mlym", "Malayalam"),
    ("Mong", "Mongolian"),
    ("Mymr", "Myanmar"),
    ("Nkoo", "Nko"),
    ("Ogam", "Ogham"),
    ("Orya", "Oriya"),
    ("Runr", "Runic"),
    ("Sinh", "Sinhala"),
    ("Syrc", "Syriac"),
    ("Taml", "Tamil"),
    ("Telu", "Telugu"),
    ("Tfng", "Tifinagh"),
    ("Tglg", "Tagalog"),
    ("Thaa", "Thaana"),
    ("Thai", "Thai"),
    ("Tibt", "Tibetan"),
    ("Vaii", "Vai"),
    ("Yiii", "Yi"),
    ("Zinh", "Inherited"),
    ("Zyyy", "Common"),
    ("Zzzz", "Unknown"),
];

pub fn script_name(tag: &str) -> Option<&'static str> {
    SCRIPT_NAMES
        .iter()
        .find(|(code, _)| *code == tag)
        .map(|(_, name)| *name)
}

/// A rule line that would match the glyph it was suggested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub line: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Suggestion {
    fn plain(line: String) -> Self {
        Self { line, note: None }
    }

    /// Render as rule text, with the note as a trailing comment.
    pub fn to_rule_line(&self) -> String {
        match &self.note {
            Some(note) => format!("{} # {}", self.line, note),
            None => self.line.clone(),
        }
    }
}

/// Suggest rule lines describing `glyph`.
///
/// Order: matching macros, name base, name suffix, script, category, then the
/// groups containing the glyph.
pub fn suggest_rules(glyph: &str, set: &GlyphSet, macros: &MacroTable) -> Vec<Suggestion> {
    let mut out = Vec::new();

    for (name, filter) in macros.iter() {
        if CompiledFilter::new(filter).matches(glyph, set) {
            out.push(Suggestion::plain(format!("macro: {name}")));
        }
    }

    let base = glyph.split('.').next().unwrap_or(glyph);
    out.push(Suggestion::plain(format!("name: {base}.*")));

    if !glyph.starts_with('.') {
        if let Some((_, suffix)) = glyph.split_once('.') {
            out.push(Suggestion::plain(format!("name: *.{suffix}")));
        }
    }

    if let Some(script) = set.script(glyph) {
        out.push(Suggestion {
            line: format!("script: {script}"),
            note: script_name(script).map(str::to_string),
        });
    }

    if let Some(category) = set.category(glyph) {
        out.push(Suggestion {
            line: format!("category: {category}"),
            note: category_description(category).map(str::to_string),
        });
    }

    out.extend(
        set.groups_containing(glyph)
            .map(|group| Suggestion::plain(format!("group: {group}"))),
    );

    out
}

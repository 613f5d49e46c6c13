//! Guide tool settings (made by FontLab https://www.fontlab.com/)
//!
//! Settings are plain values with explicit defaults. Callers load them once,
//! build a [`MacroTable`] from them, and rebuild both when the stored settings
//! change.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::macros::{parse_macro_sections, MacroError, MacroTable, DEFAULT_MACROS};

/// Environment variable naming a settings JSON file.
pub const SETTINGS_ENV: &str = "SMARTGUIDE_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(deserialize_with = "macros_or_default")]
    pub smart_macros: String,
    pub snap_to_point: bool,
    pub snap_to_future_point: bool,
    pub haptic_feedback_on_snap_to: bool,
    pub want_italic_angle: bool,
    pub highlight_alpha_scale: f64,
    pub swatch_colors: Vec<[f64; 4]>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            smart_macros: DEFAULT_MACROS.to_string(),
            snap_to_point: true,
            snap_to_future_point: true,
            haptic_feedback_on_snap_to: true,
            want_italic_angle: true,
            highlight_alpha_scale: 0.15,
            swatch_colors: vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [1.0, 1.0, 0.0, 1.0],
                [1.0, 0.0, 1.0, 1.0],
                [0.0, 1.0, 1.0, 1.0],
            ],
        }
    }
}

impl Settings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parsing settings JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Settings from [`SETTINGS_ENV`] when set, defaults otherwise.
    pub fn resolve() -> Result<Self> {
        match settings_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn macro_table(&self) -> Result<MacroTable, MacroError> {
        parse_macro_sections(&self.smart_macros)
    }
}

pub fn settings_path() -> Option<PathBuf> {
    env::var_os(SETTINGS_ENV)
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}

// Early releases stored macros as a pre-parsed mapping; anything that is not
// text is replaced by the stock definitions.
fn macros_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        other => {
            tracing::warn!(kind = value_kind(&other), "stored macros are not text, using defaults");
            Ok(DEFAULT_MACROS.to_string())
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

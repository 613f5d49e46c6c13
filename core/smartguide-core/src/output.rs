//! Streaming output helpers (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use anyhow::Result;

use crate::glyphs::GlyphMatch;

/// Write matches as a prettified JSON array.
pub fn write_json_pretty(matches: &[GlyphMatch], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(matches)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write matches as newline-delimited JSON (NDJSON).
pub fn write_ndjson(matches: &[GlyphMatch], mut w: impl Write) -> Result<()> {
    for item in matches {
        let line = serde_json::to_string(item)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

//! HTTP server for smartguide rules (made by FontLab https://www.fontlab.com/)
//!
//! Exposes rule parsing and glyph matching so that editors without a Rust
//! toolchain can share one rule engine.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task;

use smartguide_core::glyphs::{filter_glyphs, FilterOptions, GlyphMatch, GlyphSet};
use smartguide_core::macros::{parse_macro_sections, MacroTable};
use smartguide_core::rules::{parse_rules, RuleFilter};

/// Rule text to parse.
#[derive(Clone, Debug, Deserialize)]
pub struct ParseRequest {
    pub rules: String,
    /// `false` rejects `macro:` lines, as when parsing a macro body
    #[serde(default = "default_allow_macros")]
    pub allow_macros: bool,
    /// Macro definitions in "> name" sections; the server's table when absent
    #[serde(default)]
    pub macros: Option<String>,
}

fn default_allow_macros() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub filter: RuleFilter,
}

/// Rule text plus the glyph set to evaluate it against.
#[derive(Clone, Debug, Deserialize)]
pub struct MatchRequest {
    pub rules: String,
    pub glyphs: GlyphSet,
    #[serde(default)]
    pub macros: Option<String>,
    /// Worker threads for matching
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Return glyph names only
    #[serde(default)]
    pub names_only: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Option<Vec<GlyphMatch>>,
    pub names: Option<Vec<String>>,
}

/// Bind `bind` and serve until the process exits.
///
/// `macros` answers every request that does not carry its own definitions.
pub async fn serve(bind: &str, macros: MacroTable) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding HTTP server to {bind}"))?;
    tracing::info!(bind, macros = macros.len(), "serving smartguide");

    axum::serve(listener, router(macros))
        .await
        .context("serving HTTP")?;
    Ok(())
}

pub fn router(macros: MacroTable) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/parse", post(parse_handler))
        .route("/match", post(match_handler))
        .with_state(Arc::new(macros))
}

fn request_macros(
    shared: &Arc<MacroTable>,
    text: Option<&str>,
) -> Result<Arc<MacroTable>, (StatusCode, String)> {
    match text {
        Some(text) => parse_macro_sections(text)
            .map(Arc::new)
            .map_err(|e| to_bad_request(format!("parsing macros: {e}"))),
        None => Ok(Arc::clone(shared)),
    }
}

async fn parse_handler(
    State(shared): State<Arc<MacroTable>>,
    Json(req): Json<ParseRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let filter = if req.allow_macros {
        let macros = request_macros(&shared, req.macros.as_deref())?;
        parse_rules(&req.rules, Some(&macros))
    } else {
        parse_rules(&req.rules, None)
    }
    .map_err(to_bad_request)?;

    Ok(Json(ParseResponse { filter }))
}

async fn match_handler(
    State(shared): State<Arc<MacroTable>>,
    Json(req): Json<MatchRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if matches!(req.jobs, Some(0)) {
        return Err((
            StatusCode::BAD_REQUEST,
            "jobs must be at least 1 when provided".to_string(),
        ));
    }

    let macros = request_macros(&shared, req.macros.as_deref())?;
    let filter = parse_rules(&req.rules, Some(&macros)).map_err(to_bad_request)?;

    let opts = FilterOptions { jobs: req.jobs };
    let glyphs = req.glyphs;
    let matches = task::spawn_blocking(move || filter_glyphs(&glyphs, &filter, &opts))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("task join error: {e}"),
            )
        })?
        .map_err(to_bad_request)?;

    if req.names_only {
        let names = matches.into_iter().map(|m| m.name).collect();
        Ok(Json(MatchResponse {
            matches: None,
            names: Some(names),
        }))
    } else {
        Ok(Json(MatchResponse {
            matches: Some(matches),
            names: None,
        }))
    }
}

fn to_bad_request(err: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

//! smartguide CLI (made by FontLab https://www.fontlab.com/)

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use smartguide_core::glyphs::{filter_glyphs, FilterOptions, GlyphMatch, GlyphSet};
use smartguide_core::macros::{parse_macro_sections, MacroTable};
use smartguide_core::output::{write_json_pretty, write_ndjson};
use smartguide_core::rules::{parse_rules, RuleFilter};
use smartguide_core::settings::Settings;
use smartguide_core::suggest::suggest_rules;

pub mod server;

/// CLI entrypoint for smartguide.
#[derive(Debug, Parser)]
#[command(
    name = "smartguide",
    about = "Rule-driven glyph filtering for smart guides (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse rule text and print the expanded filter
    Check(CheckArgs),
    /// Print the glyphs of a glyph set that satisfy rule text
    Match(MatchArgs),
    /// List the configured macros
    Macros(MacrosArgs),
    /// Suggest rule lines describing a glyph
    Suggest(SuggestArgs),
    /// Serve parse/match over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
struct RuleInput {
    /// Inline rule text
    #[arg(conflicts_with = "rules_file", required_unless_present = "rules_file")]
    rules: Option<String>,

    /// Read rule text from a file ("-" for STDIN)
    #[arg(long = "rules-file", value_hint = ValueHint::FilePath)]
    rules_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct MacroInput {
    /// Macro definitions file using "> name" sections (defaults to settings, then built-ins)
    #[arg(long = "macros-file", value_hint = ValueHint::FilePath)]
    macros_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    input: RuleInput,

    #[command(flatten)]
    macros: MacroInput,

    /// Parse as a macro body: macro references are rejected
    #[arg(long = "no-macros", action = ArgAction::SetTrue)]
    no_macros: bool,

    /// Emit the filter as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Args)]
struct MatchArgs {
    #[command(flatten)]
    input: RuleInput,

    #[command(flatten)]
    macros: MacroInput,

    /// Glyph set JSON file
    #[arg(short = 'g', long = "glyphs", value_hint = ValueHint::FilePath)]
    glyphs: PathBuf,

    /// Worker threads for matching
    #[arg(short = 'j', long = "jobs", value_parser = clap::value_parser!(usize))]
    jobs: Option<usize>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Format output as padded columns
    #[arg(long = "columns", action = ArgAction::SetTrue)]
    columns: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Debug, Args)]
struct MacrosArgs {
    #[command(flatten)]
    macros: MacroInput,

    /// Emit macros as a JSON object
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Args)]
struct SuggestArgs {
    /// Glyph to describe
    glyph: String,

    /// Glyph set JSON file
    #[arg(short = 'g', long = "glyphs", value_hint = ValueHint::FilePath)]
    glyphs: PathBuf,

    #[command(flatten)]
    macros: MacroInput,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long = "bind", default_value = "127.0.0.1:8765")]
    bind: String,

    #[command(flatten)]
    macros: MacroInput,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check(args) => run_check(args),
        Command::Match(args) => run_match(args),
        Command::Macros(args) => run_macros(args),
        Command::Suggest(args) => run_suggest(args),
        Command::Serve(args) => run_serve(args),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run_check(args: CheckArgs) -> Result<()> {
    let stdin = io::stdin();
    let text = read_rules(&args.input, stdin.lock())?;

    let filter = if args.no_macros {
        parse_rules(&text, None)?
    } else {
        let macros = load_macros(args.macros.macros_file.as_deref())?;
        parse_rules(&text, Some(&macros))?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut handle, &filter)?;
        writeln!(handle)?;
    } else {
        write_filter(&filter, &mut handle)?;
    }
    Ok(())
}

fn run_match(args: MatchArgs) -> Result<()> {
    let stdin = io::stdin();
    let text = read_rules(&args.input, stdin.lock())?;
    let macros = load_macros(args.macros.macros_file.as_deref())?;
    let filter = parse_rules(&text, Some(&macros))?;
    let glyphs = GlyphSet::load(&args.glyphs)?;

    if matches!(args.jobs, Some(0)) {
        return Err(anyhow!("jobs must be at least 1 when provided"));
    }
    let opts = FilterOptions { jobs: args.jobs };
    let matches = filter_glyphs(&glyphs, &filter, &opts)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let use_color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => handle.is_terminal(),
    };

    if args.ndjson {
        write_ndjson(&matches, &mut handle)?;
    } else if args.json {
        write_json_pretty(&matches, &mut handle)?;
    } else if args.columns {
        write_columns(&matches, &mut handle, use_color)?;
    } else {
        write_plain(&matches, &mut handle, use_color)?;
    }

    Ok(())
}

fn run_macros(args: MacrosArgs) -> Result<()> {
    let macros = load_macros(args.macros.macros_file.as_deref())?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        let as_map: BTreeMap<&str, &RuleFilter> = macros.iter().collect();
        serde_json::to_writer_pretty(&mut handle, &as_map)?;
        writeln!(handle)?;
    } else {
        write_macros(&macros, &mut handle)?;
    }
    Ok(())
}

fn run_suggest(args: SuggestArgs) -> Result<()> {
    let glyphs = GlyphSet::load(&args.glyphs)?;
    if glyphs.glyph(&args.glyph).is_none() {
        return Err(anyhow!(
            "glyph not found in {}: {}",
            args.glyphs.display(),
            args.glyph
        ));
    }
    let macros = load_macros(args.macros.macros_file.as_deref())?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for suggestion in suggest_rules(&args.glyph, &glyphs, &macros) {
        writeln!(handle, "{}", suggestion.to_rule_line())?;
    }
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let macros = load_macros(args.macros.macros_file.as_deref())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(server::serve(&args.bind, macros))
}

fn read_rules(input: &RuleInput, mut stdin: impl BufRead) -> Result<String> {
    if let Some(text) = &input.rules {
        return Ok(text.clone());
    }

    match &input.rules_file {
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf).context("reading rules from STDIN")?;
            Ok(buf)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading rules {}", path.display())),
        None => Err(anyhow!("no rule text provided")),
    }
}

/// Macro table from an explicit file, else from settings, else built-ins.
fn load_macros(path: Option<&Path>) -> Result<MacroTable> {
    let table = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading macros {}", path.display()))?;
            parse_macro_sections(&text)
                .with_context(|| format!("parsing macros {}", path.display()))?
        }
        None => Settings::resolve()?
            .macro_table()
            .context("parsing macros from settings")?,
    };
    tracing::debug!(macros = table.len(), "macro table loaded");
    Ok(table)
}

fn write_filter(filter: &RuleFilter, mut w: impl Write) -> Result<()> {
    writeln!(w, "match: {}", filter.policy())?;
    write_predicates(filter, "", w)
}

/// One line per non-empty predicate set, each prefixed with `indent`.
fn write_predicates(filter: &RuleFilter, indent: &str, mut w: impl Write) -> Result<()> {
    let sets = [
        ("names", filter.names()),
        ("scripts", filter.scripts()),
        ("categories", filter.categories()),
        ("groups", filter.groups()),
    ];
    for (label, set) in sets {
        if set.is_empty() {
            continue;
        }
        let joined: Vec<&str> = set.iter().map(String::as_str).collect();
        writeln!(w, "{indent}{label}: {}", joined.join(" | "))?;
    }
    Ok(())
}

fn write_macros(macros: &MacroTable, mut w: impl Write) -> Result<()> {
    for (name, filter) in macros.iter() {
        writeln!(w, "> {name}")?;
        // Expansion ignores a macro body's match policy.
        write_predicates(filter, "  ", &mut w)?;
    }
    Ok(())
}

fn write_plain(matches: &[GlyphMatch], mut w: impl Write, color: bool) -> Result<()> {
    for item in matches {
        let rendered = apply_color(&item.name, color, AnsiColor::Cyan);
        writeln!(w, "{rendered}")?;
    }
    Ok(())
}

fn write_columns(matches: &[GlyphMatch], mut w: impl Write, color: bool) -> Result<()> {
    let rows: Vec<(&str, &str, &str)> = matches
        .iter()
        .map(|m| {
            (
                m.name.as_str(),
                m.script.as_deref().unwrap_or("-"),
                m.category.as_deref().unwrap_or("-"),
            )
        })
        .collect();

    let name_width = rows
        .iter()
        .map(|r| r.0.len())
        .max()
        .unwrap_or(0)
        .clamp(0, 80);
    let script_width = rows
        .iter()
        .map(|r| r.1.len())
        .max()
        .unwrap_or(0)
        .clamp(0, 16);

    for (name, script, category) in rows {
        let padded_name = format!("{:<name_width$}", name);
        let padded_script = format!("{:<script_width$}", script);
        let rendered_name = apply_color(&padded_name, color, AnsiColor::Cyan);
        let rendered_script = apply_color(&padded_script, color, AnsiColor::Yellow);
        let rendered_category = apply_color(category, color, AnsiColor::Green);

        writeln!(w, "{rendered_name}  {rendered_script}  {rendered_category}")?;
    }

    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Yellow,
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Yellow => "33",
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}

#[cfg(test)]
mod tests;

use super::*;
use clap::CommandFactory;
use smartguide_core::rules::MatchPolicy;
use std::io::Cursor;
use tempfile::tempdir;

fn glyph_match(name: &str, script: Option<&str>, category: Option<&str>) -> GlyphMatch {
    GlyphMatch {
        name: name.to_string(),
        script: script.map(str::to_string),
        category: category.map(str::to_string),
    }
}

#[test]
fn parses_check_args_with_inline_rules() {
    let cli = Cli::try_parse_from(["smartguide", "check", "match: all\nname: A*", "--json"])
        .expect("parse cli");

    let Command::Check(args) = cli.command else {
        panic!("expected check command");
    };
    assert!(args.json);
    assert!(!args.no_macros);

    let text = read_rules(&args.input, Cursor::new(Vec::new())).expect("rules");
    let filter = parse_rules(&text, None).expect("parse");
    assert_eq!(filter, RuleFilter::new(MatchPolicy::All).with_names(["A*"]));
}

#[test]
fn parses_match_args() {
    let cli = Cli::try_parse_from([
        "smartguide",
        "-vv",
        "match",
        "--rules-file",
        "rules.txt",
        "-g",
        "glyphs.json",
        "-j",
        "4",
        "--ndjson",
    ])
    .expect("parse cli");

    assert_eq!(cli.verbose, 2);
    let Command::Match(args) = cli.command else {
        panic!("expected match command");
    };
    assert_eq!(args.jobs, Some(4));
    assert_eq!(args.glyphs, PathBuf::from("glyphs.json"));
    assert_eq!(args.input.rules_file, Some(PathBuf::from("rules.txt")));
    assert!(args.ndjson);
    assert_eq!(args.color, ColorChoice::Auto);
}

#[test]
fn json_and_ndjson_conflict() {
    let parse = Cli::try_parse_from([
        "smartguide", "match", "name: A", "-g", "g.json", "--json", "--ndjson",
    ]);
    assert!(parse.is_err());
}

#[test]
fn inline_rules_and_rules_file_conflict() {
    let parse = Cli::try_parse_from(["smartguide", "check", "name: A", "--rules-file", "r.txt"]);
    assert!(parse.is_err());

    let missing = Cli::try_parse_from(["smartguide", "check"]);
    assert!(missing.is_err(), "rule text is required");
}

#[test]
fn dash_rules_file_reads_stdin() {
    let cli = Cli::try_parse_from(["smartguide", "check", "--rules-file", "-"]).expect("parse cli");
    let Command::Check(args) = cli.command else {
        panic!("expected check command");
    };

    let stdin = Cursor::new(b"script: Latn\n# trailing comment\n".to_vec());
    let text = read_rules(&args.input, stdin).expect("rules");
    assert_eq!(text, "script: Latn\n# trailing comment\n");
}

#[test]
fn rules_file_is_read_from_disk() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("rules.txt");
    fs::write(&path, "category: Lu\n").expect("write");

    let input = RuleInput {
        rules: None,
        rules_file: Some(path),
    };
    let text = read_rules(&input, Cursor::new(Vec::new())).expect("rules");
    assert_eq!(text, "category: Lu\n");

    let missing = RuleInput {
        rules: None,
        rules_file: Some(tmp.path().join("missing.txt")),
    };
    assert!(read_rules(&missing, Cursor::new(Vec::new())).is_err());
}

#[test]
fn writes_filter_sets_in_fixed_order() {
    let filter = RuleFilter::new(MatchPolicy::All)
        .with_groups(["public.kern1.*"])
        .with_names(["b", "a"])
        .with_scripts(["Latn"]);

    let mut buf = Cursor::new(Vec::new());
    write_filter(&filter, &mut buf).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    assert_eq!(
        output,
        "match: all\nnames: a | b\nscripts: Latn\ngroups: public.kern1.*\n"
    );
}

#[test]
fn writes_macro_bodies_indented() {
    let macros = parse_macro_sections("> caps\nmatch: all\ncategory: Lu\n> figures\nname: *.tf")
        .expect("macros");

    let mut buf = Cursor::new(Vec::new());
    write_macros(&macros, &mut buf).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    assert_eq!(
        output,
        "> caps\n  categories: Lu\n> figures\n  names: *.tf\n"
    );
}

#[test]
fn macros_file_overrides_defaults() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("macros.txt");
    fs::write(&path, "> only\nscript: Grek\n").expect("write");

    let table = load_macros(Some(&path)).expect("macros");
    assert_eq!(table.len(), 1);
    assert!(table.contains("only"));
    assert!(!table.contains("lowercase"));

    fs::write(&path, "script: Grek\n").expect("write");
    let err = load_macros(Some(&path)).expect_err("orphan line");
    assert!(format!("{err:#}").contains("parsing macros"));
}

#[test]
fn writes_predicates_with_indent() {
    let filter = RuleFilter::new(MatchPolicy::All)
        .with_categories(["Lu"])
        .with_names(["*.uc"]);

    let mut buf = Cursor::new(Vec::new());
    write_predicates(&filter, "  ", &mut buf).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    assert_eq!(output, "  names: *.uc\n  categories: Lu\n");
}

#[test]
fn writes_plain_names() {
    let matches = vec![
        glyph_match("A", Some("Latn"), Some("Lu")),
        glyph_match("a.sc", None, None),
    ];

    let mut buf = Cursor::new(Vec::new());
    write_plain(&matches, &mut buf, false).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    assert_eq!(output, "A\na.sc\n");
}

#[test]
fn columns_align_and_mark_missing_attributes() {
    let matches = vec![
        glyph_match("Alpha", Some("Grek"), Some("Lu")),
        glyph_match("b", None, None),
    ];

    let mut buf = Cursor::new(Vec::new());
    write_columns(&matches, &mut buf, false).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].find("Grek"), lines[1].find('-'));
    assert!(lines[1].ends_with('-'));
}

#[test]
fn color_choice_is_applied() {
    let matches = vec![glyph_match("Alpha", None, None)];

    let mut buf = Cursor::new(Vec::new());
    write_plain(&matches, &mut buf, true).expect("write");

    let output = String::from_utf8(buf.into_inner()).expect("utf8");
    assert!(output.contains("\u{1b}[36m"));
}

#[test]
fn parses_color_and_columns_flags() {
    let cli = Cli::try_parse_from([
        "smartguide", "match", "name: A", "-g", "g.json", "--columns", "--color", "never",
    ])
    .expect("parse cli");

    let Command::Match(args) = cli.command else {
        panic!("expected match command");
    };
    assert!(args.columns);
    assert_eq!(args.color, ColorChoice::Never);
}

#[test]
fn serve_binds_localhost_by_default() {
    let cli = Cli::try_parse_from(["smartguide", "serve"]).expect("parse cli");
    let Command::Serve(args) = cli.command else {
        panic!("expected serve command");
    };
    assert_eq!(args.bind, "127.0.0.1:8765");
    assert!(args.macros.macros_file.is_none());
}

#[test]
fn help_output_includes_flags() {
    let mut root = Cli::command();
    let matching = root
        .find_subcommand_mut("match")
        .expect("match command present");
    let help = matching.render_long_help().to_string();
    assert!(help.contains("--macros-file"));
    assert!(help.contains("--color <COLOR>"));
    assert!(help.contains("--jobs <JOBS>"));
}

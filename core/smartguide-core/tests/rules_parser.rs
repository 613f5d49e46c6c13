use proptest::prelude::*;

use smartguide_core::macros::{parse_macro_sections, MacroTable};
use smartguide_core::rules::{parse_rules, MatchPolicy, RuleError, RuleFilter};

fn sorted(items: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = items.iter().map(|s| s.to_string()).collect();
    out.sort();
    out
}

#[test]
fn match_line_sets_policy() {
    assert_eq!(
        parse_rules("match: any", None).expect("any").policy(),
        MatchPolicy::Any
    );
    assert_eq!(
        parse_rules("match: all", None).expect("all").policy(),
        MatchPolicy::All
    );
}

#[test]
fn policy_defaults_to_any() {
    let filter = parse_rules("name: A*\ncategory: Lu", None).expect("parse");
    assert_eq!(filter.policy(), MatchPolicy::Any);
    assert_eq!(parse_rules("", None).expect("empty"), RuleFilter::default());
}

#[test]
fn unknown_match_type_is_reported() {
    assert_eq!(
        parse_rules("match: maybe", None),
        Err(RuleError::UnknownMatchType("maybe".into()))
    );
}

#[test]
fn match_type_is_case_sensitive() {
    assert_eq!(
        parse_rules("match: ALL", None),
        Err(RuleError::UnknownMatchType("ALL".into()))
    );
}

#[test]
fn unknown_tag_is_reported() {
    assert_eq!(
        parse_rules("bogus: x", None),
        Err(RuleError::UnknownTag("bogus".into()))
    );
}

#[test]
fn line_without_colon_is_reported() {
    assert_eq!(
        parse_rules("name A*", None),
        Err(RuleError::MissingColon("name A*".into()))
    );
}

#[test]
fn predicate_lines_accumulate_into_sets() {
    let filter = parse_rules(
        "
        name: ABC*
        name: XYZ?
        name: ABC*
        script: Latn
        script: Grek
        category: Lu
        category: Ll
        group: kern*
        group: public.kern1.*
        ",
        None,
    )
    .expect("parse");

    assert_eq!(
        filter.names().iter().cloned().collect::<Vec<_>>(),
        sorted(&["ABC*", "XYZ?"])
    );
    assert_eq!(filter.scripts().len(), 2);
    assert_eq!(filter.categories().len(), 2);
    assert_eq!(
        filter.groups().iter().cloned().collect::<Vec<_>>(),
        sorted(&["kern*", "public.kern1.*"])
    );
}

#[test]
fn comments_are_stripped_from_every_line() {
    let filter = parse_rules("# header\nname: A # uppercase A\n   # indented\n", None)
        .expect("parse");
    assert_eq!(filter, RuleFilter::default().with_names(["A"]));
}

#[test]
fn macros_rejected_when_disallowed() {
    assert_eq!(
        parse_rules("macro: anything", None),
        Err(RuleError::MacrosNotAllowed)
    );
}

#[test]
fn macro_expands_into_all_four_sets() {
    let macros = parse_macro_sections(
        "
        > macro1
        name: name1
        name: name2
        script: script1
        script: script2
        category: category1
        category: category2
        group: group1
        group: group2

        > macro2
        name: xxx
        script: xxx
        category: xxx
        group: xxx
        ",
    )
    .expect("macros");

    let filter = parse_rules(
        "
        name: aName
        script: aScript
        category: aCategory
        group: aGroup
        macro: macro1
        ",
        Some(&macros),
    )
    .expect("parse");

    assert_eq!(
        filter.names().iter().cloned().collect::<Vec<_>>(),
        sorted(&["aName", "name1", "name2"])
    );
    assert_eq!(
        filter.scripts().iter().cloned().collect::<Vec<_>>(),
        sorted(&["aScript", "script1", "script2"])
    );
    assert_eq!(
        filter.categories().iter().cloned().collect::<Vec<_>>(),
        sorted(&["aCategory", "category1", "category2"])
    );
    assert_eq!(
        filter.groups().iter().cloned().collect::<Vec<_>>(),
        sorted(&["aGroup", "group1", "group2"])
    );
}

#[test]
fn macro_does_not_change_policy() {
    let macros = parse_macro_sections("> strict\nmatch: all\nname: A").expect("macros");
    let filter = parse_rules("macro: strict", Some(&macros)).expect("parse");
    assert_eq!(filter.policy(), MatchPolicy::Any);
    assert!(filter.names().contains("A"));
}

#[test]
fn missing_macro_contributes_nothing() {
    let macros = MacroTable::defaults().expect("defaults");
    let filter = parse_rules("name: A\nmacro: no-such-macro", Some(&macros)).expect("parse");
    assert_eq!(filter, RuleFilter::default().with_names(["A"]));
}

#[test]
fn macro_union_collapses_duplicates() {
    let macros = parse_macro_sections("> m1\nname: foo*\ncategory: Lu").expect("macros");
    let via_macro = parse_rules("match: any\nname: foo*\nmacro: m1", Some(&macros)).expect("macro");
    let inline = parse_rules("match: any\nname: foo*\ncategory: Lu", None).expect("inline");
    assert_eq!(via_macro, inline);
}

#[test]
fn filters_parsed_earlier_survive_table_rebuild() {
    let old = parse_macro_sections("> caps\ncategory: Lu").expect("old");
    let filter = parse_rules("macro: caps", Some(&old)).expect("parse");

    let new = parse_macro_sections("> caps\ncategory: Lt").expect("new");
    drop(old);

    assert!(filter.categories().contains("Lu"));
    let reparsed = parse_rules("macro: caps", Some(&new)).expect("reparse");
    assert!(reparsed.categories().contains("Lt"));
}

fn rule_line() -> impl Strategy<Value = String> {
    let tag = prop_oneof![
        Just("name"),
        Just("script"),
        Just("category"),
        Just("group"),
    ];
    (tag, "[A-Za-z0-9*?.]{1,8}").prop_map(|(tag, content)| format!("{tag}: {content}"))
}

proptest! {
    #[test]
    fn parsing_is_deterministic(lines in prop::collection::vec(rule_line(), 0..12)) {
        let text = lines.join("\n");
        let first = parse_rules(&text, None).expect("parse");
        let second = parse_rules(&text, None).expect("reparse");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn line_order_is_irrelevant(lines in prop::collection::vec(rule_line(), 0..12)) {
        let forward = parse_rules(&lines.join("\n"), None).expect("forward");
        let mut reversed = lines.clone();
        reversed.reverse();
        let backward = parse_rules(&reversed.join("\n"), None).expect("backward");
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn policy_is_any_without_match_line(lines in prop::collection::vec(rule_line(), 0..12)) {
        let filter = parse_rules(&lines.join("\n"), None).expect("parse");
        prop_assert_eq!(filter.policy(), MatchPolicy::Any);
    }
}

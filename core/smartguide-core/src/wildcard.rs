//! Shell-style wildcard matching (made by FontLab https://www.fontlab.com/)
//!
//! Patterns support `*` (any run), `?` (one character) and `[...]` sets with
//! ranges and `!` negation. Matching is case-sensitive and anchored at both
//! ends. Everything else in a pattern is literal.

use regex::Regex;

/// A wildcard pattern compiled for repeated matching.
#[derive(Debug, Clone)]
pub struct Wildcard {
    pattern: String,
    regex: Option<Regex>,
}

impl Wildcard {
    pub fn new(pattern: &str) -> Self {
        let regex = match Regex::new(&translate(pattern)) {
            Ok(re) => Some(re),
            Err(err) => {
                // Only reachable through the regex size limit.
                tracing::warn!(pattern, %err, "wildcard fell back to literal comparison");
                None
            }
        };

        Self {
            pattern: pattern.to_string(),
            regex,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, subject: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(subject),
            None => subject == self.pattern,
        }
    }
}

/// Match `subject` against a single wildcard `pattern`.
pub fn wildcard_match(subject: &str, pattern: &str) -> bool {
    Wildcard::new(pattern).is_match(subject)
}

/// Translate a wildcard pattern into an anchored regular expression.
pub fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from(r"\A(?s:");
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                while i < chars.len() && chars[i] == '*' {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i..end]);
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            other => push_escaped(&mut out, other),
        }
    }

    out.push_str(r")\z");
    out
}

/// Index of the `]` closing a set that opens just before `start`.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A leading `]` is a member, not the terminator.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        j += 1;
    }
    (j < chars.len()).then_some(j)
}

fn push_class(out: &mut String, body: &[char]) {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut members = String::new();
    let mut k = 0;
    while k < body.len() {
        if k + 2 < body.len() && body[k + 1] == '-' {
            let (lo, hi) = (body[k], body[k + 2]);
            // Reversed ranges match nothing.
            if lo <= hi {
                push_escaped(&mut members, lo);
                members.push('-');
                push_escaped(&mut members, hi);
            }
            k += 3;
        } else {
            push_escaped(&mut members, body[k]);
            k += 1;
        }
    }

    match (negated, members.is_empty()) {
        (true, true) => out.push('.'),
        (false, true) => out.push_str(r"[^\x00-\x{10FFFF}]"),
        (true, false) => {
            out.push_str("[^");
            out.push_str(&members);
            out.push(']');
        }
        (false, false) => {
            out.push('[');
            out.push_str(&members);
            out.push(']');
        }
    }
}

fn push_escaped(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_on_both_ends() {
        assert!(!wildcard_match("nameTest1", "nameTest"));
        assert!(wildcard_match("nameTest1", "nameTest*"));
        assert!(!wildcard_match("xnameTest", "nameTest*"));
    }

    #[test]
    fn question_mark_consumes_exactly_one() {
        assert!(wildcard_match("A1", "A?"));
        assert!(!wildcard_match("A", "A?"));
        assert!(!wildcard_match("A12", "A?"));
    }

    #[test]
    fn star_matches_empty_run() {
        assert!(wildcard_match("a.sc", "*.sc*"));
        assert!(wildcard_match(".sc", "*.sc*"));
        assert!(wildcard_match("", "*"));
        assert!(wildcard_match("anything", "**"));
    }

    #[test]
    fn sets_ranges_and_negation() {
        assert!(wildcard_match("b", "[abc]"));
        assert!(!wildcard_match("d", "[abc]"));
        assert!(wildcard_match("m", "[a-z]"));
        assert!(!wildcard_match("M", "[a-z]"));
        assert!(wildcard_match("M", "[!a-z]"));
        assert!(!wildcard_match("m", "[!a-z]"));
        assert!(wildcard_match("-", "[a-]"));
        assert!(wildcard_match("]", "[]]"));
    }

    #[test]
    fn case_sensitive() {
        assert!(!wildcard_match("abc", "ABC"));
        assert!(wildcard_match("ABC", "ABC"));
    }

    #[test]
    fn unterminated_set_is_literal() {
        assert!(wildcard_match("[ab", "[ab"));
        assert!(!wildcard_match("a", "[ab"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(wildcard_match("a.b", "a.b"));
        assert!(!wildcard_match("axb", "a.b"));
        assert!(wildcard_match("f(x)+", "f(x)+"));
        assert!(wildcard_match("^$", "^$"));
        assert!(wildcard_match("a\\b", "a\\b"));
    }

    #[test]
    fn reversed_range_matches_nothing() {
        assert!(!wildcard_match("m", "[z-a]"));
        assert!(wildcard_match("m", "[!z-a]"));
    }

    #[test]
    fn compiled_wildcard_keeps_source_pattern() {
        let wc = Wildcard::new("*.uc");
        assert_eq!(wc.pattern(), "*.uc");
        assert!(wc.is_match("A.uc"));
        assert!(!wc.is_match("A.uc.alt"));
    }
}

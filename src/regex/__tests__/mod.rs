use crate::regex::{
    escape, Atom, AtomKind, CompiledRegex, MatchKind, Matcher, Modifiers, Span, SpanSet,
};
use std::rc::Rc;

fn compile(pattern: &str) -> Rc<CompiledRegex> {
    Rc::new(CompiledRegex::new(pattern))
}

fn assert_matches(pattern: &str, accepted: &[&str], rejected: &[&str]) {
    let re = compile(pattern);
    for s in accepted {
        assert!(re.is_match(s), "'{}' did not match {:?}", pattern, s);
    }
    for s in rejected {
        assert!(!re.is_match(s), "'{}' matched {:?}", pattern, s);
    }
}

#[test]
fn empty_pattern() {
    assert_matches("", &[""], &["a"]);
    assert!(compile("").matches_empty());
}

#[test]
fn single_char() {
    assert_matches("a", &["a"], &["b", "aa", ""]);
}

#[test]
fn sequence() {
    assert_matches("abc", &["abc"], &["ab", "abcabc", ""]);
}

#[test]
fn choice() {
    assert_matches("a|b", &["a", "b"], &["ab", ""]);
}

#[test]
fn sequence_choice() {
    assert_matches("ab|ac", &["ab", "ac"], &["abac", "a", ""]);
}

#[test]
fn optional() {
    assert_matches("a?", &["a", ""], &["aa"]);
    assert_matches("ab?", &["ab", "a"], &["", "abab"]);
    assert_matches("(ab)?", &["ab", ""], &["abab", "a"]);
}

#[test]
fn zero_or_more() {
    assert_matches("a*", &["", "a", "aa", "aaa"], &["ab"]);
    assert_matches(
        "(ab)*",
        &["", "ab", "abab", "ababab"],
        &["a", "b", "aba"],
    );
}

#[test]
fn one_or_more() {
    assert_matches("a+", &["a", "aa", "aaa"], &[""]);
    assert_matches("(ab)+", &["ab", "abab", "ababab"], &["", "a", "b", "aba"]);
}

#[test]
fn repeat_bounds() {
    // swapped bounds are reordered to {3,5}
    assert_matches(
        "(ab|ac){5,3}",
        &["abacab", "abacabab", "abacababac"],
        &["abacababacab", ""],
    );
}

#[test]
fn repeat_exact() {
    assert_matches(
        "(ab|ac){3}",
        &["abacab"],
        &["abacabab", "abacababac", ""],
    );
}

#[test]
fn repeat_no_upper_limit() {
    assert_matches(
        "(ab|ac){3,}",
        &["abacab", "abacabab", "abacababacab"],
        &["abac", ""],
    );
}

#[test]
fn repeat_no_lower_limit() {
    assert_matches(
        "(ab|ac){,3}",
        &["", "abac", "abacab"],
        &["abacabab", "abacababac"],
    );
}

#[test]
fn digit_class() {
    assert_matches("\\d{3,5}", &["569", "5697", "56975"], &["569751", "5bc"]);
    assert_matches("\\D{3,5}", &["abF", "abFs", "abFs?"], &["abFs?;", "5bc"]);
}

#[test]
fn space_class() {
    assert_matches("\\s{3,5}", &["   ", " \t \r\n"], &["  \t   ", "5  "]);
    assert_matches("\\S{3,5}", &["abc", "abcd", "abcde"], &["abcdef", "   "]);
}

#[test]
fn word_class() {
    assert_matches("\\w{3,5}", &["ab0", "ab01", "abc01"], &["abc012", "?bc"]);
    assert_matches("\\W{3,5}", &["<>?", "<>?,", "<>?,."], &["<>?,./", "A<>"]);
}

#[test]
fn dot() {
    assert_matches(".{3,5}", &["^*k", "^*k)", "^*k)$"], &["^*k)$d", ""]);
}

#[test]
fn bracket_class() {
    assert_matches("[_a-zA-Z][_a-zA-Z0-9]*", &["x", "_f1", "Abc09"], &["1x", ""]);
    assert_matches("[^0-9]+", &["abc", "?!"], &["a1", ""]);
}

#[test]
fn escaped_metacharacters() {
    assert_matches("\\+|-", &["+", "-"], &["+-", ""]);
    assert_matches("\\*|/", &["*", "/"], &["*/", ""]);
    assert_matches("a\\|b", &["a|b"], &["a", "b"]);
}

#[test]
fn lenient_unclosed_constructs() {
    // missing closers are read to the end of the pattern
    assert_matches("(ab", &["ab"], &["a"]);
    assert_matches("[ab", &["a", "b"], &["c"]);
    // a trailing backslash escapes itself
    assert_matches("a\\", &["a\\"], &["a"]);
}

#[test]
fn case_insensitive_flag() {
    assert_matches("(?i)abc", &["abc", "ABC", "aBc"], &["abd"]);
    // the flag only applies to atoms after it
    assert_matches("a(?i)bc", &["abc", "aBC"], &["Abc"]);
}

#[test]
fn flag_scope_ends_with_the_group() {
    assert_matches("((?i)a)b", &["ab", "Ab"], &["aB", "AB"]);
}

#[test]
fn unicode_flag_widens_any_char() {
    assert_matches("(?u).", &["日", "a"], &["", "ab"]);
    assert_matches(".", &["a", "~"], &["日"]);
}

#[test]
fn named_character_list() {
    assert_matches("(:digit)+", &["007", "42"], &["4a", ""]);
    assert_matches("(:alpha)(:alnum)*", &["x", "a1z9"], &["9a", ""]);
}

#[test]
fn matches_empty_reflects_the_language() {
    assert!(compile("a*").matches_empty());
    assert!(compile("a?").matches_empty());
    assert!(compile("(ab|ac){,3}").matches_empty());
    assert!(!compile("a").matches_empty());
    assert!(!compile("a+").matches_empty());
    assert!(!compile("(ab|ac){3}").matches_empty());
}

#[test]
fn pattern_round_trip() {
    for pattern in [
        "",
        "a",
        "abc",
        "ab|ac",
        "a?",
        "(ab)?",
        "a*",
        "(ab)+",
        "(ab|ac){3,5}",
        "(ab|ac){3}",
        "(ab|ac){3,}",
        "(ab|ac){,3}",
        "\\d{3,5}",
        "\\w+",
        "[_a-zA-Z][_a-zA-Z0-9]*",
        "[^ab]",
        "\\+|-",
        "(?i)abc",
        "(:alpha)+",
        ".",
        "a.c",
    ] {
        let compiled = CompiledRegex::new(pattern);
        let rendered = compiled.pattern();
        let reparsed = CompiledRegex::new(&rendered);
        assert_eq!(
            compiled.regex(),
            reparsed.regex(),
            "pattern {:?} rendered as {:?} which parses differently",
            pattern,
            rendered
        );
    }
}

#[test]
fn prefix_matching_reports_the_tri_state() {
    let re = compile("ab*c");
    let mut m = re.matcher();
    assert_eq!(m.last_match(), MatchKind::Start);
    assert_eq!(m.match_next('a'), MatchKind::PartialMatch);
    assert_eq!(m.match_next('b'), MatchKind::PartialMatch);
    assert_eq!(m.match_next('b'), MatchKind::PartialMatch);
    assert_eq!(m.match_next('c'), MatchKind::FullMatch);
    assert_eq!(m.match_next('c'), MatchKind::NoMatch);
    // dead until reset
    assert_eq!(m.match_next('a'), MatchKind::NoMatch);
    assert_eq!(m.matched(), "abbc");

    m.reset();
    assert_eq!(m.last_match(), MatchKind::Start);
    assert_eq!(m.match_next('a'), MatchKind::PartialMatch);
}

#[test]
fn full_match_can_still_be_extended() {
    let re = compile("a+");
    let mut m = re.matcher();
    assert_eq!(m.match_next('a'), MatchKind::FullMatch);
    assert_eq!(m.match_next('a'), MatchKind::FullMatch);
    assert_eq!(m.matched(), "aa");
}

#[test]
fn capture_groups_survive_determinisation() {
    let re = compile("(aab)|(aac)");
    let mut m = re.matcher();
    assert!(m.matches("aab"));
    assert_eq!(m.group(1), Some("aab"));
    // the alternative through group 2 died on the last rune, so no text is
    // credited to it
    assert_eq!(m.group(2), None);

    m.reset();
    assert!(m.matches("aac"));
    assert_eq!(m.group(1), None);
    assert_eq!(m.group(2), Some("aac"));

    m.reset();
    assert!(!m.matches("aad"));
}

#[test]
fn nested_capture_groups_share_their_path() {
    let re = compile("a(b(c)d)e");
    let mut m = re.matcher();
    assert!(m.matches("abcde"));
    assert_eq!(m.group(0), Some("abcde"));
    assert_eq!(m.group(1), Some("bcd"));
    assert_eq!(m.group(2), Some("c"));
}

#[test]
fn matcher_expecting_lists_continuations() {
    let re = compile(":=");
    let mut m = re.matcher();
    assert_eq!(m.match_next(':'), MatchKind::PartialMatch);
    assert_eq!(m.expecting(), vec!["=".to_string()]);
}

#[test]
fn escape_quotes_metacharacters() {
    assert_eq!(escape("a+b"), "a\\+b");
    assert_eq!(escape("({[\\"), "\\(\\{\\[\\\\");
    let re = compile(&escape("a+b*"));
    assert!(re.is_match("a+b*"));
    assert!(!re.is_match("aab"));
}

#[test]
fn matcher_from_shared_compilation() {
    let re = compile("[0-9]+");
    let mut first = Matcher::new(Rc::clone(&re));
    let mut second = Matcher::new(Rc::clone(&re));
    assert!(first.matches("10"));
    assert!(second.matches("999"));
    assert_eq!(first.matched(), "10");
    assert_eq!(second.matched(), "999");
}

fn atom(kind: AtomKind) -> Atom {
    Atom::new(kind, Modifiers::default(), vec![0])
}

#[test]
fn char_atom_matches_only_itself() {
    let a = atom(AtomKind::Char('a'));
    assert!(a.matches('a'));
    assert!(!a.matches('b'));
}

#[test]
fn case_insensitive_char_matches_both_cases() {
    let a = Atom::new(
        AtomKind::Char('a'),
        Modifiers {
            case_insensitive: true,
            unicode: false,
        },
        vec![0],
    );
    assert!(a.matches('a'));
    assert!(a.matches('A'));
    assert!(!a.matches('b'));
    assert!(a.span_set().matches('A'));
}

#[test]
fn excluding_set_matches_the_complement() {
    let members = vec![atom(AtomKind::Char('a')), atom(AtomKind::Char('b'))];
    let set = atom(AtomKind::Set {
        exclude: true,
        members,
    });
    assert!(!set.matches('a'));
    assert!(!set.matches('b'));
    assert!(set.matches('c'));
}

#[test]
fn excluding_set_spans_invert_the_universe() {
    let set = atom(AtomKind::Set {
        exclude: true,
        members: vec![atom(AtomKind::Range('a', 'z'))],
    });
    let spans = set.span_set();
    assert!(spans.matches('A'));
    assert!(!spans.matches('q'));
    assert!(!spans.matches('\u{1F600}'), "default universe is ascii");
}

#[test]
fn any_universe_follows_the_unicode_modifier() {
    let ascii = atom(AtomKind::Any);
    assert!(ascii.matches('a'));
    assert!(!ascii.matches('日'));

    let unicode = Atom::new(
        AtomKind::Any,
        Modifiers {
            case_insensitive: false,
            unicode: true,
        },
        vec![0],
    );
    assert!(unicode.matches('日'));
}

#[test]
fn merge_groups_unions_sorted() {
    let mut a = Atom::new(AtomKind::Char('a'), Modifiers::default(), vec![0, 2]);
    let b = Atom::new(AtomKind::Char('a'), Modifiers::default(), vec![0, 1]);
    a.merge_groups(&b);
    assert_eq!(a.groups(), &[0, 1, 2]);
}

#[test]
fn compact_merges_intersecting_spans() {
    let set = SpanSet::new(vec![
        Span::new('f', 'k'),
        Span::new('a', 'g'),
        Span::new('x', 'z'),
    ]);
    assert_eq!(set.spans(), &[Span::new('a', 'k'), Span::new('x', 'z')]);
}

#[test]
fn compact_merges_adjacent_spans() {
    let set = SpanSet::new(vec![Span::new('a', 'm'), Span::new('n', 'z')]);
    assert_eq!(set.spans(), &[Span::new('a', 'z')]);
}

#[test]
fn minus_splits_spans() {
    let set = SpanSet::new(vec![Span::new('a', 'z')]);
    let removed = SpanSet::new(vec![Span::new('g', 'j')]);
    assert_eq!(
        set.minus(&removed).spans(),
        &[Span::new('a', 'f'), Span::new('k', 'z')]
    );
}

#[test]
fn minus_drops_covered_spans() {
    let set = SpanSet::new(vec![Span::new('d', 'f'), Span::new('m', 'p')]);
    let removed = SpanSet::new(vec![Span::new('a', 'z')]);
    assert!(set.minus(&removed).is_empty());
}

#[test]
fn minus_keeps_disjoint_spans() {
    let set = SpanSet::new(vec![Span::new('0', '9')]);
    let removed = SpanSet::new(vec![Span::new('a', 'z')]);
    assert_eq!(set.minus(&removed).spans(), &[Span::new('0', '9')]);
}

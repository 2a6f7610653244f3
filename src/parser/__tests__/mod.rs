use crate::lexer::{ignore_tokens, Lexer, TokenType};
use crate::parser::{Grammar, Production, Retention, Sentence};
use crate::ParseError;

fn statement_lexer() -> Lexer {
    Lexer::new(vec![
        TokenType::new("LET", "let"),
        TokenType::new("INT", "[0-9]+"),
        TokenType::new("ID", "[_a-zA-Z][_a-zA-Z0-9]*"),
        TokenType::new("ASSIGN", ":="),
        TokenType::new("EQ", "="),
        TokenType::new("SEMI", ";"),
        TokenType::new("ADD", "\\+|-"),
        TokenType::new("MUL", "\\*|/"),
        TokenType::new("LP", "\\("),
        TokenType::new("RP", "\\)"),
        TokenType::new("SPC", "[ \t\r\n]+"),
    ])
    .modulate(ignore_tokens(&["SPC"]))
}

/// Program = Stmt+
/// Stmt    = LET ID ":=" Expr ";" | ID "=" Expr ";"
/// Expr    = Term (ADD Expr)?
/// Term    = Factor+
/// Factor  = Base (MUL Expr)?
/// Base    = "(" Expr ")" | INT | ID
fn statement_grammar() -> Grammar {
    Grammar::new(
        "statements",
        statement_lexer(),
        vec![
            Production::new("Program", Sentence::one_or_more(Sentence::rule("Stmt"))),
            Production::new(
                "Stmt",
                Sentence::choice(vec![
                    Sentence::sequence(vec![
                        Sentence::token("LET"),
                        Sentence::token("ID"),
                        Sentence::token("ASSIGN"),
                        Sentence::rule("Expr"),
                        Sentence::token("SEMI"),
                    ]),
                    Sentence::sequence(vec![
                        Sentence::token("ID"),
                        Sentence::token("EQ"),
                        Sentence::rule("Expr"),
                        Sentence::token("SEMI"),
                    ]),
                ]),
            ),
            Production::new(
                "Expr",
                Sentence::sequence(vec![
                    Sentence::rule("Term"),
                    Sentence::optional(Sentence::sequence(vec![
                        Sentence::token("ADD"),
                        Sentence::rule("Expr"),
                    ])),
                ]),
            ),
            Production::new("Term", Sentence::one_or_more(Sentence::rule("Factor"))),
            Production::new(
                "Factor",
                Sentence::sequence(vec![
                    Sentence::rule("Base"),
                    Sentence::optional(Sentence::sequence(vec![
                        Sentence::token("MUL"),
                        Sentence::rule("Expr"),
                    ])),
                ]),
            ),
            Production::new(
                "Base",
                Sentence::choice(vec![
                    Sentence::sequence(vec![
                        Sentence::token("LP"),
                        Sentence::rule("Expr"),
                        Sentence::token("RP"),
                    ]),
                    Sentence::token("INT"),
                    Sentence::token("ID"),
                ]),
            ),
        ],
    )
}

#[test]
fn parses_a_program_into_four_statements() {
    let grammar = statement_grammar();
    let tree = grammar
        .parse_text("let x := 1000; let y := 2000; x = x + 5 * (4 + y / 2); y = y + x;")
        .expect("the program is well formed")
        .expect("the program is not empty");

    assert_eq!(tree.rule_name(), Some("Program"));
    assert_eq!(tree.children.len(), 4);
    for stmt in &tree.children {
        assert_eq!(stmt.rule_name(), Some("Stmt"));
    }
}

#[test]
fn leaves_carry_the_consumed_tokens() {
    let grammar = statement_grammar();
    let tree = grammar
        .parse_text("x = 1 + 2;")
        .unwrap()
        .expect("non-empty parse");

    let texts: Vec<&str> = tree.tokens().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["x", "=", "1", "+", "2", ";"]);
    assert!(tree.contains_rule("Expr"));
    assert!(tree.contains_rule("Base"));
}

#[test]
fn parse_reports_the_offending_token() {
    let grammar = statement_grammar();
    let err = grammar
        .parse_text("let x := ; y = 1;")
        .expect_err("';' cannot start an expression");
    match err {
        ParseError::Syntax(err) => {
            let position = err.position.expect("syntax errors carry a position");
            assert_eq!((position.line, position.column), (1, 10));
            assert!(err.message.contains("SEMI"), "message: {}", err.message);
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn parse_fails_on_empty_input_when_start_is_not_nullable() {
    let grammar = statement_grammar();
    let err = grammar.parse_text("").expect_err("Program needs a statement");
    assert!(matches!(err, ParseError::Syntax(_)));
}

#[test]
fn lex_failures_surface_through_parse() {
    let grammar = statement_grammar();
    let err = grammar.parse_text("let x := @;").expect_err("@ lexes nowhere");
    assert!(matches!(err, ParseError::Lex(_)));
}

#[test]
fn parse_from_named_production() {
    let grammar = statement_grammar();
    let tree = grammar
        .parse_text_production("1 + 2 * 3", "Expr")
        .unwrap()
        .expect("non-empty parse");
    assert_eq!(tree.rule_name(), Some("Expr"));

    let err = grammar
        .parse_text_production("1 + 2", "NoSuchRule")
        .expect_err("unknown start production");
    assert!(matches!(err, ParseError::Grammar(_)));
}

fn toggle_lexer() -> Lexer {
    Lexer::new(vec![
        TokenType::new("A", "a"),
        TokenType::new("B", "b"),
        TokenType::new("SPC", "[ \t\r\n]+"),
    ])
    .modulate(ignore_tokens(&["SPC"]))
}

#[test]
fn nullable_production_is_skipped_on_follow() {
    let grammar = Grammar::new(
        "nullable",
        toggle_lexer(),
        vec![
            Production::new(
                "S",
                Sentence::sequence(vec![Sentence::rule("Opt"), Sentence::token("B")]),
            ),
            Production::new("Opt", Sentence::optional(Sentence::token("A"))),
        ],
    );

    let with_a = grammar.parse_text("a b").unwrap().expect("non-empty parse");
    assert_eq!(with_a.tokens().len(), 2);

    let without_a = grammar.parse_text("b").unwrap().expect("non-empty parse");
    assert_eq!(without_a.tokens().len(), 1);
}

#[test]
fn nullable_start_production_can_match_empty() {
    let grammar = Grammar::new(
        "empty-start",
        toggle_lexer(),
        vec![Production::new(
            "Opt",
            Sentence::zero_or_more(Sentence::token("A")),
        )],
    );
    // the production never starts, so the parse is a successful empty match
    assert!(grammar.parse_text("").unwrap().is_none());

    let tree = grammar.parse_text("a a").unwrap().expect("two reps match");
    assert_eq!(tree.children.len(), 2);
}

#[test]
fn repeat_enforces_its_bounds() {
    let grammar = Grammar::new(
        "bounded",
        toggle_lexer(),
        vec![Production::new(
            "S",
            Sentence::repeat(Sentence::token("A"), 2, 3),
        )],
    );

    assert!(grammar.parse_text("a a").is_ok());
    assert!(grammar.parse_text("a a a").is_ok());
    let err = grammar.parse_text("a").expect_err("one is below the minimum");
    assert!(matches!(err, ParseError::Syntax(_)));
    // the fourth `a` is left unconsumed rather than rejected
    let tree = grammar.parse_text("a a a a").unwrap().unwrap();
    assert_eq!(tree.children.len(), 3);
}

#[test]
fn dropped_sentences_leave_no_children() {
    let lexer = statement_lexer();
    let grammar = Grammar::new(
        "drops",
        lexer,
        vec![Production::new(
            "Pair",
            Sentence::sequence(vec![
                Sentence::token("LP").retention(Retention::Drop),
                Sentence::token("INT"),
                Sentence::token("RP").retention(Retention::Drop),
            ]),
        )],
    );
    let tree = grammar.parse_text("(42)").unwrap().unwrap();
    let texts: Vec<&str> = tree.tokens().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["42"]);
}

#[test]
fn promote_tags_attach_like_retain() {
    let grammar = Grammar::new(
        "promote",
        toggle_lexer(),
        vec![Production::new(
            "S",
            Sentence::sequence(vec![
                Sentence::token("A").retention(Retention::Promote1),
                Sentence::token("B").retention(Retention::Promote2),
            ]),
        )],
    );
    let tree = grammar.parse_text("a b").unwrap().unwrap();
    assert_eq!(tree.children.len(), 2);
}

#[test]
fn left_recursion_is_reported_as_a_cycle() {
    let grammar = Grammar::new(
        "cyclic",
        toggle_lexer(),
        vec![Production::new(
            "S",
            Sentence::sequence(vec![Sentence::rule("S"), Sentence::token("A")]),
        )],
    );
    let err = grammar.parse_text("a").expect_err("S -> S A never terminates");
    match err {
        ParseError::Grammar(err) => {
            assert!(
                err.message.contains("cycle detected"),
                "message: {}",
                err.message
            );
        }
        other => panic!("expected a grammar error, got {:?}", other),
    }
}

#[test]
fn ordered_choice_takes_the_first_viable_alternative() {
    let grammar = Grammar::new(
        "ordered",
        toggle_lexer(),
        vec![Production::new(
            "S",
            Sentence::choice(vec![
                Sentence::sequence(vec![Sentence::token("A")]),
                Sentence::sequence(vec![Sentence::token("A"), Sentence::token("B")]),
            ]),
        )],
    );
    // both alternatives start with A; the first one wins and B is left over
    let tree = grammar.parse_text("a").unwrap().unwrap();
    assert_eq!(tree.tokens().len(), 1);
}

#[test]
fn grammar_renders_its_productions() {
    let grammar = statement_grammar();
    let rendered = format!("{}", grammar);
    assert!(rendered.contains("Program: (Stmt)+"));
    assert!(rendered.contains("Stmt: LET ID ASSIGN Expr SEMI | ID EQ Expr SEMI"));
}

use crate::lexer::{ignore_tokens, LexResult, Lexer, Modulator, Token, TokenType, EOF};
use crate::seq;
use crate::LexErrorKind;
use std::cell::RefCell;
use std::rc::Rc;

fn let_lexer() -> Lexer {
    Lexer::new(vec![
        TokenType::new("LET", "let"),
        TokenType::new("INT", "[0-9]+"),
        TokenType::new("ID", "[_a-zA-Z][_a-zA-Z0-9]*"),
        TokenType::new("EQ", "="),
        TokenType::new("SPC", "[ \t\r\n]+"),
    ])
}

fn tokens_of(lexer: &Lexer, input: &str) -> Vec<Token> {
    lexer
        .lex(input.as_bytes())
        .map(|item| item.expect("lexing should succeed"))
        .collect()
}

fn token(kind: &str, text: &str, line: u32, column: u32) -> Token {
    Token::new(kind, text, line, column)
}

#[test]
fn tokens_with_lines_and_columns() {
    let tokens = tokens_of(&let_lexer(), "let x =  1000");
    assert_eq!(
        tokens,
        vec![
            token("LET", "let", 1, 1),
            token("SPC", " ", 1, 4),
            token("ID", "x", 1, 5),
            token("SPC", " ", 1, 6),
            token("EQ", "=", 1, 7),
            token("SPC", "  ", 1, 8),
            token("INT", "1000", 1, 10),
            token(EOF, "", 1, 14),
        ]
    );
}

#[test]
fn maximal_munch() {
    // `letx` extends past the LET keyword, so the identifier wins even
    // though LET is declared first
    let tokens = tokens_of(&let_lexer(), "letx");
    assert_eq!(
        tokens,
        vec![token("ID", "letx", 1, 1), token(EOF, "", 1, 5)]
    );
}

#[test]
fn declaration_order_breaks_ties() {
    let tokens = tokens_of(&let_lexer(), "let");
    assert_eq!(tokens[0], token("LET", "let", 1, 1));

    let swapped = Lexer::new(vec![
        TokenType::new("ID", "[_a-zA-Z][_a-zA-Z0-9]*"),
        TokenType::new("LET", "let"),
    ]);
    let tokens = tokens_of(&swapped, "let");
    assert_eq!(tokens[0], token("ID", "let", 1, 1));
}

#[test]
fn modulated_expression_stream() {
    let lexer = Lexer::new(vec![
        TokenType::new("LET", "let"),
        TokenType::new("INT", "[0-9]+"),
        TokenType::new("ID", "[_a-zA-Z][_a-zA-Z0-9]*"),
        TokenType::new("EQ", "="),
        TokenType::new("SPC", "[ \t\r\n]+"),
        TokenType::new("PLUS", "\\+|-"),
        TokenType::new("TIME", "\\*|/"),
    ])
    .modulate(ignore_tokens(&["SPC"]));

    let tokens = tokens_of(&lexer, "let x = 1000\n\t\t\t\t\t\t\t let y =x+y*-2000");
    let kinds: Vec<(&str, &str)> = tokens
        .iter()
        .map(|t| (t.kind.as_str(), t.text.as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("LET", "let"),
            ("ID", "x"),
            ("EQ", "="),
            ("INT", "1000"),
            ("LET", "let"),
            ("ID", "y"),
            ("EQ", "="),
            ("ID", "x"),
            ("PLUS", "+"),
            ("ID", "y"),
            ("TIME", "*"),
            ("PLUS", "-"),
            ("INT", "2000"),
            (EOF, ""),
        ]
    );
    // the second statement starts after a line break and eight blanks
    assert_eq!((tokens[4].line, tokens[4].column), (2, 9));
}

#[test]
fn unicode_input_with_tiny_buffer() {
    let lexer = Lexer::new(vec![
        TokenType::new("LET", "let"),
        TokenType::new("INT", "[0-9]+"),
        TokenType::new("ID", "(?u)[_a-zA-Z][^ =]*"),
        TokenType::new("EQ", "="),
        TokenType::new("SPC", "[ \t\r\n]+"),
    ])
    .modulate(ignore_tokens(&["SPC"]))
    .buffer(3); // raised to the minimum of 8; multi-byte runes span refills

    let tokens = tokens_of(&lexer, "let A日本語 = 1000");
    assert_eq!(
        tokens,
        vec![
            token("LET", "let", 1, 1),
            token("ID", "A日本語", 1, 5),
            token("EQ", "=", 1, 10),
            token("INT", "1000", 1, 12),
            token(EOF, "", 1, 16),
        ]
    );
}

#[test]
fn buffer_size_never_changes_the_tokens() {
    let input = "let 語x = 日本語本 +  99日\nlet 日 = 1000";
    let reference: Vec<Token> = unicode_lexer(1024)
        .lex(input.as_bytes())
        .map(|item| item.expect("lexing should succeed"))
        .collect();
    for size in [8, 9, 11, 16, 23] {
        let tokens: Vec<Token> = unicode_lexer(size)
            .lex(input.as_bytes())
            .map(|item| item.expect("lexing should succeed"))
            .collect();
        assert_eq!(tokens, reference, "buffer size {} diverged", size);
    }
}

fn unicode_lexer(buffer: usize) -> Lexer {
    Lexer::new(vec![
        TokenType::new("LET", "let"),
        TokenType::new("INT", "[0-9]+"),
        TokenType::new("ID", "(?u)[_a-zA-Z日本語][_a-zA-Z0-9日本語]*"),
        TokenType::new("EQ", "="),
        TokenType::new("PLUS", "\\+|-"),
        TokenType::new("SPC", "[ \t\r\n]+"),
    ])
    .buffer(buffer)
}

#[test]
fn unmatchable_input_reports_every_partial() {
    let lexer = Lexer::new(vec![
        TokenType::new("LET", "let"),
        TokenType::new("INT", "[0-9]+"),
        TokenType::new("ID", "[_a-zA-Z][_a-zA-Z0-9]*"),
        TokenType::new("EQ", ":="),
        TokenType::new("EQ_PLUS", ":\\+"),
        TokenType::new("SPC", "[ \t\r\n]+"),
    ])
    .modulate(ignore_tokens(&["SPC"]));

    let mut stream = lexer.lex("let x : 1000 :".as_bytes());
    assert_eq!(stream.next().unwrap().unwrap().kind, "LET");
    assert_eq!(stream.next().unwrap().unwrap().kind, "ID");

    let err = stream
        .next()
        .expect("an error item ends the stream")
        .expect_err("':' followed by a space matches nothing");
    assert_eq!((err.line, err.column), (1, 7));
    match err.kind {
        LexErrorKind::NoMatch { partials } => {
            let summary: Vec<(&str, &str)> = partials
                .iter()
                .map(|p| (p.id.as_str(), p.matched.as_str()))
                .collect();
            assert_eq!(summary, vec![("EQ", ":"), ("EQ_PLUS", ":")]);
            assert_eq!(partials[0].expecting, vec!["=".to_string()]);
            assert_eq!(partials[1].expecting, vec!["\\+".to_string()]);
        }
        other => panic!("expected NoMatch, got {:?}", other),
    }

    // a single error item is final
    assert!(stream.next().is_none());
    assert!(stream.next().is_none());
}

#[test]
fn committed_full_match_is_not_resurrected() {
    // `ab(cd)?` has accepted "ab" two runes before failing on 'e', but the
    // lexer only commits the snapshot taken at the failing rune
    let lexer = Lexer::new(vec![TokenType::new("A", "ab(cd)?")]);
    let mut stream = lexer.lex("abce".as_bytes());
    let err = stream.next().unwrap().expect_err("'abc' dangling");
    assert_eq!((err.line, err.column), (1, 1));
}

#[test]
fn concatenated_tokens_reproduce_the_input() {
    let inputs = ["let x =  1000", "letx1000 = let", "   let\n\nlet "];
    for input in inputs {
        let text: String = tokens_of(&let_lexer(), input)
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(text, input);
    }
}

#[test]
fn empty_input_yields_only_eof() {
    let tokens = tokens_of(&let_lexer(), "");
    assert_eq!(tokens, vec![token(EOF, "", 1, 1)]);
}

#[test]
fn pushback_is_lifo_and_preserves_positions() {
    let mut stream = let_lexer().lex("let x".as_bytes());
    let first = stream.next().unwrap().unwrap();
    assert_eq!(first, token("LET", "let", 1, 1));

    stream.push_back(first.clone());
    assert_eq!(stream.next().unwrap().unwrap(), first);

    let t1 = token("A", "a", 1, 1);
    let t2 = token("B", "b", 2, 2);
    stream.push_back(t1.clone());
    stream.push_back(t2.clone());
    assert_eq!(stream.next().unwrap().unwrap(), t2);
    assert_eq!(stream.next().unwrap().unwrap(), t1);
}

#[test]
fn simple_token_types_match_themselves_literally() {
    let lexer = Lexer::new(vec![
        TokenType::simple("+"),
        TokenType::simple("("),
        TokenType::new("INT", "[0-9]+"),
    ]);
    let tokens = tokens_of(&lexer, "(1+2");
    let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["(", "INT", "+", "INT", EOF]);
}

#[test]
fn buffering_modulator_can_reverse_the_stream() {
    let buffered: Rc<RefCell<Vec<Token>>> = Rc::new(RefCell::new(Vec::new()));
    let reverse: Modulator = Rc::new(move |item: LexResult| match item {
        Ok(t) if t.is_eof() => {
            let mut out: Vec<LexResult> =
                buffered.borrow_mut().drain(..).rev().map(Ok).collect();
            out.push(Ok(t));
            out
        }
        Ok(t) => {
            buffered.borrow_mut().push(t);
            Vec::new()
        }
        err => vec![err],
    });

    let lexer = let_lexer()
        .modulate(ignore_tokens(&["SPC"]))
        .modulate(reverse);
    let texts: Vec<String> = lexer
        .lex("let x = 1".as_bytes())
        .map(|item| item.unwrap().text)
        .collect();
    assert_eq!(texts, vec!["1", "=", "x", "let", ""]);
}

#[test]
fn modulators_compose_left_to_right() {
    let upper: Modulator = Rc::new(|item: LexResult| match item {
        Ok(mut t) => {
            t.text = t.text.to_uppercase();
            vec![Ok(t)]
        }
        err => vec![err],
    });
    let lexer = let_lexer()
        .modulate(ignore_tokens(&["SPC"]))
        .modulate(upper);
    let texts: Vec<String> = lexer
        .lex("let abc".as_bytes())
        .map(|item| item.unwrap().text)
        .collect();
    assert_eq!(texts, vec!["LET", "ABC", ""]);
}

#[test]
fn push_style_consumption_can_cancel() {
    let mut seen = Vec::new();
    seq::push(let_lexer().lex("let x = 1".as_bytes()), |item| {
        let t = item.unwrap();
        let stop = t.kind == "ID";
        seen.push(t.kind);
        !stop
    });
    assert_eq!(seen, vec!["LET", "SPC", "ID"]);
}

#[test]
fn read_errors_surface_verbatim() {
    struct FailingReader;
    impl std::io::Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "pipe burst"))
        }
    }

    let mut stream = let_lexer().lex(FailingReader);
    let err = stream.next().unwrap().expect_err("reader fails");
    match err.kind {
        LexErrorKind::Io(io) => assert_eq!(io.to_string(), "pipe burst"),
        other => panic!("expected Io, got {:?}", other),
    }
    assert!(stream.next().is_none());
}

#[test]
fn invalid_utf8_is_a_lex_error() {
    let lexer = let_lexer();
    let mut stream = lexer.lex(&[b'l', b'e', b't', 0xff][..]);
    let mut last = None;
    for item in &mut stream {
        last = Some(item);
    }
    let err = last.unwrap().expect_err("0xff is not valid UTF-8");
    assert!(matches!(err.kind, LexErrorKind::InvalidUtf8));
}

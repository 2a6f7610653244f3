//! The recursive descent recogniser. One token of lookahead via pushback;
//! each construct tests the lookahead against its FIRST set and either
//! recurses, skips (when nullable), or fails naming the offending token
//! and the construct being matched.

use super::{CycleDetector, Grammar, Production, Retention, Sentence, SyntaxTree};
use crate::lexer::{Token, TokenSeq};
use crate::{ParseError, SyntaxError};
use std::io::Read;

/// Read the lookahead without consuming it.
fn peek<R: Read>(tokens: &mut TokenSeq<R>) -> Result<Token, ParseError> {
    let token = take(tokens)?;
    tokens.push_back(token.clone());
    Ok(token)
}

/// Consume the next token.
fn take<R: Read>(tokens: &mut TokenSeq<R>) -> Result<Token, ParseError> {
    match tokens.next() {
        Some(Ok(token)) => Ok(token),
        Some(Err(err)) => Err(ParseError::Lex(err)),
        None => Err(ParseError::Syntax(SyntaxError::new(
            None,
            "unexpected end of token stream".into(),
        ))),
    }
}

fn unexpected(token: &Token, matching: impl std::fmt::Display) -> ParseError {
    ParseError::Syntax(SyntaxError::new(
        Some(token.position()),
        format!("unexpected token {:?} while matching {}", token.kind, matching),
    ))
}

fn cannot_start(token: &Token, sentence: &Sentence) -> ParseError {
    ParseError::Syntax(SyntaxError::new(
        Some(token.position()),
        format!("token {:?} cannot start {}", token.kind, sentence),
    ))
}

impl Production {
    /// Recognise this production against the stream. `Ok(None)` is a
    /// successful empty match: the production is nullable and the
    /// lookahead belongs to its FOLLOW set.
    pub(crate) fn recognise<R: Read>(
        &self,
        g: &Grammar,
        tokens: &mut TokenSeq<R>,
        cd: &mut CycleDetector,
    ) -> Result<Option<SyntaxTree>, ParseError> {
        let token = peek(tokens)?;
        let first = self.first(g, cd)?;
        if first.contains(&token.kind) {
            self.sentence.recognise(g, &self.name, tokens, cd)
        } else if self.match_empty(g) {
            // the start production has no call sites, so end-of-stream
            // stands in for its FOLLOW set
            let follow = self.follow(g, cd)?;
            if follow.contains(&token.kind) || token.is_eof() {
                Ok(None)
            } else {
                Err(unexpected(&token, &self.name))
            }
        } else {
            Err(unexpected(&token, &self.name))
        }
    }
}

impl Sentence {
    fn recognise<R: Read>(
        &self,
        g: &Grammar,
        owner: &str,
        tokens: &mut TokenSeq<R>,
        cd: &mut CycleDetector,
    ) -> Result<Option<SyntaxTree>, ParseError> {
        match self {
            Sentence::Token { id, .. } => {
                let token = take(tokens)?;
                if token.kind == *id {
                    Ok(Some(SyntaxTree::leaf(token)))
                } else {
                    Err(ParseError::Syntax(SyntaxError::new(
                        Some(token.position()),
                        format!(
                            "token type {:?} does not match expected type {:?}",
                            token.kind, id
                        ),
                    )))
                }
            }
            Sentence::Rule { name, .. } => {
                let production = g.find(name).ok_or_else(|| {
                    ParseError::Grammar(crate::GrammarError::new(format!(
                        "could not find production {:?}",
                        name
                    )))
                })?;
                production.recognise(g, tokens, cd)
            }
            Sentence::Sequence { elements, .. } => {
                let mut tree = SyntaxTree::rule(owner);
                for element in elements {
                    let token = peek(tokens)?;
                    if element.first(g, cd)?.contains(&token.kind) {
                        let child = element.recognise(g, owner, tokens, cd)?;
                        tree.attach(child, element.get_retention());
                    } else if !element.match_empty(g) {
                        return Err(cannot_start(&token, element));
                    }
                }
                Ok(Some(tree))
            }
            Sentence::Choice { alternates, .. } => {
                let token = peek(tokens)?;
                for alternate in alternates {
                    if alternate.first(g, cd)?.contains(&token.kind) {
                        return alternate.recognise(g, owner, tokens, cd);
                    }
                }
                if alternates.iter().any(|a| a.match_empty(g)) {
                    Ok(None)
                } else {
                    Err(ParseError::Syntax(SyntaxError::new(
                        Some(token.position()),
                        format!(
                            "no alternates found for choice {} on token {:?}",
                            self, token.kind
                        ),
                    )))
                }
            }
            Sentence::Optional { sentence, .. } => {
                let token = peek(tokens)?;
                if sentence.first(g, cd)?.contains(&token.kind) {
                    sentence.recognise(g, owner, tokens, cd)
                } else {
                    Ok(None)
                }
            }
            Sentence::ZeroOrMore { sentence, .. } => {
                let first = sentence.first(g, cd)?;
                let mut tree = SyntaxTree::rule(owner);
                loop {
                    let token = peek(tokens)?;
                    if !first.contains(&token.kind) {
                        break;
                    }
                    let child = sentence.recognise(g, owner, tokens, cd)?;
                    tree.attach(child, sentence.get_retention());
                }
                Ok(Some(tree))
            }
            Sentence::OneOrMore { sentence, .. } => {
                let first = sentence.first(g, cd)?;
                let mut tree = SyntaxTree::rule(owner);
                let mut matched_once = false;
                loop {
                    let token = peek(tokens)?;
                    if first.contains(&token.kind) {
                        matched_once = true;
                        let child = sentence.recognise(g, owner, tokens, cd)?;
                        tree.attach(child, sentence.get_retention());
                    } else if !matched_once && !sentence.match_empty(g) {
                        return Err(cannot_start(&token, sentence));
                    } else {
                        break;
                    }
                }
                Ok(Some(tree))
            }
            Sentence::Repeat {
                sentence, min, max, ..
            } => {
                let first = sentence.first(g, cd)?;
                let mut tree = SyntaxTree::rule(owner);
                let mut matched = 0;
                while matched < *max {
                    let token = peek(tokens)?;
                    if first.contains(&token.kind) {
                        let child = sentence.recognise(g, owner, tokens, cd)?;
                        tree.attach(child, sentence.get_retention());
                        matched += 1;
                    } else if matched < *min && !sentence.match_empty(g) {
                        return Err(cannot_start(&token, sentence));
                    } else {
                        break;
                    }
                }
                Ok(Some(tree))
            }
        }
    }
}

impl SyntaxTree {
    /// Attach a matched child according to its retention tag. `Promote1`
    /// and `Promote2` attach like `Retain`; the lifting they reserve is an
    /// AST-shaping concern.
    fn attach(&mut self, child: Option<SyntaxTree>, retention: Retention) {
        if retention == Retention::Drop {
            return;
        }
        if let Some(child) = child {
            self.children.push(child);
        }
    }
}

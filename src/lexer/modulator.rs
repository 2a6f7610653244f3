use super::Modulator;
use std::collections::HashSet;
use std::rc::Rc;

/// A [Modulator] that takes the given token types out of the stream. Useful
/// to remove syntactically meaningless tokens such as white space before
/// parsing.
pub fn ignore_tokens(types: &[&str]) -> Modulator {
    let ignore: HashSet<String> = types.iter().map(|t| t.to_string()).collect();
    Rc::new(move |item| match item {
        Ok(token) if ignore.contains(&token.kind) => Vec::new(),
        other => vec![other],
    })
}

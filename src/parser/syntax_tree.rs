use super::{SyntaxNode, SyntaxTree};
use crate::lexer::Token;
use ptree::TreeItem;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

impl SyntaxTree {
    /// An internal node wrapping the production that matched.
    pub fn rule(name: impl Into<String>) -> Self {
        Self {
            node: SyntaxNode::Rule(name.into()),
            children: Vec::new(),
        }
    }

    /// A leaf node wrapping a consumed token.
    pub fn leaf(token: Token) -> Self {
        Self {
            node: SyntaxNode::Token(token),
            children: Vec::new(),
        }
    }

    /// The wrapped token, for leaf nodes.
    pub fn token(&self) -> Option<&Token> {
        match &self.node {
            SyntaxNode::Token(token) => Some(token),
            SyntaxNode::Rule(_) => None,
        }
    }

    /// The production name, for internal nodes.
    pub fn rule_name(&self) -> Option<&str> {
        match &self.node {
            SyntaxNode::Rule(name) => Some(name),
            SyntaxNode::Token(_) => None,
        }
    }

    /// Whether any node of the subtree is an internal node named `name`.
    pub fn contains_rule(&self, name: &str) -> bool {
        self.rule_name() == Some(name) || self.children.iter().any(|c| c.contains_rule(name))
    }

    /// The tokens of the subtree's leaves, left to right.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'t>(&'t self, out: &mut Vec<&'t Token>) {
        if let Some(token) = self.token() {
            out.push(token);
        }
        for child in &self.children {
            child.collect_tokens(out);
        }
    }

    /// Print the tree to stdout.
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

impl Display for SyntaxNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxNode::Token(token) => write!(f, "{}", token),
            SyntaxNode::Rule(name) => write!(f, "{}", name),
        }
    }
}

impl TreeItem for SyntaxTree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{}", self.node)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(&self.children)
    }
}

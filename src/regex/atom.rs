use super::{escape, Atom, AtomKind, Modifiers, Span, SpanSet};
use std::fmt::{Display, Formatter};

impl Atom {
    pub(crate) fn new(kind: AtomKind, modifiers: Modifiers, groups: Vec<u32>) -> Self {
        Self {
            kind,
            modifiers,
            groups,
            label: None,
        }
    }

    /// An atom carrying a source rendering different from its derived one,
    /// e.g. `\d` for the range `0-9` or `(:alpha)` for a named class.
    pub(crate) fn labelled(
        kind: AtomKind,
        modifiers: Modifiers,
        groups: Vec<u32>,
        label: &str,
    ) -> Self {
        Self {
            kind,
            modifiers,
            groups,
            label: Some(label.to_string()),
        }
    }

    /// The ε atom labelling NFA empty transitions.
    pub(crate) fn empty() -> Self {
        Self::new(AtomKind::Empty, Modifiers::default(), Vec::new())
    }

    pub fn kind(&self) -> &AtomKind {
        &self.kind
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, AtomKind::Empty)
    }

    /// Whether the atom matches the rune `c`. Case-insensitive atoms compare
    /// lower-cased runes.
    pub fn matches(&self, c: char) -> bool {
        match &self.kind {
            AtomKind::Empty => false,
            AtomKind::Any => self.universe().matches(c),
            AtomKind::Char(ch) => {
                if self.modifiers.case_insensitive {
                    fold(*ch) == fold(c)
                } else {
                    *ch == c
                }
            }
            AtomKind::Range(from, to) => {
                if self.modifiers.case_insensitive {
                    fold(*from) <= fold(c) && fold(c) <= fold(*to)
                } else {
                    *from <= c && c <= *to
                }
            }
            AtomKind::Set { exclude, members } => {
                let hit = members.iter().any(|m| m.matches(c));
                if *exclude {
                    !hit
                } else {
                    hit
                }
            }
        }
    }

    /// The enumerable set of runes the atom can match. Excluding sets are
    /// inverted against the matching universe selected by the unicode
    /// modifier.
    pub fn span_set(&self) -> SpanSet {
        match &self.kind {
            AtomKind::Empty => SpanSet::default(),
            AtomKind::Any => self.universe(),
            AtomKind::Char(c) => {
                let mut spans = vec![Span::single(*c)];
                if self.modifiers.case_insensitive {
                    spans.extend(case_twins(*c).map(Span::single));
                }
                SpanSet::new(spans)
            }
            AtomKind::Range(from, to) => {
                let mut spans = vec![Span::new(*from, *to)];
                if self.modifiers.case_insensitive {
                    spans.push(Span::new(fold(*from), fold(*to)));
                    spans.push(Span::new(raise(*from), raise(*to)));
                }
                SpanSet::new(spans)
            }
            AtomKind::Set { exclude, members } => {
                let mut union = SpanSet::default();
                for m in members {
                    union = union.union(&m.span_set());
                }
                if *exclude {
                    self.universe().minus(&union)
                } else {
                    union
                }
            }
        }
    }

    /// The textual rendering of the atom. Atoms produced from the same
    /// pattern text render identically; the rendering is the fusion key when
    /// determinising (see the DFA construction).
    pub fn pattern(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match &self.kind {
            AtomKind::Empty => String::new(),
            AtomKind::Any => ".".to_string(),
            AtomKind::Char(c) => escape(&c.to_string()),
            AtomKind::Range(from, to) => {
                if *to == char::MAX {
                    format!("{}-", from)
                } else {
                    format!("{}-{}", from, to)
                }
            }
            AtomKind::Set { exclude, members } => {
                let mut s = String::from("[");
                if *exclude {
                    s.push('^');
                }
                for m in members {
                    s.push_str(&m.class_pattern());
                }
                s.push(']');
                s
            }
        }
    }

    /// The rendering of the atom as a class member, where runes stand for
    /// themselves.
    fn class_pattern(&self) -> String {
        match &self.kind {
            AtomKind::Char(c) => c.to_string(),
            _ => self.pattern(),
        }
    }

    /// The ordered capture-group path of the atom.
    pub fn groups(&self) -> &[u32] {
        &self.groups
    }

    pub fn set_groups(&mut self, groups: Vec<u32>) {
        self.groups = groups;
    }

    /// Union the capture-group path of `other` into this atom, keeping the
    /// path sorted and duplicate-free. Used when fusing same-pattern atoms
    /// during determinisation.
    pub(crate) fn merge_groups(&mut self, other: &Atom) {
        for g in &other.groups {
            if !self.groups.contains(g) {
                self.groups.push(*g);
            }
        }
        self.groups.sort_unstable();
    }

    fn universe(&self) -> SpanSet {
        if self.modifiers.unicode {
            SpanSet::all_unicode()
        } else {
            SpanSet::ascii_printable()
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern())
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn raise(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

/// The other case halves of `c`, when distinct from `c` itself.
fn case_twins(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase()
        .chain(c.to_uppercase())
        .filter(move |t| *t != c)
}

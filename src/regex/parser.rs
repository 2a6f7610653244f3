//! Recursive descent parsing of the regex surface syntax:
//!
//! ```text
//! regex  := term ('|' regex)?
//! term   := factor*                      (terminates at ')', '|' or end)
//! factor := base ('*' | '+' | '?' | '{' m? ',' n? '}' | '{' n '}')?
//! base   := '(' ('?' flags ')' | ':' name ')' | regex ')')
//!         | ch
//! ch     := '[' '^'? chAtom+ ']' | '\' esc | '.' | rune
//! ```
//!
//! One rune of lookahead, no left recursion, lenient on unclosed constructs.

use super::{Atom, AtomKind, Modifiers, Regex};

pub(crate) struct PatternParser {
    input: Vec<char>,
    position: usize,
    group: u32,
    groups: Vec<u32>,
    modifiers: Modifiers,
}

impl PatternParser {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            group: 0,
            groups: vec![0],
            modifiers: Modifiers::default(),
        }
    }

    pub fn parse(mut self) -> Regex {
        self.regex()
    }

    fn peek(&self) -> char {
        self.input.get(self.position).copied().unwrap_or('\0')
    }

    fn next(&mut self) -> char {
        let c = self.input[self.position];
        self.position += 1;
        c
    }

    fn has_more(&self) -> bool {
        self.position < self.input.len()
    }

    fn regex(&mut self) -> Regex {
        let term = self.term();
        if self.has_more() && self.peek() == '|' {
            self.next();
            let right = self.regex();
            Regex::Choice(Box::new(term), Box::new(right))
        } else {
            term
        }
    }

    fn term(&mut self) -> Regex {
        let mut factors = Vec::new();
        while self.has_more() && self.peek() != ')' && self.peek() != '|' {
            factors.push(self.factor());
        }
        Regex::Sequence(factors)
    }

    fn factor(&mut self) -> Regex {
        let base = self.base();
        if self.has_more() {
            match self.peek() {
                '*' => {
                    self.next();
                    return Regex::ZeroOrMore(Box::new(base));
                }
                '+' => {
                    self.next();
                    return Regex::OneOrMore(Box::new(base));
                }
                '?' => {
                    self.next();
                    return Regex::ZeroOrOne(Box::new(base));
                }
                '{' => {
                    self.next();
                    if self.has_more() {
                        let (min, max) = self.bounds();
                        return Regex::Repeat {
                            re: Box::new(base),
                            min,
                            max,
                        };
                    } else {
                        // a trailing '{' stands for itself
                        return Regex::Sequence(vec![base, Regex::Atom(self.atom(AtomKind::Char('{')))]);
                    }
                }
                _ => {}
            }
        }
        base
    }

    /// Parse the body of a `{m,n}` repetition, clamping the bounds to
    /// `0..=255` and swapping them when `min > max`. A missing `min` is 0, a
    /// missing `max` is 255, and `{n}` means exactly n.
    fn bounds(&mut self) -> (u8, u8) {
        let mut m = String::new();
        let mut n = String::new();
        let mut first = true;
        while self.has_more() {
            let c = self.next();
            if c == '}' {
                break;
            }
            if c == ',' {
                first = false;
            } else if first {
                m.push(c);
            } else {
                n.push(c);
            }
        }
        let mut min: i32 = m.trim().parse().unwrap_or(0);
        let mut max: i32 = n.trim().parse().unwrap_or(255);
        if first {
            max = min;
        }
        min = min.clamp(0, 255);
        max = max.clamp(0, 255);
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        (min as u8, max as u8)
    }

    fn base(&mut self) -> Regex {
        if self.peek() == '(' {
            self.next();
            match self.peek() {
                '?' => {
                    self.next();
                    self.flag_group()
                }
                ':' => {
                    self.next();
                    self.named_class()
                }
                _ => {
                    self.group += 1;
                    self.groups.push(self.group);
                    let saved = self.modifiers;

                    let re = self.regex();

                    self.groups.pop();
                    self.modifiers = saved;

                    // lenient parsing: don't break if no closing bracket, read to the end
                    if self.has_more() {
                        self.next();
                    }
                    Regex::Group(Box::new(re))
                }
            }
        } else {
            self.ch()
        }
    }

    /// `(?i)`, `(?u)`: set modifier flags for the atoms that follow within
    /// the enclosing group. Unknown flags are ignored.
    fn flag_group(&mut self) -> Regex {
        let mut flags = String::new();
        while self.has_more() && self.peek() != ')' {
            let c = self.next();
            match c {
                'i' => self.modifiers.case_insensitive = true,
                'u' => self.modifiers.unicode = true,
                _ => {}
            }
            flags.push(c);
        }
        if self.has_more() {
            self.next();
        }
        Regex::Flags(flags)
    }

    /// `(:name)`: a named character list. An unknown name yields a set that
    /// matches nothing.
    fn named_class(&mut self) -> Regex {
        let mut name = String::new();
        while self.has_more() && self.peek() != ')' {
            name.push(self.next());
        }
        if self.has_more() {
            self.next();
        }
        let members: Vec<AtomKind> = match name.as_str() {
            "alpha" => vec![AtomKind::Range('a', 'z'), AtomKind::Range('A', 'Z')],
            "digit" => vec![AtomKind::Range('0', '9')],
            "alnum" => vec![
                AtomKind::Range('0', '9'),
                AtomKind::Range('a', 'z'),
                AtomKind::Range('A', 'Z'),
            ],
            "upper" => vec![AtomKind::Range('A', 'Z')],
            "lower" => vec![AtomKind::Range('a', 'z')],
            "space" => vec![
                AtomKind::Char(' '),
                AtomKind::Char('\t'),
                AtomKind::Char('\n'),
                AtomKind::Char('\x0c'),
                AtomKind::Char('\r'),
            ],
            "word" => vec![
                AtomKind::Range('0', '9'),
                AtomKind::Range('a', 'z'),
                AtomKind::Range('A', 'Z'),
                AtomKind::Char('_'),
            ],
            _ => Vec::new(),
        };
        let members = members.into_iter().map(|k| self.atom(k)).collect();
        Regex::Atom(self.labelled(
            AtomKind::Set {
                exclude: false,
                members,
            },
            &format!("(:{})", name),
        ))
    }

    fn ch(&mut self) -> Regex {
        if self.peek() == '[' {
            self.next();
            Regex::Atom(self.class())
        } else if self.peek() == '\\' {
            self.next();
            // lenient parsing: a single backslash at the end escapes itself
            if self.has_more() {
                let c = self.next();
                Regex::Atom(self.escaped(c))
            } else {
                Regex::Atom(self.atom(AtomKind::Char('\\')))
            }
        } else if self.peek() == '.' {
            self.next();
            Regex::Atom(self.atom(AtomKind::Any))
        } else {
            let c = self.next();
            Regex::Atom(self.atom(AtomKind::Char(c)))
        }
    }

    /// The body of a `[...]` class; the opening bracket is already consumed.
    fn class(&mut self) -> Atom {
        let exclude = if self.peek() == '^' {
            self.next();
            true
        } else {
            false
        };

        let mut members = Vec::new();
        while self.has_more() && self.peek() != ']' {
            let from = self.next();
            if self.peek() == '-' {
                self.next();
                if self.has_more() && self.peek() != ']' {
                    let to = self.next();
                    members.push(self.atom(AtomKind::Range(from, to)));
                } else {
                    members.push(self.atom(AtomKind::Range(from, char::MAX)));
                }
            } else {
                members.push(self.atom(AtomKind::Char(from)));
            }
        }
        // lenient parsing: don't break if no closing square bracket, read to the end
        if self.has_more() {
            self.next();
        }
        self.atom(AtomKind::Set { exclude, members })
    }

    /// `\d \D \s \S \w \W` expand to the usual sets; any other escaped rune
    /// stands for itself.
    fn escaped(&mut self, c: char) -> Atom {
        let space = || {
            vec![
                AtomKind::Char(' '),
                AtomKind::Char('\t'),
                AtomKind::Char('\n'),
                AtomKind::Char('\x0c'),
                AtomKind::Char('\r'),
            ]
        };
        let word = || {
            vec![
                AtomKind::Range('0', '9'),
                AtomKind::Range('a', 'z'),
                AtomKind::Range('A', 'Z'),
                AtomKind::Char('_'),
            ]
        };
        match c {
            'd' => self.labelled(AtomKind::Range('0', '9'), "\\d"),
            'D' => {
                let members = vec![self.atom(AtomKind::Range('0', '9'))];
                self.labelled(
                    AtomKind::Set {
                        exclude: true,
                        members,
                    },
                    "\\D",
                )
            }
            's' => {
                let members = space().into_iter().map(|k| self.atom(k)).collect();
                self.labelled(
                    AtomKind::Set {
                        exclude: false,
                        members,
                    },
                    "\\s",
                )
            }
            'S' => {
                let members = space().into_iter().map(|k| self.atom(k)).collect();
                self.labelled(
                    AtomKind::Set {
                        exclude: true,
                        members,
                    },
                    "\\S",
                )
            }
            'w' => {
                let members = word().into_iter().map(|k| self.atom(k)).collect();
                self.labelled(
                    AtomKind::Set {
                        exclude: false,
                        members,
                    },
                    "\\w",
                )
            }
            'W' => {
                let members = word().into_iter().map(|k| self.atom(k)).collect();
                self.labelled(
                    AtomKind::Set {
                        exclude: true,
                        members,
                    },
                    "\\W",
                )
            }
            _ => self.atom(AtomKind::Char(c)),
        }
    }

    fn atom(&self, kind: AtomKind) -> Atom {
        Atom::new(kind, self.modifiers, self.groups.clone())
    }

    fn labelled(&self, kind: AtomKind, label: &str) -> Atom {
        Atom::labelled(kind, self.modifiers, self.groups.clone(), label)
    }
}

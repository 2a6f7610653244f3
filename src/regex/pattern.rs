use super::Regex;
use std::fmt::{Display, Formatter};

impl Regex {
    /// Render the expression back to its surface syntax. Compiling the
    /// rendering yields a structurally equivalent tree.
    pub fn pattern(&self) -> String {
        match self {
            Regex::Atom(atom) => atom.pattern(),
            Regex::Flags(flags) => format!("(?{})", flags),
            Regex::Choice(left, right) => format!("{}|{}", left.pattern(), right.pattern()),
            Regex::Sequence(factors) => {
                let mut s = String::new();
                for re in factors {
                    s.push_str(&re.pattern());
                }
                s
            }
            Regex::ZeroOrOne(re) => format!("{}?", re.pattern()),
            Regex::ZeroOrMore(re) => format!("{}*", re.pattern()),
            Regex::OneOrMore(re) => format!("{}+", re.pattern()),
            Regex::Repeat { re, min, max } => {
                let mut s = format!("{}{{", re.pattern());
                if min == max {
                    s.push_str(&min.to_string());
                } else {
                    if *min != 0 {
                        s.push_str(&min.to_string());
                    }
                    s.push(',');
                    if *max != u8::MAX {
                        s.push_str(&max.to_string());
                    }
                }
                s.push('}');
                s
            }
            Regex::Group(re) => format!("({})", re.pattern()),
        }
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern())
    }
}

use super::{Span, SpanSet};
use std::fmt::{Display, Formatter};

impl Span {
    pub fn new(from: char, to: char) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    pub fn single(c: char) -> Self {
        Self { from: c, to: c }
    }

    pub fn matches(&self, c: char) -> bool {
        self.from <= c && c <= self.to
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.to >= other.from && other.to >= self.from
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.from == self.to {
            write!(f, "{:?}", self.from)
        } else if self.to == char::MAX {
            write!(f, "{:?}-", self.from)
        } else {
            write!(f, "{:?}-{:?}", self.from, self.to)
        }
    }
}

impl SpanSet {
    /// The universe of runes matched by `.` under the unicode modifier.
    pub fn all_unicode() -> Self {
        SpanSet(vec![Span::new('\0', char::MAX)])
    }

    /// The default matching universe: the printable ASCII range.
    pub fn ascii_printable() -> Self {
        SpanSet(vec![Span::new(' ', '~')])
    }

    pub fn new(spans: Vec<Span>) -> Self {
        SpanSet(spans).compact()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn spans(&self) -> &[Span] {
        &self.0
    }

    pub fn matches(&self, c: char) -> bool {
        self.0.iter().any(|s| s.matches(c))
    }

    pub fn union(mut self, other: &SpanSet) -> SpanSet {
        self.0.extend_from_slice(&other.0);
        self.compact()
    }

    /// Merge intersecting spans and order the set by starting rune.
    pub fn compact(mut self) -> SpanSet {
        if self.0.len() <= 1 {
            return self;
        }
        self.0.sort_by_key(|s| s.from);
        let mut result = vec![self.0[0]];
        for span in &self.0[1..] {
            let last = result
                .last_mut()
                .expect("compacted span set starts non-empty");
            if last.intersects(span) || next_rune(last.to) == Some(span.from) {
                if last.to < span.to {
                    last.to = span.to;
                }
            } else {
                result.push(*span);
            }
        }
        SpanSet(result)
    }

    /// The set difference `self - other` over inclusive rune ranges.
    pub fn minus(&self, other: &SpanSet) -> SpanSet {
        let mut result = Vec::new();
        let r1 = self.clone().compact();
        let r2 = other.clone().compact();

        let mut j = 0;
        for mut left in r1.0 {
            while j < r2.0.len() && left.from > r2.0[j].to {
                j += 1;
            }
            if j == r2.0.len() || left.to < r2.0[j].from {
                result.push(left);
            } else {
                let mut reached_end = false;
                let mut k = j;
                while k < r2.0.len() && left.to >= r2.0[k].from {
                    if left.from < r2.0[k].from {
                        if let Some(to) = prev_rune(r2.0[k].from) {
                            result.push(Span::new(left.from, to));
                        }
                    }
                    if left.to <= r2.0[k].to {
                        reached_end = true;
                    } else if let Some(from) = next_rune(r2.0[k].to) {
                        left.from = from;
                    } else {
                        reached_end = true;
                    }
                    k += 1;
                }
                if !reached_end {
                    result.push(left);
                }
            }
        }
        SpanSet(result)
    }
}

impl Display for SpanSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, span) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", span)?;
        }
        Ok(())
    }
}

/// The rune after `c`, skipping the surrogate gap.
fn next_rune(c: char) -> Option<char> {
    let mut n = c as u32 + 1;
    if n == 0xD800 {
        n = 0xE000;
    }
    char::from_u32(n)
}

/// The rune before `c`, skipping the surrogate gap.
fn prev_rune(c: char) -> Option<char> {
    let mut n = (c as u32).checked_sub(1)?;
    if n == 0xDFFF {
        n = 0xD7FF;
    }
    char::from_u32(n)
}

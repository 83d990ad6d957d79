/// Forward-only cursor over the lines of one report file.
///
/// Every section extractor for a file shares one cursor. Lines are never
/// revisited: a consumed line is gone, and the only lookahead is `peek`.
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    /// True while unconsumed lines remain.
    pub fn has_next(&self) -> bool {
        self.pos < self.lines.len()
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// 1-based number of the most recently consumed line (0 before any).
    pub fn line_number(&self) -> usize {
        self.pos
    }

    /// Consume lines up to and including the first one matching `pred`.
    ///
    /// Returns `None` once the cursor is exhausted without a match.
    pub fn advance_to<P>(&mut self, pred: P) -> Option<&'a str>
    where
        P: Fn(&str) -> bool,
    {
        while let Some(line) = self.next_line() {
            if pred(line) {
                return Some(line);
            }
        }
        None
    }

    /// Like `advance_to`, but gives up without consuming the first line
    /// matching `stop`, leaving it for the next extractor.
    pub fn advance_to_before<P, S>(&mut self, pred: P, stop: S) -> Option<&'a str>
    where
        P: Fn(&str) -> bool,
        S: Fn(&str) -> bool,
    {
        while let Some(line) = self.peek() {
            if stop(line) && !pred(line) {
                return None;
            }
            self.pos += 1;
            if pred(line) {
                return Some(line);
            }
        }
        None
    }
}

//! Character-level primitives shared by both grammars.
//!
//! The scanner walks an immutable buffer byte by byte. Every delimiter it
//! looks for is ASCII, so the slices it hands out always fall on UTF-8
//! boundaries. When format preservation is on, every consumed lexeme is
//! also pushed onto a pending token buffer that the driver later moves onto
//! an object.

use crate::ast::{FormatKind, FormatToken};
use crate::error::SyntaxErrorKind;
use log::trace;

#[inline]
pub fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[inline]
pub fn is_line_end(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

#[derive(Debug)]
pub struct Scanner<'src> {
    source: &'src str,
    position: usize,
    line_no: usize,
    preserve_format: bool,
    pending: Vec<FormatToken<'src>>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str, preserve_format: bool) -> Self {
        Self {
            source,
            position: 0,
            line_no: 1,
            preserve_format,
            pending: Vec::new(),
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based number of the line the cursor is on.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn preserve_format(&self) -> bool {
        self.preserve_format
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.position + offset).copied()
    }

    /// True at a line terminator or at the end of input.
    pub fn at_line_end(&self) -> bool {
        self.peek().map_or(true, is_line_end)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.position..].starts_with(prefix)
    }

    /// Consumes `byte` if it is next, recording it as a literal.
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.advance_by(1, FormatKind::Literal);
            true
        } else {
            false
        }
    }

    /// Consumes `len` bytes and records them as one token of `kind`.
    pub fn advance_by(&mut self, len: usize, kind: FormatKind) -> &'src str {
        let start = self.position;
        self.position += len;
        let text = &self.source[start..self.position];
        self.record(kind, text);
        text
    }

    /// Returns the run of bytes up to the first one matching `stop` (or the
    /// end of input) without consuming it.
    pub fn scan_until(&self, stop: impl Fn(u8) -> bool) -> &'src str {
        let rest = &self.source.as_bytes()[self.position..];
        let len = rest.iter().position(|&b| stop(b)).unwrap_or(rest.len());
        &self.source[self.position..self.position + len]
    }

    /// Consumes the run of bytes up to the first one matching `stop`.
    pub fn take_until(&mut self, stop: impl Fn(u8) -> bool, kind: FormatKind) -> &'src str {
        let len = self.scan_until(stop).len();
        self.advance_by(len, kind)
    }

    /// Skips spaces and tabs, returning how many were consumed.
    pub fn skip_blanks(&mut self) -> usize {
        let len = self.scan_until(|b| !is_blank(b)).len();
        if len > 0 {
            self.advance_by(len, FormatKind::Literal);
        }
        len
    }

    /// Skips a `#` or `;` comment up to, not including, the line terminator.
    pub fn skip_comment(&mut self) {
        if matches!(self.peek(), Some(b'#' | b';')) {
            self.take_until(is_line_end, FormatKind::Literal);
        }
    }

    /// Skips a `;` comment following the content of a line.
    pub fn skip_trailing_comment(&mut self) {
        if self.peek() == Some(b';') {
            self.take_until(is_line_end, FormatKind::Literal);
        }
    }

    /// Consumes an optional `\r` and an optional `\n`, counting one line if
    /// either was present.
    pub fn consume_line_ending(&mut self) -> bool {
        let bytes = self.source.as_bytes();
        let mut len = 0;
        if bytes.get(self.position) == Some(&b'\r') {
            len += 1;
        }
        if bytes.get(self.position + len) == Some(&b'\n') {
            len += 1;
        }
        if len == 0 {
            return false;
        }
        self.advance_by(len, FormatKind::Literal);
        self.line_no += 1;
        true
    }

    /// Skips blanks and fails unless the line ends here or a `;` comment starts.
    pub fn assert_no_trailing_garbage(&mut self) -> Result<(), SyntaxErrorKind> {
        self.skip_blanks();
        match self.peek() {
            None | Some(b';') => Ok(()),
            Some(b) if is_line_end(b) => Ok(()),
            Some(_) => Err(SyntaxErrorKind::TrailingCharacters),
        }
    }

    fn record(&mut self, kind: FormatKind, text: &'src str) {
        // Empty values are kept so they can be substituted when rendering.
        if text.is_empty() && kind == FormatKind::Literal {
            return;
        }
        if self.preserve_format {
            trace!("format token {:?} at line {}: {:?}", kind, self.line_no, text);
            self.pending.push(FormatToken::new(kind, text, self.line_no));
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Hands over every token recorded since the last call.
    pub fn take_pending(&mut self) -> Vec<FormatToken<'src>> {
        std::mem::take(&mut self.pending)
    }
}

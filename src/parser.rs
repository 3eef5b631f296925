//! Line-oriented driver shared by both dialects.
//!
//! Every physical line goes through the same steps: leading blanks, a
//! leading comment, the grammar rule for the current state, a trailing `;`
//! comment and finally the line ending. The first syntax error stops the
//! parse; there is no resynchronisation.

use crate::api::ParseOptions;
use crate::ast::{Object, ObjectList};
use crate::error::{NagError, ParserError, SyntaxErrorKind};
use crate::grammar::Grammar;
use crate::lexer::Scanner;
use crate::utils::rest_of_line_span;
use log::{debug, trace};
use miette::NamedSource;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum ParseState {
    /// Expecting an object header (or blank/comment lines).
    #[default]
    #[serde(alias = "PARSE_OBJ", alias = "header")]
    AwaitingHeader,
    /// Inside an object: expecting attribute lines or the closing `}`.
    #[serde(alias = "PARSE_ARG", alias = "attribute")]
    AwaitingAttribute,
    /// Terminal; a syntax error was reported.
    Failed,
}

impl FromStr for ParseState {
    type Err = NagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PARSE_OBJ" | "header" | "AwaitingHeader" => Ok(ParseState::AwaitingHeader),
            "PARSE_ARG" | "attribute" | "AwaitingAttribute" => Ok(ParseState::AwaitingAttribute),
            other => Err(NagError::UnknownState(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    grammar: Grammar,
    state: ParseState,
    objects: ObjectList<'src>,
    source_name: String,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, &ParseOptions::default())
    }

    pub fn with_options(source: &'src str, options: &ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(source, options.preserve_format),
            grammar: options.grammar,
            state: options.start_state,
            objects: ObjectList::new(),
            source_name: options.source_name.clone(),
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Runs the state machine over the whole buffer.
    ///
    /// # Errors
    /// Returns the first syntax error, with the line it occurred on.
    pub fn parse(mut self) -> Result<ObjectList<'src>, NagError> {
        debug!(
            "parsing {} ({} bytes) with the {} grammar from {:?}",
            self.source_name,
            self.scanner.source().len(),
            self.grammar,
            self.state
        );

        if self.state == ParseState::Failed {
            return Err(self.fail(SyntaxErrorKind::UnknownParserState));
        }

        while !self.scanner.is_eof() && self.state != ParseState::Failed {
            if let Err(kind) = self.parse_line() {
                return Err(self.fail(kind));
            }
        }

        self.flush_remaining();
        debug!("parsed {} objects from {}", self.objects.len(), self.source_name);
        Ok(self.objects)
    }

    fn parse_line(&mut self) -> Result<(), SyntaxErrorKind> {
        trace!("line {} in {:?}", self.scanner.line_no(), self.state);

        self.scanner.skip_blanks();
        self.flush_between_objects();
        self.scanner.skip_comment();
        self.flush_between_objects();

        self.state = match self.state {
            ParseState::AwaitingHeader => {
                self.grammar.parse_header_line(&mut self.scanner, &mut self.objects)?
            }
            ParseState::AwaitingAttribute => {
                self.grammar.parse_attribute_line(&mut self.scanner, &mut self.objects)?
            }
            ParseState::Failed => return Err(SyntaxErrorKind::UnknownParserState),
        };

        self.scanner.skip_trailing_comment();
        self.flush_between_objects();
        self.scanner.consume_line_ending();
        self.flush_between_objects();
        Ok(())
    }

    /// Between objects, recorded blanks and comments go to an imaginary
    /// object so they keep their place in the output.
    fn flush_between_objects(&mut self) {
        if self.state != ParseState::AwaitingHeader || !self.scanner.has_pending() {
            return;
        }
        let tokens = self.scanner.take_pending();
        match self.objects.last_mut() {
            Some(last) if !last.is_real() => last.append_format(tokens),
            _ => {
                let mut placeholder = Object::imaginary();
                placeholder.append_format(tokens);
                self.objects.push(placeholder);
            }
        }
    }

    fn flush_remaining(&mut self) {
        if !self.scanner.has_pending() {
            return;
        }
        let tokens = self.scanner.take_pending();
        match self.objects.last_mut() {
            Some(last) => last.append_format(tokens),
            None => {
                let mut placeholder = Object::imaginary();
                placeholder.append_format(tokens);
                self.objects.push(placeholder);
            }
        }
    }

    fn fail(&mut self, kind: SyntaxErrorKind) -> NagError {
        self.state = ParseState::Failed;
        let line_no = self.scanner.line_no();
        debug!("{} in {} at line {}", kind, self.source_name, line_no);
        let source = self.scanner.source();
        ParserError::new(
            kind,
            NamedSource::new(self.source_name.clone(), source.to_string()),
            rest_of_line_span(source, self.scanner.position()),
            line_no,
        )
        .into()
    }
}

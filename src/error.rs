use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use std::fmt::{self, Display};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum NagError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[error("Unknown grammar `{0}`")]
    #[diagnostic(
        code(options::unknown_grammar),
        help("Valid grammars are `object` and `status`.")
    )]
    UnknownGrammar(String),

    #[error("Unknown parser state `{0}`")]
    #[diagnostic(
        code(options::unknown_state),
        help("Valid start states are `PARSE_OBJ` (header) and `PARSE_ARG` (attribute).")
    )]
    UnknownState(String),
}

impl NagError {
    /// Renders the error as a graphical miette report without colors,
    /// falling back to the plain message if the report handler fails.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = String::new();
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
        match handler.render_report(&mut buffer, self) {
            Ok(()) => buffer,
            Err(_) => self.to_string(),
        }
    }

    /// The syntax error behind this error, if it came from the parser.
    #[must_use]
    pub fn as_parser_error(&self) -> Option<&ParserError> {
        match self {
            NagError::Parser(err) => Some(err),
            _ => None,
        }
    }
}

/// The fixed taxonomy of parse failures.
///
/// Every kind is fatal: the first one aborts the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// Object-mode header missing `define` or the blank after it.
    DefineKeywordExpected,
    /// `define` not followed by a type name.
    ObjectNameExpected,
    /// Header line without a `{`.
    OpenBraceExpected,
    /// Non-comment content after a complete line.
    TrailingCharacters,
    /// Status attribute name not followed by `=`.
    EqualsSignExpected,
    /// The driver was asked to dispatch from a state it does not know.
    UnknownParserState,
}

impl SyntaxErrorKind {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            SyntaxErrorKind::DefineKeywordExpected => "Definition should start from 'define'",
            SyntaxErrorKind::ObjectNameExpected => "Object header should contain an object name",
            SyntaxErrorKind::OpenBraceExpected => "Object header should end with '{'",
            SyntaxErrorKind::TrailingCharacters => "Trailing characters",
            SyntaxErrorKind::EqualsSignExpected => "Argument name should be followed by '='",
            SyntaxErrorKind::UnknownParserState => "In unknown state",
        }
    }
}

impl Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Definition should start from 'define' at line {line_no}")]
    #[diagnostic(
        code(parser::define_expected),
        help("Object definitions start with `define <type> {{`, with at least one blank after `define`.")
    )]
    DefineKeywordExpected {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected `define` here")]
        span: SourceSpan,
        line_no: usize,
    },

    #[error("Object header should contain an object name at line {line_no}")]
    #[diagnostic(
        code(parser::object_name_expected),
        help("Name the object type before the opening brace, e.g. `define host {{`.")
    )]
    ObjectNameExpected {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected an object type name")]
        span: SourceSpan,
        line_no: usize,
    },

    #[error("Object header should end with '{{' at line {line_no}")]
    #[diagnostic(
        code(parser::open_brace_expected),
        help("The opening brace must be on the same line as the object type.")
    )]
    OpenBraceExpected {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected `{{` here")]
        span: SourceSpan,
        line_no: usize,
    },

    #[error("Trailing characters at line {line_no}")]
    #[diagnostic(
        code(parser::trailing_characters),
        help("Only blanks or a `;` comment may follow a brace.")
    )]
    TrailingCharacters {
        #[source_code]
        src: NamedSource<String>,
        #[label("unexpected text")]
        span: SourceSpan,
        line_no: usize,
    },

    #[error("Argument name should be followed by '=' at line {line_no}")]
    #[diagnostic(
        code(parser::equals_sign_expected),
        help("Status attributes are written as `name=value`.")
    )]
    EqualsSignExpected {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected `=` here")]
        span: SourceSpan,
        line_no: usize,
    },

    #[error("In unknown state at line {line_no}")]
    #[diagnostic(
        code(parser::unknown_state),
        help("Start parsing in the header or attribute state.")
    )]
    UnknownParserState {
        #[source_code]
        src: NamedSource<String>,
        #[label("parser stopped here")]
        span: SourceSpan,
        line_no: usize,
    },
}

impl ParserError {
    pub(crate) fn new(
        kind: SyntaxErrorKind,
        src: NamedSource<String>,
        span: SourceSpan,
        line_no: usize,
    ) -> Self {
        match kind {
            SyntaxErrorKind::DefineKeywordExpected => {
                ParserError::DefineKeywordExpected { src, span, line_no }
            }
            SyntaxErrorKind::ObjectNameExpected => {
                ParserError::ObjectNameExpected { src, span, line_no }
            }
            SyntaxErrorKind::OpenBraceExpected => {
                ParserError::OpenBraceExpected { src, span, line_no }
            }
            SyntaxErrorKind::TrailingCharacters => {
                ParserError::TrailingCharacters { src, span, line_no }
            }
            SyntaxErrorKind::EqualsSignExpected => {
                ParserError::EqualsSignExpected { src, span, line_no }
            }
            SyntaxErrorKind::UnknownParserState => {
                ParserError::UnknownParserState { src, span, line_no }
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> SyntaxErrorKind {
        match self {
            ParserError::DefineKeywordExpected { .. } => SyntaxErrorKind::DefineKeywordExpected,
            ParserError::ObjectNameExpected { .. } => SyntaxErrorKind::ObjectNameExpected,
            ParserError::OpenBraceExpected { .. } => SyntaxErrorKind::OpenBraceExpected,
            ParserError::TrailingCharacters { .. } => SyntaxErrorKind::TrailingCharacters,
            ParserError::EqualsSignExpected { .. } => SyntaxErrorKind::EqualsSignExpected,
            ParserError::UnknownParserState { .. } => SyntaxErrorKind::UnknownParserState,
        }
    }

    /// 1-based line of the failure: line terminators consumed before it, plus one.
    #[must_use]
    pub fn line_no(&self) -> usize {
        match self {
            ParserError::DefineKeywordExpected { line_no, .. }
            | ParserError::ObjectNameExpected { line_no, .. }
            | ParserError::OpenBraceExpected { line_no, .. }
            | ParserError::TrailingCharacters { line_no, .. }
            | ParserError::EqualsSignExpected { line_no, .. }
            | ParserError::UnknownParserState { line_no, .. } => *line_no,
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.kind().message()
    }

    #[must_use]
    pub fn span(&self) -> SourceSpan {
        match self {
            ParserError::DefineKeywordExpected { span, .. }
            | ParserError::ObjectNameExpected { span, .. }
            | ParserError::OpenBraceExpected { span, .. }
            | ParserError::TrailingCharacters { span, .. }
            | ParserError::EqualsSignExpected { span, .. }
            | ParserError::UnknownParserState { span, .. } => *span,
        }
    }
}

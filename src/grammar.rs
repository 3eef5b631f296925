//! The two line grammars.
//!
//! Object definition files:
//!
//! ```text
//! define <type> {
//!     <name> [value]
//! }
//! ```
//!
//! Status files:
//!
//! ```text
//! <type> {
//!     <name>=<value>
//! }
//! ```
//!
//! Each function parses what is left of one physical line after the driver
//! skipped leading blanks and comments, and returns the state for the next
//! line.

use crate::ast::{Argument, FormatKind, Object, ObjectList};
use crate::error::{NagError, SyntaxErrorKind};
use crate::lexer::{is_blank, is_line_end, Scanner};
use crate::parser::ParseState;
use log::trace;
use serde::Deserialize;
use std::fmt::{self, Display};
use std::str::FromStr;

const DEFINE_KEYWORD: &str = "define";

type LineResult = Result<ParseState, SyntaxErrorKind>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// `define <type> {` headers and `<name> [value]` attributes.
    #[default]
    Object,
    /// `<type> {` headers and `<name>=<value>` attributes.
    Status,
}

impl Grammar {
    pub fn parse_header_line<'src>(
        self,
        scanner: &mut Scanner<'src>,
        objects: &mut ObjectList<'src>,
    ) -> LineResult {
        match self {
            Grammar::Object => object_header(scanner, objects),
            Grammar::Status => status_header(scanner, objects),
        }
    }

    pub fn parse_attribute_line<'src>(
        self,
        scanner: &mut Scanner<'src>,
        objects: &mut ObjectList<'src>,
    ) -> LineResult {
        match self {
            Grammar::Object => object_attribute(scanner, objects),
            Grammar::Status => status_attribute(scanner, objects),
        }
    }
}

impl FromStr for Grammar {
    type Err = NagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "object" | "objects" => Ok(Grammar::Object),
            "status" => Ok(Grammar::Status),
            other => Err(NagError::UnknownGrammar(other.to_string())),
        }
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Object => f.write_str("object"),
            Grammar::Status => f.write_str("status"),
        }
    }
}

fn ends_type_name(b: u8) -> bool {
    is_blank(b) || is_line_end(b) || b == b'{'
}

fn ends_value(b: u8) -> bool {
    b == b';' || is_line_end(b)
}

fn open_object<'src>(scanner: &Scanner<'src>, objects: &mut ObjectList<'src>, type_name: &'src str) {
    trace!("opening `{}` at line {}", type_name, scanner.line_no());
    let mut object = Object::real(type_name);
    if scanner.preserve_format() {
        object.format_tokens = Some(Vec::new());
    }
    objects.push(object);
}

/// `}` ends the current object; its pending format tokens move onto it.
fn close_object<'src>(scanner: &mut Scanner<'src>, objects: &mut ObjectList<'src>) -> LineResult {
    scanner.eat(b'}');
    scanner.assert_no_trailing_garbage()?;
    if scanner.has_pending() {
        if let Some(last) = objects.last_mut() {
            last.append_format(scanner.take_pending());
        }
    }
    Ok(ParseState::AwaitingHeader)
}

/// Attaches an argument to the open object, creating the default root
/// object first when attributes appear before any header.
fn add_argument<'src>(
    scanner: &mut Scanner<'src>,
    objects: &mut ObjectList<'src>,
    name: &'src str,
    value_len: Option<usize>,
) {
    let object = objects.current_or_root(scanner.preserve_format());
    let index = object.arguments.len();
    let value = value_len.map(|len| scanner.advance_by(len, FormatKind::AttributeValue { argument: index }));
    object.push_argument(Argument::new(name, value));
}

fn object_header<'src>(scanner: &mut Scanner<'src>, objects: &mut ObjectList<'src>) -> LineResult {
    if scanner.at_line_end() {
        return Ok(ParseState::AwaitingHeader);
    }

    let followed_by_blank = scanner.peek_at(DEFINE_KEYWORD.len()).is_some_and(is_blank);
    if !scanner.starts_with(DEFINE_KEYWORD) || !followed_by_blank {
        return Err(SyntaxErrorKind::DefineKeywordExpected);
    }
    scanner.advance_by(DEFINE_KEYWORD.len(), FormatKind::Literal);
    scanner.skip_blanks();

    let type_name = scanner.take_until(ends_type_name, FormatKind::Literal);
    if type_name.is_empty() {
        return Err(SyntaxErrorKind::ObjectNameExpected);
    }

    scanner.skip_blanks();
    if !scanner.eat(b'{') {
        return Err(SyntaxErrorKind::OpenBraceExpected);
    }
    scanner.assert_no_trailing_garbage()?;

    open_object(scanner, objects, type_name);
    Ok(ParseState::AwaitingAttribute)
}

fn object_attribute<'src>(scanner: &mut Scanner<'src>, objects: &mut ObjectList<'src>) -> LineResult {
    if scanner.peek() == Some(b'}') {
        return close_object(scanner, objects);
    }

    let name = scanner.take_until(|b| is_blank(b) || is_line_end(b), FormatKind::Literal);
    if name.is_empty() {
        return Ok(ParseState::AwaitingAttribute);
    }

    let value_len = if scanner.at_line_end() {
        None
    } else {
        scanner.skip_blanks();
        Some(scanner.scan_until(ends_value).len())
    };

    add_argument(scanner, objects, name, value_len);
    Ok(ParseState::AwaitingAttribute)
}

fn status_header<'src>(scanner: &mut Scanner<'src>, objects: &mut ObjectList<'src>) -> LineResult {
    let type_name = scanner.take_until(ends_type_name, FormatKind::Literal);
    if type_name.is_empty() && scanner.peek() != Some(b'{') {
        return Ok(ParseState::AwaitingHeader);
    }
    if scanner.at_line_end() {
        return Err(SyntaxErrorKind::OpenBraceExpected);
    }
    if type_name.is_empty() {
        return Err(SyntaxErrorKind::ObjectNameExpected);
    }

    scanner.skip_blanks();
    if !scanner.eat(b'{') {
        return Err(SyntaxErrorKind::OpenBraceExpected);
    }
    scanner.assert_no_trailing_garbage()?;

    open_object(scanner, objects, type_name);
    Ok(ParseState::AwaitingAttribute)
}

fn status_attribute<'src>(scanner: &mut Scanner<'src>, objects: &mut ObjectList<'src>) -> LineResult {
    if scanner.peek() == Some(b'}') {
        return close_object(scanner, objects);
    }

    let name = scanner.take_until(|b| is_blank(b) || is_line_end(b) || b == b'=', FormatKind::Literal);
    // An empty name is only a blank line when no `=` follows; `=value` is an empty key.
    if name.is_empty() && scanner.peek() != Some(b'=') {
        return Ok(ParseState::AwaitingAttribute);
    }

    scanner.skip_blanks();
    if !scanner.eat(b'=') {
        return Err(SyntaxErrorKind::EqualsSignExpected);
    }
    scanner.skip_blanks();
    let value_len = scanner.scan_until(ends_value).len();

    add_argument(scanner, objects, name, Some(value_len));
    Ok(ParseState::AwaitingAttribute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(grammar: Grammar, line: &str) -> (LineResult, ObjectList<'_>) {
        let mut scanner = Scanner::new(line, false);
        let mut objects = ObjectList::new();
        let result = grammar.parse_header_line(&mut scanner, &mut objects);
        (result, objects)
    }

    fn attribute(grammar: Grammar, line: &str) -> (LineResult, ObjectList<'_>) {
        let mut scanner = Scanner::new(line, false);
        let mut objects = ObjectList::new();
        let result = grammar.parse_attribute_line(&mut scanner, &mut objects);
        (result, objects)
    }

    #[test]
    fn test_object_header() {
        let (result, objects) = header(Grammar::Object, "define service{");
        assert_eq!(result, Ok(ParseState::AwaitingAttribute));
        assert_eq!(objects.get(0).map(|o| o.type_name), Some("service"));

        let (result, objects) = header(Grammar::Object, "define\thost   {   ; comment");
        assert_eq!(result, Ok(ParseState::AwaitingAttribute));
        assert_eq!(objects.get(0).map(|o| o.type_name), Some("host"));
    }

    #[test]
    fn test_object_header_blank_line_is_noop() {
        let (result, objects) = header(Grammar::Object, "\n");
        assert_eq!(result, Ok(ParseState::AwaitingHeader));
        assert!(objects.is_empty());

        let (result, _) = header(Grammar::Object, "");
        assert_eq!(result, Ok(ParseState::AwaitingHeader));
    }

    #[test]
    fn test_object_header_errors() {
        let cases = [
            ("defin host {", SyntaxErrorKind::DefineKeywordExpected),
            ("definehost {", SyntaxErrorKind::DefineKeywordExpected),
            ("define", SyntaxErrorKind::DefineKeywordExpected),
            ("define {", SyntaxErrorKind::ObjectNameExpected),
            ("define host", SyntaxErrorKind::OpenBraceExpected),
            ("define host x {", SyntaxErrorKind::OpenBraceExpected),
            ("define host { x", SyntaxErrorKind::TrailingCharacters),
            ("define host { # not allowed", SyntaxErrorKind::TrailingCharacters),
        ];
        for (line, expected) in cases {
            let (result, objects) = header(Grammar::Object, line);
            assert_eq!(result, Err(expected), "line {line:?}");
            assert!(objects.is_empty(), "line {line:?}");
        }
    }

    #[test]
    fn test_object_attribute_values() {
        let (_, objects) = attribute(Grammar::Object, "address 10.0.0.1");
        let root = objects.get(0).unwrap();
        assert_eq!(root.type_name, "ROOT");
        assert_eq!(root.arguments, vec![Argument::new("address", Some("10.0.0.1"))]);

        let (_, objects) = attribute(Grammar::Object, "register");
        assert_eq!(objects.get(0).unwrap().arguments, vec![Argument::new("register", None)]);

        let (_, objects) = attribute(Grammar::Object, "alias   a b c;comment");
        assert_eq!(objects.get(0).unwrap().arguments, vec![Argument::new("alias", Some("a b c"))]);

        let (_, objects) = attribute(Grammar::Object, "notes  ");
        assert_eq!(objects.get(0).unwrap().arguments, vec![Argument::new("notes", Some(""))]);
    }

    #[test]
    fn test_close_brace_returns_to_header() {
        let (result, objects) = attribute(Grammar::Object, "}  ; done");
        assert_eq!(result, Ok(ParseState::AwaitingHeader));
        assert!(objects.is_empty());

        let (result, _) = attribute(Grammar::Status, "} extra");
        assert_eq!(result, Err(SyntaxErrorKind::TrailingCharacters));
    }

    #[test]
    fn test_status_header() {
        let (result, objects) = header(Grammar::Status, "hoststatus {");
        assert_eq!(result, Ok(ParseState::AwaitingAttribute));
        assert_eq!(objects.get(0).map(|o| o.type_name), Some("hoststatus"));

        let (result, objects) = header(Grammar::Status, "");
        assert_eq!(result, Ok(ParseState::AwaitingHeader));
        assert!(objects.is_empty());
    }

    #[test]
    fn test_status_header_errors() {
        let cases = [
            ("info", SyntaxErrorKind::OpenBraceExpected),
            ("info x {", SyntaxErrorKind::OpenBraceExpected),
            ("{", SyntaxErrorKind::ObjectNameExpected),
            ("info { x", SyntaxErrorKind::TrailingCharacters),
        ];
        for (line, expected) in cases {
            let (result, _) = header(Grammar::Status, line);
            assert_eq!(result, Err(expected), "line {line:?}");
        }
    }

    #[test]
    fn test_status_attribute() {
        let (_, objects) = attribute(Grammar::Status, "state = up");
        assert_eq!(objects.get(0).unwrap().arguments, vec![Argument::new("state", Some("up"))]);

        let (_, objects) = attribute(Grammar::Status, "plugin_output=");
        assert_eq!(objects.get(0).unwrap().arguments, vec![Argument::new("plugin_output", Some(""))]);

        let (_, objects) = attribute(Grammar::Status, "=orphan");
        assert_eq!(objects.get(0).unwrap().arguments, vec![Argument::new("", Some("orphan"))]);

        let (_, objects) = attribute(Grammar::Status, "output=a=b c");
        assert_eq!(objects.get(0).unwrap().arguments, vec![Argument::new("output", Some("a=b c"))]);
    }

    #[test]
    fn test_status_attribute_requires_equals() {
        let (result, objects) = attribute(Grammar::Status, "state up");
        assert_eq!(result, Err(SyntaxErrorKind::EqualsSignExpected));
        assert!(objects.is_empty());

        let (result, _) = attribute(Grammar::Status, "state");
        assert_eq!(result, Err(SyntaxErrorKind::EqualsSignExpected));
    }

    #[test]
    fn test_grammar_from_str() {
        assert_eq!("object".parse::<Grammar>().unwrap(), Grammar::Object);
        assert_eq!("status".parse::<Grammar>().unwrap(), Grammar::Status);
        assert!(matches!("xml".parse::<Grammar>(), Err(NagError::UnknownGrammar(_))));
    }
}

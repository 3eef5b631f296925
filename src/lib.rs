pub mod api;
pub mod ast;
pub mod error;
pub mod format;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod utils;
mod serialization;

pub use api::{parse, parse_main_config, parse_objects, parse_status, ParseOptions, ParseResult};
pub use ast::{Argument, ElementKind, FormatKind, FormatToken, Object, ObjectList};
pub use error::{NagError, ParserError, SyntaxErrorKind};
pub use grammar::Grammar;
pub use parser::ParseState;
pub use serialization::Record;

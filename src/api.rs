use crate::ast::{Object, ObjectList, DEFAULT_ROOT};
use crate::error::NagError;
use crate::format::reconstruct;
use crate::grammar::Grammar;
use crate::parser::{ParseState, Parser};
use crate::serialization::{to_records, Record};
use serde::{Deserialize, Serialize, Serializer};

/// How a buffer should be parsed.
///
/// Defaults to object definitions, starting at a header, without format
/// preservation. Can be deserialized so hosts may keep it in their own config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub grammar: Grammar,
    pub start_state: ParseState,
    /// Record every lexeme so the input can be reproduced exactly.
    pub preserve_format: bool,
    /// Name shown in error reports.
    pub source_name: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            grammar: Grammar::Object,
            start_state: ParseState::AwaitingHeader,
            preserve_format: false,
            source_name: "source.cfg".to_string(),
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    #[must_use]
    pub fn start_state(mut self, start_state: ParseState) -> Self {
        self.start_state = start_state;
        self
    }

    #[must_use]
    pub fn preserve_format(mut self, preserve_format: bool) -> Self {
        self.preserve_format = preserve_format;
        self
    }

    #[must_use]
    pub fn source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }
}

/// Everything produced by one parse. Borrows the input buffer; dropping the
/// result releases every object, argument and format token at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<'src> {
    objects: ObjectList<'src>,
    grammar: Grammar,
}

impl Serialize for ParseResult<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_records().serialize(serializer)
    }
}

impl<'src> ParseResult<'src> {
    #[must_use]
    pub fn objects(&self) -> &ObjectList<'src> {
        &self.objects
    }

    #[must_use]
    pub fn into_objects(self) -> ObjectList<'src> {
        self.objects
    }

    #[must_use]
    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// The default root object, present when attributes preceded any header.
    #[must_use]
    pub fn root(&self) -> Option<&Object<'src>> {
        self.objects.of_type(DEFAULT_ROOT).next()
    }

    /// The original input, rebuilt from preserved format tokens.
    #[must_use]
    pub fn reconstruct(&self) -> Option<String> {
        reconstruct(&self.objects)
    }

    #[must_use]
    pub fn to_records(&self) -> Vec<Record<'src>> {
        to_records(&self.objects)
    }

    /// Serializes the objects as JSON records.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the objects as YAML records.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Parses `source` according to `options`.
///
/// # Errors
/// Returns a `NagError::Parser` carrying the first syntax error and its line.
pub fn parse<'src>(source: &'src str, options: &ParseOptions) -> Result<ParseResult<'src>, NagError> {
    let objects = Parser::with_options(source, options).parse()?;
    Ok(ParseResult {
        objects,
        grammar: options.grammar,
    })
}

/// Parses an object definition file (`define host { ... }`), keeping format.
///
/// # Errors
/// See [`parse`].
pub fn parse_objects(source: &str) -> Result<ParseResult<'_>, NagError> {
    let options = ParseOptions::default()
        .grammar(Grammar::Object)
        .preserve_format(true)
        .source_name("objects.cfg");
    parse(source, &options)
}

/// Parses a status file (`hoststatus { ... }`). Status files are large and
/// rewritten by the monitoring daemon, so format is not kept.
///
/// # Errors
/// See [`parse`].
pub fn parse_status(source: &str) -> Result<ParseResult<'_>, NagError> {
    let options = ParseOptions::default()
        .grammar(Grammar::Status)
        .source_name("status.dat");
    parse(source, &options)
}

/// Parses a main config file: bare `name=value` lines that all attach to the
/// default root object.
///
/// # Errors
/// See [`parse`].
pub fn parse_main_config(source: &str) -> Result<ParseResult<'_>, NagError> {
    let options = ParseOptions::default()
        .grammar(Grammar::Status)
        .start_state(ParseState::AwaitingAttribute)
        .preserve_format(true)
        .source_name("nagios.cfg");
    parse(source, &options)
}

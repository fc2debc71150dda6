use std::fmt;

use thiserror::Error;

use crate::{action::ActionKind, ArityMode, Value};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Either half of the taxonomy, for callers that register and parse in one go.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// A malformed action, detected at registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("dest must not be empty")]
    EmptyDest,
    #[error("dest `{0}` is already registered")]
    DuplicateDest(String),
    #[error("argument `{dest}`: option string `{option}` conflicts with `{existing}`")]
    ConflictingOptionString { option: String, dest: String, existing: String },
    #[error("invalid option string `{option}`: must start with one of `{prefix_chars}`")]
    InvalidOptionString { option: String, prefix_chars: String },
    #[error("nargs must not be negative, got {0}")]
    NegativeArity(i64),
    #[error("invalid nargs value `{0}`")]
    InvalidArity(String),
    #[error("nargs `{0}` is not supported")]
    UnsupportedArity(String),
    #[error("`required` is not allowed for positional `{0}`")]
    RequiredPositional(String),
    #[error("argument `{0}`: nargs for store actions must be != 0")]
    ZeroArityStore(String),
    #[error("argument `{dest}`: {kind} actions take no arguments")]
    ArityNotAllowed { dest: String, kind: ActionKind },
    #[error("positional `{dest}` can't be a {kind} action")]
    PositionalKind { dest: String, kind: ActionKind },
    #[error("argument `{0}`: choices must not be empty")]
    EmptyChoices(String),
    #[error("prefix chars must not be empty")]
    EmptyPrefixChars,
}

/// Coarse classification of a [`MatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingArgument,
    InvalidType,
    InvalidChoice,
    ExplicitArgumentIgnored,
    UnrecognizedArgument,
    RequiredArgumentMissing,
}

/// A token that no action claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unrecognized {
    pub position: usize,
    pub token: String,
}

/// A failed parse. No partial namespace accompanies it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("argument {arg}: {}", expected(.arity))]
    MissingArgument { arg: String, arity: ArityMode },
    #[error("argument {arg}: invalid {conversion} value: '{token}' ({reason})")]
    InvalidType { arg: String, conversion: String, token: String, position: usize, reason: String },
    #[error("argument {arg}: invalid choice: {} (choose from {})", Repr(.value), ReprList(.choices))]
    InvalidChoice { arg: String, value: Value, choices: Vec<Value>, position: usize },
    #[error("argument {arg}: ignored explicit argument '{value}'")]
    ExplicitArgumentIgnored { arg: String, value: String, position: usize },
    #[error("unrecognized arguments: {}", TokenList(.tokens))]
    UnrecognizedArguments { tokens: Vec<Unrecognized> },
    #[error("the following arguments are required: {}", .args.join(", "))]
    RequiredArgumentMissing { args: Vec<String> },
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::MissingArgument { .. } => ErrorKind::MissingArgument,
            MatchError::InvalidType { .. } => ErrorKind::InvalidType,
            MatchError::InvalidChoice { .. } => ErrorKind::InvalidChoice,
            MatchError::ExplicitArgumentIgnored { .. } => ErrorKind::ExplicitArgumentIgnored,
            MatchError::UnrecognizedArguments { .. } => ErrorKind::UnrecognizedArgument,
            MatchError::RequiredArgumentMissing { .. } => ErrorKind::RequiredArgumentMissing,
        }
    }

    /// Display name of the offending action, if the error concerns exactly one.
    pub fn arg(&self) -> Option<&str> {
        match self {
            MatchError::MissingArgument { arg, .. }
            | MatchError::InvalidType { arg, .. }
            | MatchError::InvalidChoice { arg, .. }
            | MatchError::ExplicitArgumentIgnored { arg, .. } => Some(arg.as_str()),
            MatchError::UnrecognizedArguments { .. }
            | MatchError::RequiredArgumentMissing { .. } => None,
        }
    }

    /// Index of the offending token, if there is a single one.
    pub fn position(&self) -> Option<usize> {
        match self {
            MatchError::InvalidType { position, .. }
            | MatchError::InvalidChoice { position, .. }
            | MatchError::ExplicitArgumentIgnored { position, .. } => Some(*position),
            MatchError::UnrecognizedArguments { tokens } if tokens.len() == 1 => {
                Some(tokens[0].position)
            }
            _ => None,
        }
    }
}

fn expected(arity: &ArityMode) -> String {
    match arity {
        ArityMode::Single | ArityMode::Exact(1) => "expected one argument".to_string(),
        ArityMode::Optional => "expected at most one argument".to_string(),
        ArityMode::OneOrMore => "expected at least one argument".to_string(),
        ArityMode::Exact(n) => format!("expected {n} arguments"),
        ArityMode::ZeroOrMore | ArityMode::Remainder => "expected arguments".to_string(),
    }
}

struct Repr<'a>(&'a Value);

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Str(it) => write!(f, "'{it}'"),
            it => fmt::Display::fmt(it, f),
        }
    }
}

struct ReprList<'a>(&'a [Value]);

impl fmt::Display for ReprList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(&Repr(value), f)?;
        }
        Ok(())
    }
}

struct TokenList<'a>(&'a [Unrecognized]);

impl fmt::Display for TokenList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, it) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&it.token)?;
        }
        Ok(())
    }
}

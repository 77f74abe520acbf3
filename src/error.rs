use thiserror::Error;

/// Errors raised while building signatures, grammars and lexicons.
///
/// Parsing itself never fails: an ungrammatical sentence yields a chart with
/// no full parse. A failed unification is not an error either; it shows up as
/// a node of type `TOP`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("type `{0}` is declared twice")]
    DuplicateType(String),
    #[error("malformed rule `{rule}`: {reason}")]
    MalformedRule { rule: String, reason: String },
    #[error("malformed grammar: {0}")]
    MalformedGrammar(String),
    #[error("{what} notation: {message}")]
    Notation { what: &'static str, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid word pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed_rule(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedRule { rule: rule.into(), reason: reason.into() }
    }

    pub(crate) fn notation(what: &'static str, message: impl std::fmt::Display) -> Self {
        Error::Notation { what, message: message.to_string() }
    }
}

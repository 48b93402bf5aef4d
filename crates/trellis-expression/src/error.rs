use thiserror::Error;

/// Failures from tokenizing, compiling or evaluating a binding expression.
///
/// Every variant carries the expression text it was raised for, so a
/// caller holding many compiled bindings can report which one is broken.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("unexpected character '{found}' at offset {position} in: {expression}")]
    UnexpectedCharacter {
        found: char,
        position: usize,
        expression: String,
    },

    #[error("mismatched '{delimiter}' in: {expression}")]
    MismatchedDelimiter { delimiter: char, expression: String },

    #[error("unterminated string literal in: {expression}")]
    UnterminatedString { expression: String },

    #[error("unexpected ',' in: {expression}")]
    UnexpectedComma { expression: String },

    #[error("unexpected ':' in: {expression}")]
    UnexpectedColon { expression: String },

    #[error("stray ';' in: {expression}")]
    StraySemicolon { expression: String },

    #[error("'?' without a matching ':' branch in: {expression}")]
    MalformedTernary { expression: String },

    #[error("malformed object literal in: {expression}")]
    MalformedObject { expression: String },

    #[error("operator '{operator}' is missing an operand in: {expression}")]
    MissingOperand { operator: String, expression: String },

    #[error("'{operator}' assignment is not supported in expressions: {expression}")]
    AssignmentUnsupported { operator: String, expression: String },

    #[error("'{target}' is not a function in: {expression}")]
    NotAFunction { target: String, expression: String },
}

//! Error taxonomy for registration and dispatch.

use thiserror::Error;

use super::ValueType;

/// Errors produced while registering bindings or executing a console line.
///
/// Every error is terminal for the line being executed only. The console prints
/// the message to the scrollback and carries on with the next frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    /// The identifier is neither a built-in nor a registered binding.
    #[error("unknown command or variable '{0}'")]
    UnknownIdentifier(String),

    /// The number of top-level arguments does not match the declared signature.
    #[error("'{name}' expects {expected} argument(s), got {found}")]
    ArityError {
        name: String,
        expected: usize,
        found: usize,
    },

    /// A token or nested result could not be coerced to the required type.
    #[error("expected {expected}, got '{found}'")]
    TypeError { expected: ValueType, found: String },

    /// Registration-time collision with an existing entry or a built-in.
    #[error("'{0}' is already bound")]
    DuplicateIdentifier(String),

    /// A command declared more parameters than the dispatcher supports.
    #[error("'{name}' declares {len} parameters (at most {max} allowed)", max = super::MAX_ARITY)]
    SignatureTooLong { name: String, len: usize },

    /// Malformed line (empty, unbalanced parentheses).
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Sub-expressions nested beyond the recursion limit.
    #[error("sub-expressions nested too deeply (limit {limit})", limit = super::MAX_NESTING_DEPTH)]
    NestingTooDeep,

    /// Division by zero or integer overflow in a built-in operator.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Attempt to write a variable flagged read-only.
    #[error("'{0}' is read-only")]
    ReadOnly(String),

    /// The memory behind a variable binding has been dropped without unbinding.
    #[error("'{0}' refers to a value that no longer exists")]
    BindingExpired(String),

    /// A command handler reported a failure of its own.
    #[error("{name}: {message}")]
    Command { name: String, message: String },
}

impl ConsoleError {
    /// Build a handler failure for the command `name`.
    pub fn command(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Short category label, used as the prefix of error lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ConsoleError::UnknownIdentifier(_) => "UnknownIdentifier",
            ConsoleError::ArityError { .. } => "ArityError",
            ConsoleError::TypeError { .. } => "TypeError",
            ConsoleError::DuplicateIdentifier(_) => "DuplicateIdentifier",
            ConsoleError::SignatureTooLong { .. } => "SignatureTooLong",
            ConsoleError::Syntax(_) => "SyntaxError",
            ConsoleError::NestingTooDeep => "SyntaxError",
            ConsoleError::Arithmetic(_) => "ArithmeticError",
            ConsoleError::ReadOnly(_) => "ReadOnly",
            ConsoleError::BindingExpired(_) => "BindingExpired",
            ConsoleError::Command { .. } => "CommandError",
        }
    }
}

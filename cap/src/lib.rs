//! Command-line argument parsing with a fluent registration API.
//!
//! - flags, typed options (int, double, string, enum) and labeled positionals
//! - an optional variadic positional with min/max bounds
//! - remainder capture after a literal `--`
//! - word-wrapped usage and help rendering
//! - "did you mean" suggestions for near-miss long options and enum values
//!
//! ```no_run
//! use cap::{Action, Context};
//!
//! let mut ctx = Context::new();
//! ctx.set_program_description("Solve a puzzle day.");
//! let jobs = ctx
//!     .int_option()
//!     .long("jobs")
//!     .short('j')
//!     .description("Worker threads.")
//!     .default_value(1)
//!     .done();
//! let day = ctx
//!     .positional_string()
//!     .label("day")
//!     .description("Which day to run.")
//!     .done();
//!
//! if let Action::Exit(code) = ctx.parse_and_handle(std::env::args()) {
//!     std::process::exit(code);
//! }
//! let jobs: i32 = ctx.value(&jobs).unwrap_or(1);
//! let day: String = ctx.value(&day).unwrap_or_default();
//! # let _ = (jobs, day);
//! ```

mod context;
mod help;
pub mod number;
mod parse;
mod registry;
pub mod suggest;
mod value;

pub use context::Context;
pub use help::wrap_text;
pub use parse::{classify, ArgKind};
pub use registry::{
    DoubleOptionBuilder, EnumOptionBuilder, FlagBuilder, IntOptionBuilder, OptionBuilder,
    OptionType, PositionalBuilder, PositionalType, StringOptionBuilder, VariadicBuilder,
};
pub use value::{EnumHandle, EnumRepr, FromValue, Handle, Value, ValueKind};

// ============================================================================
// Result and Error types
// ============================================================================

pub type Result<T> = std::result::Result<T, Error>;

/// A rejected command line.
///
/// Every variant carries the full rendered text: the error line(s), the
/// usage line and a hint pointing at `--help`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    UnknownOption(String),
    #[error("{0}")]
    InvalidValue(String),
    #[error("{0}")]
    MissingOption(String),
    #[error("{0}")]
    MissingValue(String),
    #[error("{0}")]
    NoIdentifier(String),
    #[error("{0}")]
    UnexpectedPositional(String),
    #[error("{0}")]
    TooManyPositionals(String),
    #[error("{0}")]
    TooFewPositionals(String),
    #[error("{0}")]
    MissingRequired(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownOption,
    InvalidValue,
    MissingOption,
    MissingValue,
    NoIdentifier,
    UnexpectedPositional,
    TooManyPositionals,
    TooFewPositionals,
    MissingRequired,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::UnknownOption => Error::UnknownOption(message),
            ErrorKind::InvalidValue => Error::InvalidValue(message),
            ErrorKind::MissingOption => Error::MissingOption(message),
            ErrorKind::MissingValue => Error::MissingValue(message),
            ErrorKind::NoIdentifier => Error::NoIdentifier(message),
            ErrorKind::UnexpectedPositional => Error::UnexpectedPositional(message),
            ErrorKind::TooManyPositionals => Error::TooManyPositionals(message),
            ErrorKind::TooFewPositionals => Error::TooFewPositionals(message),
            ErrorKind::MissingRequired => Error::MissingRequired(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownOption(_) => ErrorKind::UnknownOption,
            Error::InvalidValue(_) => ErrorKind::InvalidValue,
            Error::MissingOption(_) => ErrorKind::MissingOption,
            Error::MissingValue(_) => ErrorKind::MissingValue,
            Error::NoIdentifier(_) => ErrorKind::NoIdentifier,
            Error::UnexpectedPositional(_) => ErrorKind::UnexpectedPositional,
            Error::TooManyPositionals(_) => ErrorKind::TooManyPositionals,
            Error::TooFewPositionals(_) => ErrorKind::TooFewPositionals,
            Error::MissingRequired(_) => ErrorKind::MissingRequired,
        }
    }

    /// The rendered message, identical to `to_string()`.
    pub fn message(&self) -> &str {
        match self {
            Error::UnknownOption(s)
            | Error::InvalidValue(s)
            | Error::MissingOption(s)
            | Error::MissingValue(s)
            | Error::NoIdentifier(s)
            | Error::UnexpectedPositional(s)
            | Error::TooManyPositionals(s)
            | Error::TooFewPositionals(s)
            | Error::MissingRequired(s) => s,
        }
    }
}

// ============================================================================
// Parse outcomes
// ============================================================================

/// Non-error terminal states of [`Context::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    HelpRequested,
    VersionRequested,
}

/// What the caller should do after [`Context::parse_and_handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Output has been printed; exit with this status.
    Exit(i32),
    KeepGoing,
}

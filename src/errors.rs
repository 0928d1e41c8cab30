//! Error types.
//!
//! [`MangleError`] covers contract violations detected while encoding a
//! single specialization event. None of them are recoverable: the caller's
//! decision set does not fit the mangling grammar, and any suffix produced so
//! far is discarded.

use std::path::PathBuf;
use thiserror::Error;

/// Encoding failure for one specialization event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MangleError {
    /// A decision named a parameter the function does not have.
    #[error("argument index {index} is out of range for a function of arity {arity}")]
    ArgumentOutOfRange { index: usize, arity: usize },

    /// An event declared more parameters than any function can have.
    #[error("arity {arity} exceeds the limit of {max}")]
    ArityTooLarge { arity: usize, max: usize },

    /// A propagated string constant is longer than the grammar allows.
    #[error("string literal of {len} code units exceeds the limit of {max}")]
    StringLiteralTooLong { len: usize, max: usize },

    /// A propagated closure whose callee is not a direct function reference.
    #[error("closure callee is not a direct function reference")]
    UnresolvedClosureCallee,

    /// A convention-flag modifier with neither flag set.
    #[error("argument {index} has an empty modifier flag set")]
    EmptyModifierFlags { index: usize },

    /// A decision that cannot be combined with what the argument already carries.
    #[error("argument {index} is dead and cannot also be marked {requested}")]
    ConflictingModifier {
        index: usize,
        requested: &'static str,
    },
}

/// Failure while loading or encoding an event file.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported event file extension for {} (expected .toml or .json)", .path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("event {index} (`{base}`): {source}")]
    Mangle {
        index: usize,
        base: String,
        #[source]
        source: MangleError,
    },

    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Failure while loading `specmangle.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

//! Specmangle - specialization name mangling
//!
//! This library produces the symbol suffixes that identify generic and
//! function signature specializations of a declaration.

pub mod config;
pub mod driver;
pub mod errors;
pub mod event;
pub mod mangle;
pub mod types;

// Re-export commonly used types
pub use config::{EmitMode, MangleConfig, OutputFormat};
pub use errors::{ConfigError, EventError, MangleError};
pub use mangle::{
    ArgumentModifier, CanonicalEncoder, Closure, FunctionSignatureMangler,
    GenericSpecializationMangler, Literal, Mangler, SpecializationMangler, SubEncoder,
    Substitution,
};
pub use types::{Conformance, Type};

//! Specialization name mangling.
//!
//! A specialization pass that clones a declaration records what it did
//! (generic substitutions, or per-parameter signature rewrites) and asks one
//! of the manglers here for a suffix that identifies the clone. The suffix is
//! wrapped into a full symbol as:
//!
//! ```text
//! _TTS <kind> <suffix> _ <base name>
//! ```
//!
//! where `<kind>` is `g` for generic and `f` for function signature
//! specialization. Every field in the suffix is self-delimiting, so the
//! grammar needs no length header.
//!
//! Types, conformances and identifiers are encoded by a [`SubEncoder`]; the
//! manglers only own the delimiter structure around them.

pub mod canonical;
pub mod closure;
pub mod generic;
pub mod literal;
pub mod signature;

pub use canonical::CanonicalEncoder;
pub use closure::{Callee, Closure};
pub use generic::{GenericSpecializationMangler, Substitution};
pub use literal::{Literal, StringEncoding};
pub use signature::{ArgumentModifier, ConventionFlags, FunctionSignatureMangler};

use crate::errors::MangleError;
use crate::types::{Conformance, Type};
use std::fmt;
use std::fmt::Write as _;

/// Prefix shared by every specialized symbol.
pub const SPECIALIZATION_PREFIX: &str = "_TTS";

/// Append-only output accumulator threaded through every encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mangler {
    buf: String,
}

impl Mangler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Append the `Display` rendering of a value (integers, bit patterns).
    pub fn push_display(&mut self, value: impl fmt::Display) {
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{}", value);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Encoders for the pieces of a symbol that the specialization grammar
/// treats as opaque.
///
/// Implementations must be deterministic and self-delimiting: the manglers
/// concatenate their output without separators.
pub trait SubEncoder {
    fn mangle_type(&self, ty: &Type, out: &mut Mangler);
    fn mangle_conformance(&self, conformance: &Conformance, out: &mut Mangler);
    fn mangle_identifier(&self, ident: &str, out: &mut Mangler);
}

/// Which pass produced a specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecializationKind {
    Generic,
    FunctionSignature,
}

impl SpecializationKind {
    /// Single-character code emitted after [`SPECIALIZATION_PREFIX`].
    pub fn code(self) -> char {
        match self {
            SpecializationKind::Generic => 'g',
            SpecializationKind::FunctionSignature => 'f',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecializationKind::Generic => "generic",
            SpecializationKind::FunctionSignature => "function-signature",
        }
    }
}

impl fmt::Display for SpecializationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common driver for the specialization manglers.
pub trait SpecializationMangler {
    const KIND: SpecializationKind;

    /// Append the specialization suffix.
    ///
    /// On error nothing useful is left in `out`; the whole event is invalid.
    fn mangle_specialization<E: SubEncoder + ?Sized>(
        &self,
        encoder: &E,
        out: &mut Mangler,
    ) -> Result<(), MangleError>;

    /// Produce the suffix on its own.
    fn suffix<E: SubEncoder + ?Sized>(&self, encoder: &E) -> Result<String, MangleError> {
        let mut out = Mangler::new();
        self.mangle_specialization(encoder, &mut out)?;
        Ok(out.finish())
    }

    /// Produce the full specialized symbol for `base`.
    fn mangle<E: SubEncoder + ?Sized>(
        &self,
        encoder: &E,
        base: &str,
    ) -> Result<String, MangleError> {
        let mut out = Mangler::new();
        out.push_str(SPECIALIZATION_PREFIX);
        out.push(Self::KIND.code());
        self.mangle_specialization(encoder, &mut out)?;
        out.push('_');
        out.push_str(base);
        Ok(out.finish())
    }
}

/// Sub-encoder for tests: writes names verbatim and types as their display
/// form, so expected strings stay readable.
#[cfg(test)]
pub(crate) struct PlainEncoder;

#[cfg(test)]
impl SubEncoder for PlainEncoder {
    fn mangle_type(&self, ty: &Type, out: &mut Mangler) {
        out.push_display(ty);
    }

    fn mangle_conformance(&self, conformance: &Conformance, out: &mut Mangler) {
        out.push_display(conformance);
    }

    fn mangle_identifier(&self, ident: &str, out: &mut Mangler) {
        out.push_str(ident);
    }
}

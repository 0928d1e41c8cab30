//! Closure-propagated payloads: `cl <callee ident> <captured type>*`.

use super::{Mangler, SubEncoder};
use crate::errors::MangleError;
use crate::types::Type;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The function a propagated closure partially applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Callee {
    /// Direct reference to a named function.
    Function(String),
    /// Callee only known at run time; closures over these are not specialized.
    Indirect,
}

/// A partial application whose captured arguments were moved into the
/// specialized function's signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Closure {
    pub callee: Callee,
    /// Types of the captured arguments, in capture order.
    #[serde(default)]
    pub captured: Vec<Type>,
}

impl Closure {
    pub fn new(callee: impl Into<String>, captured: Vec<Type>) -> Self {
        Self {
            callee: Callee::Function(callee.into()),
            captured,
        }
    }

    pub fn callee_name(&self) -> Option<&str> {
        match &self.callee {
            Callee::Function(name) => Some(name),
            Callee::Indirect => None,
        }
    }
}

/// Append the `cl` field for `closure`.
pub fn mangle_closure_prop<E: SubEncoder + ?Sized>(
    closure: &Closure,
    encoder: &E,
    out: &mut Mangler,
) -> Result<(), MangleError> {
    let callee = closure
        .callee_name()
        .ok_or(MangleError::UnresolvedClosureCallee)?;
    trace!(callee, captured = closure.captured.len(), "mangling closure");

    out.push_str("cl");
    encoder.mangle_identifier(callee, out);
    for ty in &closure.captured {
        encoder.mangle_type(ty, out);
    }
    Ok(())
}

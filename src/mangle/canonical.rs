//! Default encodings for types, conformances and identifiers.

use super::{Mangler, SubEncoder};
use crate::types::{Conformance, Type};

/// Self-delimiting encoder used when no host type system is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalEncoder;

impl SubEncoder for CanonicalEncoder {
    fn mangle_type(&self, ty: &Type, out: &mut Mangler) {
        match ty {
            Type::Int => out.push_str("Si"),
            Type::Float => out.push_str("Sd"),
            Type::Bool => out.push_str("Sb"),
            Type::String => out.push_str("SS"),
            Type::Nil => out.push_str("T_"),
            Type::Array(elem) => {
                out.push_str("Sa");
                self.mangle_type(elem, out);
            }
            Type::Nullable(inner) => {
                out.push_str("Sq");
                self.mangle_type(inner, out);
            }
            Type::Function { params, ret } => {
                out.push('F');
                for param in params {
                    self.mangle_type(param, out);
                }
                out.push('_');
                self.mangle_type(ret, out);
            }
            Type::Named { name, args } if args.is_empty() => {
                out.push('V');
                self.mangle_identifier(name, out);
            }
            Type::Named { name, args } => {
                out.push_str("GV");
                self.mangle_identifier(name, out);
                for arg in args {
                    self.mangle_type(arg, out);
                }
                out.push('_');
            }
            Type::Param(index) => {
                out.push('Q');
                out.push_display(index);
                out.push('_');
            }
        }
    }

    fn mangle_conformance(&self, conformance: &Conformance, out: &mut Mangler) {
        out.push('P');
        self.mangle_identifier(&conformance.protocol, out);
        self.mangle_identifier(&conformance.module, out);
    }

    /// `<len><ident>` for plain identifiers, `X<len>_<ident>` otherwise.
    /// Lengths are in UTF-8 bytes.
    fn mangle_identifier(&self, ident: &str, out: &mut Mangler) {
        if !is_plain_identifier(ident) {
            out.push('X');
            out.push_display(ident.len());
            out.push('_');
        } else {
            out.push_display(ident.len());
        }
        out.push_str(ident);
    }
}

/// A leading digit would run into the length prefix.
fn is_plain_identifier(ident: &str) -> bool {
    match ident.as_bytes().first() {
        None => false,
        Some(b) if b.is_ascii_digit() => false,
        Some(_) => ident.is_ascii(),
    }
}

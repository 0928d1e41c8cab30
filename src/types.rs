//! Type definitions consumed by the specialization manglers.
//!
//! These are the canonical types and protocol conformances that appear in
//! generic substitutions and in the captured argument lists of propagated
//! closures. The manglers never inspect them; they hand them to a
//! [`SubEncoder`](crate::mangle::SubEncoder).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical type representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Type {
    /// Integer type: `int`
    Int,
    /// Floating-point type: `float`
    Float,
    /// Boolean type: `bool`
    Bool,
    /// String type: `string`
    String,
    /// Nil type: `nil`
    Nil,
    /// Array type: `array<T>`
    Array(Box<Type>),
    /// Nullable type: `T?`
    Nullable(Box<Type>),
    /// Function type: `(T1, T2, ...) -> R`
    Function { params: Vec<Type>, ret: Box<Type> },
    /// Nominal type, possibly with generic arguments: `Pair<int, float>`
    Named {
        name: std::string::String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<Type>,
    },
    /// Unsubstituted generic parameter, by index in its declaration's signature.
    Param(u32),
}

impl Type {
    /// Create a new array type.
    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    /// Create a new nullable type.
    pub fn nullable(inner: Type) -> Type {
        Type::Nullable(Box::new(inner))
    }

    /// Create a new function type.
    pub fn function(params: Vec<Type>, ret: Type) -> Type {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    /// Create a nominal type without generic arguments.
    pub fn named(name: impl Into<std::string::String>) -> Type {
        Type::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Create a nominal type applied to generic arguments.
    pub fn generic(name: impl Into<std::string::String>, args: Vec<Type>) -> Type {
        Type::Named {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Nil => write!(f, "nil"),
            Type::Array(elem) => write!(f, "array<{}>", elem),
            Type::Nullable(inner) => write!(f, "{}?", inner),
            Type::Function { params, ret } => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") -> {}", ret)
            }
            Type::Named { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Type::Param(index) => write!(f, "T{}", index),
        }
    }
}

/// Witness that a replacement type satisfies a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Conformance {
    /// Name of the protocol being conformed to
    pub protocol: String,
    /// Module that declares the conformance
    pub module: String,
}

impl Conformance {
    pub fn new(protocol: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            module: module.into(),
        }
    }
}

impl fmt::Display for Conformance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.protocol)
    }
}

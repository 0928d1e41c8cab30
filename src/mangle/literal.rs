//! Constant-propagated literal payloads.
//!
//! ```text
//! cp fr <ident>                  function reference
//! cp g <ident>                   global reference
//! cp i <signed decimal>          integer
//! cp fl <unsigned decimal>       float, raw bit pattern
//! cp se <encoding> v <ident>     string, identifier is `u` + value
//! ```

use super::{Mangler, SubEncoder};
use crate::errors::MangleError;
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Longest string constant that may be propagated, in code units.
pub const MAX_STRING_LITERAL_LEN: usize = 32;

/// Storage encoding of a string constant; the discriminant is emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringEncoding {
    #[default]
    Utf8 = 0,
    Utf16 = 1,
    #[serde(rename = "objc-selector")]
    ObjCSelector = 2,
}

impl StringEncoding {
    /// Number of code units `value` occupies in this encoding.
    pub fn code_units(self, value: &str) -> usize {
        match self {
            StringEncoding::Utf8 | StringEncoding::ObjCSelector => value.len(),
            StringEncoding::Utf16 => value.encode_utf16().count(),
        }
    }
}

/// The value of a constant-propagated argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Literal {
    FunctionRef {
        name: String,
    },
    GlobalRef {
        name: String,
    },
    Integer {
        #[serde(with = "decimal")]
        value: BigInt,
    },
    Float {
        #[serde(with = "decimal")]
        bits: BigUint,
    },
    String {
        value: String,
        #[serde(default)]
        encoding: StringEncoding,
    },
}

impl Literal {
    pub fn function_ref(name: impl Into<String>) -> Self {
        Literal::FunctionRef { name: name.into() }
    }

    pub fn global_ref(name: impl Into<String>) -> Self {
        Literal::GlobalRef { name: name.into() }
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Literal::Integer {
            value: value.into(),
        }
    }

    pub fn float_bits(bits: impl Into<BigUint>) -> Self {
        Literal::Float { bits: bits.into() }
    }

    pub fn from_f64(value: f64) -> Self {
        Literal::float_bits(value.to_bits())
    }

    pub fn from_f32(value: f32) -> Self {
        Literal::float_bits(value.to_bits())
    }

    pub fn string(value: impl Into<String>, encoding: StringEncoding) -> Self {
        Literal::String {
            value: value.into(),
            encoding,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::FunctionRef { .. } => "function-ref",
            Literal::GlobalRef { .. } => "global-ref",
            Literal::Integer { .. } => "integer",
            Literal::Float { .. } => "float",
            Literal::String { .. } => "string",
        }
    }
}

/// Append the `cp` field for `literal`.
pub fn mangle_constant_prop<E: SubEncoder + ?Sized>(
    literal: &Literal,
    encoder: &E,
    out: &mut Mangler,
) -> Result<(), MangleError> {
    trace!(kind = literal.kind_name(), "mangling constant-propagated literal");

    out.push_str("cp");
    match literal {
        Literal::FunctionRef { name } => {
            out.push_str("fr");
            encoder.mangle_identifier(name, out);
        }
        Literal::GlobalRef { name } => {
            out.push('g');
            encoder.mangle_identifier(name, out);
        }
        Literal::Integer { value } => {
            out.push('i');
            out.push_display(value);
        }
        Literal::Float { bits } => {
            out.push_str("fl");
            out.push_display(bits);
        }
        Literal::String { value, encoding } => {
            let len = encoding.code_units(value);
            if len > MAX_STRING_LITERAL_LEN {
                return Err(MangleError::StringLiteralTooLong {
                    len,
                    max: MAX_STRING_LITERAL_LEN,
                });
            }

            let mut ident = String::with_capacity(value.len() + 1);
            ident.push('u');
            ident.push_str(value);

            out.push_str("se");
            out.push_display(*encoding as u8);
            out.push('v');
            encoder.mangle_identifier(&ident, out);
        }
    }
    Ok(())
}

/// Arbitrary-precision integers as decimal strings; plain TOML/JSON integers
/// are accepted on input.
mod decimal {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::marker::PhantomData;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: fmt::Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: fmt::Display,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor(PhantomData))
    }

    struct DecimalVisitor<T>(PhantomData<T>);

    impl<T> DecimalVisitor<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        fn parse<E: de::Error>(text: &str) -> Result<T, E> {
            T::from_str(text).map_err(|e| E::custom(format!("invalid decimal `{}`: {}", text, e)))
        }
    }

    impl<T> Visitor<'_> for DecimalVisitor<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal integer or a string holding one")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
            Self::parse(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
            Self::parse(&v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            Self::parse(&v.to_string())
        }
    }
}

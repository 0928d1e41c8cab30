//! Generic specialization: one field per substitution.
//!
//! ```text
//! <replacement type> <conformance>* _
//! ```
//!
//! A missing conformance ends that substitution's conformance list early.
//! The `_` that closes the substitution is still written.

use super::{Mangler, SpecializationKind, SpecializationMangler, SubEncoder};
use crate::errors::MangleError;
use crate::types::{Conformance, Type};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A generic parameter bound to a concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Substitution {
    pub replacement: Type,
    /// Conformances of `replacement` to the parameter's requirements.
    /// `None` stops encoding of the remaining entries.
    #[serde(default, with = "conformance_slots")]
    pub conformances: Vec<Option<Conformance>>,
}

impl Substitution {
    pub fn new(replacement: Type, conformances: Vec<Conformance>) -> Self {
        Self {
            replacement,
            conformances: conformances.into_iter().map(Some).collect(),
        }
    }

    /// Conformances that are actually encoded.
    pub fn encoded_conformances(&self) -> impl Iterator<Item = &Conformance> {
        self.conformances.iter().map_while(Option::as_ref)
    }
}

/// Mangler for a generic specialization event.
#[derive(Debug, Clone)]
pub struct GenericSpecializationMangler {
    substitutions: Vec<Substitution>,
}

impl GenericSpecializationMangler {
    pub fn new(substitutions: Vec<Substitution>) -> Self {
        Self { substitutions }
    }
}

impl SpecializationMangler for GenericSpecializationMangler {
    const KIND: SpecializationKind = SpecializationKind::Generic;

    fn mangle_specialization<E: SubEncoder + ?Sized>(
        &self,
        encoder: &E,
        out: &mut Mangler,
    ) -> Result<(), MangleError> {
        debug!(
            substitutions = self.substitutions.len(),
            "mangling generic specialization"
        );

        for sub in &self.substitutions {
            encoder.mangle_type(&sub.replacement, out);
            for conformance in sub.encoded_conformances() {
                encoder.mangle_conformance(conformance, out);
            }
            out.push('_');
        }
        Ok(())
    }
}

/// Event files spell a missing conformance as an empty table (`{}`) or, in
/// JSON, `null`.
mod conformance_slots {
    use crate::types::Conformance;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Slot {
        Present(Conformance),
        Absent(EmptyTable),
        Null,
    }

    /// Only a table with no keys at all marks a missing conformance.
    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct EmptyTable {}

    pub fn serialize<S: Serializer>(
        slots: &[Option<Conformance>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let slots: Vec<Slot> = slots
            .iter()
            .map(|slot| match slot {
                Some(c) => Slot::Present(c.clone()),
                None => Slot::Absent(EmptyTable {}),
            })
            .collect();
        slots.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Option<Conformance>>, D::Error> {
        let slots = Vec::<Slot>::deserialize(deserializer)?;
        Ok(slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Present(c) => Some(c),
                Slot::Absent(_) | Slot::Null => None,
            })
            .collect())
    }
}

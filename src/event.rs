//! Specialization events described in TOML or JSON files.
//!
//! ```toml
//! [[event]]
//! kind = "function-signature"
//! base = "_TF4main3fooFTSiSi_Si"
//! arity = 2
//!
//! [[event.arguments]]
//! index = 0
//! action = "constant-prop"
//! literal = { kind = "integer", value = 42 }
//! ```

use crate::config::EmitMode;
use crate::errors::{EventError, MangleError};
use crate::mangle::{
    Closure, FunctionSignatureMangler, GenericSpecializationMangler, Literal, SpecializationKind,
    SpecializationMangler, SubEncoder, Substitution,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Largest parameter count an event file may declare.
pub const MAX_ARITY: usize = u16::MAX as usize;

/// A file holding any number of events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFile {
    #[serde(default, rename = "event")]
    pub events: Vec<SpecializationEvent>,
}

impl EventFile {
    /// Load an event file; the format follows the file extension.
    pub fn load(path: &Path) -> Result<Self, EventError> {
        let content = fs::read_to_string(path).map_err(|source| EventError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|source| EventError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            Some("json") => serde_json::from_str(&content).map_err(|source| EventError::Json {
                path: path.to_path_buf(),
                source,
            }),
            _ => Err(EventError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// One specialization performed by an optimizer pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SpecializationEvent {
    Generic {
        base: String,
        #[serde(default)]
        substitutions: Vec<Substitution>,
    },
    FunctionSignature {
        base: String,
        arity: usize,
        #[serde(default)]
        arguments: Vec<ArgumentDecision>,
    },
}

/// A decision about one parameter, applied in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDecision {
    pub index: usize,
    #[serde(flatten)]
    pub action: ArgumentAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ArgumentAction {
    Dead,
    ConstantProp { literal: Literal },
    ClosureProp { closure: Closure },
    OwnedToGuaranteed,
    Sroa,
}

impl ArgumentDecision {
    pub fn apply(&self, fssm: &mut FunctionSignatureMangler) -> Result<(), MangleError> {
        match &self.action {
            ArgumentAction::Dead => fssm.set_argument_dead(self.index),
            ArgumentAction::ConstantProp { literal } => {
                fssm.set_argument_constant_prop(self.index, literal.clone())
            }
            ArgumentAction::ClosureProp { closure } => {
                fssm.set_argument_closure_prop(self.index, closure.clone())
            }
            ArgumentAction::OwnedToGuaranteed => fssm.set_argument_owned_to_guaranteed(self.index),
            ArgumentAction::Sroa => fssm.set_argument_sroa(self.index),
        }
    }
}

impl SpecializationEvent {
    pub fn base(&self) -> &str {
        match self {
            SpecializationEvent::Generic { base, .. }
            | SpecializationEvent::FunctionSignature { base, .. } => base,
        }
    }

    pub fn kind(&self) -> SpecializationKind {
        match self {
            SpecializationEvent::Generic { .. } => SpecializationKind::Generic,
            SpecializationEvent::FunctionSignature { .. } => SpecializationKind::FunctionSignature,
        }
    }

    /// Encode this event with a fresh mangler.
    pub fn mangle<E: SubEncoder + ?Sized>(
        &self,
        encoder: &E,
        emit: EmitMode,
    ) -> Result<String, MangleError> {
        debug!(kind = %self.kind(), base = self.base(), "encoding event");

        match self {
            SpecializationEvent::Generic {
                base,
                substitutions,
            } => {
                let gsm = GenericSpecializationMangler::new(substitutions.clone());
                emit_with(&gsm, encoder, base, emit)
            }
            SpecializationEvent::FunctionSignature {
                base,
                arity,
                arguments,
            } => {
                if *arity > MAX_ARITY {
                    return Err(MangleError::ArityTooLarge {
                        arity: *arity,
                        max: MAX_ARITY,
                    });
                }
                if let Some(decision) = arguments.iter().find(|d| d.index >= *arity) {
                    return Err(MangleError::ArgumentOutOfRange {
                        index: decision.index,
                        arity: *arity,
                    });
                }

                let mut fssm = FunctionSignatureMangler::new(*arity);
                for decision in arguments {
                    decision.apply(&mut fssm)?;
                }
                emit_with(&fssm, encoder, base, emit)
            }
        }
    }
}

fn emit_with<M, E>(
    mangler: &M,
    encoder: &E,
    base: &str,
    emit: EmitMode,
) -> Result<String, MangleError>
where
    M: SpecializationMangler,
    E: SubEncoder + ?Sized,
{
    match emit {
        EmitMode::Symbol => mangler.mangle(encoder, base),
        EmitMode::Suffix => mangler.suffix(encoder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mangle::CanonicalEncoder;
    use crate::types::Type;
    use std::io::Write;

    const SAMPLE_TOML: &str = r#"
[[event]]
kind = "function-signature"
base = "foo"
arity = 2

[[event.arguments]]
index = 0
action = "constant-prop"
literal = { kind = "integer", value = 42 }

[[event]]
kind = "generic"
base = "bar"

[[event.substitutions]]
replacement = "int"
conformances = [{ protocol = "Equatable", module = "Core" }]
"#;

    #[test]
    fn test_parse_toml_events() {
        let file: EventFile = toml::from_str(SAMPLE_TOML).unwrap();
        assert_eq!(file.events.len(), 2);
        assert_eq!(file.events[0].kind(), SpecializationKind::FunctionSignature);
        assert_eq!(file.events[1].base(), "bar");

        let symbols: Vec<String> = file
            .events
            .iter()
            .map(|e| e.mangle(&CanonicalEncoder, EmitMode::Symbol).unwrap())
            .collect();
        assert_eq!(symbols, vec!["_TTSfcpi42_n__foo", "_TTSgSiP9Equatable4Core__bar"]);
    }

    #[test]
    fn test_parse_json_argument_actions() {
        let json = r#"{"event": [{
            "kind": "function-signature",
            "base": "f",
            "arity": 4,
            "arguments": [
                {"index": 0, "action": "dead"},
                {"index": 1, "action": "owned-to-guaranteed"},
                {"index": 1, "action": "sroa"},
                {"index": 2, "action": "closure-prop",
                 "closure": {"callee": {"function": "g"}, "captured": ["float"]}},
                {"index": 3, "action": "constant-prop",
                 "literal": {"kind": "global-ref", "name": "G"}}
            ]
        }]}"#;
        let file: EventFile = serde_json::from_str(json).unwrap();
        let event = &file.events[0];
        assert_eq!(
            event.mangle(&CanonicalEncoder, EmitMode::Suffix).unwrap(),
            "d_gs_cl1gSd_cpg1G_"
        );
    }

    #[test]
    fn test_out_of_range_decision_fails() {
        let event = SpecializationEvent::FunctionSignature {
            base: "f".to_string(),
            arity: 1,
            arguments: vec![ArgumentDecision {
                index: 1,
                action: ArgumentAction::Dead,
            }],
        };
        assert_eq!(
            event.mangle(&CanonicalEncoder, EmitMode::Symbol),
            Err(MangleError::ArgumentOutOfRange { index: 1, arity: 1 })
        );
    }

    #[test]
    fn test_oversized_arity_is_rejected() {
        let event = SpecializationEvent::FunctionSignature {
            base: "f".to_string(),
            arity: 1_000_000_000_000,
            arguments: vec![],
        };
        assert_eq!(
            event.mangle(&CanonicalEncoder, EmitMode::Symbol),
            Err(MangleError::ArityTooLarge {
                arity: 1_000_000_000_000,
                max: MAX_ARITY,
            })
        );

        let toml_src = r#"
[[event]]
kind = "function-signature"
base = "f"
arity = 1000000000000
"#;
        let file: EventFile = toml::from_str(toml_src).unwrap();
        assert!(matches!(
            file.events[0].mangle(&CanonicalEncoder, EmitMode::Suffix),
            Err(MangleError::ArityTooLarge { .. })
        ));
    }

    #[test]
    fn test_index_checked_before_any_decision_applies() {
        // The dead/sroa conflict on index 0 would fire first if decisions
        // were applied before the range check.
        let event = SpecializationEvent::FunctionSignature {
            base: "f".to_string(),
            arity: MAX_ARITY,
            arguments: vec![
                ArgumentDecision {
                    index: 0,
                    action: ArgumentAction::Dead,
                },
                ArgumentDecision {
                    index: 0,
                    action: ArgumentAction::Sroa,
                },
                ArgumentDecision {
                    index: MAX_ARITY,
                    action: ArgumentAction::Dead,
                },
            ],
        };
        assert_eq!(
            event.mangle(&CanonicalEncoder, EmitMode::Suffix),
            Err(MangleError::ArgumentOutOfRange {
                index: MAX_ARITY,
                arity: MAX_ARITY,
            })
        );
    }

    #[test]
    fn test_generic_event_suffix() {
        let event = SpecializationEvent::Generic {
            base: "id".to_string(),
            substitutions: vec![Substitution::new(Type::array(Type::Int), vec![])],
        };
        assert_eq!(
            event.mangle(&CanonicalEncoder, EmitMode::Suffix).unwrap(),
            "SaSi_"
        );
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("events.toml");
        fs::write(&toml_path, SAMPLE_TOML).unwrap();
        assert_eq!(EventFile::load(&toml_path).unwrap().events.len(), 2);

        let txt_path = dir.path().join("events.txt");
        let mut f = fs::File::create(&txt_path).unwrap();
        f.write_all(SAMPLE_TOML.as_bytes()).unwrap();
        assert!(matches!(
            EventFile::load(&txt_path),
            Err(EventError::UnsupportedExtension { .. })
        ));

        assert!(matches!(
            EventFile::load(&dir.path().join("missing.toml")),
            Err(EventError::Io { .. })
        ));
    }
}

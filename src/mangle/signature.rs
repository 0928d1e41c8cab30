//! Function signature specialization: one field per parameter.
//!
//! Each parameter's field is followed by `_`:
//!
//! | Modifier                    | Field          |
//! |-----------------------------|----------------|
//! | constant propagated         | `cp...`        |
//! | closure propagated          | `cl...`        |
//! | unmodified                  | `n`            |
//! | dead                        | `d`            |
//! | owned to guaranteed / SROA  | `g`, `s`, `gs` |

use super::closure::mangle_closure_prop;
use super::literal::mangle_constant_prop;
use super::{Closure, Literal, Mangler, SpecializationKind, SpecializationMangler, SubEncoder};
use crate::errors::MangleError;
use tracing::{debug, trace};

/// Calling-convention rewrites that can be applied together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConventionFlags {
    pub owned_to_guaranteed: bool,
    pub sroa: bool,
}

impl ConventionFlags {
    pub fn is_empty(self) -> bool {
        !self.owned_to_guaranteed && !self.sroa
    }
}

/// What the specializer did to one parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ArgumentModifier {
    #[default]
    Unmodified,
    Dead,
    ConstantProp(Literal),
    ClosureProp(Closure),
    Flags(ConventionFlags),
}

impl ArgumentModifier {
    pub fn is_dead(&self) -> bool {
        matches!(self, ArgumentModifier::Dead)
    }
}

/// Mangler for a function signature specialization event.
///
/// Created with the original function's arity; every parameter starts out
/// unmodified.
#[derive(Debug, Clone)]
pub struct FunctionSignatureMangler {
    args: Vec<ArgumentModifier>,
}

impl FunctionSignatureMangler {
    pub fn new(arity: usize) -> Self {
        Self {
            args: vec![ArgumentModifier::Unmodified; arity],
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn argument(&self, index: usize) -> Option<&ArgumentModifier> {
        self.args.get(index)
    }

    pub fn is_argument_dead(&self, index: usize) -> bool {
        self.args.get(index).is_some_and(ArgumentModifier::is_dead)
    }

    fn arg_mut(&mut self, index: usize) -> Result<&mut ArgumentModifier, MangleError> {
        let arity = self.args.len();
        self.args
            .get_mut(index)
            .ok_or(MangleError::ArgumentOutOfRange { index, arity })
    }

    pub fn set_argument_dead(&mut self, index: usize) -> Result<(), MangleError> {
        *self.arg_mut(index)? = ArgumentModifier::Dead;
        Ok(())
    }

    pub fn set_argument_constant_prop(
        &mut self,
        index: usize,
        literal: Literal,
    ) -> Result<(), MangleError> {
        *self.arg_mut(index)? = ArgumentModifier::ConstantProp(literal);
        Ok(())
    }

    pub fn set_argument_closure_prop(
        &mut self,
        index: usize,
        closure: Closure,
    ) -> Result<(), MangleError> {
        *self.arg_mut(index)? = ArgumentModifier::ClosureProp(closure);
        Ok(())
    }

    pub fn set_argument_owned_to_guaranteed(&mut self, index: usize) -> Result<(), MangleError> {
        self.add_flag(index, "owned-to-guaranteed", |flags| flags.owned_to_guaranteed = true)
    }

    pub fn set_argument_sroa(&mut self, index: usize) -> Result<(), MangleError> {
        self.add_flag(index, "sroa", |flags| flags.sroa = true)
    }

    fn add_flag(
        &mut self,
        index: usize,
        name: &'static str,
        set: impl FnOnce(&mut ConventionFlags),
    ) -> Result<(), MangleError> {
        let arg = self.arg_mut(index)?;
        match *arg {
            ArgumentModifier::Unmodified => {
                let mut flags = ConventionFlags::default();
                set(&mut flags);
                *arg = ArgumentModifier::Flags(flags);
            }
            ArgumentModifier::Flags(ref mut flags) => set(flags),
            // The payload decides the encoding on its own.
            ArgumentModifier::ConstantProp(_) | ArgumentModifier::ClosureProp(_) => {
                trace!(index, flag = name, "flag absorbed by propagated argument");
            }
            ArgumentModifier::Dead => {
                return Err(MangleError::ConflictingModifier {
                    index,
                    requested: name,
                });
            }
        }
        Ok(())
    }
}

/// Append the field for one parameter, without its delimiter.
pub fn mangle_argument<E: SubEncoder + ?Sized>(
    index: usize,
    modifier: &ArgumentModifier,
    encoder: &E,
    out: &mut Mangler,
) -> Result<(), MangleError> {
    match modifier {
        ArgumentModifier::ConstantProp(literal) => mangle_constant_prop(literal, encoder, out),
        ArgumentModifier::ClosureProp(closure) => mangle_closure_prop(closure, encoder, out),
        ArgumentModifier::Unmodified => {
            out.push('n');
            Ok(())
        }
        ArgumentModifier::Dead => {
            out.push('d');
            Ok(())
        }
        ArgumentModifier::Flags(flags) => {
            if flags.is_empty() {
                return Err(MangleError::EmptyModifierFlags { index });
            }
            if flags.owned_to_guaranteed {
                out.push('g');
            }
            if flags.sroa {
                out.push('s');
            }
            Ok(())
        }
    }
}

impl SpecializationMangler for FunctionSignatureMangler {
    const KIND: SpecializationKind = SpecializationKind::FunctionSignature;

    fn mangle_specialization<E: SubEncoder + ?Sized>(
        &self,
        encoder: &E,
        out: &mut Mangler,
    ) -> Result<(), MangleError> {
        debug!(arity = self.args.len(), "mangling function signature specialization");

        for (index, modifier) in self.args.iter().enumerate() {
            let start = out.len();
            mangle_argument(index, modifier, encoder, out)?;
            trace!(index, field = &out.as_str()[start..], "mangled argument");
            out.push('_');
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mangle::{CanonicalEncoder, PlainEncoder, StringEncoding};
    use crate::types::Type;

    #[test]
    fn test_all_unmodified() {
        let fssm = FunctionSignatureMangler::new(3);
        assert_eq!(fssm.suffix(&CanonicalEncoder).unwrap(), "n_n_n_");
        let nullary = FunctionSignatureMangler::new(0);
        assert_eq!(nullary.suffix(&CanonicalEncoder).unwrap(), "");
    }

    #[test]
    fn test_argument_order_matters() {
        let mut a = FunctionSignatureMangler::new(2);
        a.set_argument_dead(1).unwrap();
        let mut b = FunctionSignatureMangler::new(2);
        b.set_argument_dead(0).unwrap();

        let a = a.suffix(&CanonicalEncoder).unwrap();
        let b = b.suffix(&CanonicalEncoder).unwrap();
        assert_eq!(a, "n_d_");
        assert_eq!(b, "d_n_");
        assert_ne!(a, b);
    }

    #[test]
    fn test_integer_constant_then_unmodified() {
        let mut fssm = FunctionSignatureMangler::new(2);
        fssm.set_argument_constant_prop(0, Literal::integer(42)).unwrap();
        assert_eq!(fssm.suffix(&PlainEncoder).unwrap(), "cpi42_n_");
        assert_eq!(fssm.suffix(&CanonicalEncoder).unwrap(), "cpi42_n_");
    }

    #[test]
    fn test_constant_prop_wins_over_flags() {
        let mut fssm = FunctionSignatureMangler::new(1);
        fssm.set_argument_owned_to_guaranteed(0).unwrap();
        fssm.set_argument_constant_prop(0, Literal::integer(1)).unwrap();
        assert_eq!(fssm.suffix(&CanonicalEncoder).unwrap(), "cpi1_");

        let mut fssm = FunctionSignatureMangler::new(1);
        fssm.set_argument_constant_prop(0, Literal::integer(1)).unwrap();
        fssm.set_argument_owned_to_guaranteed(0).unwrap();
        fssm.set_argument_sroa(0).unwrap();
        assert_eq!(fssm.suffix(&CanonicalEncoder).unwrap(), "cpi1_");
    }

    #[test]
    fn test_closure_prop_wins_over_flags() {
        let mut fssm = FunctionSignatureMangler::new(2);
        fssm.set_argument_closure_prop(1, Closure::new("foo", vec![Type::Int])).unwrap();
        fssm.set_argument_sroa(1).unwrap();
        assert_eq!(fssm.suffix(&CanonicalEncoder).unwrap(), "n_cl3fooSi_");
    }

    #[test]
    fn test_flag_order_is_fixed() {
        let mut gs = FunctionSignatureMangler::new(1);
        gs.set_argument_sroa(0).unwrap();
        gs.set_argument_owned_to_guaranteed(0).unwrap();
        assert_eq!(gs.suffix(&CanonicalEncoder).unwrap(), "gs_");

        let mut g = FunctionSignatureMangler::new(1);
        g.set_argument_owned_to_guaranteed(0).unwrap();
        assert_eq!(g.suffix(&CanonicalEncoder).unwrap(), "g_");

        let mut s = FunctionSignatureMangler::new(1);
        s.set_argument_sroa(0).unwrap();
        s.set_argument_sroa(0).unwrap();
        assert_eq!(s.suffix(&CanonicalEncoder).unwrap(), "s_");
    }

    #[test]
    fn test_dead_replaces_earlier_decisions() {
        let mut fssm = FunctionSignatureMangler::new(1);
        fssm.set_argument_owned_to_guaranteed(0).unwrap();
        fssm.set_argument_dead(0).unwrap();
        assert_eq!(fssm.suffix(&CanonicalEncoder).unwrap(), "d_");
    }

    #[test]
    fn test_flags_on_dead_argument_conflict() {
        let mut fssm = FunctionSignatureMangler::new(1);
        fssm.set_argument_dead(0).unwrap();
        assert_eq!(
            fssm.set_argument_sroa(0),
            Err(MangleError::ConflictingModifier {
                index: 0,
                requested: "sroa"
            })
        );
        assert!(fssm.is_argument_dead(0));
    }

    #[test]
    fn test_out_of_range_index() {
        let mut fssm = FunctionSignatureMangler::new(2);
        let expected = Err(MangleError::ArgumentOutOfRange { index: 2, arity: 2 });
        assert_eq!(fssm.set_argument_dead(2), expected);
        assert_eq!(fssm.set_argument_sroa(2), expected);
        assert_eq!(fssm.set_argument_owned_to_guaranteed(2), expected);
        assert_eq!(fssm.set_argument_constant_prop(2, Literal::integer(0)), expected);
        assert_eq!(
            fssm.set_argument_closure_prop(2, Closure::new("f", vec![])),
            expected
        );
        assert_eq!(fssm.suffix(&CanonicalEncoder).unwrap(), "n_n_");
    }

    #[test]
    fn test_empty_flags_are_rejected() {
        let mut out = Mangler::new();
        let flags = ArgumentModifier::Flags(ConventionFlags::default());
        assert_eq!(
            mangle_argument(4, &flags, &CanonicalEncoder, &mut out),
            Err(MangleError::EmptyModifierFlags { index: 4 })
        );
    }

    #[test]
    fn test_one_bad_argument_fails_whole_suffix() {
        let mut fssm = FunctionSignatureMangler::new(3);
        fssm.set_argument_dead(0).unwrap();
        let long = Literal::string("x".repeat(33), StringEncoding::Utf8);
        fssm.set_argument_constant_prop(1, long).unwrap();
        assert_eq!(
            fssm.suffix(&CanonicalEncoder),
            Err(MangleError::StringLiteralTooLong { len: 33, max: 32 })
        );
        assert_eq!(
            fssm.mangle(&CanonicalEncoder, "base"),
            Err(MangleError::StringLiteralTooLong { len: 33, max: 32 })
        );
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let mut fssm = FunctionSignatureMangler::new(2);
        fssm.set_argument_dead(0).unwrap();
        let before = fssm.suffix(&CanonicalEncoder).unwrap();

        assert!(fssm.is_argument_dead(0));
        assert!(!fssm.is_argument_dead(1));
        assert!(!fssm.is_argument_dead(7));
        assert_eq!(fssm.argument(1), Some(&ArgumentModifier::Unmodified));
        assert_eq!(fssm.argument(2), None);
        assert_eq!(fssm.arity(), 2);

        assert_eq!(fssm.suffix(&CanonicalEncoder).unwrap(), before);
    }

    #[test]
    fn test_mixed_signature() {
        let mut fssm = FunctionSignatureMangler::new(5);
        fssm.set_argument_constant_prop(0, Literal::function_ref("callee")).unwrap();
        fssm.set_argument_dead(1).unwrap();
        fssm.set_argument_owned_to_guaranteed(2).unwrap();
        fssm.set_argument_closure_prop(3, Closure::new("cl", vec![Type::Bool])).unwrap();
        let hi = Literal::string("hi", StringEncoding::Utf8);
        fssm.set_argument_constant_prop(4, hi).unwrap();
        assert_eq!(
            fssm.suffix(&CanonicalEncoder).unwrap(),
            "cpfr6callee_d_g_cl2clSb_cpse0v3uhi_"
        );
    }
}

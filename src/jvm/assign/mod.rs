//! Deciding whether a value of one type may occupy a stack slot of another
//!
//! An [`Assigner`] answers that question by handing back the
//! [`StackManipulation`] performing the conversion, or
//! [`StackManipulation::Illegal`] when no conversion exists. Assignment
//! failure is an expected outcome during speculative code generation (eg.
//! while trying candidate target methods), so assigners never error: callers
//! check `is_valid` on the result before generating code that depends on it.
//!
//! [`ReferenceTypeAware`] is the default policy. It handles identity and
//! reference conversions only; primitive widening is layered in front of it
//! by [`PrimitiveAware`], and boxing/unboxing is not synthesized at all.

mod binding;
mod primitive;

pub use binding::*;
pub use primitive::*;

use super::class_graph::{Assignable, ClassData};
use super::code::StackManipulation;
use super::FieldType;

/// Permission bit for runtime-checked narrowing
///
/// [`Typing::Dynamic`] means the caller asserts the actual runtime type is
/// compatible even where static information cannot prove it; the conversion
/// is then emitted as a checked cast that defers the proof to the runtime.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Typing {
    Static,
    Dynamic,
}

impl Typing {
    pub fn is_dynamic(self) -> bool {
        self == Typing::Dynamic
    }
}

/// Decides how a value of a source type can be assigned to a target type
///
/// Assigners are stateless and freely shareable; all state lives in the
/// returned manipulation.
pub trait Assigner {
    fn assign<'g>(
        &self,
        source: FieldType<&'g ClassData<'g>>,
        target: FieldType<&'g ClassData<'g>>,
        typing: Typing,
    ) -> StackManipulation<'g>;
}

/// Default assigner: identity and reference conversions
///
/// Primitive types assign only to themselves. Reference types assign
/// trivially when the target is a supertype, and via a down cast when the
/// caller permits dynamic typing. No primitive widening and no boxing: those
/// conversions belong to more specialized assigners composed in front of
/// this one (see [`PrimitiveAware`]).
pub struct ReferenceTypeAware;

impl Assigner for ReferenceTypeAware {
    fn assign<'g>(
        &self,
        source: FieldType<&'g ClassData<'g>>,
        target: FieldType<&'g ClassData<'g>>,
        typing: Typing,
    ) -> StackManipulation<'g> {
        match (source, target) {
            (FieldType::Ref(source_type), FieldType::Ref(target_type)) => {
                if source_type.is_assignable(&target_type) {
                    StackManipulation::Trivial
                } else if typing.is_dynamic() {
                    log::trace!(
                        "Assigning {:?} to {:?} via runtime-checked cast",
                        source_type,
                        target_type
                    );
                    StackManipulation::DownCast(target_type)
                } else {
                    log::trace!("No assignment of {:?} to {:?}", source_type, target_type);
                    StackManipulation::Illegal
                }
            }

            // Primitives are only ever assignable to themselves
            _ if source == target => StackManipulation::Trivial,
            _ => StackManipulation::Illegal,
        }
    }
}

/// Assigner that only accepts nominally equal types
///
/// Subtyping is ignored entirely; useful where an exact match has to have
/// been established already.
pub struct EqualTypesOnly;

impl Assigner for EqualTypesOnly {
    fn assign<'g>(
        &self,
        source: FieldType<&'g ClassData<'g>>,
        target: FieldType<&'g ClassData<'g>>,
        _typing: Typing,
    ) -> StackManipulation<'g> {
        if source == target {
            StackManipulation::Trivial
        } else {
            StackManipulation::Illegal
        }
    }
}

/// Assigner that refuses every conversion
pub struct Refusing;

impl Assigner for Refusing {
    fn assign<'g>(
        &self,
        _source: FieldType<&'g ClassData<'g>>,
        _target: FieldType<&'g ClassData<'g>>,
        _typing: Typing,
    ) -> StackManipulation<'g> {
        StackManipulation::Illegal
    }
}

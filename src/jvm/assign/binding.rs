use super::{Assigner, Typing};
use crate::jvm::class_graph::ClassData;
use crate::jvm::code::StackManipulation;
use crate::jvm::MethodDescriptor;
use crate::util::Width;

/// Load the arguments of one method and convert them for a call to another
///
/// Produces one `Load` per source parameter, each followed by whatever
/// conversion the assigner decides on, composed in order. Local variable
/// offsets start at `first_offset` (use 1 to skip a `this` receiver) and
/// advance by the parameter's word width, so `long` and `double` parameters
/// occupy two slots.
///
/// The whole binding is [`StackManipulation::Illegal`] when the parameter
/// counts differ or any single parameter cannot be assigned.
pub fn bind_arguments<'g, A: Assigner>(
    source: &MethodDescriptor<&'g ClassData<'g>>,
    target: &MethodDescriptor<&'g ClassData<'g>>,
    assigner: &A,
    typing: Typing,
    first_offset: u16,
) -> StackManipulation<'g> {
    if source.parameters.len() != target.parameters.len() {
        log::trace!(
            "Cannot bind {} parameters to {} parameters",
            source.parameters.len(),
            target.parameters.len()
        );
        return StackManipulation::Illegal;
    }

    let mut parts = Vec::with_capacity(source.parameters.len() * 2);
    let mut offset = first_offset;
    for (&source_type, &target_type) in source.parameters.iter().zip(&target.parameters) {
        let conversion = assigner.assign(source_type, target_type, typing);
        if !conversion.is_valid() {
            return StackManipulation::Illegal;
        }
        parts.push(StackManipulation::Load {
            variable: source_type,
            offset,
        });
        parts.push(conversion);
        offset += source_type.width() as u16;
    }
    StackManipulation::Compound(parts)
}

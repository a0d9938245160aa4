use super::{Assigner, Typing};
use crate::jvm::class_graph::ClassData;
use crate::jvm::code::{Instruction, Size, StackManipulation, StackSize};
use crate::jvm::{BaseType, FieldType};

/// Widening primitive conversion, if one exists (JLS 5.1.2)
///
/// Identity conversions come back as [`StackManipulation::Trivial`], as do
/// widenings the JVM performs without an instruction (`byte`, `short`, and
/// `char` are already `int`-shaped on the operand stack). `boolean` widens
/// to nothing but itself, and narrowing directions are
/// [`StackManipulation::Illegal`].
pub fn widen_primitive<'g>(source: BaseType, target: BaseType) -> StackManipulation<'g> {
    use BaseType::*;

    if source == target {
        return StackManipulation::Trivial;
    }

    let grow_one = StackSize::Single.to_increasing_size();
    let shrink_one = StackSize::Single.to_decreasing_size();
    let widen = |instruction: Instruction<'g>, size: Size| StackManipulation::Widen {
        instruction,
        size,
    };

    match (source, target) {
        (Byte | Short | Char, Int) | (Byte, Short) => StackManipulation::Trivial,
        (Byte | Short | Char | Int, Long) => widen(Instruction::I2L, grow_one),
        (Byte | Short | Char | Int, Float) => widen(Instruction::I2F, Size::ZERO),
        (Byte | Short | Char | Int, Double) => widen(Instruction::I2D, grow_one),
        (Long, Float) => widen(Instruction::L2F, shrink_one),
        (Long, Double) => widen(Instruction::L2D, Size::ZERO),
        (Float, Double) => widen(Instruction::F2D, grow_one),
        _ => StackManipulation::Illegal,
    }
}

/// Assigner layering widening primitive conversions over another assigner
///
/// Primitive-to-primitive assignments are resolved by [`widen_primitive`];
/// everything reference-to-reference is delegated to the wrapped assigner.
/// Mixed primitive/reference assignments are refused: boxing conversions are
/// deliberately not synthesized here.
pub struct PrimitiveAware<A> {
    pub reference_assigner: A,
}

impl<A: Assigner> Assigner for PrimitiveAware<A> {
    fn assign<'g>(
        &self,
        source: FieldType<&'g ClassData<'g>>,
        target: FieldType<&'g ClassData<'g>>,
        typing: Typing,
    ) -> StackManipulation<'g> {
        match (source, target) {
            (FieldType::Base(source_type), FieldType::Base(target_type)) => {
                widen_primitive(source_type, target_type)
            }
            (FieldType::Ref(_), FieldType::Ref(_)) => {
                self.reference_assigner.assign(source, target, typing)
            }
            _ => StackManipulation::Illegal,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::assign::ReferenceTypeAware;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas};
    use crate::jvm::RefType;

    #[test]
    fn identity_widenings_are_trivial() {
        for typ in [
            BaseType::Boolean,
            BaseType::Byte,
            BaseType::Char,
            BaseType::Short,
            BaseType::Int,
            BaseType::Long,
            BaseType::Float,
            BaseType::Double,
        ] {
            assert_eq!(widen_primitive(typ, typ), StackManipulation::Trivial);
        }
    }

    #[test]
    fn int_shaped_widenings_need_no_instruction() {
        for source in [BaseType::Byte, BaseType::Short, BaseType::Char] {
            assert_eq!(
                widen_primitive(source, BaseType::Int),
                StackManipulation::Trivial
            );
        }
        assert_eq!(
            widen_primitive(BaseType::Byte, BaseType::Short),
            StackManipulation::Trivial
        );
    }

    #[test]
    fn widenings_to_two_word_types_grow_the_stack() {
        assert_eq!(
            widen_primitive(BaseType::Int, BaseType::Long),
            StackManipulation::Widen {
                instruction: Instruction::I2L,
                size: Size::new(1, 1),
            }
        );
        assert_eq!(
            widen_primitive(BaseType::Short, BaseType::Double),
            StackManipulation::Widen {
                instruction: Instruction::I2D,
                size: Size::new(1, 1),
            }
        );
        assert_eq!(
            widen_primitive(BaseType::Float, BaseType::Double),
            StackManipulation::Widen {
                instruction: Instruction::F2D,
                size: Size::new(1, 1),
            }
        );
    }

    #[test]
    fn long_to_float_shrinks_the_stack() {
        assert_eq!(
            widen_primitive(BaseType::Long, BaseType::Float),
            StackManipulation::Widen {
                instruction: Instruction::L2F,
                size: Size::new(-1, 0),
            }
        );
        assert_eq!(
            widen_primitive(BaseType::Long, BaseType::Double),
            StackManipulation::Widen {
                instruction: Instruction::L2D,
                size: Size::ZERO,
            }
        );
    }

    #[test]
    fn narrowings_are_illegal() {
        for (source, target) in [
            (BaseType::Int, BaseType::Byte),
            (BaseType::Long, BaseType::Int),
            (BaseType::Double, BaseType::Float),
            (BaseType::Float, BaseType::Long),
        ] {
            assert_eq!(
                widen_primitive(source, target),
                StackManipulation::Illegal,
                "{:?} must not narrow to {:?}",
                source,
                target
            );
        }
    }

    #[test]
    fn boolean_widens_only_to_itself() {
        for other in [BaseType::Byte, BaseType::Int, BaseType::Long] {
            assert_eq!(
                widen_primitive(BaseType::Boolean, other),
                StackManipulation::Illegal
            );
            assert_eq!(
                widen_primitive(other, BaseType::Boolean),
                StackManipulation::Illegal
            );
        }
    }

    #[test]
    fn primitive_aware_widens_and_delegates() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let assigner = PrimitiveAware {
            reference_assigner: ReferenceTypeAware,
        };

        assert_eq!(
            assigner.assign(FieldType::int(), FieldType::long(), Typing::Static),
            StackManipulation::Widen {
                instruction: Instruction::I2L,
                size: Size::new(1, 1),
            }
        );

        assert_eq!(
            assigner.assign(
                FieldType::object(java.object),
                FieldType::object(java.string),
                Typing::Dynamic,
            ),
            StackManipulation::DownCast(RefType::Object(java.string)),
        );

        // No boxing or unboxing
        assert_eq!(
            assigner.assign(
                FieldType::int(),
                FieldType::object(java.integer),
                Typing::Dynamic,
            ),
            StackManipulation::Illegal,
        );
        assert_eq!(
            assigner.assign(
                FieldType::object(java.double),
                FieldType::double(),
                Typing::Dynamic,
            ),
            StackManipulation::Illegal,
        );
    }
}

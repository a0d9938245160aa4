use super::{Instruction, InstructionSink, Size, StackSize};
use crate::jvm::class_graph::ClassData;
use crate::jvm::{BaseType, Error, FieldType, RefType};

/// Composable description of zero or more instructions together with their
/// effect on the operand stack
///
/// A manipulation is constructed once (usually by an assigner), applied at
/// most once while a method body is generated, and carries no mutable state.
/// The variants are all freely shareable across threads; only the sink passed
/// to [`StackManipulation::apply`] is single-threaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackManipulation<'g> {
    /// No instructions are needed: the value on the stack already satisfies
    /// the target type
    Trivial,

    /// No legal instruction sequence exists
    ///
    /// This is an ordinary, expected outcome of assignment decisions (not an
    /// error); it only becomes one if applied without checking `is_valid`.
    Illegal,

    /// Runtime-checked narrowing to the target type
    ///
    /// Only the target is retained because a `checkcast` instruction takes
    /// only the destination type as operand. Two down casts are equal exactly
    /// when they name the same target type.
    DownCast(RefType<&'g ClassData<'g>>),

    /// One primitive widening conversion instruction
    Widen {
        instruction: Instruction<'g>,
        size: Size,
    },

    /// Push a local variable onto the stack
    Load {
        variable: FieldType<&'g ClassData<'g>>,
        offset: u16,
    },

    /// Sequence of manipulations, applied in order
    Compound(Vec<StackManipulation<'g>>),
}

impl<'g> StackManipulation<'g> {
    /// Can this manipulation be applied at all?
    ///
    /// Callers must check this before `apply`: an invalid manipulation means
    /// the requested conversion does not exist, and the caller is expected to
    /// surface that as a "cannot assign" diagnostic or try an alternative.
    pub fn is_valid(&self) -> bool {
        match self {
            StackManipulation::Illegal => false,
            StackManipulation::Compound(parts) => parts.iter().all(StackManipulation::is_valid),
            _ => true,
        }
    }

    /// Write the instructions out and report their stack effect
    pub fn apply<S: InstructionSink<'g>>(&self, sink: &mut S) -> Result<Size, Error> {
        match self {
            StackManipulation::Trivial => Ok(Size::ZERO),

            StackManipulation::Illegal => {
                log::error!("Applying an illegal stack manipulation");
                Err(Error::IllegalStackManipulation)
            }

            StackManipulation::DownCast(target) => {
                sink.emit(Instruction::CheckCast(*target))?;
                Ok(Size::ZERO)
            }

            StackManipulation::Widen { instruction, size } => {
                sink.emit(instruction.clone())?;
                Ok(*size)
            }

            StackManipulation::Load { variable, offset } => {
                let insn = match variable {
                    FieldType::Base(BaseType::Long) => Instruction::LLoad(*offset),
                    FieldType::Base(BaseType::Float) => Instruction::FLoad(*offset),
                    FieldType::Base(BaseType::Double) => Instruction::DLoad(*offset),
                    FieldType::Base(_) => Instruction::ILoad(*offset),
                    FieldType::Ref(_) => Instruction::ALoad(*offset),
                };
                sink.emit(insn)?;
                Ok(StackSize::of(variable).to_increasing_size())
            }

            StackManipulation::Compound(parts) => {
                let mut size = Size::ZERO;
                for part in parts {
                    size = size.merge(part.apply(sink)?);
                }
                Ok(size)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas};

    #[test]
    fn trivial_emits_nothing() {
        let mut sink: Vec<Instruction> = vec![];
        let size = StackManipulation::Trivial.apply(&mut sink).unwrap();
        assert_eq!(size, Size::ZERO);
        assert!(sink.is_empty());
    }

    #[test]
    fn illegal_fails_to_apply() {
        let mut sink: Vec<Instruction> = vec![];
        assert!(!StackManipulation::Illegal.is_valid());
        assert!(matches!(
            StackManipulation::Illegal.apply(&mut sink),
            Err(Error::IllegalStackManipulation)
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn down_cast_emits_one_checkcast() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let target = RefType::Object(java.string);
        let manipulation = StackManipulation::DownCast(target);
        assert!(manipulation.is_valid());

        let mut sink: Vec<Instruction> = vec![];
        let size = manipulation.apply(&mut sink).unwrap();
        assert_eq!(size, Size::ZERO);
        assert_eq!(sink, vec![Instruction::CheckCast(target)]);
    }

    #[test]
    fn down_cast_equality_is_by_name() {
        // Same name allocated in two unrelated graphs
        let arenas1 = ClassGraphArenas::new();
        let graph1 = ClassGraph::new(&arenas1);
        let java1 = graph1.insert_java_library_types();

        let arenas2 = ClassGraphArenas::new();
        let graph2 = ClassGraph::new(&arenas2);
        let java2 = graph2.insert_java_library_types();

        assert_eq!(
            StackManipulation::DownCast(RefType::Object(java1.string)),
            StackManipulation::DownCast(RefType::Object(java2.string)),
        );
        assert_ne!(
            StackManipulation::DownCast(RefType::Object(java1.string)),
            StackManipulation::DownCast(RefType::Object(java2.object)),
        );
    }

    #[test]
    fn load_pushes_width_of_variable() {
        let mut sink: Vec<Instruction> = vec![];
        let load_double = StackManipulation::Load {
            variable: FieldType::double(),
            offset: 2,
        };
        let size = load_double.apply(&mut sink).unwrap();
        assert_eq!(size, Size::new(2, 2));
        assert_eq!(sink, vec![Instruction::DLoad(2)]);
    }

    #[test]
    fn compound_validity() {
        let valid = StackManipulation::Compound(vec![
            StackManipulation::Trivial,
            StackManipulation::Trivial,
        ]);
        assert!(valid.is_valid());

        let invalid = StackManipulation::Compound(vec![
            StackManipulation::Trivial,
            StackManipulation::Illegal,
        ]);
        assert!(!invalid.is_valid());

        assert!(StackManipulation::Compound(vec![]).is_valid());
    }

    #[test]
    fn compound_folds_sizes() {
        // Push two words, then an operation consuming one: Size(1, 2)
        let manipulation = StackManipulation::Compound(vec![
            StackManipulation::Load {
                variable: FieldType::long(),
                offset: 0,
            },
            StackManipulation::Widen {
                instruction: Instruction::L2F,
                size: StackSize::Single.to_decreasing_size(),
            },
        ]);

        let mut sink: Vec<Instruction> = vec![];
        let size = manipulation.apply(&mut sink).unwrap();
        assert_eq!(size, Size::new(1, 2));
        assert_eq!(sink, vec![Instruction::LLoad(0), Instruction::L2F]);
    }
}

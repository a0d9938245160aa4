//! Instruction emission and stack bookkeeping
//!
//! Code generation in this crate is built out of [`StackManipulation`]
//! values: immutable descriptions of instruction sequences that know their
//! own stack effect. Applying a manipulation writes its instructions into an
//! [`InstructionSink`] and returns a [`Size`]; callers fold those sizes with
//! [`Size::merge`] to arrive at the `max_stack` the enclosing method must
//! declare.

mod bytecode;
mod sink;
mod size;
mod stack_manipulation;

pub use bytecode::*;
pub use sink::*;
pub use size::*;
pub use stack_manipulation::*;

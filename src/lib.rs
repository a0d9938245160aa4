//! Engineer JVM classes at the bytecode level, without source code.
//!
//! The heart of the crate is the type-assignment subsystem in [`jvm::assign`]:
//! given a source and a target type, an assigner decides whether a value of
//! the source type can occupy a stack slot of the target type and hands back
//! the [`jvm::code::StackManipulation`] that makes the conversion legal (or
//! the illegal marker if no conversion exists). Everything that writes method
//! bodies funnels through that decision.

pub mod jvm;
pub mod util;

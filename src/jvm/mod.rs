//! Type-driven JVM bytecode conversions
//!
//! ### Simple example
//!
//! Suppose a value of static type `java/lang/Object` must end up in a slot
//! typed as some class of ours. Statically that assignment is unprovable, but
//! a caller willing to rely on the runtime check can ask for it with
//! [`assign::Typing::Dynamic`] and gets back the `checkcast` sequence:
//!
//! ```
//! use classforge::jvm::assign::*;
//! use classforge::jvm::class_graph::*;
//! use classforge::jvm::code::*;
//! use classforge::jvm::*;
//!
//! # fn convert() -> Result<(), Error> {
//! // Setup the class graph, add in Java standard library types
//! let class_graph_arenas = ClassGraphArenas::new();
//! let class_graph = ClassGraph::new(&class_graph_arenas);
//! let java = class_graph.insert_java_library_types();
//!
//! // Declare our own class in the graph
//! let widget = class_graph.add_class(ClassData::new(
//!     BinaryName::from_string(String::from("me/alec/Widget")).unwrap(),
//!     java.object,
//!     ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
//! ));
//!
//! let assigner = PrimitiveAware {
//!     reference_assigner: ReferenceTypeAware,
//! };
//!
//! // Widening into a supertype slot needs no instructions at all
//! let widening = assigner.assign(
//!     FieldType::object(widget),
//!     FieldType::object(java.object),
//!     Typing::Static,
//! );
//! assert_eq!(widening, StackManipulation::Trivial);
//!
//! // Going the other way needs permission, and costs a `checkcast`
//! let narrowing = assigner.assign(
//!     FieldType::object(java.object),
//!     FieldType::object(widget),
//!     Typing::Dynamic,
//! );
//! assert!(narrowing.is_valid());
//!
//! let mut instructions: Vec<Instruction> = vec![];
//! let size = narrowing.apply(&mut instructions)?;
//! assert_eq!(size, Size::ZERO);
//! assert_eq!(instructions, vec![Instruction::CheckCast(RefType::Object(widget))]);
//! # Ok(())
//! # }
//! # convert().unwrap();
//! ```

mod access_flags;
pub mod assign;
pub mod class_graph;
pub mod code;
pub mod constants;
mod descriptors;
mod errors;
mod names;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;

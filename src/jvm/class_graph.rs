use super::{BinaryName, ClassAccessFlags, Name, RefType, RenderDescriptor};
use elsa::map::FrozenMap;
use elsa::FrozenVec;
use std::collections::HashSet;
use std::fmt;
use std::fmt::Debug;
use typed_arena::Arena;

/// Backing storage for [`ClassGraph`]
///
/// Kept separate from the graph so that the graph can hand out references
/// tied to the arena lifetime instead of reference-counted pointers.
pub struct ClassGraphArenas<'g> {
    class_arena: Arena<ClassData<'g>>,
}

impl<'g> ClassGraphArenas<'g> {
    pub fn new() -> Self {
        ClassGraphArenas {
            class_arena: Arena::new(),
        }
    }
}

impl<'g> Default for ClassGraphArenas<'g> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks the subtyping relationships between the classes and interfaces the
/// toolkit knows about
///
/// This is the loader-independent type description that assignment decisions
/// are made against: a class here is just a name plus edges to its superclass
/// and interfaces, whether or not any real class file is around.
pub struct ClassGraph<'g> {
    arenas: &'g ClassGraphArenas<'g>,
    classes: FrozenMap<&'g BinaryName, &'g ClassData<'g>>,
}

impl<'g> ClassGraph<'g> {
    /// New empty graph
    pub fn new(arenas: &'g ClassGraphArenas<'g>) -> Self {
        ClassGraph {
            arenas,
            classes: FrozenMap::new(),
        }
    }

    /// Add a new class to the class graph
    pub fn add_class(&self, data: ClassData<'g>) -> &'g ClassData<'g> {
        let data = &*self.arenas.class_arena.alloc(data);
        self.classes.insert(&data.name, data);
        data
    }

    /// Look up a class by its binary name
    pub fn lookup_class(&'g self, name: &BinaryName) -> Option<&'g ClassData<'g>> {
        self.classes.get(name)
    }

    /// Add the standard library types the toolkit reasons about to the graph
    pub fn insert_java_library_types(&self) -> JavaClasses<'g> {
        JavaClasses::add_to_graph(self)
    }
}

/// Subtyping relationship between types
pub trait Assignable {
    /// Is the first type assignable to the second?
    fn is_assignable(&self, super_type: &Self) -> bool;
}

/// This does a traversal of super types in the class graph to determine assignability
impl<'g> Assignable for &'g ClassData<'g> {
    fn is_assignable(&self, super_type: &&'g ClassData<'g>) -> bool {
        let mut supertypes_to_visit: Vec<&ClassData<'g>> = vec![self];
        let mut dont_revisit: HashSet<&BinaryName> = HashSet::new();
        dont_revisit.insert(&self.name);

        // Optimization: if the super type is a class, then skip visiting interfaces
        let super_is_class: bool = !super_type.is_interface();

        while let Some(class_data) = supertypes_to_visit.pop() {
            if class_data.name == super_type.name {
                return true;
            }

            // Enqueue next types to visit
            if let Some(superclass) = class_data.superclass {
                if dont_revisit.insert(&superclass.name) {
                    supertypes_to_visit.push(superclass);
                }
            }
            if !super_is_class {
                for interface in class_data.interfaces.iter() {
                    if dont_revisit.insert(&interface.name) {
                        supertypes_to_visit.push(interface);
                    }
                }
            }
        }

        false
    }
}

/// This matches the semantics of the prolog predicate `isJavaAssignable(sub_type, super_type)` in
/// the JVM verifier specification.
impl<'g> Assignable for RefType<&'g ClassData<'g>> {
    fn is_assignable(&self, super_type: &RefType<&'g ClassData<'g>>) -> bool {
        match (self, super_type) {
            // Special superclass and interfaces of all arrays
            (
                RefType::PrimitiveArray(_) | RefType::ObjectArray(_),
                RefType::Object(object_type),
            ) => is_array_type_assignable(&object_type.name),

            // Primitive arrays must match in dimension and type
            (RefType::PrimitiveArray(arr1), RefType::PrimitiveArray(arr2)) => arr1 == arr2,

            // Higher dimensional primitive arrays can be subtypes of object arrays
            (RefType::PrimitiveArray(arr1), RefType::ObjectArray(arr2)) => {
                arr1.additional_dimensions > arr2.additional_dimensions
                    && is_array_type_assignable(&arr2.element_type.name)
            }

            // Cursed (unsound) covariance of arrays
            (RefType::ObjectArray(arr1), RefType::ObjectArray(arr2)) => {
                if arr1.additional_dimensions < arr2.additional_dimensions {
                    false
                } else if arr1.additional_dimensions == arr2.additional_dimensions {
                    arr1.element_type.is_assignable(&arr2.element_type)
                } else {
                    is_array_type_assignable(&arr2.element_type.name)
                }
            }

            // Object-to-object assignability holds if there is a path through super type edges
            (RefType::Object(cls1), RefType::Object(cls2)) => cls1.is_assignable(cls2),

            _ => false,
        }
    }
}

/// Check if arrays can be assigned to a super type
///
/// This bakes in knowledge of the small, finite set of super types arrays have.
fn is_array_type_assignable(super_type: &BinaryName) -> bool {
    super_type == &BinaryName::OBJECT
        || super_type == &BinaryName::CLONEABLE
        || super_type == &BinaryName::SERIALIZABLE
}

pub struct ClassData<'g> {
    /// Name of the class
    pub name: BinaryName,

    /// Superclass is only ever missing for `java/lang/Object` itself
    pub superclass: Option<&'g ClassData<'g>>,

    /// Interfaces implemented (or super-interfaces)
    pub interfaces: FrozenVec<&'g ClassData<'g>>,

    /// Access flags of the class
    pub access_flags: ClassAccessFlags,
}

impl<'g> ClassData<'g> {
    pub fn new(
        name: BinaryName,
        superclass: &'g ClassData<'g>,
        access_flags: ClassAccessFlags,
    ) -> ClassData<'g> {
        ClassData {
            name,
            superclass: Some(superclass),
            interfaces: FrozenVec::new(),
            access_flags,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }
}

/// Equality of classes is nominal
impl<'g> PartialEq for ClassData<'g> {
    fn eq(&self, other: &ClassData<'g>) -> bool {
        self.name == other.name
    }
}

impl<'g> Eq for ClassData<'g> {}

impl<'g> RenderDescriptor for ClassData<'g> {
    fn render_to(&self, write_to: &mut String) {
        self.name.render_to(write_to)
    }
}

impl<'a, 'g> RenderDescriptor for &'a ClassData<'g> {
    fn render_to(&self, write_to: &mut String) {
        self.name.render_to(write_to)
    }
}

impl<'g> Debug for ClassData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}

/// References to the standard library types that assignment logic needs
///
/// The superclass and interface edges registered here mirror the real JDK
/// hierarchy, so subtyping questions about these classes come out the same as
/// they would against loaded classes.
pub struct JavaClasses<'g> {
    pub object: &'g ClassData<'g>,
    pub cloneable: &'g ClassData<'g>,
    pub serializable: &'g ClassData<'g>,
    pub char_sequence: &'g ClassData<'g>,
    pub string: &'g ClassData<'g>,
    pub number: &'g ClassData<'g>,
    pub byte: &'g ClassData<'g>,
    pub short: &'g ClassData<'g>,
    pub character: &'g ClassData<'g>,
    pub integer: &'g ClassData<'g>,
    pub long: &'g ClassData<'g>,
    pub float: &'g ClassData<'g>,
    pub double: &'g ClassData<'g>,
    pub boolean: &'g ClassData<'g>,
    pub void: &'g ClassData<'g>,
    pub throwable: &'g ClassData<'g>,
    pub exception: &'g ClassData<'g>,
    pub runtime_exception: &'g ClassData<'g>,
    pub class_cast_exception: &'g ClassData<'g>,
}

impl<'g> JavaClasses<'g> {
    fn add_to_graph(class_graph: &ClassGraph<'g>) -> JavaClasses<'g> {
        use ClassAccessFlags as Flags;

        let public_class = Flags::PUBLIC | Flags::SUPER;
        let public_final = public_class | Flags::FINAL;
        let public_interface = Flags::PUBLIC | Flags::INTERFACE | Flags::ABSTRACT;

        let object = class_graph.add_class(ClassData {
            name: BinaryName::OBJECT,
            superclass: None,
            interfaces: FrozenVec::new(),
            access_flags: public_class,
        });

        let cloneable =
            class_graph.add_class(ClassData::new(BinaryName::CLONEABLE, object, public_interface));
        let serializable = class_graph.add_class(ClassData::new(
            BinaryName::SERIALIZABLE,
            object,
            public_interface,
        ));
        let char_sequence = class_graph.add_class(ClassData::new(
            BinaryName::CHARSEQUENCE,
            object,
            public_interface,
        ));
        let string =
            class_graph.add_class(ClassData::new(BinaryName::STRING, object, public_final));
        let number =
            class_graph.add_class(ClassData::new(BinaryName::NUMBER, object, public_class | Flags::ABSTRACT));
        let byte = class_graph.add_class(ClassData::new(BinaryName::BYTE, number, public_final));
        let short = class_graph.add_class(ClassData::new(BinaryName::SHORT, number, public_final));
        let character =
            class_graph.add_class(ClassData::new(BinaryName::CHARACTER, object, public_final));
        let integer =
            class_graph.add_class(ClassData::new(BinaryName::INTEGER, number, public_final));
        let long = class_graph.add_class(ClassData::new(BinaryName::LONG, number, public_final));
        let float = class_graph.add_class(ClassData::new(BinaryName::FLOAT, number, public_final));
        let double =
            class_graph.add_class(ClassData::new(BinaryName::DOUBLE, number, public_final));
        let boolean =
            class_graph.add_class(ClassData::new(BinaryName::BOOLEAN, object, public_final));
        let void = class_graph.add_class(ClassData::new(BinaryName::VOID, object, public_final));
        let throwable =
            class_graph.add_class(ClassData::new(BinaryName::THROWABLE, object, public_class));
        let exception =
            class_graph.add_class(ClassData::new(BinaryName::EXCEPTION, throwable, public_class));
        let runtime_exception = class_graph.add_class(ClassData::new(
            BinaryName::RUNTIMEEXCEPTION,
            exception,
            public_class,
        ));
        let class_cast_exception = class_graph.add_class(ClassData::new(
            BinaryName::CLASSCASTEXCEPTION,
            runtime_exception,
            public_class,
        ));

        string.interfaces.push(char_sequence);
        string.interfaces.push(serializable);

        JavaClasses {
            object,
            cloneable,
            serializable,
            char_sequence,
            string,
            number,
            byte,
            short,
            character,
            integer,
            long,
            float,
            double,
            boolean,
            void,
            throwable,
            exception,
            runtime_exception,
            class_cast_exception,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::FieldType;

    #[test]
    fn simple_classes() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let object_cls = &java.object;
        let string_cls = &java.string;

        assert!(
            object_cls.is_assignable(object_cls),
            "java.lang.Object <: java.lang.Object"
        );
        assert!(
            string_cls.is_assignable(string_cls),
            "java.lang.String <: java.lang.String"
        );
        assert!(
            string_cls.is_assignable(object_cls),
            "java.lang.String <: java.lang.Object"
        );
        assert!(
            !object_cls.is_assignable(string_cls),
            "java.lang.Object </: java.lang.String"
        );
    }

    #[test]
    fn transitive_classes() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let object_cls = &java.object;
        let number_cls = &java.number;
        let integer_cls = &java.integer;

        assert!(
            number_cls.is_assignable(object_cls),
            "java.lang.Number <: java.lang.Object"
        );
        assert!(
            integer_cls.is_assignable(number_cls),
            "java.lang.Integer <: java.lang.Number"
        );
        assert!(
            integer_cls.is_assignable(object_cls),
            "java.lang.Integer <: java.lang.Object"
        );
        assert!(
            !object_cls.is_assignable(number_cls),
            "java.lang.Object </: java.lang.Number"
        );
        assert!(
            !number_cls.is_assignable(integer_cls),
            "java.lang.Number </: java.lang.Integer"
        );
    }

    #[test]
    fn simple_interfaces() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let object_cls = &java.object;
        let string_cls = &java.string;
        let charsequence_cls = &java.char_sequence;

        assert!(
            string_cls.is_assignable(charsequence_cls),
            "java.lang.String <: java.lang.CharSequence"
        );
        assert!(
            charsequence_cls.is_assignable(object_cls),
            "java.lang.CharSequence <: java.lang.Object"
        );
        assert!(
            !charsequence_cls.is_assignable(string_cls),
            "java.lang.CharSequence </: java.lang.String"
        );
        assert!(
            !object_cls.is_assignable(charsequence_cls),
            "java.lang.Object </: java.lang.CharSequence"
        );
    }

    #[test]
    fn arrays() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let object_cls = &RefType::Object(java.object);
        let cloneable_cls = &RefType::Object(java.cloneable);
        let int_array = &RefType::array(FieldType::int());
        let long_array = &RefType::array(FieldType::long());
        let integer_array = &RefType::array(FieldType::object(java.integer));
        let number_array = &RefType::array(FieldType::object(java.number));

        assert!(
            int_array.is_assignable(object_cls),
            "[]int <: java.lang.Object"
        );
        assert!(
            int_array.is_assignable(cloneable_cls),
            "[]int <: java.lang.Cloneable"
        );
        assert!(
            !object_cls.is_assignable(int_array),
            "java.lang.Object </: []int"
        );
        assert!(!int_array.is_assignable(long_array), "[]int </: []long");

        assert!(
            integer_array.is_assignable(number_array),
            "[]java.lang.Integer <: []java.lang.Number"
        );
        assert!(
            !number_array.is_assignable(integer_array),
            "[]java.lang.Number </: []java.lang.Integer"
        );
        assert!(
            !int_array.is_assignable(integer_array),
            "[]int </: []java.lang.Integer"
        );
    }

    #[test]
    fn nested_arrays() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let object_array = &RefType::array(FieldType::object(java.object));
        let nested_int_array = &RefType::array(FieldType::array(FieldType::int()));
        let nested_integer_array =
            &RefType::array(FieldType::array(FieldType::object(java.integer)));
        let nested_number_array = &RefType::array(FieldType::array(FieldType::object(java.number)));

        assert!(
            nested_int_array.is_assignable(object_array),
            "[][]int <: []java.lang.Object"
        );
        assert!(
            nested_integer_array.is_assignable(object_array),
            "[][]java.lang.Integer <: []java.lang.Object"
        );
        assert!(
            nested_integer_array.is_assignable(nested_number_array),
            "[][]java.lang.Integer <: [][]java.lang.Number"
        );
        assert!(
            !object_array.is_assignable(nested_int_array),
            "[]java.lang.Object </: [][]int"
        );
        assert!(
            !nested_number_array.is_assignable(nested_integer_array),
            "[][]java.lang.Number </: [][]java.lang.Integer"
        );
    }
}

use super::class_graph::ClassData;
use super::{Error, Name, RefType, RenderDescriptor};
use byteorder::{BigEndian, WriteBytesExt};
use std::collections::HashMap;

/// Index into the constant pool
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ConstantIndex(pub u16);

/// Index into the constant pool of a `Utf8` constant
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Utf8ConstantIndex(pub ConstantIndex);

/// Index into the constant pool of a `Class` constant
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ClassConstantIndex(pub ConstantIndex);

/// Constants as in the constant pool
///
/// Only the entries the code-emission layer needs are modelled: class
/// references (for `checkcast` operands) and the UTF-8 names they point to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    /// Encoded as modified UTF-8, though the names we intern never hit the
    /// cases where that differs from regular UTF-8
    Utf8(String),
    Class(Utf8ConstantIndex),
}

impl Constant {
    pub fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Constant::Utf8(string) => {
                writer.write_u8(1)?;
                writer.write_u16::<BigEndian>(string.len() as u16)?;
                writer.write_all(string.as_bytes())?;
            }
            Constant::Class(Utf8ConstantIndex(ConstantIndex(idx))) => {
                writer.write_u8(7)?;
                writer.write_u16::<BigEndian>(*idx)?;
            }
        }
        Ok(())
    }
}

/// Class file constants pool builder
///
/// The pool is append only and deduplicating: interning the same name twice
/// hands back the index assigned the first time. Indexing starts at 1 and the
/// largest valid index is 65535.
pub struct ConstantsPool {
    constants: Vec<Constant>,
    utf8s: HashMap<String, Utf8ConstantIndex>,
    classes: HashMap<String, ClassConstantIndex>,
}

impl ConstantsPool {
    /// Make a fresh empty constants pool
    pub fn new() -> ConstantsPool {
        ConstantsPool {
            constants: vec![],
            utf8s: HashMap::new(),
            classes: HashMap::new(),
        }
    }

    /// Push a constant into the constant pool, provided there is space for it
    fn push_constant(&mut self, constant: Constant) -> Result<ConstantIndex, Error> {
        let offset = self.constants.len() + 1;
        match u16::try_from(offset) {
            Ok(offset) => {
                self.constants.push(constant);
                Ok(ConstantIndex(offset))
            }
            Err(_) => Err(Error::ConstantPoolOverflow {
                constant,
                offset: u16::MAX,
            }),
        }
    }

    /// Get or insert a utf8 constant from the constant pool
    pub fn get_utf8(&mut self, utf8: &str) -> Result<Utf8ConstantIndex, Error> {
        if let Some(idx) = self.utf8s.get(utf8) {
            Ok(*idx)
        } else {
            let idx = Utf8ConstantIndex(self.push_constant(Constant::Utf8(utf8.to_owned()))?);
            self.utf8s.insert(utf8.to_owned(), idx);
            Ok(idx)
        }
    }

    /// Get or insert a class constant from the constant pool
    ///
    /// Class constants name object types by their internal binary name, but
    /// array types by their full field descriptor.
    pub fn get_class<'g>(
        &mut self,
        class: &RefType<&'g ClassData<'g>>,
    ) -> Result<ClassConstantIndex, Error> {
        let name = match class {
            RefType::Object(cls) => cls.name.as_str().to_owned(),
            RefType::ObjectArray(_) | RefType::PrimitiveArray(_) => class.render(),
        };

        if let Some(idx) = self.classes.get(&name) {
            Ok(*idx)
        } else {
            let utf8 = self.get_utf8(&name)?;
            let idx = ClassConstantIndex(self.push_constant(Constant::Class(utf8))?);
            self.classes.insert(name, idx);
            Ok(idx)
        }
    }

    /// Consume the pool and return the final vector of constants
    pub fn into_constants(self) -> Vec<Constant> {
        self.constants
    }
}

impl Default for ConstantsPool {
    fn default() -> Self {
        Self::new()
    }
}

//! The slice of the JVM instruction set that conversion and binding code
//! emits. Instructions are kept symbolic (class operands are references into
//! the class graph) until they are written out, at which point `checkcast`
//! operands get interned into a constant pool.

use crate::jvm::class_graph::ClassData;
use crate::jvm::constants::{ClassConstantIndex, ConstantIndex, ConstantsPool};
use crate::jvm::{Error, RefType};
use byteorder::{BigEndian, WriteBytesExt};

/// Non-branching JVM bytecode instruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction<'g> {
    ILoad(u16), // covers `iload`, `iload_{0,3}`, and `wide iload`
    LLoad(u16),
    FLoad(u16),
    DLoad(u16),
    ALoad(u16),
    I2L,
    I2F,
    I2D,
    L2F,
    L2D,
    F2D,
    CheckCast(RefType<&'g ClassData<'g>>),
}

impl<'g> Instruction<'g> {
    /// Write the instruction out as bytecode
    ///
    /// Symbolic class operands are interned in the constants pool.
    pub fn serialize<W: WriteBytesExt>(
        &self,
        constants: &mut ConstantsPool,
        writer: &mut W,
    ) -> Result<(), Error> {
        /* The load instructions follow the same pattern:
         *
         *   - short form (0-3) have special bytes
         *   - normal form (0-255) use `iload` plus a byte operand
         *   - wide form (256-65535) use `wide iload` plus two byte operands
         */
        fn serialize_load<W: WriteBytesExt>(
            idx: u16,
            short_form_start: u8,
            normal_form: u8,
            writer: &mut W,
        ) -> std::io::Result<()> {
            match u8::try_from(idx) {
                Ok(n @ 0..=3) => writer.write_u8(short_form_start + n),
                Ok(n) => {
                    writer.write_u8(normal_form)?;
                    writer.write_u8(n)
                }
                Err(_) => {
                    writer.write_u8(0xC4)?;
                    writer.write_u8(normal_form)?;
                    writer.write_u16::<BigEndian>(idx)
                }
            }
        }

        match self {
            Instruction::ILoad(idx) => serialize_load(*idx, 0x1A, 0x15, writer)?,
            Instruction::LLoad(idx) => serialize_load(*idx, 0x1E, 0x16, writer)?,
            Instruction::FLoad(idx) => serialize_load(*idx, 0x22, 0x17, writer)?,
            Instruction::DLoad(idx) => serialize_load(*idx, 0x26, 0x18, writer)?,
            Instruction::ALoad(idx) => serialize_load(*idx, 0x2A, 0x19, writer)?,
            Instruction::I2L => writer.write_u8(0x85)?,
            Instruction::I2F => writer.write_u8(0x86)?,
            Instruction::I2D => writer.write_u8(0x87)?,
            Instruction::L2F => writer.write_u8(0x89)?,
            Instruction::L2D => writer.write_u8(0x8A)?,
            Instruction::F2D => writer.write_u8(0x8D)?,
            Instruction::CheckCast(class) => {
                let ClassConstantIndex(ConstantIndex(idx)) = constants.get_class(class)?;
                writer.write_u8(0xC0)?;
                writer.write_u16::<BigEndian>(idx)?;
            }
        }
        Ok(())
    }
}

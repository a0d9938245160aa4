use super::Instruction;
use crate::jvm::constants::ConstantsPool;
use crate::jvm::Error;
use byteorder::WriteBytesExt;

/// Mutable target that stack manipulations write their instructions into
///
/// Sinks are not thread safe; concurrent generation of different method
/// bodies must use one sink per body.
pub trait InstructionSink<'g> {
    fn emit(&mut self, insn: Instruction<'g>) -> Result<(), Error>;
}

/// Recording sink, useful for inspecting what a manipulation would emit
impl<'g> InstructionSink<'g> for Vec<Instruction<'g>> {
    fn emit(&mut self, insn: Instruction<'g>) -> Result<(), Error> {
        self.push(insn);
        Ok(())
    }
}

/// Sink that writes bytecode out directly, interning class operands into a
/// constants pool as it goes
pub struct BytecodeWriter<'a, W> {
    pub constants: &'a mut ConstantsPool,
    pub writer: W,
}

impl<'a, 'g, W: WriteBytesExt> InstructionSink<'g> for BytecodeWriter<'a, W> {
    fn emit(&mut self, insn: Instruction<'g>) -> Result<(), Error> {
        insn.serialize(self.constants, &mut self.writer)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink: Vec<Instruction> = vec![];
        sink.emit(Instruction::ILoad(1)).unwrap();
        sink.emit(Instruction::I2L).unwrap();
        assert_eq!(sink, vec![Instruction::ILoad(1), Instruction::I2L]);
    }

    #[test]
    fn bytecode_writer_writes_bytes() {
        let mut constants = ConstantsPool::new();
        let mut buffer: Vec<u8> = vec![];
        let mut sink = BytecodeWriter {
            constants: &mut constants,
            writer: &mut buffer,
        };

        sink.emit(Instruction::ILoad(1)).unwrap();
        sink.emit(Instruction::I2D).unwrap();

        assert_eq!(buffer, vec![0x1B, 0x87]);
    }
}

/// Elements with a word width (eg. stack operands and local variables)
///
/// The JVM gives `long` and `double` values two slots everywhere slots are
/// counted: on the operand stack, in the local variable array, and in method
/// parameter lengths. Everything else gets one slot.
pub trait Width {
    fn width(&self) -> usize;
}

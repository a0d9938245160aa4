use super::constants::Constant;

#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),

    /// The constant pool has no room left for a constant
    ConstantPoolOverflow {
        constant: Constant,
        offset: u16,
    },

    /// An illegal stack manipulation was applied
    ///
    /// Callers must check `is_valid` before applying a manipulation; reaching
    /// this error means a type-assignment failure went unchecked earlier.
    IllegalStackManipulation,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

use thiserror::Error;

/// Errors raised while reading or writing a class file.
#[derive(Debug, Error)]
pub enum ClassFileError {
    #[error("unexpected end of class file at offset {offset} (needed {needed} more bytes)")]
    Truncated { offset: usize, needed: usize },

    #[error("bad magic 0x{0:08x}, expected 0xcafebabe")]
    BadMagic(u32),

    #[error("{0} bytes of trailing data after the class file")]
    TrailingData(usize),

    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { tag: u8, index: u16 },

    #[error("constant pool index {0} is out of range or unusable")]
    BadConstantIndex(u16),

    #[error("long or double constant at index {0} does not fit in the constant pool")]
    WideConstantOverflow(u16),

    #[error("constant pool entry {index} is not a {expected}")]
    UnexpectedConstant { index: u16, expected: &'static str },

    #[error("invalid modified UTF-8 at byte {0}")]
    InvalidModifiedUtf8(usize),

    #[error("invalid descriptor `{0}`")]
    InvalidDescriptor(String),

    #[error("constant pool overflow: more than 65534 entries")]
    ConstantPoolOverflow,

    #[error("string is {0} bytes in modified UTF-8, the limit is 65535")]
    StringTooLong(usize),

    #[error("{what} exceeds the class file limit of {limit}")]
    LimitExceeded { what: &'static str, limit: usize },

    #[error("operand stack underflow at `{0}`")]
    StackUnderflow(&'static str),
}

pub type Result<T> = std::result::Result<T, ClassFileError>;

//! Stubgen Class File
//!
//! Reading and writing of JVM class files, limited to what stub generation needs.
//!
//! # Features
//!
//! - **Constant pool**: deduplicating builder for the entries emitted code references
//! - **Descriptors**: parse and render field/method descriptors and Java type names
//! - **Code**: straight-line bytecode builder that tracks max stack and max locals
//! - **Writer / reader**: serialize a class, and parse any well-formed class file back
//!
//! # Example
//!
//! ```ignore
//! use stubgen_classfile::{AccessFlags, ClassWriter, MethodDescriptor, JAVA_8};
//!
//! let mut writer = ClassWriter::new(
//!     JAVA_8,
//!     AccessFlags::PUBLIC | AccessFlags::SUPER,
//!     "org/example/Empty",
//!     Some("java/lang/Object"),
//!     &[],
//! )?;
//! writer.method_with_code(AccessFlags::PUBLIC, "<init>", &MethodDescriptor::void(), &[], |code| {
//!     code.aload(0)?
//!         .invokespecial("java/lang/Object", "<init>", &MethodDescriptor::void())?
//!         .return_void()?;
//!     Ok(())
//! })?;
//! let bytes = writer.to_bytes()?;
//! ```

pub mod access;
pub mod code;
pub mod constant_pool;
pub mod descriptor;
pub mod error;
pub mod mutf8;
pub mod reader;
pub mod writer;

pub use access::AccessFlags;
pub use code::{decode_instructions, Code, CodeBuilder, Instruction};
pub use constant_pool::ConstantPool;
pub use descriptor::{FieldType, MethodDescriptor};
pub use error::{ClassFileError, Result};
pub use reader::{ClassFile, CodeAttribute, Constant, FieldInfo, MethodInfo};
pub use writer::{ClassVersion, ClassWriter, JAVA_8};

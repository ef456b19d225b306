//! Stubgen Core
//!
//! Synthesizes placeholder ("dummy") classes for interfaces whose instances are read before
//! static initialization has filled them in. Every instance method of a generated class
//! throws the configured exception with a message naming the method, so a premature read
//! fails loudly instead of misbehaving.
//!
//! # Features
//!
//! - **Class path**: resolve types from class directories, in-memory class files, and a
//!   built-in table of core JDK throwables
//! - **Reflection**: enumerate the methods an interface exposes, described like
//!   `java.lang.reflect.Method.toString()`
//! - **Generator**: validate inputs and emit a Java 8 class file
//! - **Provider**: derive generated class names within a package
//!
//! # Example
//!
//! ```ignore
//! use stubgen_core::{ClassPath, DummyClassGenerator};
//!
//! let mut class_path = ClassPath::new();
//! class_path.add_directory("build/classes");
//!
//! let class = DummyClassGenerator::new(&class_path).create_class(
//!     "org.example.CatalogEntry",
//!     "org.example.dummy.DummyCatalogEntry",
//!     "java.lang.UnsupportedOperationException",
//! )?;
//! std::fs::write(class.relative_path(), class.bytes())?;
//! ```

pub mod bootstrap;
pub mod class_path;
pub mod env_utils;
pub mod error;
pub mod generator;
pub mod provider;
pub mod reflect;

pub use class_path::{ClassPath, ClassSource, DirectorySource, MemorySource, TypeHandle};
pub use error::{ErrorKind, Result, SynthesisError};
pub use generator::{
    DummyClassGenerator, GeneratedClass, GenerationRequest, CLASS_VERSION, DUMMY_MESSAGE_PREFIX,
};
pub use provider::{dummy_class_name, DummyClassProvider};
pub use reflect::Method;

//! Catalog Stubgen
//!
//! Command-line front end for generating dummy classes:
//!
//! - **Generation**: see [`stubgen_core`] for the generator and class path
//! - **Class files**: see [`stubgen_classfile`] for reading and writing
//! - **Batches**: [`manifest`] loads JSON manifests and writes generated classes to disk

pub mod manifest;

pub use stubgen_classfile;
pub use stubgen_core;

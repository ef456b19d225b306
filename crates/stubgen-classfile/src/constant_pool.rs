//! Constant pool builder used by the writer.

use std::collections::HashMap;

use crate::error::{ClassFileError, Result};
use crate::mutf8;

/// Constant pool tags (JVMS 4.4).
pub mod tag {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELDREF: u8 = 9;
    pub const METHODREF: u8 = 10;
    pub const INTERFACE_METHODREF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const DYNAMIC: u8 = 17;
    pub const INVOKE_DYNAMIC: u8 = 18;
    pub const MODULE: u8 = 19;
    pub const PACKAGE: u8 = 20;
}

const MAX_UTF8_LEN: usize = u16::MAX as usize;
// constant_pool_count is a u16 and index 0 is reserved
const MAX_ENTRIES: usize = u16::MAX as usize - 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Entry {
    Utf8(String),
    Class(u16),
    String(u16),
    NameAndType(u16, u16),
    Methodref(u16, u16),
}

/// Deduplicating constant pool. Equal entries always share one index.
#[derive(Debug, Default)]
pub struct ConstantPool {
    entries: Vec<Entry>,
    index: HashMap<Entry, u16>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, not counting the reserved index 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn utf8(&mut self, value: &str) -> Result<u16> {
        let len = mutf8::encoded_len(value);
        if len > MAX_UTF8_LEN {
            return Err(ClassFileError::StringTooLong(len));
        }
        self.insert(Entry::Utf8(value.to_string()))
    }

    pub fn class(&mut self, internal_name: &str) -> Result<u16> {
        let name = self.utf8(internal_name)?;
        self.insert(Entry::Class(name))
    }

    pub fn string(&mut self, value: &str) -> Result<u16> {
        let utf8 = self.utf8(value)?;
        self.insert(Entry::String(utf8))
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> Result<u16> {
        let name = self.utf8(name)?;
        let descriptor = self.utf8(descriptor)?;
        self.insert(Entry::NameAndType(name, descriptor))
    }

    pub fn methodref(&mut self, class: &str, name: &str, descriptor: &str) -> Result<u16> {
        let class = self.class(class)?;
        let nat = self.name_and_type(name, descriptor)?;
        self.insert(Entry::Methodref(class, nat))
    }

    fn insert(&mut self, entry: Entry) -> Result<u16> {
        if let Some(&idx) = self.index.get(&entry) {
            return Ok(idx);
        }
        if self.entries.len() >= MAX_ENTRIES {
            return Err(ClassFileError::ConstantPoolOverflow);
        }
        self.entries.push(entry.clone());
        let idx = self.entries.len() as u16;
        self.index.insert(entry, idx);
        Ok(idx)
    }

    /// Append `constant_pool_count` followed by every entry.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&((self.entries.len() + 1) as u16).to_be_bytes());
        for entry in &self.entries {
            match entry {
                Entry::Utf8(value) => {
                    let bytes = mutf8::encode(value);
                    out.push(tag::UTF8);
                    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
                    out.extend_from_slice(&bytes);
                }
                Entry::Class(name) => {
                    out.push(tag::CLASS);
                    out.extend_from_slice(&name.to_be_bytes());
                }
                Entry::String(utf8) => {
                    out.push(tag::STRING);
                    out.extend_from_slice(&utf8.to_be_bytes());
                }
                Entry::NameAndType(name, descriptor) => {
                    out.push(tag::NAME_AND_TYPE);
                    out.extend_from_slice(&name.to_be_bytes());
                    out.extend_from_slice(&descriptor.to_be_bytes());
                }
                Entry::Methodref(class, nat) => {
                    out.push(tag::METHODREF);
                    out.extend_from_slice(&class.to_be_bytes());
                    out.extend_from_slice(&nat.to_be_bytes());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_deduplicated() {
        let mut pool = ConstantPool::new();
        let a = pool.class("java/lang/Object").unwrap();
        let b = pool.class("java/lang/Object").unwrap();
        assert_eq!(a, b);
        // Utf8 + Class
        assert_eq!(pool.len(), 2);

        let m1 = pool.methodref("java/lang/Object", "<init>", "()V").unwrap();
        let m2 = pool.methodref("java/lang/Object", "<init>", "()V").unwrap();
        assert_eq!(m1, m2);
    }

    #[test]
    fn test_string_and_utf8_share_text() {
        let mut pool = ConstantPool::new();
        let utf8 = pool.utf8("hello").unwrap();
        let string = pool.string("hello").unwrap();
        assert_ne!(utf8, string);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_indices_start_at_one() {
        let mut pool = ConstantPool::new();
        assert_eq!(pool.utf8("a").unwrap(), 1);
        assert_eq!(pool.utf8("b").unwrap(), 2);

        let mut out = Vec::new();
        pool.write_to(&mut out);
        assert_eq!(&out[..2], &[0, 3]);
        assert_eq!(&out[2..6], &[tag::UTF8, 0, 1, b'a']);
    }

    #[test]
    fn test_rejects_oversized_strings() {
        let mut pool = ConstantPool::new();
        let huge = "x".repeat(70_000);
        assert!(matches!(
            pool.string(&huge),
            Err(ClassFileError::StringTooLong(70_000))
        ));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut pool = ConstantPool::new();
        for i in 0..MAX_ENTRIES {
            pool.utf8(&i.to_string()).unwrap();
        }
        assert!(matches!(
            pool.utf8("one too many"),
            Err(ClassFileError::ConstantPoolOverflow)
        ));
        // existing entries still resolve
        assert_eq!(pool.utf8("0").unwrap(), 1);
    }
}

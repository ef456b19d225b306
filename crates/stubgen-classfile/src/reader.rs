//! Class file parsing.
//!
//! The reader keeps the whole constant pool and resolves names eagerly for the class header
//! and its members. Attributes other than `Code` and `Exceptions` are skipped.

use crate::access::AccessFlags;
use crate::constant_pool::tag;
use crate::error::{ClassFileError, Result};
use crate::mutf8;
use crate::writer::{ClassVersion, MAGIC};

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Index 0 and the slot following a long or double.
    Unusable,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    Fieldref(u16, u16),
    Methodref(u16, u16),
    InterfaceMethodref(u16, u16),
    NameAndType(u16, u16),
    MethodHandle(u8, u16),
    MethodType(u16),
    Dynamic(u16, u16),
    InvokeDynamic(u16, u16),
    Module(u16),
    Package(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub access: AccessFlags,
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table_len: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub access: AccessFlags,
    pub name: String,
    pub descriptor: String,
    /// Internal names from the `Exceptions` attribute.
    pub exceptions: Vec<String>,
    pub code: Option<CodeAttribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub version: ClassVersion,
    pub constant_pool: Vec<Constant>,
    pub access: AccessFlags,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|end| *end <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(ClassFileError::Truncated {
                offset: self.pos,
                needed: n - (self.bytes.len() - self.pos),
            }),
        }
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self) -> Result<u64> {
        let hi = self.u32()? as u64;
        let lo = self.u32()? as u64;
        Ok((hi << 32) | lo)
    }
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut cur = Cursor { bytes, pos: 0 };

        let magic = cur.u32()?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic(magic));
        }
        let minor = cur.u16()?;
        let major = cur.u16()?;
        let constant_pool = parse_constant_pool(&mut cur)?;

        let mut class = ClassFile {
            version: ClassVersion { major, minor },
            constant_pool,
            access: AccessFlags(0),
            this_class: String::new(),
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        };

        class.access = AccessFlags(cur.u16()?);
        class.this_class = class.class_name(cur.u16()?)?.to_string();
        let super_idx = cur.u16()?;
        if super_idx != 0 {
            class.super_class = Some(class.class_name(super_idx)?.to_string());
        }

        let interface_count = cur.u16()?;
        for _ in 0..interface_count {
            let name = class.class_name(cur.u16()?)?.to_string();
            class.interfaces.push(name);
        }

        let field_count = cur.u16()?;
        for _ in 0..field_count {
            let access = AccessFlags(cur.u16()?);
            let name = class.utf8(cur.u16()?)?.to_string();
            let descriptor = class.utf8(cur.u16()?)?.to_string();
            skip_attributes(&mut cur)?;
            class.fields.push(FieldInfo {
                access,
                name,
                descriptor,
            });
        }

        let method_count = cur.u16()?;
        for _ in 0..method_count {
            let method = class.parse_method(&mut cur)?;
            class.methods.push(method);
        }

        skip_attributes(&mut cur)?;
        if cur.pos != bytes.len() {
            return Err(ClassFileError::TrailingData(bytes.len() - cur.pos));
        }
        Ok(class)
    }

    fn parse_method(&self, cur: &mut Cursor<'_>) -> Result<MethodInfo> {
        let access = AccessFlags(cur.u16()?);
        let name = self.utf8(cur.u16()?)?.to_string();
        let descriptor = self.utf8(cur.u16()?)?.to_string();
        let mut exceptions = Vec::new();
        let mut code = None;

        let attr_count = cur.u16()?;
        for _ in 0..attr_count {
            let attr_name = self.utf8(cur.u16()?)?;
            let len = cur.u32()? as usize;
            let body = cur.take(len)?;
            let mut attr = Cursor {
                bytes: body,
                pos: 0,
            };
            match attr_name {
                "Code" => {
                    let max_stack = attr.u16()?;
                    let max_locals = attr.u16()?;
                    let code_len = attr.u32()? as usize;
                    let bytes = attr.take(code_len)?.to_vec();
                    let exception_table_len = attr.u16()?;
                    attr.take(exception_table_len as usize * 8)?;
                    skip_attributes(&mut attr)?;
                    code = Some(CodeAttribute {
                        max_stack,
                        max_locals,
                        code: bytes,
                        exception_table_len,
                    });
                }
                "Exceptions" => {
                    let count = attr.u16()?;
                    for _ in 0..count {
                        exceptions.push(self.class_name(attr.u16()?)?.to_string());
                    }
                }
                _ => {}
            }
        }

        Ok(MethodInfo {
            access,
            name,
            descriptor,
            exceptions,
            code,
        })
    }

    pub fn constant(&self, idx: u16) -> Result<&Constant> {
        match self.constant_pool.get(idx as usize) {
            Some(Constant::Unusable) | None => Err(ClassFileError::BadConstantIndex(idx)),
            Some(constant) => Ok(constant),
        }
    }

    pub fn utf8(&self, idx: u16) -> Result<&str> {
        match self.constant(idx)? {
            Constant::Utf8(value) => Ok(value),
            _ => Err(ClassFileError::UnexpectedConstant {
                index: idx,
                expected: "Utf8",
            }),
        }
    }

    /// Internal name referenced by a `CONSTANT_Class` entry.
    pub fn class_name(&self, idx: u16) -> Result<&str> {
        match self.constant(idx)? {
            Constant::Class(name) => self.utf8(*name),
            _ => Err(ClassFileError::UnexpectedConstant {
                index: idx,
                expected: "Class",
            }),
        }
    }

    /// Text of a `CONSTANT_String` entry.
    pub fn string_constant(&self, idx: u16) -> Result<&str> {
        match self.constant(idx)? {
            Constant::String(utf8) => self.utf8(*utf8),
            _ => Err(ClassFileError::UnexpectedConstant {
                index: idx,
                expected: "String",
            }),
        }
    }

    /// `(class, name, descriptor)` of a field or method reference.
    pub fn member_ref(&self, idx: u16) -> Result<(&str, &str, &str)> {
        let (class, nat) = match self.constant(idx)? {
            Constant::Fieldref(c, n)
            | Constant::Methodref(c, n)
            | Constant::InterfaceMethodref(c, n) => (*c, *n),
            _ => {
                return Err(ClassFileError::UnexpectedConstant {
                    index: idx,
                    expected: "member reference",
                })
            }
        };
        let (name, descriptor) = match self.constant(nat)? {
            Constant::NameAndType(n, d) => (*n, *d),
            _ => {
                return Err(ClassFileError::UnexpectedConstant {
                    index: nat,
                    expected: "NameAndType",
                })
            }
        };
        Ok((self.class_name(class)?, self.utf8(name)?, self.utf8(descriptor)?))
    }

    pub fn is_interface(&self) -> bool {
        self.access.is_interface()
    }

    pub fn method(&self, name: &str, descriptor: &str) -> Option<&MethodInfo> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }
}

fn parse_constant_pool(cur: &mut Cursor<'_>) -> Result<Vec<Constant>> {
    let count = cur.u16()?;
    let mut pool = Vec::with_capacity(count as usize);
    pool.push(Constant::Unusable);

    let mut idx: u16 = 1;
    while idx < count {
        let tag = cur.u8()?;
        let constant = match tag {
            tag::UTF8 => {
                let len = cur.u16()? as usize;
                Constant::Utf8(mutf8::decode(cur.take(len)?)?)
            }
            tag::INTEGER => Constant::Integer(cur.u32()? as i32),
            tag::FLOAT => Constant::Float(f32::from_bits(cur.u32()?)),
            tag::LONG => Constant::Long(cur.u64()? as i64),
            tag::DOUBLE => Constant::Double(f64::from_bits(cur.u64()?)),
            tag::CLASS => Constant::Class(cur.u16()?),
            tag::STRING => Constant::String(cur.u16()?),
            tag::FIELDREF => Constant::Fieldref(cur.u16()?, cur.u16()?),
            tag::METHODREF => Constant::Methodref(cur.u16()?, cur.u16()?),
            tag::INTERFACE_METHODREF => Constant::InterfaceMethodref(cur.u16()?, cur.u16()?),
            tag::NAME_AND_TYPE => Constant::NameAndType(cur.u16()?, cur.u16()?),
            tag::METHOD_HANDLE => Constant::MethodHandle(cur.u8()?, cur.u16()?),
            tag::METHOD_TYPE => Constant::MethodType(cur.u16()?),
            tag::DYNAMIC => Constant::Dynamic(cur.u16()?, cur.u16()?),
            tag::INVOKE_DYNAMIC => Constant::InvokeDynamic(cur.u16()?, cur.u16()?),
            tag::MODULE => Constant::Module(cur.u16()?),
            tag::PACKAGE => Constant::Package(cur.u16()?),
            other => {
                return Err(ClassFileError::UnknownConstantTag {
                    tag: other,
                    index: idx,
                })
            }
        };
        let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
        // a wide constant also claims the next index, which must still be below count
        if wide && u32::from(idx) + 2 > u32::from(count) {
            return Err(ClassFileError::WideConstantOverflow(idx));
        }
        pool.push(constant);
        if wide {
            pool.push(Constant::Unusable);
            idx += 2;
        } else {
            idx += 1;
        }
    }
    Ok(pool)
}

fn skip_attributes(cur: &mut Cursor<'_>) -> Result<()> {
    let count = cur.u16()?;
    for _ in 0..count {
        cur.u16()?;
        let len = cur.u32()? as usize;
        cur.take(len)?;
    }
    Ok(())
}

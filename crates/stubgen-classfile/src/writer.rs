//! Class file serialization.

use crate::access::AccessFlags;
use crate::code::{Code, CodeBuilder};
use crate::constant_pool::ConstantPool;
use crate::descriptor::{MethodDescriptor, MAX_PARAM_SLOTS};
use crate::error::{ClassFileError, Result};

pub const MAGIC: u32 = 0xCAFE_BABE;

/// Class file format version (`major.minor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassVersion {
    pub major: u16,
    pub minor: u16,
}

/// Java 8, the oldest format that allows static and default interface methods.
pub const JAVA_8: ClassVersion = ClassVersion {
    major: 52,
    minor: 0,
};

impl std::fmt::Display for ClassVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

const MAX_COUNT: usize = u16::MAX as usize;

struct MethodEntry {
    access: AccessFlags,
    name: u16,
    descriptor: u16,
    code: Option<Code>,
    exceptions: Vec<u16>,
}

/// Builds one class. Methods are written in the order they are added.
pub struct ClassWriter {
    version: ClassVersion,
    access: AccessFlags,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    pool: ConstantPool,
    methods: Vec<MethodEntry>,
    code_attr: Option<u16>,
    exceptions_attr: Option<u16>,
}

impl ClassWriter {
    /// `super_name` is `None` only for `java/lang/Object` itself.
    pub fn new(
        version: ClassVersion,
        access: AccessFlags,
        name: &str,
        super_name: Option<&str>,
        interfaces: &[&str],
    ) -> Result<Self> {
        if interfaces.len() > MAX_COUNT {
            return Err(ClassFileError::LimitExceeded {
                what: "interface count",
                limit: MAX_COUNT,
            });
        }
        let mut pool = ConstantPool::new();
        let this_class = pool.class(name)?;
        let super_class = match super_name {
            Some(super_name) => pool.class(super_name)?,
            None => 0,
        };
        let interfaces = interfaces
            .iter()
            .map(|iface| pool.class(iface))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            version,
            access,
            this_class,
            super_class,
            interfaces,
            pool,
            methods: Vec::new(),
            code_attr: None,
            exceptions_attr: None,
        })
    }

    pub fn pool_mut(&mut self) -> &mut ConstantPool {
        &mut self.pool
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Add a method without a body (abstract or native).
    pub fn abstract_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &MethodDescriptor,
        exceptions: &[&str],
    ) -> Result<()> {
        self.push_method(access, name, descriptor, exceptions, None)
    }

    /// Add a method whose body is produced by `body`.
    ///
    /// Locals start out sized for the receiver (unless static) plus the arguments.
    pub fn method_with_code<F>(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &MethodDescriptor,
        exceptions: &[&str],
        body: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut CodeBuilder<'_>) -> Result<()>,
    {
        let locals = argument_slots(access, descriptor)?;
        let mut builder = CodeBuilder::new(&mut self.pool, locals);
        body(&mut builder)?;
        let code = builder.finish()?;
        if self.code_attr.is_none() {
            self.code_attr = Some(self.pool.utf8("Code")?);
        }
        self.push_method(access, name, descriptor, exceptions, Some(code))
    }

    fn push_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &MethodDescriptor,
        exceptions: &[&str],
        code: Option<Code>,
    ) -> Result<()> {
        argument_slots(access, descriptor)?;
        if self.methods.len() >= MAX_COUNT {
            return Err(ClassFileError::LimitExceeded {
                what: "method count",
                limit: MAX_COUNT,
            });
        }
        let name = self.pool.utf8(name)?;
        let descriptor = self.pool.utf8(&descriptor.to_string())?;
        let exceptions = exceptions
            .iter()
            .map(|exc| self.pool.class(exc))
            .collect::<Result<Vec<_>>>()?;
        if !exceptions.is_empty() && self.exceptions_attr.is_none() {
            self.exceptions_attr = Some(self.pool.utf8("Exceptions")?);
        }
        self.methods.push(MethodEntry {
            access,
            name,
            descriptor,
            code,
            exceptions,
        });
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(1024);
        out.extend_from_slice(&MAGIC.to_be_bytes());
        out.extend_from_slice(&self.version.minor.to_be_bytes());
        out.extend_from_slice(&self.version.major.to_be_bytes());
        self.pool.write_to(&mut out);
        out.extend_from_slice(&self.access.bits().to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());

        put_u16(&mut out, self.interfaces.len());
        for iface in &self.interfaces {
            out.extend_from_slice(&iface.to_be_bytes());
        }

        // fields_count
        put_u16(&mut out, 0);

        put_u16(&mut out, self.methods.len());
        for method in &self.methods {
            self.write_method(&mut out, method);
        }

        // attributes_count
        put_u16(&mut out, 0);
        Ok(out)
    }

    fn write_method(&self, out: &mut Vec<u8>, method: &MethodEntry) {
        out.extend_from_slice(&method.access.bits().to_be_bytes());
        out.extend_from_slice(&method.name.to_be_bytes());
        out.extend_from_slice(&method.descriptor.to_be_bytes());

        let attr_count = method.code.is_some() as usize + !method.exceptions.is_empty() as usize;
        put_u16(out, attr_count);

        if let (Some(code), Some(name)) = (&method.code, self.code_attr) {
            // max_stack + max_locals + code_length + code + exception_table_length + attributes_count
            let len = 2 + 2 + 4 + code.bytes.len() + 2 + 2;
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&(len as u32).to_be_bytes());
            out.extend_from_slice(&code.max_stack.to_be_bytes());
            out.extend_from_slice(&code.max_locals.to_be_bytes());
            out.extend_from_slice(&(code.bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(&code.bytes);
            put_u16(out, 0);
            put_u16(out, 0);
        }

        if let (false, Some(name)) = (method.exceptions.is_empty(), self.exceptions_attr) {
            let len = 2 + 2 * method.exceptions.len();
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&(len as u32).to_be_bytes());
            put_u16(out, method.exceptions.len());
            for exc in &method.exceptions {
                out.extend_from_slice(&exc.to_be_bytes());
            }
        }
    }
}

/// Receiver (unless static) plus argument slots, bounded by [`MAX_PARAM_SLOTS`].
fn argument_slots(access: AccessFlags, descriptor: &MethodDescriptor) -> Result<u16> {
    let receiver: u16 = if access.is_static() { 0 } else { 1 };
    let slots = u32::from(receiver) + u32::from(descriptor.param_slots());
    if slots > u32::from(MAX_PARAM_SLOTS) {
        return Err(ClassFileError::LimitExceeded {
            what: "method argument slots",
            limit: MAX_PARAM_SLOTS as usize,
        });
    }
    Ok(slots as u16)
}

fn put_u16(out: &mut Vec<u8>, value: usize) {
    out.extend_from_slice(&(value as u16).to_be_bytes());
}

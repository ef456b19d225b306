//! Field and method descriptors.
//!
//! Descriptors render back to exactly the string they were parsed from, so a parsed
//! [`MethodDescriptor`] can be written into a generated class unchanged.

use std::fmt;

use crate::error::{ClassFileError, Result};

const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Upper bound on the local slots a method's arguments may take, receiver included.
pub const MAX_PARAM_SLOTS: u16 = 255;

/// A JVM field type (`I`, `Ljava/lang/String;`, `[J`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    /// Reference to a class, by internal name (`java/lang/String`).
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn object(internal_name: impl Into<String>) -> Self {
        FieldType::Object(internal_name.into())
    }

    pub fn parse(descriptor: &str) -> Result<Self> {
        let (ty, rest) = parse_field_type(descriptor, descriptor)?;
        if !rest.is_empty() {
            return Err(invalid(descriptor));
        }
        Ok(ty)
    }

    /// Local variable / operand stack slots taken by a value of this type.
    pub fn slot_size(&self) -> u16 {
        match self {
            FieldType::Long | FieldType::Double => 2,
            _ => 1,
        }
    }

    /// The name Java reflection reports for this type, e.g. `java.lang.String[]`.
    ///
    /// Nested classes keep their binary `$` separator.
    pub fn java_name(&self) -> String {
        match self {
            FieldType::Byte => "byte".to_string(),
            FieldType::Char => "char".to_string(),
            FieldType::Double => "double".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Int => "int".to_string(),
            FieldType::Long => "long".to_string(),
            FieldType::Short => "short".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Object(name) => name.replace('/', "."),
            FieldType::Array(inner) => format!("{}[]", inner.java_name()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Byte => f.write_str("B"),
            FieldType::Char => f.write_str("C"),
            FieldType::Double => f.write_str("D"),
            FieldType::Float => f.write_str("F"),
            FieldType::Int => f.write_str("I"),
            FieldType::Long => f.write_str("J"),
            FieldType::Short => f.write_str("S"),
            FieldType::Boolean => f.write_str("Z"),
            FieldType::Object(name) => write!(f, "L{};", name),
            FieldType::Array(inner) => write!(f, "[{}", inner),
        }
    }
}

/// A method descriptor: parameter types and an optional (non-void) return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub ret: Option<FieldType>,
}

impl MethodDescriptor {
    pub fn new(params: Vec<FieldType>, ret: Option<FieldType>) -> Self {
        Self { params, ret }
    }

    /// `()V`
    pub fn void() -> Self {
        Self {
            params: Vec::new(),
            ret: None,
        }
    }

    pub fn parse(descriptor: &str) -> Result<Self> {
        let mut rest = descriptor
            .strip_prefix('(')
            .ok_or_else(|| invalid(descriptor))?;

        let mut params = Vec::new();
        let mut slots: u16 = 0;
        loop {
            if let Some(after) = rest.strip_prefix(')') {
                rest = after;
                break;
            }
            let (ty, after) = parse_field_type(rest, descriptor)?;
            slots += ty.slot_size();
            if slots > MAX_PARAM_SLOTS {
                return Err(invalid(descriptor));
            }
            params.push(ty);
            rest = after;
        }

        let ret = if rest == "V" {
            None
        } else {
            Some(FieldType::parse(rest).map_err(|_| invalid(descriptor))?)
        };

        Ok(Self { params, ret })
    }

    /// Slots the arguments occupy in the callee's locals (receiver excluded).
    /// Saturates at `u16::MAX` for descriptors built by hand past the class file limit.
    pub fn param_slots(&self) -> u16 {
        self.params
            .iter()
            .fold(0u16, |acc, ty| acc.saturating_add(ty.slot_size()))
    }

    pub fn return_slots(&self) -> u16 {
        self.ret.as_ref().map(FieldType::slot_size).unwrap_or(0)
    }

    pub fn return_java_name(&self) -> String {
        self.ret
            .as_ref()
            .map(FieldType::java_name)
            .unwrap_or_else(|| "void".to_string())
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.params {
            write!(f, "{}", param)?;
        }
        f.write_str(")")?;
        match &self.ret {
            Some(ret) => write!(f, "{}", ret),
            None => f.write_str("V"),
        }
    }
}

fn invalid(descriptor: &str) -> ClassFileError {
    ClassFileError::InvalidDescriptor(descriptor.to_string())
}

fn parse_field_type<'a>(input: &'a str, full: &str) -> Result<(FieldType, &'a str)> {
    let dimensions = input.bytes().take_while(|b| *b == b'[').count();
    if dimensions > MAX_ARRAY_DIMENSIONS {
        return Err(invalid(full));
    }
    let input = &input[dimensions..];

    let (mut ty, rest) = match input.as_bytes().first() {
        Some(b'B') => (FieldType::Byte, &input[1..]),
        Some(b'C') => (FieldType::Char, &input[1..]),
        Some(b'D') => (FieldType::Double, &input[1..]),
        Some(b'F') => (FieldType::Float, &input[1..]),
        Some(b'I') => (FieldType::Int, &input[1..]),
        Some(b'J') => (FieldType::Long, &input[1..]),
        Some(b'S') => (FieldType::Short, &input[1..]),
        Some(b'Z') => (FieldType::Boolean, &input[1..]),
        Some(b'L') => {
            let end = input.find(';').ok_or_else(|| invalid(full))?;
            let name = &input[1..end];
            if name.is_empty()
                || name.contains(|c: char| matches!(c, '.' | '[' | '<' | '>'))
                || name.split('/').any(str::is_empty)
            {
                return Err(invalid(full));
            }
            (FieldType::Object(name.to_string()), &input[end + 1..])
        }
        _ => return Err(invalid(full)),
    };

    for _ in 0..dimensions {
        ty = FieldType::Array(Box::new(ty));
    }
    Ok((ty, rest))
}

//! Interface method reflection.
//!
//! Enumeration follows what `Class.getMethods()` reports for an interface: public methods
//! declared on the interface itself, then public instance methods inherited from
//! superinterfaces. A (name, descriptor) pair is reported once, from the most specific
//! declaration. `java.lang.Object` members are never included.

use std::collections::HashSet;
use std::fmt;

use stubgen_classfile::{AccessFlags, MethodDescriptor};

use crate::class_path::{ClassPath, DeclaredMethod, TypeHandle};
use crate::error::{Result, SynthesisError};

/// Modifier bits that `Method.toString()` prints.
const METHOD_MODIFIERS: u16 = 0x0001 // public
    | 0x0002 // private
    | 0x0004 // protected
    | 0x0008 // static
    | 0x0010 // final
    | 0x0020 // synchronized
    | 0x0100 // native
    | 0x0400 // abstract
    | 0x0800; // strictfp

const ACCESS_MODIFIERS: u16 = 0x0001 | 0x0002 | 0x0004;

/// Printing order used by `java.lang.reflect.Modifier.toString`.
const MODIFIER_WORDS: &[(u16, &str)] = &[
    (0x0001, "public"),
    (0x0004, "protected"),
    (0x0002, "private"),
    (0x0400, "abstract"),
    (0x0008, "static"),
    (0x0010, "final"),
    (0x0020, "synchronized"),
    (0x0100, "native"),
    (0x0800, "strictfp"),
];

/// A method reachable from an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Internal name of the declaring type.
    pub declaring_class: String,
    pub declared_in_interface: bool,
    pub access: AccessFlags,
    pub name: String,
    pub descriptor: MethodDescriptor,
    /// Internal names of the declared checked exceptions.
    pub exceptions: Vec<String>,
}

impl Method {
    fn from_declared(owner: &TypeHandle, method: &DeclaredMethod) -> Self {
        Self {
            declaring_class: owner.name.clone(),
            declared_in_interface: owner.is_interface(),
            access: method.access,
            name: method.name.clone(),
            descriptor: method.descriptor.clone(),
            exceptions: method.exceptions.clone(),
        }
    }

    pub fn is_static(&self) -> bool {
        self.access.is_static()
    }

    /// A public, non-abstract instance method declared in an interface.
    pub fn is_default(&self) -> bool {
        self.declared_in_interface
            && self.access.is_public()
            && !self.access.is_abstract()
            && !self.access.is_static()
    }

    fn key(&self) -> (String, String) {
        (self.name.clone(), self.descriptor.to_string())
    }
}

/// Renders like `java.lang.reflect.Method.toString()`, e.g.
/// `public abstract java.lang.String org.example.Foo.foo() throws java.io.IOException`.
impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mods = self.access.bits() & METHOD_MODIFIERS;
        if mods != 0 && !self.is_default() {
            write_modifiers(f, mods)?;
        } else {
            write_modifiers(f, mods & ACCESS_MODIFIERS)?;
            if self.is_default() {
                f.write_str("default ")?;
            }
            write_modifiers(f, mods & !ACCESS_MODIFIERS)?;
        }

        write!(
            f,
            "{} {}.{}(",
            self.descriptor.return_java_name(),
            self.declaring_class.replace('/', "."),
            self.name
        )?;
        for (i, param) in self.descriptor.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&param.java_name())?;
        }
        f.write_str(")")?;

        if !self.exceptions.is_empty() {
            f.write_str(" throws ")?;
            for (i, exc) in self.exceptions.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                f.write_str(&exc.replace('/', "."))?;
            }
        }
        Ok(())
    }
}

fn write_modifiers(f: &mut fmt::Formatter<'_>, mods: u16) -> fmt::Result {
    for (bit, word) in MODIFIER_WORDS {
        if mods & bit != 0 {
            write!(f, "{} ", word)?;
        }
    }
    Ok(())
}

/// Every public method `interface` exposes, static ones declared directly on it included.
pub fn interface_methods(class_path: &ClassPath, interface: &TypeHandle) -> Result<Vec<Method>> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut out = Vec::new();
    collect(class_path, interface, true, &mut visited, &mut seen, &mut out)?;
    Ok(out)
}

/// The methods a stub has to override: [`interface_methods`] without the static ones.
pub fn instance_methods(class_path: &ClassPath, interface: &TypeHandle) -> Result<Vec<Method>> {
    Ok(interface_methods(class_path, interface)?
        .into_iter()
        .filter(|m| !m.is_static())
        .collect())
}

fn collect(
    class_path: &ClassPath,
    ty: &TypeHandle,
    is_root: bool,
    visited: &mut HashSet<String>,
    seen: &mut HashSet<(String, String)>,
    out: &mut Vec<Method>,
) -> Result<()> {
    if !visited.insert(ty.name.clone()) {
        return Ok(());
    }

    for declared in &ty.methods {
        if !declared.access.is_public() || declared.name.starts_with('<') {
            continue;
        }
        // static interface methods are not inherited
        if declared.access.is_static() && !is_root {
            continue;
        }
        let method = Method::from_declared(ty, declared);
        if seen.insert(method.key()) {
            out.push(method);
        }
    }

    for super_name in &ty.interfaces {
        let super_type = class_path.require(super_name)?;
        if !super_type.is_interface() {
            return Err(SynthesisError::MalformedHierarchy {
                class: ty.binary_name(),
                reason: format!(
                    "superinterface {} is not an interface",
                    super_type.binary_name()
                ),
            });
        }
        collect(class_path, &super_type, false, visited, seen, out)?;
    }
    Ok(())
}

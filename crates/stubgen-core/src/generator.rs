//! Dummy class synthesis.
//!
//! [`DummyClassGenerator`] turns an interface and an exception type into the bytes of a
//! concrete class implementing the interface, where every instance method throws the
//! exception with a message naming the method that was called.

use serde::{Deserialize, Serialize};
use stubgen_classfile::{AccessFlags, ClassVersion, ClassWriter, FieldType, MethodDescriptor, JAVA_8};
use tracing::{debug, trace, warn};

use crate::class_path::{ClassPath, TypeHandle};
use crate::error::{Result, SynthesisError};
use crate::reflect::{self, Method};

/// Format version of every generated class.
pub const CLASS_VERSION: ClassVersion = JAVA_8;

/// Leading text of the message passed to the thrown exception. The method description follows.
pub const DUMMY_MESSAGE_PREFIX: &str = "A method was invoked on a dummy autogenerated class. This is most likely due to a static field not being properly initialized, usually in a CatalogType-related class.\nMethod: ";

const OBJECT: &str = "java/lang/Object";
const THROWABLE: &str = "java/lang/Throwable";

/// One class to generate. Names are dotted binary names (`org.example.Outer$Inner`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    pub interface: Option<String>,
    pub name: Option<String>,
    pub exception: Option<String>,
}

impl GenerationRequest {
    pub fn new(
        interface: impl Into<String>,
        name: impl Into<String>,
        exception: impl Into<String>,
    ) -> Self {
        Self {
            interface: Some(interface.into()),
            name: Some(name.into()),
            exception: Some(exception.into()),
        }
    }
}

/// A serialized generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClass {
    name: String,
    internal_name: String,
    bytes: Vec<u8>,
    method_count: usize,
}

impl GeneratedClass {
    /// Dotted binary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of throwing methods, the constructor not included.
    pub fn method_count(&self) -> usize {
        self.method_count
    }

    /// Path of the class file relative to a class path root, e.g. `org/example/Foo.class`.
    pub fn relative_path(&self) -> std::path::PathBuf {
        let mut path: std::path::PathBuf = self.internal_name.split('/').collect();
        path.set_extension("class");
        path
    }
}

/// Generates dummy classes against a [`ClassPath`].
///
/// Holds no state besides the class path reference; each call produces fresh bytes.
#[derive(Debug, Clone, Copy)]
pub struct DummyClassGenerator<'cp> {
    class_path: &'cp ClassPath,
}

impl<'cp> DummyClassGenerator<'cp> {
    pub fn new(class_path: &'cp ClassPath) -> Self {
        Self { class_path }
    }

    pub fn class_path(&self) -> &'cp ClassPath {
        self.class_path
    }

    /// Generate from a request whose fields may be missing.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GeneratedClass> {
        let interface = required("interface", request.interface.as_deref())?;
        let name = required("name", request.name.as_deref())?;
        let exception = required("exception", request.exception.as_deref())?;
        self.create_class(interface, name, exception)
    }

    /// Generate `name`, implementing `interface`, whose methods throw `exception`.
    ///
    /// All three are dotted binary names. The interface and exception are resolved on the
    /// class path; `name` is the class to create.
    pub fn create_class(&self, interface: &str, name: &str, exception: &str) -> Result<GeneratedClass> {
        let interface = required("interface", Some(interface))?;
        let name = required("name", Some(name))?;
        let exception = required("exception", Some(exception))?;

        let interface_internal = internal_name("interface", interface)?;
        let internal = internal_name("name", name)?;
        let exception_internal = internal_name("exception", exception)?;

        let interface_type = self.resolve_input("interface", &interface_internal)?;
        if !interface_type.is_interface() {
            return Err(SynthesisError::NotAnInterface(interface_type.binary_name()));
        }

        let exception_type = self.resolve_input("exception", &exception_internal)?;
        if !self.class_path.is_subclass_of(&exception_type, THROWABLE)? {
            return Err(SynthesisError::NotThrowable(exception_type.binary_name()));
        }
        check_constructible(&exception_type)?;

        if !interface_type.is_public()
            && interface_type.package() != crate::class_path::package_of(&internal)
        {
            warn!(
                interface = %interface_type.binary_name(),
                class = name,
                "interface is not public and the generated class is in another package; \
                 the class will fail to link"
            );
        }

        let methods = reflect::instance_methods(self.class_path, &interface_type)?;
        let bytes = emit_class(&internal, &interface_internal, &exception_internal, &methods)
            .map_err(|source| SynthesisError::Emit {
                class: name.to_string(),
                source,
            })?;

        debug!(
            class = name,
            interface = %interface_type.binary_name(),
            exception = %exception_type.binary_name(),
            methods = methods.len(),
            size = bytes.len(),
            "generated dummy class"
        );

        Ok(GeneratedClass {
            name: name.to_string(),
            internal_name: internal,
            bytes,
            method_count: methods.len(),
        })
    }

    fn resolve_input(&self, argument: &'static str, internal: &str) -> Result<std::sync::Arc<TypeHandle>> {
        self.class_path
            .resolve(internal)?
            .ok_or_else(|| SynthesisError::UnknownType {
                argument,
                name: internal.replace('/', "."),
            })
    }
}

fn required<'a>(argument: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SynthesisError::MissingArgument(argument)),
    }
}

/// Convert a dotted binary name to its internal form, rejecting anything that is not one.
///
/// `argument` names the input in the returned [`SynthesisError::InvalidName`].
pub fn internal_name(argument: &'static str, binary_name: &str) -> Result<String> {
    let invalid = || SynthesisError::InvalidName {
        argument,
        value: binary_name.to_string(),
    };
    if binary_name.contains(|c: char| matches!(c, '/' | ';' | '[') || c.is_whitespace()) {
        return Err(invalid());
    }
    if binary_name.split('.').any(str::is_empty) {
        return Err(invalid());
    }
    Ok(binary_name.replace('.', "/"))
}

fn check_constructible(exception: &TypeHandle) -> Result<()> {
    let reason = if exception.is_interface() {
        Some("it is an interface")
    } else if exception.is_abstract() {
        Some("it is abstract")
    } else if !exception.has_message_constructor() {
        Some("it has no public (String) constructor")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SynthesisError::UnusableException {
            name: exception.binary_name(),
            reason,
        }),
        None => Ok(()),
    }
}

fn emit_class(
    internal: &str,
    interface: &str,
    exception: &str,
    methods: &[Method],
) -> stubgen_classfile::Result<Vec<u8>> {
    let mut writer = ClassWriter::new(
        CLASS_VERSION,
        AccessFlags::PUBLIC | AccessFlags::SUPER,
        internal,
        Some(OBJECT),
        &[interface],
    )?;
    generate_constructor(&mut writer)?;
    generate_methods(&mut writer, exception, methods)?;
    writer.to_bytes()
}

fn generate_constructor(writer: &mut ClassWriter) -> stubgen_classfile::Result<()> {
    writer.method_with_code(
        AccessFlags::PUBLIC,
        "<init>",
        &MethodDescriptor::void(),
        &[],
        |code| {
            code.aload(0)?
                .invokespecial(OBJECT, "<init>", &MethodDescriptor::void())?
                .return_void()?;
            Ok(())
        },
    )
}

fn generate_methods(
    writer: &mut ClassWriter,
    exception: &str,
    methods: &[Method],
) -> stubgen_classfile::Result<()> {
    let message_ctor = MethodDescriptor::new(vec![FieldType::object("java/lang/String")], None);
    for method in methods {
        let message = format!("{}{}", DUMMY_MESSAGE_PREFIX, method);
        trace!(method = %method.name, descriptor = %method.descriptor, "emitting throwing body");
        writer.method_with_code(
            AccessFlags::PUBLIC,
            &method.name,
            &method.descriptor,
            &[],
            |code| {
                code.new_object(exception)?
                    .dup()?
                    .ldc_string(&message)?
                    .invokespecial(exception, "<init>", &message_ctor)?
                    .athrow()?;
                Ok(())
            },
        )?;
    }
    Ok(())
}

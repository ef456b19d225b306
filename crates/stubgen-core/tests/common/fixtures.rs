//! Fixture classes for generator tests.
//!
//! Everything is built with `ClassWriter` and served from a `MemorySource`, so no Java
//! toolchain is needed. Core JDK types come from the bootstrap table.

use stubgen_classfile::{AccessFlags, ClassWriter, FieldType, MethodDescriptor, JAVA_8};
use stubgen_core::{ClassPath, MemorySource};

pub const SIMPLE_INTERFACE: &str = "org.example.SimpleInterface";
pub const SUB_INTERFACE: &str = "org.example.SubInterface";
pub const CUSTOM_EXCEPTION: &str = "org.example.CustomException";

const INTERFACE_ACCESS: u16 = 0x0601; // public interface abstract

/// A method declared on a fixture interface.
#[derive(Debug, Clone, Copy)]
pub struct FixtureMethod {
    pub access: AccessFlags,
    pub name: &'static str,
    pub descriptor: &'static str,
    pub exceptions: &'static [&'static str],
}

impl FixtureMethod {
    pub const fn abstract_method(name: &'static str, descriptor: &'static str) -> Self {
        Self {
            access: AccessFlags(0x0401),
            name,
            descriptor,
            exceptions: &[],
        }
    }

    pub const fn static_method(name: &'static str) -> Self {
        Self {
            access: AccessFlags(0x0009),
            name,
            descriptor: "()V",
            exceptions: &[],
        }
    }

    /// A `()V` default method.
    pub const fn default_method(name: &'static str) -> Self {
        Self {
            access: AccessFlags(0x0001),
            name,
            descriptor: "()V",
            exceptions: &[],
        }
    }

    pub const fn throws(mut self, exceptions: &'static [&'static str]) -> Self {
        self.exceptions = exceptions;
        self
    }
}

/// Class file for an interface. Methods with a body (static and default) just return.
pub fn interface_class(
    name: &str,
    access: u16,
    super_interfaces: &[&str],
    methods: &[FixtureMethod],
) -> Vec<u8> {
    let mut writer = ClassWriter::new(
        JAVA_8,
        AccessFlags(access),
        name,
        Some("java/lang/Object"),
        super_interfaces,
    )
    .unwrap();
    for method in methods {
        let descriptor = MethodDescriptor::parse(method.descriptor).unwrap();
        if method.access.is_abstract() {
            writer
                .abstract_method(method.access, method.name, &descriptor, method.exceptions)
                .unwrap();
        } else {
            writer
                .method_with_code(method.access, method.name, &descriptor, method.exceptions, |code| {
                    code.return_void()?;
                    Ok(())
                })
                .unwrap();
        }
    }
    writer.to_bytes().unwrap()
}

/// Class file for a plain class with the given constructors. Constructor bodies are not
/// meaningful; only their presence is inspected.
pub fn plain_class(name: &str, access: u16, super_class: &str, constructors: &[MethodDescriptor]) -> Vec<u8> {
    let mut writer =
        ClassWriter::new(JAVA_8, AccessFlags(access), name, Some(super_class), &[]).unwrap();
    for ctor in constructors {
        writer
            .method_with_code(AccessFlags::PUBLIC, "<init>", ctor, &[], |code| {
                code.return_void()?;
                Ok(())
            })
            .unwrap();
    }
    writer.to_bytes().unwrap()
}

fn message_ctor() -> MethodDescriptor {
    MethodDescriptor::new(vec![FieldType::object("java/lang/String")], None)
}

/// The fixture class path:
///
/// - `SimpleInterface`: static `static_method()V`, `foo()String throws IOException`, `blah()V`
/// - `SubInterface extends SimpleInterface`: `test()I`
/// - `Defaults`: default `hello()V`, abstract `run()V`
/// - `Wide`: `compute(JDI[Ljava/lang/String;)J`
/// - diamond `Left`/`Right` both extending `Top`, joined by `Bottom`
/// - `Hidden`: package-private interface
/// - `Broken`: extends the missing interface `Missing`
/// - `NotAnInterface`: a plain class
/// - `CustomException`, `NoMessageException`, `AbstractException`
pub fn fixture_class_path() -> ClassPath {
    let public = INTERFACE_ACCESS;
    let mut source = MemorySource::new();

    source.insert(
        "org/example/SimpleInterface",
        interface_class(
            "org/example/SimpleInterface",
            public,
            &[],
            &[
                FixtureMethod::static_method("static_method"),
                FixtureMethod::abstract_method("foo", "()Ljava/lang/String;")
                    .throws(&["java/io/IOException"]),
                FixtureMethod::abstract_method("blah", "()V"),
            ],
        ),
    );
    source.insert(
        "org/example/SubInterface",
        interface_class(
            "org/example/SubInterface",
            public,
            &["org/example/SimpleInterface"],
            &[FixtureMethod::abstract_method("test", "()I")],
        ),
    );
    source.insert(
        "org/example/Defaults",
        interface_class(
            "org/example/Defaults",
            public,
            &[],
            &[
                FixtureMethod::default_method("hello"),
                FixtureMethod::abstract_method("run", "()V"),
            ],
        ),
    );
    source.insert(
        "org/example/Wide",
        interface_class(
            "org/example/Wide",
            public,
            &[],
            &[FixtureMethod::abstract_method(
                "compute",
                "(JDI[Ljava/lang/String;)J",
            )],
        ),
    );
    source.insert(
        "org/example/Top",
        interface_class(
            "org/example/Top",
            public,
            &[],
            &[
                FixtureMethod::abstract_method("shared", "()V"),
                FixtureMethod::static_method("helper"),
            ],
        ),
    );
    for side in ["Left", "Right"] {
        let name = format!("org/example/{}", side);
        source.insert(
            name.clone(),
            interface_class(&name, public, &["org/example/Top"], &[]),
        );
    }
    source.insert(
        "org/example/Bottom",
        interface_class(
            "org/example/Bottom",
            public,
            &["org/example/Left", "org/example/Right"],
            &[FixtureMethod::abstract_method("own", "()V")],
        ),
    );
    source.insert(
        "org/example/Hidden",
        interface_class(
            "org/example/Hidden",
            0x0600,
            &[],
            &[FixtureMethod::abstract_method("secret", "()V")],
        ),
    );
    source.insert(
        "org/example/Broken",
        interface_class("org/example/Broken", public, &["org/example/Missing"], &[]),
    );

    source.insert(
        "org/example/NotAnInterface",
        plain_class(
            "org/example/NotAnInterface",
            0x0021,
            "java/lang/Object",
            &[MethodDescriptor::void()],
        ),
    );
    source.insert(
        "org/example/CustomException",
        plain_class(
            "org/example/CustomException",
            0x0021,
            "java/lang/RuntimeException",
            &[MethodDescriptor::void(), message_ctor()],
        ),
    );
    source.insert(
        "org/example/NoMessageException",
        plain_class(
            "org/example/NoMessageException",
            0x0021,
            "java/lang/RuntimeException",
            &[MethodDescriptor::void()],
        ),
    );
    source.insert(
        "org/example/AbstractException",
        plain_class(
            "org/example/AbstractException",
            0x0421,
            "java/lang/RuntimeException",
            &[message_ctor()],
        ),
    );

    ClassPath::new().with_source(source)
}

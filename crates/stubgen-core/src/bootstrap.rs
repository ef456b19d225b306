//! Built-in descriptions of core JDK classes.
//!
//! JDK classes live in the runtime image rather than on a user class path, so the throwable
//! hierarchy the generator has to check against is described here. Only superclass links and
//! constructors are modeled; that is all validation needs.

use stubgen_classfile::{AccessFlags, FieldType, MethodDescriptor};

use crate::class_path::{DeclaredMethod, TypeHandle};

struct BootstrapClass {
    name: &'static str,
    super_class: Option<&'static str>,
    /// Whether a public `<init>(Ljava/lang/String;)V` exists.
    message_ctor: bool,
}

const fn class(
    name: &'static str,
    super_class: &'static str,
    message_ctor: bool,
) -> BootstrapClass {
    BootstrapClass {
        name,
        super_class: Some(super_class),
        message_ctor,
    }
}

const BOOTSTRAP_CLASSES: &[BootstrapClass] = &[
    BootstrapClass {
        name: "java/lang/Object",
        super_class: None,
        message_ctor: false,
    },
    class("java/lang/Throwable", "java/lang/Object", true),
    class("java/lang/Exception", "java/lang/Throwable", true),
    class("java/lang/Error", "java/lang/Throwable", true),
    class("java/lang/RuntimeException", "java/lang/Exception", true),
    class("java/lang/UnsupportedOperationException", "java/lang/RuntimeException", true),
    class("java/lang/IllegalStateException", "java/lang/RuntimeException", true),
    class("java/lang/IllegalArgumentException", "java/lang/RuntimeException", true),
    class("java/lang/NullPointerException", "java/lang/RuntimeException", true),
    class("java/lang/ClassCastException", "java/lang/RuntimeException", true),
    class("java/lang/IndexOutOfBoundsException", "java/lang/RuntimeException", true),
    class("java/lang/ArithmeticException", "java/lang/RuntimeException", true),
    class("java/lang/LinkageError", "java/lang/Error", true),
    class("java/lang/ExceptionInInitializerError", "java/lang/LinkageError", true),
    // only AssertionError(Object) is public
    class("java/lang/AssertionError", "java/lang/Error", false),
    class("java/io/IOException", "java/lang/Exception", true),
    // not throwable, kept so non-throwable inputs fail with the right error
    class("java/lang/String", "java/lang/Object", false),
];

/// Look up a built-in class by internal name.
pub fn lookup(internal_name: &str) -> Option<TypeHandle> {
    let entry = BOOTSTRAP_CLASSES
        .iter()
        .find(|entry| entry.name == internal_name)?;

    let mut access = AccessFlags::PUBLIC | AccessFlags::SUPER;
    if entry.name == "java/lang/String" {
        access |= AccessFlags::FINAL;
    }

    let mut methods = vec![DeclaredMethod {
        access: AccessFlags::PUBLIC,
        name: "<init>".to_string(),
        descriptor: MethodDescriptor::void(),
        exceptions: Vec::new(),
    }];
    if entry.message_ctor {
        methods.push(DeclaredMethod {
            access: AccessFlags::PUBLIC,
            name: "<init>".to_string(),
            descriptor: MethodDescriptor::new(
                vec![FieldType::object("java/lang/String")],
                None,
            ),
            exceptions: Vec::new(),
        });
    }

    Some(TypeHandle {
        name: entry.name.to_string(),
        access,
        super_class: entry.super_class.map(str::to_string),
        interfaces: Vec::new(),
        methods,
    })
}

/// Internal names of every built-in class.
pub fn names() -> impl Iterator<Item = &'static str> {
    BOOTSTRAP_CLASSES.iter().map(|entry| entry.name)
}

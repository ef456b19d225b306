//! Structural assertions on generated class files.

use stubgen_classfile::{decode_instructions, AccessFlags, ClassFile, Instruction};
use stubgen_core::DUMMY_MESSAGE_PREFIX;

pub fn parse_class(bytes: &[u8]) -> ClassFile {
    match ClassFile::parse(bytes) {
        Ok(class) => class,
        Err(e) => panic!("generated class failed to parse: {}", e),
    }
}

/// Assert the class has exactly one constructor, `<init>()V`, delegating to `Object`.
pub fn assert_object_constructor(class: &ClassFile) {
    let ctors: Vec<_> = class.methods.iter().filter(|m| m.name == "<init>").collect();
    assert_eq!(ctors.len(), 1, "expected exactly one constructor");
    let ctor = ctors[0];
    assert_eq!(ctor.descriptor, "()V");
    assert_eq!(ctor.access, AccessFlags::PUBLIC);

    let code = ctor.code.as_ref().expect("constructor has a body");
    let insns = decode_instructions(&code.code);
    assert_eq!(insns.len(), 3, "constructor body: {:?}", insns);
    assert_eq!(insns[0], Instruction::Aload(0));
    let Instruction::InvokeSpecial(idx) = insns[1] else {
        panic!("expected invokespecial, got {:?}", insns[1]);
    };
    assert_eq!(
        class.member_ref(idx).unwrap(),
        ("java/lang/Object", "<init>", "()V")
    );
    assert_eq!(insns[2], Instruction::Return);
    assert_eq!(code.max_stack, 1);
    assert_eq!(code.max_locals, 1);
}

/// Assert `name`/`descriptor` is a public method whose body throws `exception` (internal
/// name) with the dummy message followed by `description`. Returns the message.
pub fn assert_throwing_body(
    class: &ClassFile,
    name: &str,
    descriptor: &str,
    exception: &str,
    description: &str,
) -> String {
    let method = class
        .method(name, descriptor)
        .unwrap_or_else(|| panic!("missing method {}{}", name, descriptor));
    assert_eq!(method.access, AccessFlags::PUBLIC, "{} should be plain public", name);
    assert!(method.exceptions.is_empty());

    let code = method.code.as_ref().expect("method has a body");
    let insns = decode_instructions(&code.code);
    assert_eq!(insns.len(), 5, "body of {}: {:?}", name, insns);

    let Instruction::New(new_idx) = insns[0] else {
        panic!("expected new, got {:?}", insns[0]);
    };
    assert_eq!(class.class_name(new_idx).unwrap(), exception);
    assert_eq!(insns[1], Instruction::Dup);

    let Instruction::Ldc(msg_idx) = insns[2] else {
        panic!("expected ldc, got {:?}", insns[2]);
    };
    let message = class.string_constant(msg_idx).unwrap().to_string();
    assert_eq!(message, format!("{}{}", DUMMY_MESSAGE_PREFIX, description));

    let Instruction::InvokeSpecial(ctor_idx) = insns[3] else {
        panic!("expected invokespecial, got {:?}", insns[3]);
    };
    assert_eq!(
        class.member_ref(ctor_idx).unwrap(),
        (exception, "<init>", "(Ljava/lang/String;)V")
    );
    assert_eq!(insns[4], Instruction::Athrow);
    assert_eq!(code.max_stack, 3);
    assert_eq!(code.exception_table_len, 0);
    message
}

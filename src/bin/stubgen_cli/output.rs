//! Output formatting for the stubgen CLI
//!
//! Provides human-readable and JSON output formatting for all commands.

use serde::Serialize;
use stubgen_classfile::{AccessFlags, ClassFile, Constant, Instruction};

/// Format an error for display
pub fn format_error(error: &anyhow::Error, json_output: bool) -> String {
    if json_output {
        #[derive(Serialize)]
        struct ErrorJson {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            kind: Option<stubgen_core::ErrorKind>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            causes: Vec<String>,
        }

        let err = ErrorJson {
            error: error.to_string(),
            kind: error
                .chain()
                .find_map(|cause| cause.downcast_ref::<stubgen_core::SynthesisError>())
                .map(|e| e.kind()),
            causes: error.chain().skip(1).map(|e| e.to_string()).collect(),
        };
        serde_json::to_string_pretty(&err).unwrap_or_else(|_| "{}".to_string())
    } else {
        let mut out = format!("\x1b[31mError:\x1b[0m {}\n", error);
        let mut causes = error.chain().skip(1).peekable();
        if causes.peek().is_some() {
            out.push_str("Caused by:\n");
            for (idx, cause) in causes.enumerate() {
                out.push_str(&format!("  {}: {}\n", idx + 1, cause));
            }
        }
        out
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Modifier keywords for class or method access flags, in source order.
pub fn describe_access(access: AccessFlags, is_method: bool) -> String {
    let mut words = Vec::new();
    for (flag, word) in [
        (AccessFlags::PUBLIC, "public"),
        (AccessFlags::PROTECTED, "protected"),
        (AccessFlags::PRIVATE, "private"),
        (AccessFlags::ABSTRACT, "abstract"),
        (AccessFlags::STATIC, "static"),
        (AccessFlags::FINAL, "final"),
    ] {
        if access.contains(flag) {
            words.push(word);
        }
    }
    if is_method {
        if access.contains(AccessFlags::SYNCHRONIZED) {
            words.push("synchronized");
        }
        if access.contains(AccessFlags::NATIVE) {
            words.push("native");
        }
    } else if access.is_interface() {
        words.push("interface");
    } else {
        words.push("class");
    }
    words.join(" ")
}

/// One instruction with its constant pool operand spelled out.
pub fn format_instruction(class: &ClassFile, insn: &Instruction) -> String {
    let class_ref = |idx: u16| {
        class
            .class_name(idx)
            .map(str::to_string)
            .unwrap_or_else(|_| format!("#{}", idx))
    };
    match insn {
        Instruction::Aload(slot) => format!("aload {}", slot),
        Instruction::New(idx) => format!("new {}", class_ref(*idx)),
        Instruction::Dup => "dup".to_string(),
        Instruction::Ldc(idx) => match class.constant(*idx) {
            Ok(Constant::String(_)) => match class.string_constant(*idx) {
                Ok(text) => format!("ldc {:?}", text),
                Err(_) => format!("ldc #{}", idx),
            },
            _ => format!("ldc #{}", idx),
        },
        Instruction::InvokeSpecial(idx) => match class.member_ref(*idx) {
            Ok((owner, name, descriptor)) => {
                format!("invokespecial {}.{}{}", owner, name, descriptor)
            }
            Err(_) => format!("invokespecial #{}", idx),
        },
        Instruction::Return => "return".to_string(),
        Instruction::Athrow => "athrow".to_string(),
        Instruction::Unknown { offset, opcode } => {
            format!("<opcode 0x{:02x} at {}, not decoded>", opcode, offset)
        }
    }
}

//! Dump command - print the structure of a class file.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use super::output::{describe_access, format_instruction};
use stubgen_classfile::{decode_instructions, ClassFile};

#[derive(Parser, Debug)]
pub struct DumpCmd {
    /// Class file to read
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct DumpOutput {
    version: String,
    access: String,
    flags: String,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    constant_pool_count: usize,
    methods: Vec<MethodDump>,
}

#[derive(Debug, Serialize)]
struct MethodDump {
    access: String,
    name: String,
    descriptor: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exceptions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_stack: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_locals: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    code: Vec<String>,
}

impl DumpCmd {
    pub fn execute(&self, json_output: bool, verbose: bool) -> Result<()> {
        let bytes = std::fs::read(&self.file)
            .with_context(|| format!("failed to read class file: {}", self.file.display()))?;
        let class = ClassFile::parse(&bytes)
            .with_context(|| format!("failed to parse class file: {}", self.file.display()))?;
        let out = dump(&class, json_output || verbose);

        if json_output {
            return super::output::print_json(&out);
        }

        println!("{} {}", out.access, out.this_class.replace('/', "."));
        println!("  version: {}", out.version);
        println!("  flags: {}", out.flags);
        if let Some(super_class) = &out.super_class {
            println!("  extends: {}", super_class.replace('/', "."));
        }
        for iface in &out.interfaces {
            println!("  implements: {}", iface.replace('/', "."));
        }
        println!("  constant pool: {} entries", out.constant_pool_count);
        println!("  methods: {}", out.methods.len());
        for method in &out.methods {
            println!("    {} {}{}", method.access, method.name, method.descriptor);
            if !method.exceptions.is_empty() {
                println!("      throws {}", method.exceptions.join(", "));
            }
            if let (Some(stack), Some(locals)) = (method.max_stack, method.max_locals) {
                println!("      max_stack={} max_locals={}", stack, locals);
            }
            for insn in &method.code {
                println!("        {}", insn);
            }
        }
        Ok(())
    }
}

fn dump(class: &ClassFile, with_code: bool) -> DumpOutput {
    let methods = class
        .methods
        .iter()
        .map(|m| MethodDump {
            access: describe_access(m.access, true),
            name: m.name.clone(),
            descriptor: m.descriptor.clone(),
            exceptions: m.exceptions.clone(),
            max_stack: m.code.as_ref().map(|c| c.max_stack),
            max_locals: m.code.as_ref().map(|c| c.max_locals),
            code: match (&m.code, with_code) {
                (Some(code), true) => decode_instructions(&code.code)
                    .iter()
                    .map(|insn| format_instruction(class, insn))
                    .collect(),
                _ => Vec::new(),
            },
        })
        .collect();

    DumpOutput {
        version: class.version.to_string(),
        access: describe_access(class.access, false),
        flags: class.access.to_string(),
        this_class: class.this_class.clone(),
        super_class: class.super_class.clone(),
        interfaces: class.interfaces.clone(),
        // index 0 is reserved
        constant_pool_count: class.constant_pool.len().saturating_sub(1),
        methods,
    }
}

//! Methods command - list what a dummy for an interface implements.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use stubgen_core::generator::internal_name;
use stubgen_core::{reflect, ClassPath, SynthesisError};

#[derive(Parser, Debug)]
pub struct MethodsCmd {
    /// Interface to inspect (binary name)
    #[arg(long)]
    pub interface: String,

    /// Include static methods, which generated classes do not implement
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
struct MethodOutput {
    name: String,
    descriptor: String,
    declaring_class: String,
    is_static: bool,
    is_default: bool,
    description: String,
}

impl MethodsCmd {
    pub fn execute(&self, class_path: &ClassPath, json_output: bool) -> Result<()> {
        let requested = self.interface.trim();
        if requested.is_empty() {
            return Err(SynthesisError::MissingArgument("interface").into());
        }
        let internal = internal_name("interface", requested)?;
        let interface = class_path
            .resolve(&internal)?
            .ok_or_else(|| SynthesisError::UnknownType {
                argument: "interface",
                name: requested.to_string(),
            })?;
        if !interface.is_interface() {
            return Err(SynthesisError::NotAnInterface(interface.binary_name()).into());
        }

        let methods = if self.all {
            reflect::interface_methods(class_path, &interface)
        } else {
            reflect::instance_methods(class_path, &interface)
        }
        .with_context(|| format!("failed to enumerate methods of {}", interface.binary_name()))?;

        let out: Vec<MethodOutput> = methods
            .iter()
            .map(|m| MethodOutput {
                name: m.name.clone(),
                descriptor: m.descriptor.to_string(),
                declaring_class: m.declaring_class.replace('/', "."),
                is_static: m.is_static(),
                is_default: m.is_default(),
                description: m.to_string(),
            })
            .collect();

        if json_output {
            super::output::print_json(&out)?;
        } else {
            println!("{} ({} methods)", interface.binary_name(), out.len());
            for method in &out {
                println!("  {}", method.description);
            }
        }
        Ok(())
    }
}

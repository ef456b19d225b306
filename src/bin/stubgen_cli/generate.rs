//! Generate command - write one dummy class.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use catalog_stubgen::manifest::write_class;
use stubgen_core::env_utils::default_exception;
use stubgen_core::{dummy_class_name, ClassPath, DummyClassGenerator, SynthesisError};

#[derive(Parser, Debug)]
pub struct GenerateCmd {
    /// Interface to implement (binary name, e.g. org.example.CatalogEntry)
    #[arg(long)]
    pub interface: String,

    /// Binary name of the generated class
    #[arg(long)]
    pub name: Option<String>,

    /// Derive the class name as <PACKAGE>.Dummy_<interface> when --name is not given
    #[arg(long, conflicts_with = "name")]
    pub package: Option<String>,

    /// Exception thrown by every method [default: java.lang.UnsupportedOperationException,
    /// or STUBGEN_DEFAULT_EXCEPTION]
    #[arg(long)]
    pub exception: Option<String>,

    /// Output directory; the class is written at its package path below it
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    class: String,
    path: String,
    methods: usize,
    size: usize,
}

impl GenerateCmd {
    pub fn execute(&self, class_path: &ClassPath, json_output: bool, verbose: bool) -> Result<()> {
        let name = match (&self.name, &self.package) {
            (Some(name), _) => name.clone(),
            (None, Some(package)) => dummy_class_name(package, &self.interface),
            (None, None) => return Err(SynthesisError::MissingArgument("name").into()),
        };
        let exception = self.exception.clone().unwrap_or_else(default_exception);

        let class = DummyClassGenerator::new(class_path).create_class(
            &self.interface,
            &name,
            &exception,
        )?;
        let path = write_class(&self.out, &class)?;

        let out = GenerateOutput {
            class: class.name().to_string(),
            path: path.display().to_string(),
            methods: class.method_count(),
            size: class.bytes().len(),
        };
        if json_output {
            super::output::print_json(&out)?;
        } else {
            println!("Generated {} ({} methods)", out.class, out.methods);
            println!("Wrote {}", out.path);
            if verbose {
                println!("Exception: {}", exception);
                println!("Size: {} bytes", out.size);
            }
        }
        Ok(())
    }
}

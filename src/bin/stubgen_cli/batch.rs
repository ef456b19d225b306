//! Batch command - generate every class listed in a manifest.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

use catalog_stubgen::manifest::{emit_dummy_classes, BatchManifest};
use stubgen_core::env_utils::default_exception;
use stubgen_core::{ClassPath, DummyClassGenerator};

#[derive(Parser, Debug)]
pub struct BatchCmd {
    /// JSON manifest listing the classes to generate
    #[arg(long)]
    pub manifest: PathBuf,

    /// Output directory; classes are written at their package paths below it
    #[arg(long)]
    pub out: PathBuf,
}

impl BatchCmd {
    pub fn execute(&self, class_path: &ClassPath, json_output: bool, verbose: bool) -> Result<()> {
        let manifest = BatchManifest::load(&self.manifest)?;
        let requests = manifest.resolved_requests(&default_exception());
        let generator = DummyClassGenerator::new(class_path);
        let report = emit_dummy_classes(&generator, &requests, &self.out)?;

        if json_output {
            super::output::print_json(&report)?;
        } else {
            for outcome in &report.classes {
                let name = outcome.name.as_deref().unwrap_or("<unnamed>");
                match (&outcome.path, &outcome.error) {
                    (Some(path), _) => {
                        println!("\x1b[32m✓\x1b[0m {} ({} methods)", name, outcome.methods);
                        if verbose {
                            println!("    {}", path);
                        }
                    }
                    (None, Some(error)) => println!("\x1b[31m✗\x1b[0m {}: {}", name, error),
                    (None, None) => {}
                }
            }
            println!(
                "Generated {} of {} classes into {}",
                report.generated,
                report.classes.len(),
                report.out_dir
            );
        }

        if report.is_success() {
            Ok(())
        } else {
            Err(anyhow!(
                "{} of {} requests failed",
                report.failed,
                report.classes.len()
            ))
        }
    }
}

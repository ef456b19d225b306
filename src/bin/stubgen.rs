//! stubgen: generate dummy implementations of catalog-style JVM interfaces
//!
//! Every instance method of a generated class throws the configured exception with a
//! message naming the method, so a catalog field that is read before static
//! initialization fills it in fails with a clear diagnostic.
//!
//! ## Commands
//!
//! - **generate**: write one dummy class
//! - **batch**: write every class listed in a JSON manifest
//! - **methods**: list the methods a dummy for an interface would implement
//! - **dump**: print the structure of a class file
//!
//! ## Example Usage
//!
//! ```bash
//! # Generate a dummy for an interface compiled into build/classes
//! stubgen --classpath build/classes generate \
//!     --interface org.example.CatalogEntry \
//!     --name org.example.dummy.DummyCatalogEntry \
//!     --out build/generated
//!
//! # Generate everything listed in a manifest
//! stubgen --classpath build/classes batch --manifest dummies.json --out build/generated
//!
//! # Inspect the result
//! stubgen dump build/generated/org/example/dummy/DummyCatalogEntry.class
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod stubgen_cli;

use stubgen_cli::{batch::BatchCmd, dump::DumpCmd, generate::GenerateCmd, methods::MethodsCmd};

#[derive(Parser)]
#[command(
    name = "stubgen",
    author,
    version,
    about = "Generate throwing placeholder classes for JVM interfaces",
    long_about = "Generates concrete classes implementing an interface where every instance \
                  method throws a configured exception naming the invoked method.\n\n\
                  Input types are resolved from class directories given with --classpath, \
                  plus a built-in table of core java.lang types."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of compiled classes to resolve types from (repeatable, or ':'-separated)
    #[arg(
        long = "classpath",
        global = true,
        env = "STUBGEN_CLASSPATH",
        value_delimiter = ':'
    )]
    classpath: Vec<PathBuf>,

    /// Do not fall back to the built-in java.lang type table
    #[arg(long, global = true)]
    no_bootstrap: bool,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging, per-instruction dumps)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single dummy class
    Generate(GenerateCmd),

    /// Generate every dummy class listed in a JSON manifest
    Batch(BatchCmd),

    /// List the methods a dummy class for an interface implements
    Methods(MethodsCmd),

    /// Print the structure of a class file
    Dump(DumpCmd),
}

fn main() -> Result<()> {
    let Cli {
        command,
        classpath,
        no_bootstrap,
        json,
        verbose,
    } = Cli::parse();

    stubgen_cli::init_tracing(verbose);
    let class_path = stubgen_cli::build_class_path(&classpath, no_bootstrap);

    let result = match command {
        Commands::Generate(cmd) => cmd.execute(&class_path, json, verbose),
        Commands::Batch(cmd) => cmd.execute(&class_path, json, verbose),
        Commands::Methods(cmd) => cmd.execute(&class_path, json),
        Commands::Dump(cmd) => cmd.execute(json, verbose),
    };

    if let Err(err) = &result {
        eprintln!("{}", stubgen_cli::output::format_error(err, json));
        std::process::exit(stubgen_cli::exit_code(err));
    }
    result
}

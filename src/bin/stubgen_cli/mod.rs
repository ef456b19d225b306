//! CLI subcommand implementations for stubgen

pub mod batch;
pub mod dump;
pub mod generate;
pub mod methods;
pub mod output;

use std::path::PathBuf;

use stubgen_core::env_utils::{env_bool, NO_BOOTSTRAP_VAR};
use stubgen_core::{ClassPath, ErrorKind, SynthesisError};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

pub fn build_class_path(dirs: &[PathBuf], no_bootstrap: bool) -> ClassPath {
    let mut class_path = ClassPath::new();
    for dir in dirs.iter().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.is_dir() {
            tracing::warn!(path = %dir.display(), "class path entry is not a directory");
        }
        class_path.add_directory(dir);
    }
    if no_bootstrap || env_bool(NO_BOOTSTRAP_VAR) {
        class_path.set_bootstrap(false);
    }
    debug!(?class_path, "class path configured");
    class_path
}

/// Process exit code for a failed command: 2, 3 and 4 for the generator's error kinds, 1
/// for anything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<SynthesisError>())
        .map(SynthesisError::kind);
    match kind {
        Some(ErrorKind::InvalidArgument) => 2,
        Some(ErrorKind::PreconditionViolation) => 3,
        Some(ErrorKind::GenerationFailure) => 4,
        None => 1,
    }
}

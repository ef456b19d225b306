//! Naming of dummy classes inside a fixed package.

use crate::class_path::ClassPath;
use crate::error::{Result, SynthesisError};
use crate::generator::{DummyClassGenerator, GeneratedClass};

/// `<package>.Dummy_<interface>` with `.` and `$` in the interface name replaced by `_`.
///
/// ```
/// use stubgen_core::provider::dummy_class_name;
///
/// assert_eq!(
///     dummy_class_name("org.example.dummy", "org.example.Catalog$Entry"),
///     "org.example.dummy.Dummy_org_example_Catalog_Entry"
/// );
/// ```
pub fn dummy_class_name(package: &str, interface: &str) -> String {
    let flattened: String = interface
        .trim()
        .chars()
        .map(|c| if c == '.' || c == '$' { '_' } else { c })
        .collect();
    let package = package.trim().trim_end_matches('.');
    if package.is_empty() {
        format!("Dummy_{}", flattened)
    } else {
        format!("{}.Dummy_{}", package, flattened)
    }
}

/// Generates dummy classes whose names are derived from the interface they implement.
#[derive(Debug, Clone)]
pub struct DummyClassProvider<'cp> {
    package: String,
    generator: DummyClassGenerator<'cp>,
}

impl<'cp> DummyClassProvider<'cp> {
    pub fn new(package: impl Into<String>, class_path: &'cp ClassPath) -> Self {
        Self {
            package: package.into(),
            generator: DummyClassGenerator::new(class_path),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn class_name_for(&self, interface: &str) -> String {
        dummy_class_name(&self.package, interface)
    }

    pub fn create(&self, interface: &str, exception: &str) -> Result<GeneratedClass> {
        if interface.trim().is_empty() {
            return Err(SynthesisError::MissingArgument("interface"));
        }
        let name = self.class_name_for(interface);
        self.generator.create_class(interface, &name, exception)
    }
}

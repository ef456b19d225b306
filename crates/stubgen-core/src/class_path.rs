//! Class path: where input types are resolved from.
//!
//! A [`ClassPath`] is an ordered list of [`ClassSource`]s followed by the built-in
//! [`bootstrap`](crate::bootstrap) table. Resolved types are cached as [`TypeHandle`]s, so a
//! hierarchy shared by many interfaces is parsed once.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use stubgen_classfile::{AccessFlags, ClassFile, MethodDescriptor};
use tracing::{debug, trace};

use crate::bootstrap;
use crate::error::{Result, SynthesisError};

/// Somewhere class files can be looked up by internal name.
pub trait ClassSource: Send + Sync + fmt::Debug {
    /// Short human-readable description, used in errors and logs.
    fn describe(&self) -> String;

    /// Raw class file bytes for `internal_name`, or `None` if this source lacks it.
    fn find(&self, internal_name: &str) -> io::Result<Option<Vec<u8>>>;
}

/// A directory laid out by package: `<root>/org/example/Foo.class`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ClassSource for DirectorySource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn find(&self, internal_name: &str) -> io::Result<Option<Vec<u8>>> {
        let mut path = self.root.clone();
        for segment in internal_name.split('/') {
            // lookups stay below the root
            if matches!(segment, "" | "." | "..") {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid class name {}", internal_name),
                ));
            }
            path.push(segment);
        }
        path.set_extension("class");
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Class files held in memory, keyed by internal name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    classes: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, internal_name: impl Into<String>, bytes: Vec<u8>) {
        self.classes.insert(internal_name.into(), bytes);
    }

    pub fn with_class(mut self, internal_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(internal_name, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} classes)", self.classes.len())
    }

    fn find(&self, internal_name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.classes.get(internal_name).cloned())
    }
}

/// A method as declared on a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMethod {
    pub access: AccessFlags,
    pub name: String,
    pub descriptor: MethodDescriptor,
    /// Internal names of the declared checked exceptions.
    pub exceptions: Vec<String>,
}

/// A resolved type, reduced to what reflection needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandle {
    /// Internal name (`org/example/Foo`).
    pub name: String,
    pub access: AccessFlags,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub methods: Vec<DeclaredMethod>,
}

impl TypeHandle {
    /// Build a handle from a parsed class file.
    pub fn from_class_file(class: &ClassFile) -> stubgen_classfile::Result<Self> {
        let methods = class
            .methods
            .iter()
            .map(|m| {
                Ok(DeclaredMethod {
                    access: m.access,
                    name: m.name.clone(),
                    descriptor: MethodDescriptor::parse(&m.descriptor)?,
                    exceptions: m.exceptions.clone(),
                })
            })
            .collect::<stubgen_classfile::Result<Vec<_>>>()?;

        Ok(Self {
            name: class.this_class.clone(),
            access: class.access,
            super_class: class.super_class.clone(),
            interfaces: class.interfaces.clone(),
            methods,
        })
    }

    /// Dotted binary name (`org.example.Outer$Inner`).
    pub fn binary_name(&self) -> String {
        self.name.replace('/', ".")
    }

    /// Internal package prefix, empty for the unnamed package.
    pub fn package(&self) -> &str {
        package_of(&self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.access.is_interface()
    }

    pub fn is_public(&self) -> bool {
        self.access.is_public()
    }

    pub fn is_abstract(&self) -> bool {
        self.access.is_abstract()
    }

    pub fn declared_method(&self, name: &str, descriptor: &MethodDescriptor) -> Option<&DeclaredMethod> {
        self.methods
            .iter()
            .find(|m| m.name == name && &m.descriptor == descriptor)
    }

    /// Whether a public `<init>(Ljava/lang/String;)V` is declared.
    pub fn has_message_constructor(&self) -> bool {
        self.methods.iter().any(|m| {
            m.name == "<init>"
                && m.access.is_public()
                && m.descriptor.ret.is_none()
                && m.descriptor.params.len() == 1
                && m.descriptor.params[0].to_string() == "Ljava/lang/String;"
        })
    }
}

/// Internal package prefix of an internal name.
pub fn package_of(internal_name: &str) -> &str {
    internal_name
        .rfind('/')
        .map(|idx| &internal_name[..idx])
        .unwrap_or("")
}

/// Ordered class sources plus the bootstrap table, with a parse cache.
pub struct ClassPath {
    sources: Vec<Box<dyn ClassSource>>,
    bootstrap: bool,
    cache: RwLock<HashMap<String, Arc<TypeHandle>>>,
}

impl Default for ClassPath {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClassPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassPath")
            .field("sources", &self.sources)
            .field("bootstrap", &self.bootstrap)
            .field("cached", &self.cache.read().len())
            .finish()
    }
}

impl ClassPath {
    /// Empty class path; only the bootstrap table resolves.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            bootstrap: true,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_source(mut self, source: impl ClassSource + 'static) -> Self {
        self.add_source(source);
        self
    }

    pub fn add_source(&mut self, source: impl ClassSource + 'static) {
        self.sources.push(Box::new(source));
        self.cache.get_mut().clear();
    }

    pub fn add_directory(&mut self, root: impl Into<PathBuf>) {
        self.add_source(DirectorySource::new(root));
    }

    /// Enable or disable the built-in JDK table. Sources are always consulted first.
    pub fn set_bootstrap(&mut self, enabled: bool) {
        self.bootstrap = enabled;
        self.cache.get_mut().clear();
    }

    pub fn bootstrap_enabled(&self) -> bool {
        self.bootstrap
    }

    pub fn sources(&self) -> impl Iterator<Item = &dyn ClassSource> {
        self.sources.iter().map(|s| s.as_ref())
    }

    /// Resolve a type by internal name. `Ok(None)` when nothing provides it.
    pub fn resolve(&self, internal_name: &str) -> Result<Option<Arc<TypeHandle>>> {
        if let Some(handle) = self.cache.read().get(internal_name) {
            return Ok(Some(handle.clone()));
        }

        let Some(handle) = self.load(internal_name)? else {
            return Ok(None);
        };
        let handle = Arc::new(handle);
        self.cache
            .write()
            .entry(internal_name.to_string())
            .or_insert_with(|| handle.clone());
        Ok(Some(handle))
    }

    /// Resolve a type the hierarchy refers to; absence is a [`SynthesisError::MissingClass`].
    pub fn require(&self, internal_name: &str) -> Result<Arc<TypeHandle>> {
        self.resolve(internal_name)?
            .ok_or_else(|| SynthesisError::MissingClass(internal_name.replace('/', ".")))
    }

    /// Whether `ty` is `ancestor` or extends it through its superclass chain.
    pub fn is_subclass_of(&self, ty: &TypeHandle, ancestor: &str) -> Result<bool> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = Some(Arc::new(ty.clone()));

        while let Some(handle) = current {
            if handle.name == ancestor {
                return Ok(true);
            }
            if !visited.insert(handle.name.clone()) {
                return Err(SynthesisError::MalformedHierarchy {
                    class: handle.binary_name(),
                    reason: "superclass cycle".to_string(),
                });
            }
            current = match &handle.super_class {
                Some(super_class) => Some(self.require(super_class)?),
                None => None,
            };
        }
        Ok(false)
    }

    fn load(&self, internal_name: &str) -> Result<Option<TypeHandle>> {
        for source in &self.sources {
            let bytes = source
                .find(internal_name)
                .map_err(|e| SynthesisError::Io {
                    class: internal_name.replace('/', "."),
                    source_name: source.describe(),
                    source: e,
                })?;
            let Some(bytes) = bytes else {
                continue;
            };

            trace!(class = internal_name, source = %source.describe(), "parsing class file");
            let handle = parse_handle(internal_name, &bytes)?;
            if handle.name != internal_name {
                return Err(SynthesisError::MalformedHierarchy {
                    class: internal_name.replace('/', "."),
                    reason: format!(
                        "{} declares class {}",
                        source.describe(),
                        handle.binary_name()
                    ),
                });
            }
            return Ok(Some(handle));
        }

        if self.bootstrap {
            if let Some(handle) = bootstrap::lookup(internal_name) {
                debug!(class = internal_name, "resolved from bootstrap table");
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }
}

fn parse_handle(internal_name: &str, bytes: &[u8]) -> Result<TypeHandle> {
    let class_format = |source| SynthesisError::ClassFormat {
        class: internal_name.replace('/', "."),
        source,
    };
    let class = ClassFile::parse(bytes).map_err(class_format)?;
    TypeHandle::from_class_file(&class).map_err(class_format)
}

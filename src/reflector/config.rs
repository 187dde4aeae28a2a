//! Configuration of an [`crate::AssemblyInfoReflector`].

pub use crate::metadata::view::LoadMode;

/// Options for reading assemblies
///
/// The defaults memory-map the assembly and allow attribute type names nested 64 levels deep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectorConfig {
    /// How the assembly file is brought into memory
    pub load_mode: LoadMode,

    /// Maximum nesting depth of attribute type names (default: 64)
    ///
    /// The type name of every assembly attribute is resolved, not only those of the known
    /// kinds, so any attribute nested deeper than this fails the read with
    /// [`crate::Error::RecursionLimit`].
    pub max_nesting_depth: usize,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            load_mode: LoadMode::MemoryMapped,
            max_nesting_depth: 64,
        }
    }
}

impl ReflectorConfig {
    /// Read the assembly into memory instead of mapping it
    ///
    /// Useful when the file is replaced while it is being read, e.g. by a concurrent build step.
    #[must_use]
    pub fn buffered() -> Self {
        Self {
            load_mode: LoadMode::Buffered,
            ..Self::default()
        }
    }
}

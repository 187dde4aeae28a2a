//! Reading the assembly info attributes of an assembly file.
//!
//! [`AssemblyInfoReflector`] ties the pieces together:
//!
//! 1. the path is made absolute against the [`Environment`] and checked on the [`FileSystem`]
//! 2. the file is loaded as a [`ModuleView`]
//! 3. each [`KnownAttribute`] is looked up among the attributes of the assembly
//! 4. the values are collected into a [`ParseResult`]
//!
//! The loaded module is dropped before the result is returned.
//!
//! # Examples
//!
//! ```rust,no_run
//! use asminfo::reflect_assembly_info;
//!
//! let info = reflect_assembly_info("bin/Release/Acme.Core.dll")?;
//! if let Some(version) = info.version() {
//!     println!("##vso[build.updatebuildnumber]{version}");
//! }
//! # Ok::<(), asminfo::Error>(())
//! ```

mod attributes;
mod config;
mod path;
mod result;

pub use attributes::{
    boolean_form, lookup_all, lookup_single, string_form, string_value, KnownAttribute,
    MultiDecoder, SingleDecoder,
};
pub use config::{LoadMode, ReflectorConfig};
pub use path::{resolve_path, Environment, FileSystem, PhysicalFileSystem, ProcessEnvironment};
pub use result::ParseResult;

use std::path::Path;

use crate::{metadata::view::AssemblyAttribute, Error, ModuleView, Result};

/// Reads assembly info through a host [`FileSystem`] and [`Environment`].
///
/// # Examples
///
/// ```rust,no_run
/// use asminfo::{AssemblyInfoReflector, PhysicalFileSystem, ProcessEnvironment};
///
/// let reflector = AssemblyInfoReflector::new(PhysicalFileSystem, ProcessEnvironment);
/// let info = reflector.reflect("bin/Release/Acme.Core.dll")?;
/// println!("{:?} {:?}", info.product(), info.file_version());
/// # Ok::<(), asminfo::Error>(())
/// ```
pub struct AssemblyInfoReflector<F, E> {
    file_system: F,
    environment: E,
    config: ReflectorConfig,
}

impl<F: FileSystem, E: Environment> AssemblyInfoReflector<F, E> {
    /// Create a reflector with the default [`ReflectorConfig`]
    pub fn new(file_system: F, environment: E) -> Self {
        Self::with_config(file_system, environment, ReflectorConfig::default())
    }

    /// Create a reflector with an explicit configuration
    pub fn with_config(file_system: F, environment: E, config: ReflectorConfig) -> Self {
        AssemblyInfoReflector {
            file_system,
            environment,
            config,
        }
    }

    /// Read the assembly info attributes of the assembly at `path`
    ///
    /// ## Arguments
    /// * 'path' - Path to the assembly, relative paths are resolved against the working
    ///   directory of the environment
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] for an empty path
    /// - [`Error::FileNotFound`] if the resolved path is not an existing file
    /// - the reader's error if the file is not a readable assembly
    /// - [`Error::DuplicateAttribute`], [`Error::MissingArgument`] or
    ///   [`Error::TypeConversionInvalid`] if an attribute cannot be read
    pub fn reflect(&self, path: impl AsRef<Path>) -> Result<ParseResult> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("path"));
        }

        let path = resolve_path(path, &self.environment)?;
        if !self.file_system.exists(&path) {
            return Err(Error::FileNotFound(path));
        }

        log::debug!("reading assembly info of {}", path.display());

        let view = ModuleView::from_file_with(&path, self.config.load_mode)?;
        // Identification only, an unreadable name or mvid does not fail the read
        log::debug!(
            "loaded module {:?} ({:?})",
            view.module_name().ok(),
            view.mvid().ok().flatten()
        );

        let attributes = view.assembly_attributes(self.config.max_nesting_depth)?;
        log::debug!("assembly carries {} attributes", attributes.len());

        read_known_attributes(&attributes)
    }
}

fn read_known_attributes(attributes: &[AssemblyAttribute<'_>]) -> Result<ParseResult> {
    let single = |kind: KnownAttribute| lookup_single(attributes, kind.full_name(), string_form);

    Ok(ParseResult::new(
        single(KnownAttribute::ClsCompliant)?,
        single(KnownAttribute::Company)?,
        lookup_single(
            attributes,
            KnownAttribute::ComVisible.full_name(),
            boolean_form,
        )?,
        single(KnownAttribute::Configuration)?,
        single(KnownAttribute::Copyright)?,
        single(KnownAttribute::Description)?,
        single(KnownAttribute::FileVersion)?,
        single(KnownAttribute::Guid)?,
        single(KnownAttribute::InformationalVersion)?,
        single(KnownAttribute::Product)?,
        single(KnownAttribute::Title)?,
        single(KnownAttribute::Trademark)?,
        single(KnownAttribute::Version)?,
        lookup_all(
            attributes,
            KnownAttribute::InternalsVisibleTo.full_name(),
            string_value,
        )?,
    ))
}

/// Read the assembly info attributes of the assembly at `path`
///
/// Relative paths are resolved against the current directory of the process.
///
/// # Errors
/// See [`AssemblyInfoReflector::reflect`]
pub fn reflect_assembly_info(path: impl AsRef<Path>) -> Result<ParseResult> {
    AssemblyInfoReflector::new(PhysicalFileSystem, ProcessEnvironment).reflect(path)
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, path::PathBuf};

    use super::*;
    use crate::test::{AssemblyBuilder, TestArgument};

    /// Records whether it was asked anything
    #[derive(Default)]
    struct ProbingFileSystem {
        probed: Cell<bool>,
    }

    impl FileSystem for ProbingFileSystem {
        fn exists(&self, _path: &Path) -> bool {
            self.probed.set(true);
            false
        }
    }

    struct FixedEnvironment(PathBuf);

    impl Environment for FixedEnvironment {
        fn working_directory(&self) -> Result<PathBuf> {
            Ok(self.0.clone())
        }
    }

    fn write_assembly(builder: AssemblyBuilder) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Acme.Core.dll");
        std::fs::write(&path, builder.build()).unwrap();
        (dir, path)
    }

    #[test]
    fn empty_path_is_rejected_before_io() {
        let reflector = AssemblyInfoReflector::new(
            ProbingFileSystem::default(),
            FixedEnvironment(PathBuf::new()),
        );

        assert!(matches!(
            reflector.reflect(""),
            Err(Error::InvalidArgument("path"))
        ));
        assert!(!reflector.file_system.probed.get());
    }

    #[test]
    fn missing_file_reports_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let reflector = AssemblyInfoReflector::new(
            ProbingFileSystem::default(),
            FixedEnvironment(dir.path().to_path_buf()),
        );

        let error = reflector.reflect("bin/Missing.dll").unwrap_err();
        let expected = dir.path().join("bin").join("Missing.dll");
        assert!(reflector.file_system.probed.get());
        assert_eq!(
            error.to_string(),
            format!("Assembly file '{}' does not exist.", expected.display())
        );
        assert!(matches!(error, Error::FileNotFound(path) if path == expected));
    }

    #[test]
    fn reads_known_attributes() {
        let (dir, _path) = write_assembly(
            AssemblyBuilder::new("Acme.Core")
                .attribute(
                    KnownAttribute::ClsCompliant.full_name(),
                    TestArgument::Bool(true),
                )
                .attribute(
                    KnownAttribute::ComVisible.full_name(),
                    TestArgument::Bool(false),
                )
                .attribute(
                    KnownAttribute::Guid.full_name(),
                    TestArgument::String("0f4e3a2b-1c5d-4e6f-8a9b-0c1d2e3f4a5b"),
                )
                .attribute(
                    KnownAttribute::Configuration.full_name(),
                    TestArgument::String(""),
                )
                .module_attribute(
                    KnownAttribute::Title.full_name(),
                    TestArgument::String("ignored"),
                ),
        );

        let reflector = AssemblyInfoReflector::with_config(
            PhysicalFileSystem,
            FixedEnvironment(dir.path().to_path_buf()),
            ReflectorConfig::buffered(),
        );
        let info = reflector.reflect("Acme.Core.dll").unwrap();

        assert_eq!(info.cls_compliant(), Some("True"));
        assert_eq!(info.com_visible(), Some("False"));
        assert_eq!(info.guid(), Some("0f4e3a2b-1c5d-4e6f-8a9b-0c1d2e3f4a5b"));
        assert_eq!(info.configuration(), None);
        assert_eq!(info.title(), None);
        assert_eq!(info.internals_visible_to(), None);
    }

    #[test]
    fn unreadable_module_name_is_not_an_error() {
        let builder = AssemblyBuilder::new("Acme.Core")
            .attribute(
                KnownAttribute::Company.full_name(),
                TestArgument::String("Acme"),
            )
            .module_name_index(0xFFFF);
        assert!(matches!(
            ModuleView::from_mem(builder.build()).unwrap().module_name(),
            Err(Error::OutOfBounds)
        ));
        let (_dir, path) = write_assembly(builder);

        for level in [log::LevelFilter::Off, log::LevelFilter::Debug] {
            log::set_max_level(level);
            let info = reflect_assembly_info(&path);
            log::set_max_level(log::LevelFilter::Off);
            assert_eq!(info.unwrap().company(), Some("Acme"));
        }
    }

    #[test]
    fn com_visible_must_be_boolean() {
        let (_dir, path) = write_assembly(AssemblyBuilder::new("Acme.Core").attribute(
            KnownAttribute::ComVisible.full_name(),
            TestArgument::String("true"),
        ));

        assert!(matches!(
            reflect_assembly_info(&path),
            Err(Error::TypeConversionInvalid)
        ));
    }

    #[test]
    fn array_arguments_cannot_be_rendered() {
        let (_dir, path) = write_assembly(AssemblyBuilder::new("Acme.Core").attribute(
            KnownAttribute::Description.full_name(),
            TestArgument::StringArray(&["a", "b"]),
        ));

        assert!(matches!(
            reflect_assembly_info(&path),
            Err(Error::TypeConversionInvalid)
        ));
    }

    #[test]
    fn netmodules_are_rejected() {
        let (_dir, path) = write_assembly(AssemblyBuilder::new("Acme.Core").without_assembly());

        assert!(matches!(
            reflect_assembly_info(&path),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn nesting_depth_is_configurable() {
        let (dir, _path) = write_assembly(
            AssemblyBuilder::new("Acme.Core")
                .attribute("Acme.Outer/Middle/InnerAttribute", TestArgument::None),
        );

        let shallow = AssemblyInfoReflector::with_config(
            PhysicalFileSystem,
            FixedEnvironment(dir.path().to_path_buf()),
            ReflectorConfig {
                max_nesting_depth: 2,
                ..ReflectorConfig::default()
            },
        );
        assert!(matches!(
            shallow.reflect("Acme.Core.dll"),
            Err(Error::RecursionLimit(2))
        ));

        let deep = AssemblyInfoReflector::new(
            PhysicalFileSystem,
            FixedEnvironment(dir.path().to_path_buf()),
        );
        assert_eq!(deep.reflect("Acme.Core.dll").unwrap(), ParseResult::default());
    }
}

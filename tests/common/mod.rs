//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

#[path = "../../src/test/builder.rs"]
mod builder;

pub use builder::{AssemblyBuilder, TestArgument, EXTERNAL_ENUM, LOCAL_ENUM};

/// Write the image of `builder` to `name` inside a fresh temporary directory
pub fn write_assembly(builder: &AssemblyBuilder, name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, builder.build()).unwrap();
    (dir, path)
}

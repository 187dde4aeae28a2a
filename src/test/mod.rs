//! Fixtures shared by the unit tests.
//!
//! The same builder is included by the integration tests and the benches through `#[path]`.

mod builder;

pub use builder::{AssemblyBuilder, TestArgument, EXTERNAL_ENUM, LOCAL_ENUM};

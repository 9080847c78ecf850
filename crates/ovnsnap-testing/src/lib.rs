//! Testing infrastructure for ovnsnap integration tests.
//!
//! - `TestWorld`: isolated snapshot directory, config and fake engine for CLI tests
//! - `fixtures`: OVSDB file writer
//! - `runtime`: in-memory `ContainerRuntime` recording every call
//! - `assertions`: helper-script and JSON assertions

pub mod assertions;
pub mod fixtures;
pub mod runtime;
pub mod world;

pub use fixtures::OvsdbFixture;
pub use runtime::{Call, FakeRuntime};
pub use world::{CliResult, TestWorld};

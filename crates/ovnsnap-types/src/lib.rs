//! Core types shared by every ovnsnap crate.
//!
//! - `Role` / `RoleFilter`: which OVN database a file holds and which ones to keep
//! - `DatabaseRecord`: one discovered database file
//! - `Fleet`: the ordered, immutable set of records for one invocation

pub mod error;
pub mod fleet;
pub mod role;

pub use error::{Error, Result};
pub use fleet::{DatabaseRecord, Fleet, container_name, sanitize_name_component};
pub use role::{Role, RoleFilter, RoleSpec, StorageFormat};

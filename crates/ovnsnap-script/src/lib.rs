//! Helper shell-script generation.
//!
//! The generated file is sourced into an interactive bash session and gives
//! named shortcuts for the containers of one fleet. Rendering is pure; only
//! `write_script` touches the filesystem.

pub mod error;
pub mod render;

pub use error::{Error, Result};
pub use render::{ScriptContext, ScriptEntry, render, shell_quote, write_script};

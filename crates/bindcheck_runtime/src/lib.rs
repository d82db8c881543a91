//! Snapshot loading, multi-unit driver, and CLI for bindcheck.
//!
//! This crate provides:
//! - [`ProgramSnapshot`] - A serialized program load, in JSON or `MessagePack`
//! - [`Driver`] - Analyzes every unit of a snapshot in dependency order
//! - The `bindcheck` command-line tool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod driver;
pub mod snapshot;

pub use driver::{Driver, DriverReport, dependency_order};
pub use snapshot::{
    ProgramSnapshot, SnapshotFormat, from_bytes, from_json, load_from_file, save_to_file,
    to_bytes, to_json,
};

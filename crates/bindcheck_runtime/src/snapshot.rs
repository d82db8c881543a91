//! Program snapshots and their on-disk formats.
//!
//! A front-end that loads and type-checks the analyzed program ships the
//! result here as a [`ProgramSnapshot`]. Files ending in `.json` are JSON;
//! everything else is `MessagePack`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bindcheck_foundation::{Error, ErrorContext, Result};
use bindcheck_program::{Unit, Universe};
use serde::{Deserialize, Serialize};

/// A whole program load: the shared universe plus every unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    /// Types and declarations shared by all units.
    pub universe: Universe,
    /// The compilation units, in any order.
    pub units: Vec<Unit>,
}

impl ProgramSnapshot {
    /// Creates a snapshot with no units.
    #[must_use]
    pub fn new(universe: Universe) -> Self {
        Self {
            universe,
            units: Vec::new(),
        }
    }

    /// Adds a unit.
    #[must_use]
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Finds a unit by module path.
    #[must_use]
    pub fn unit(&self, module: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.module == module)
    }
}

/// Encoding of a snapshot file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `MessagePack` with named fields.
    MessagePack,
    /// JSON.
    Json,
}

impl SnapshotFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::MessagePack,
        }
    }
}

// =============================================================================
// In-memory encoding
// =============================================================================

/// Serializes a snapshot to `MessagePack` bytes.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(snapshot: &ProgramSnapshot) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(snapshot).map_err(|e| Error::snapshot(e.to_string()))
}

/// Deserializes a snapshot from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<ProgramSnapshot> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::snapshot(e.to_string()))
}

/// Serializes a snapshot to JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(snapshot: &ProgramSnapshot) -> Result<String> {
    serde_json::to_string(snapshot).map_err(|e| Error::snapshot(e.to_string()))
}

/// Deserializes a snapshot from JSON.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_json(text: &str) -> Result<ProgramSnapshot> {
    serde_json::from_str(text).map_err(|e| Error::snapshot(e.to_string()))
}

// =============================================================================
// Files
// =============================================================================

/// Saves a snapshot, choosing the format from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(snapshot: &ProgramSnapshot, path: P) -> Result<()> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let bytes = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => to_json(snapshot)?.into_bytes(),
        SnapshotFormat::MessagePack => to_bytes(snapshot)?,
    };

    let file = File::create(path).map_err(|e| Error::io(shown.clone(), &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(shown.clone(), &e))?;
    writer.flush().map_err(|e| Error::io(shown, &e))?;

    Ok(())
}

/// Loads a snapshot, choosing the format from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ProgramSnapshot> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let file = File::open(path).map_err(|e| Error::io(shown.clone(), &e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(shown.clone(), &e))?;

    let decoded = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => std::str::from_utf8(&bytes)
            .map_err(|e| Error::snapshot(e.to_string()))
            .and_then(from_json),
        SnapshotFormat::MessagePack => from_bytes(&bytes),
    };
    let snapshot =
        decoded.map_err(|e| e.with_context(ErrorContext::new().with_source(shown.clone())))?;

    tracing::debug!(path = %shown, units = snapshot.units.len(), "snapshot loaded");
    Ok(snapshot)
}

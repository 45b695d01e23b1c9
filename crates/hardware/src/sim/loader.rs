//! Program image loading.
//!
//! Micro-program images are raw little-endian micro-words, lower word first,
//! exactly as they sit in micro memory.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::error::Result;

/// Loads a binary file from disk into a byte vector.
///
/// # Arguments
///
/// * `path` - Path to the binary file.
///
/// # Returns
///
/// The raw bytes of the file, or `VuError::Io` if it cannot be read.
pub fn load_binary(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), len = bytes.len(), "image read");
    Ok(bytes)
}

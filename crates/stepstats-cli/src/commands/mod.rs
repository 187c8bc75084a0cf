//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod convert;
pub mod preview;

use std::path::Path;

/// Progress line printed before each file is parsed
pub(crate) fn announce_file(path: &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    eprintln!("Parsing {}", name);
}

//! Newline-delimited input files (container names, directory prefixes).

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads `path` line by line, keeping order and every line (blank ones included).
/// Only the line terminator (`\n` or `\r\n`) is stripped. Fails as a whole on
/// any open or read error.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("read {}", path.display()))
}

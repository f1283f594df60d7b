//! # Pre-built Key Lists
//!
//! Colliding keys that were computed ahead of time, stored as plain UTF-8 text with one key per
//! line and no header. A resource name is resolved in two places, in order:
//!
//! 1. the **embedded** namespace compiled into the crate (see [`embedded`]);
//! 2. the **filesystem**, either relative to a caller-supplied directory or to the working
//!    directory.
//!
//! Reading stops after `max_lines` keys; a shorter file is a valid partial result.
//!
//! ```rust
//! use hashflood::prebuilt;
//!
//! let keys = prebuilt::read_lines("djbx31a.txt", 3, None).unwrap();
//! assert_eq!(keys, vec!["xwxwxwxwxwxwxwxw", "xwxwxwxwxwxwxwyX", "xwxwxwxwxwxwxwz9"]);
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Resources compiled into the crate.
static EMBEDDED: &[(&str, &str)] = &[
    ("djbx31a.txt", include_str!("../resources/djbx31a.txt")),
    ("djbx33a.txt", include_str!("../resources/djbx33a.txt")),
];

/// Looks up an embedded resource by name.
pub fn embedded(name: &str) -> Option<&'static str> {
    EMBEDDED
        .iter()
        .find(|(resource, _)| *resource == name)
        .map(|(_, contents)| *contents)
}

/// Reads at most `max_lines` keys from the named resource.
///
/// # Errors
/// - [`Error::InvalidArgument`] if `max_lines` is zero.
/// - [`Error::ResourceUnavailable`] if the resource is missing, unreadable or not UTF-8.
pub fn read_lines(name: &str, max_lines: usize, dir: Option<&Path>) -> Result<Vec<String>> {
    if max_lines == 0 {
        return Err(Error::invalid_argument("max_lines must be positive"));
    }

    if let Some(contents) = embedded(name) {
        return Ok(contents
            .lines()
            .take(max_lines)
            .map(str::to_owned)
            .collect());
    }

    let path = resolve(name, dir);
    debug!(
        "Unable to find {} among embedded resources, reading {} instead",
        name,
        path.display()
    );
    let file = File::open(&path).map_err(|e| Error::resource(name, e))?;
    let mut lines = Vec::with_capacity(max_lines.min(1 << 16));
    for line in BufReader::new(file).lines().take(max_lines) {
        lines.push(line.map_err(|e| Error::resource(name, e))?);
    }
    Ok(lines)
}

/// Writes keys to `path` in the resource format, replacing any existing file.
///
/// # Errors
/// - [`Error::Encoding`] if a key contains a line break.
/// - [`Error::ResourceUnavailable`] if the file cannot be written.
pub fn write_lines<S: AsRef<str>>(path: &Path, keys: &[S]) -> Result<()> {
    if let Some(key) = keys
        .iter()
        .map(AsRef::as_ref)
        .find(|key| key.contains(['\n', '\r']))
    {
        return Err(Error::Encoding(format!(
            "key {key:?} cannot be stored one per line"
        )));
    }

    let name = path.display().to_string();
    let write = || -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for key in keys {
            writeln!(out, "{}", key.as_ref())?;
        }
        out.flush()
    };
    write().map_err(|e| Error::resource(name, e))
}

fn resolve(name: &str, dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

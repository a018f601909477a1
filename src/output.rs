//! Progress lines for the treekmz commands.
//!
//! Each line is a right-aligned verb followed by a message, written to
//! stderr so a KMZ streamed to stdout stays clean.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Column the verbs are right-aligned to.
const VERB_WIDTH: usize = 12;

/// Colour of a progress verb.
#[derive(Debug, Clone, Copy)]
enum Tone {
    Progress,
    Note,
    Caution,
    Failure,
}

impl Tone {
    /// Bold SGR sequence for the verb.
    fn sgr(self) -> &'static str {
        match self {
            Tone::Progress => "\x1b[1;32m",
            Tone::Note => "\x1b[1;36m",
            Tone::Caution => "\x1b[1;33m",
            Tone::Failure => "\x1b[1;31m",
        }
    }
}

/// Writes progress lines, coloured only when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Step of a conversion, such as `Reading trees.csv`.
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(Tone::Progress, verb, message);
    }

    /// Follow-up detail such as a `help` hint.
    pub fn info(&self, verb: &str, message: &str) {
        self.emit(Tone::Note, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(Tone::Caution, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.emit(Tone::Failure, verb, message);
    }

    fn emit(&self, tone: Tone, verb: &str, message: &str) {
        let line = if self.color {
            format!("{}{verb:>VERB_WIDTH$}\x1b[0m {message}", tone.sgr())
        } else {
            format!("{verb:>VERB_WIDTH$} {message}")
        };
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Count with the matching noun, e.g. `3 trees` or `1 category`.
pub fn plural<N>(n: N, one: &str, many: &str) -> String
where
    N: Display + PartialEq + From<u8>,
{
    let noun = if n == N::from(1) { one } else { many };
    format!("{n} {noun}")
}

/// Path as shown in progress lines: relative to the working directory
/// when it lives below it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_singular() {
        assert_eq!(plural(1usize, "placemark", "placemarks"), "1 placemark");
    }

    #[test]
    fn test_plural_zero() {
        assert_eq!(plural(0u64, "row", "rows"), "0 rows");
    }

    #[test]
    fn test_plural_many() {
        assert_eq!(plural(5usize, "category", "categories"), "5 categories");
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let p = Path::new("/nonexistent/path/to/trees.kmz");
        assert_eq!(display_path(p), "/nonexistent/path/to/trees.kmz");
    }

    #[test]
    fn test_display_path_below_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let inside = cwd.join("maps").join("trees.kmz");
        let expected = Path::new("maps").join("trees.kmz");
        assert_eq!(display_path(&inside), expected.display().to_string());
        assert_eq!(display_path(&cwd), ".");
    }
}

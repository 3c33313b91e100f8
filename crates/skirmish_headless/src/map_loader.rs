//! Map file loading.
//!
//! Map files are plain text, one board row per line. Trailing whitespace
//! (including `\r` from Windows line endings) is trimmed and blank lines are
//! dropped; everything else is handed to the core parser unchanged.

use std::path::Path;

use thiserror::Error;

/// Error type for map loading.
#[derive(Error, Debug)]
pub enum MapError {
    /// File not found.
    #[error("Map file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read map file: {0}")]
    ReadError(#[from] std::io::Error),
    /// File holds no rows.
    #[error("Map file is empty: {0}")]
    Empty(String),
}

/// Split map text into board rows.
#[must_use]
pub fn split_rows(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load board rows from a map file.
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<String>, MapError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MapError::FileNotFound(path.display().to_string()));
    }

    let contents = std::fs::read_to_string(path)?;
    let rows = split_rows(&contents);
    if rows.is_empty() {
        return Err(MapError::Empty(path.display().to_string()));
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "Loaded map");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_split_rows_trims_and_skips_blanks() {
        let rows = split_rows("#####\r\n#E.G#   \n\n#####\n\n");
        assert_eq!(rows, vec!["#####", "#E.G#", "#####"]);
    }

    #[test]
    fn test_load_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "#####").unwrap();
        writeln!(file, "#E.G#").unwrap();
        writeln!(file, "#####").unwrap();

        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "#E.G#");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_rows("/no/such/map.txt"),
            Err(MapError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_blank_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(load_rows(file.path()), Err(MapError::Empty(_))));
    }
}

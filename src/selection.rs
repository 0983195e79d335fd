use crate::decoder::ArchiveFormat;
use std::path::{Path, PathBuf};

/// Separator used when a selection travels as a single string.
pub const SELECTION_SEPARATOR: &str = "; ";

/// The ordered set of paths chosen for one batch. Paths are kept as given,
/// so names that are not valid UTF-8 reach the pipeline unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<PathBuf>,
}

impl Selection {
    /// Splits a `"; "`-joined string. Entries are trimmed; blank ones are dropped.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(SELECTION_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(PathBuf::from)
            .collect();

        Self { entries }
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let entries = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .filter(|path| !path.as_os_str().is_empty())
            .collect();

        Self { entries }
    }

    pub fn extend(&mut self, other: Selection) {
        self.entries.extend(other.entries);
    }

    /// Textual form for display and logs.
    pub fn join(&self) -> String {
        self.entries
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(SELECTION_SEPARATOR)
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries whose extension is not a supported archive format. They are
    /// still converted (and fail); this is for up-front warnings.
    pub fn unsupported(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|path| ArchiveFormat::from_path(path).is_err())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_parse_trims_and_drops_blanks() {
        let selection = Selection::parse(" /a/one.7z ;  /b/two.rar; ; /c/three.zip ");
        assert_eq!(
            selection.entries(),
            paths(&["/a/one.7z", "/b/two.rar", "/c/three.zip"])
        );
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_empty_string_is_empty_selection() {
        assert!(Selection::parse("").is_empty());
        assert!(Selection::parse("   ").is_empty());
    }

    #[test]
    fn test_join_round_trips() {
        let selection = Selection::from_paths(["x.tar", "dir/y.7z"]);
        assert_eq!(selection.join(), "x.tar; dir/y.7z");
        assert_eq!(Selection::parse(&selection.join()), selection);
    }

    #[test]
    fn test_unsupported_entries() {
        let selection = Selection::parse("a.7z; b.gz; c.TAR; notes");
        assert_eq!(selection.unsupported(), paths(&["b.gz", "notes"]));
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut selection = Selection::from_paths(["first.zip"]);
        selection.extend(Selection::parse("second.rar; third.7z"));
        assert_eq!(
            selection.entries(),
            paths(&["first.zip", "second.rar", "third.7z"])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_from_paths_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = Path::new(OsStr::from_bytes(b"/in/caf\xe9.tar"));
        let selection = Selection::from_paths([raw]);

        assert_eq!(selection.entries()[0].as_os_str().as_bytes(), b"/in/caf\xe9.tar");
        assert!(selection.unsupported().is_empty());
    }
}

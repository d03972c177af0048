use std::path::PathBuf;

/// One embedded Turtle file: its base name and verbatim text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub contents: String,
}

/// All matching files found directly in one directory.
///
/// Bundles are kept in an ordered list rather than keyed by name: two
/// directories with the same base name in different subtrees stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Base name of the directory.
    pub name: String,
    /// Full path of the directory as visited during the scan.
    pub path: PathBuf,
    pub resources: Vec<Resource>,
}

impl Bundle {
    /// Total number of characters embedded in this bundle.
    pub fn char_count(&self) -> usize {
        self.resources
            .iter()
            .map(|r| r.contents.chars().count())
            .sum()
    }
}

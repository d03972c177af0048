use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use walkdir::WalkDir;

use crate::embed::read_resource;
use crate::error::ScanError;
use crate::model::Bundle;

/// Suffix identifying LV2 Turtle files.
pub const DEFAULT_SUFFIX: &str = ".ttl";

/// Options controlling directory traversal.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File name suffix to match, compared case-sensitively.
    pub suffix: String,
    /// Descend into symbolic links to directories.
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            follow_links: false,
        }
    }
}

/// A visited directory and the matching file names directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurtleDir {
    pub path: PathBuf,
    pub files: Vec<String>,
}

/// Walk `root` and list every directory that directly contains matching files.
///
/// Directories are visited depth-first, parents before children, with
/// siblings sorted by file name. File names within a directory are sorted the
/// same way. Directories without a match are left out.
pub fn turtle_dirs(root: &Path, options: &ScanOptions) -> Result<Vec<TurtleDir>, ScanError> {
    check_root(root)?;

    let mut dirs: IndexMap<PathBuf, Vec<String>> = IndexMap::new();
    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.entry(entry.path().to_path_buf()).or_default();
            continue;
        }
        // Unfollowed links to directories are neither bundles nor files.
        if entry.path_is_symlink() && entry.path().is_dir() {
            continue;
        }
        if !entry
            .file_name()
            .as_encoded_bytes()
            .ends_with(options.suffix.as_bytes())
        {
            continue;
        }

        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| ScanError::NonUtf8Name(entry.path().to_path_buf()))?
            .to_string();
        let parent = entry.path().parent().unwrap_or(root).to_path_buf();
        dirs.entry(parent).or_default().push(name);
    }

    let found: Vec<TurtleDir> = dirs
        .into_iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(path, files)| TurtleDir { path, files })
        .collect();

    info!(
        "found {} bundle directories with {} files under {}",
        found.len(),
        found.iter().map(|d| d.files.len()).sum::<usize>(),
        root.display()
    );
    Ok(found)
}

/// Discover and read every bundle under `root`.
///
/// Any unreadable directory or file aborts the whole scan.
pub fn collect_bundles(root: &Path, options: &ScanOptions) -> Result<Vec<Bundle>, ScanError> {
    turtle_dirs(root, options)?
        .into_iter()
        .map(|dir| {
            let name = bundle_name(&dir.path)?;
            let resources = dir
                .files
                .iter()
                .map(|file| read_resource(&dir.path.join(file)))
                .collect::<Result<Vec<_>, _>>()?;
            debug!(
                "bundle {name} ({}): {} resources",
                dir.path.display(),
                resources.len()
            );
            Ok(Bundle {
                name,
                path: dir.path,
                resources,
            })
        })
        .collect()
}

/// The base name of a bundle directory.
///
/// Paths without a final component (`.`, `..`) are resolved first so the
/// bundle still gets the directory's real name. A filesystem root has no name
/// and yields an empty string.
pub fn bundle_name(dir: &Path) -> Result<String, ScanError> {
    let resolved;
    let name = match dir.file_name() {
        Some(name) => Some(name),
        None => {
            resolved = dir.canonicalize().map_err(|source| ScanError::Read {
                path: dir.to_path_buf(),
                source,
            })?;
            resolved.file_name()
        }
    };

    match name {
        Some(name) => name
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| ScanError::NonUtf8Name(dir.to_path_buf())),
        None => Ok(String::new()),
    }
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ScanError::RootNotFound(root.to_path_buf()))
        }
        Err(source) => Err(ScanError::Read {
            path: root.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_skips_directories_without_matches() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a/manifest.ttl", "abc");
        write(tmp.path(), "a/presets.ttl", "defg");
        write(tmp.path(), "b/readme.txt", "not turtle");

        let dirs = turtle_dirs(tmp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].path, tmp.path().join("a"));
        assert_eq!(dirs[0].files, vec!["manifest.ttl", "presets.ttl"]);
    }

    #[test]
    fn test_parent_before_children_sorted_siblings() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "top.ttl", "");
        write(tmp.path(), "z/z.ttl", "");
        write(tmp.path(), "a/zz.ttl", "");
        write(tmp.path(), "a/inner/i.ttl", "");
        write(tmp.path(), "a/aa.ttl", "");

        let dirs = turtle_dirs(tmp.path(), &ScanOptions::default()).unwrap();
        let paths: Vec<PathBuf> = dirs.iter().map(|d| d.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                tmp.path().to_path_buf(),
                tmp.path().join("a"),
                tmp.path().join("a/inner"),
                tmp.path().join("z"),
            ]
        );
        assert_eq!(dirs[1].files, vec!["aa.ttl", "zz.ttl"]);
    }

    #[test]
    fn test_suffix_is_literal_and_case_sensitive() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "x/.ttl", "");
        write(tmp.path(), "x/upper.TTL", "");
        write(tmp.path(), "x/manifest.ttl.bak", "");
        write(tmp.path(), "x/plugin.ttl", "");

        let dirs = turtle_dirs(tmp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(dirs[0].files, vec![".ttl", "plugin.ttl"]);
    }

    #[test]
    fn test_custom_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "x/plugin.ttl", "");
        write(tmp.path(), "x/plugin.n3", "");

        let options = ScanOptions {
            suffix: ".n3".to_string(),
            ..ScanOptions::default()
        };
        let dirs = turtle_dirs(tmp.path(), &options).unwrap();
        assert_eq!(dirs[0].files, vec!["plugin.n3"]);
    }

    #[test]
    fn test_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let err = turtle_dirs(&tmp.path().join("nope"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound(_)));
    }

    #[test]
    fn test_root_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "lone.ttl", "");
        let err =
            turtle_dirs(&tmp.path().join("lone.ttl"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_empty_root() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("empty")).unwrap();
        let bundles = collect_bundles(tmp.path(), &ScanOptions::default()).unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn test_same_named_directories_stay_distinct() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "one/core/a.ttl", "first");
        write(tmp.path(), "two/core/a.ttl", "second");

        let bundles = collect_bundles(tmp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(bundles.len(), 2);
        assert!(bundles.iter().all(|b| b.name == "core"));
        assert_eq!(bundles[0].resources[0].contents, "first");
        assert_eq!(bundles[1].resources[0].contents, "second");
    }

    #[test]
    fn test_bundle_name_of_dot_path() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("lv2");
        fs::create_dir(&dir).unwrap();
        assert_eq!(bundle_name(&dir).unwrap(), "lv2");
        assert_eq!(bundle_name(&dir.join(".")).unwrap(), "lv2");
        assert_eq!(bundle_name(&dir.join("..")).unwrap(), bundle_name(tmp.path()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_unfollowed_directory_links_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "real/plugin.ttl", "x");
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link.ttl")).unwrap();

        let dirs = turtle_dirs(tmp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].path, tmp.path().join("real"));

        let options = ScanOptions {
            follow_links: true,
            ..ScanOptions::default()
        };
        let dirs = turtle_dirs(tmp.path(), &options).unwrap();
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[0].path, tmp.path().join("link.ttl"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a/good.ttl", "x");
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("a/dangling.ttl"))
            .unwrap();

        let err = collect_bundles(tmp.path(), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScanError::Read { .. }));
    }
}

use std::path::{Path, PathBuf};

/// Return a [`PathBuf`] pointing to the workspace root of the sharetree repository. For example,
/// use
/// ```rust
/// # use sharetree_utils::project_root::project_root;
/// # use std::path::PathBuf;
/// let readme = project_root().join("README.md");
/// # assert_eq!(readme, PathBuf::from(&concat!(env!("CARGO_MANIFEST_DIR"), "/../README.md")))
/// ```
///
/// This is a workaround for the lack of a CARGO_WORKSPACE_DIR environment variable.
pub fn project_root() -> PathBuf {
    PathBuf::from(&concat!(env!("CARGO_MANIFEST_DIR"), "/.."))
}

/// Resolves `path` against the workspace root, unless it is absolute.
pub fn resolve(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_owned()
    } else {
        project_root().join(path)
    }
}

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Separator between entries of a path-list variable such as `PYTHONPATH`
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: &str = ";";

/// Separator between entries of a path-list variable such as `PYTHONPATH`
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: &str = ":";

/// Prepend `entry` to a path-list value, keeping `existing` byte-for-byte after the separator.
pub fn prepend_path_list(entry: &Path, existing: Option<&OsStr>) -> OsString {
  let mut value = OsString::from(entry.as_os_str());
  if let Some(existing) = existing {
    value.push(PATH_LIST_SEPARATOR);
    value.push(existing);
  }
  value
}

/// Split a path-list value into its entries, dropping empty ones.
pub fn split_path_list(value: &OsStr) -> Vec<PathBuf> {
  std::env::split_paths(value)
    .filter(|p| !p.as_os_str().is_empty())
    .collect()
}

/// Walk from `start` towards the filesystem root looking for an entry named `name`.
///
/// Returns the first `<ancestor>/<name>` that exists, or `None` once the root
/// has been checked.
pub fn find_dir(name: &str, start: &Path) -> Option<PathBuf> {
  start
    .ancestors()
    .map(|dir| dir.join(name))
    .find(|candidate| candidate.exists())
}

//! Module search state handed to the interpreter.
//!
//! The state pairs the inheritable path-list variable (`PYTHONPATH`) with the
//! ordered list of directories the interpreter searches in-process. It is a
//! plain value: locating `mbuild` produces a new state instead of mutating the
//! launcher's own environment, and the state is applied to each spawned child.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::platform::paths::{prepend_path_list, split_path_list};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
  #[error("module search entry is not valid UTF-8: {}", entry.display())]
  NonUtf8Entry { entry: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSearchState {
  var: String,
  inherited: Option<OsString>,
  entries: Vec<PathBuf>,
}

impl ModuleSearchState {
  /// Build the state the interpreter would start with for `script`.
  ///
  /// The script's directory comes first, followed by the entries of the
  /// inheritable variable in order.
  pub fn new(var: impl Into<String>, inherited: Option<OsString>, script: &Path) -> Self {
    let mut entries = vec![script_dir(script)];
    if let Some(value) = &inherited {
      entries.extend(split_path_list(value));
    }
    Self {
      var: var.into(),
      inherited,
      entries,
    }
  }

  /// Read the inheritable variable from the current process environment.
  pub fn from_env(var: &str, script: &Path) -> Self {
    Self::new(var, std::env::var_os(var), script)
  }

  /// Name of the inheritable path-list variable.
  pub fn var(&self) -> &str {
    &self.var
  }

  /// Value exported to children, `None` when the variable is unset.
  pub fn inherited(&self) -> Option<&OsStr> {
    self.inherited.as_deref()
  }

  /// In-process search list, highest priority first.
  pub fn entries(&self) -> &[PathBuf] {
    &self.entries
  }

  /// Return a new state with `dir` in front of both the variable and the search list.
  pub fn with_prepended(&self, dir: &Path) -> Self {
    let inherited = prepend_path_list(dir, self.inherited.as_deref());
    let mut entries = Vec::with_capacity(self.entries.len() + 1);
    entries.push(dir.to_path_buf());
    entries.extend(self.entries.iter().cloned());
    debug!(var = %self.var, value = ?inherited, "prepended search path");
    Self {
      var: self.var.clone(),
      inherited: Some(inherited),
      entries,
    }
  }

  /// Export the inheritable variable to a child process.
  pub fn apply_to(&self, command: &mut Command) {
    match &self.inherited {
      Some(value) => command.env(&self.var, value),
      None => command.env_remove(&self.var),
    };
  }

  /// Search list as strings, for handing to the interpreter bootstrap.
  ///
  /// Entries that are not valid UTF-8 are rejected rather than altered.
  pub fn entries_utf8(&self) -> Result<Vec<&str>, SearchError> {
    self
      .entries
      .iter()
      .map(|entry| {
        entry.to_str().ok_or_else(|| SearchError::NonUtf8Entry {
          entry: entry.clone(),
        })
      })
      .collect()
  }
}

/// Directory the interpreter places first on its search list for `script`.
///
/// A bare file name yields an empty path, meaning the working directory.
fn script_dir(script: &Path) -> PathBuf {
  script.parent().map(Path::to_path_buf).unwrap_or_default()
}

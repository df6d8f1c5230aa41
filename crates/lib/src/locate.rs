//! Locating the `mbuild` build-support package.
//!
//! Whether `mbuild` is already importable is asked of the interpreter. When it
//! is not, two install locations are probed:
//! the directory next to the one holding the invoking script, then the
//! nearest `mbuild` found walking up from the working directory. The first
//! that exists is prepended to the module search state.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::SUPPORT_MODULE;
use crate::finder::{FindError, ModuleFinder};
use crate::platform::paths::find_dir;
use crate::search::ModuleSearchState;

#[derive(Debug, Error)]
pub enum LocateError {
  #[error("mfile cannot find the mbuild directory: [{}] or [{}]", derived.display(), relative.display())]
  NotFound { derived: PathBuf, relative: PathBuf },

  #[error(transparent)]
  Find(#[from] FindError),
}

/// The two install locations probed for `mbuild`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
  /// `<dir of script>/../mbuild`, kept textual so diagnostics show what was probed.
  pub derived: PathBuf,
  /// Nearest `mbuild` above the working directory, empty when none was found.
  pub relative: PathBuf,
}

impl Candidates {
  pub fn compute(script: &Path, cwd: &Path) -> Self {
    let script_dir = script.parent().unwrap_or(Path::new(""));
    Self {
      derived: script_dir.join("..").join(SUPPORT_MODULE),
      relative: find_dir(SUPPORT_MODULE, cwd).unwrap_or_default(),
    }
  }

  /// The first candidate that exists on the filesystem.
  ///
  /// An empty relative candidate never exists.
  pub fn select(&self) -> Result<&Path, LocateError> {
    if self.derived.exists() {
      return Ok(self.derived.as_path());
    }
    if !self.relative.as_os_str().is_empty() && self.relative.exists() {
      return Ok(self.relative.as_path());
    }
    Err(LocateError::NotFound {
      derived: self.derived.clone(),
      relative: self.relative.clone(),
    })
  }
}

/// How `mbuild` became importable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// Already importable; the state is returned unchanged.
  Present(ModuleSearchState),
  /// Found at `path`, which has been prepended to the state.
  Prepended { path: PathBuf, state: ModuleSearchState },
}

impl Resolution {
  pub fn state(&self) -> &ModuleSearchState {
    match self {
      Self::Present(state) | Self::Prepended { state, .. } => state,
    }
  }

  pub fn into_state(self) -> ModuleSearchState {
    match self {
      Self::Present(state) | Self::Prepended { state, .. } => state,
    }
  }
}

/// Make `mbuild` importable through `state`.
///
/// Idempotent: an `mbuild` the interpreter can already import, from anywhere
/// on its search path, leaves the state untouched. On failure no new state is
/// produced.
pub fn locate_support(
  state: &ModuleSearchState,
  script: &Path,
  cwd: &Path,
  finder: &dyn ModuleFinder,
) -> Result<Resolution, LocateError> {
  if finder.find(SUPPORT_MODULE, state)? {
    debug!("{} already importable", SUPPORT_MODULE);
    return Ok(Resolution::Present(state.clone()));
  }

  let candidates = Candidates::compute(script, cwd);
  debug!(
    derived = %candidates.derived.display(),
    relative = %candidates.relative.display(),
    "probing {} install locations",
    SUPPORT_MODULE
  );

  let path = candidates.select()?.to_path_buf();
  info!(path = %path.display(), var = %state.var(), "adding {} to module search path", SUPPORT_MODULE);

  Ok(Resolution::Prepended {
    state: state.with_prepended(&path),
    path,
  })
}

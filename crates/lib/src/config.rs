//! Launcher configuration.
//!
//! Everything the launcher needs from its surroundings is read once here:
//! the invoking script path, the working directory, the interpreter and the
//! module search state inherited from the environment.

use std::path::PathBuf;

use thiserror::Error;

use crate::consts::{DEFAULT_INTERPRETER, INTERPRETER_VAR, MIN_RUNTIME, SEARCH_PATH_VAR};
use crate::search::ModuleSearchState;
use crate::version::RuntimeVersion;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to determine the working directory")]
  WorkingDir(#[source] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct LaunchConfig {
  /// Path the launcher was invoked as.
  pub script: PathBuf,
  /// Directory builds run in and the upward `mbuild` search starts from.
  pub cwd: PathBuf,
  /// Interpreter running the orchestrator and the packager.
  pub interpreter: PathBuf,
  pub min_runtime: RuntimeVersion,
  /// Search state inherited from the environment at start-up.
  pub search: ModuleSearchState,
}

impl LaunchConfig {
  pub fn from_env(script: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let script = script.into();
    let cwd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
    let search = ModuleSearchState::from_env(SEARCH_PATH_VAR, &script);

    Ok(Self {
      script,
      cwd,
      interpreter: interpreter(),
      min_runtime: MIN_RUNTIME.into(),
      search,
    })
  }
}

/// Interpreter from `MFILE_PYTHON`, falling back to the platform default.
pub fn interpreter() -> PathBuf {
  std::env::var_os(INTERPRETER_VAR)
    .filter(|value| !value.is_empty())
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_INTERPRETER))
}

//! Launcher-level error type.

use thiserror::Error;

use crate::locate::LocateError;
use crate::orchestrator::{ImportError, Termination};
use crate::package::PackageError;
use crate::version::VersionError;

/// Why `mbuild` could not be made importable.
#[derive(Debug, Error)]
pub enum SupportError {
  #[error(transparent)]
  Version(#[from] VersionError),

  #[error(transparent)]
  Locate(#[from] LocateError),
}

#[derive(Debug, Error)]
pub enum BootError {
  /// Version gate or dependency lookup failed. The headline stays fixed, the
  /// cause is kept both in the message and as the error source.
  #[error("mbuild import failed: {0}")]
  SupportImport(#[source] SupportError),

  #[error("orchestrator import failed: {0}")]
  OrchestratorImport(#[from] ImportError),

  /// The companion handler decided how the process ends.
  #[error("{0}")]
  Orchestrator(Termination),

  #[error("extension packaging failed: {0}")]
  Package(#[from] PackageError),
}

impl BootError {
  /// Process exit code for this failure.
  pub fn exit_code(&self) -> i32 {
    match self {
      Self::Orchestrator(termination) => termination.code,
      _ => 1,
    }
  }
}

impl From<VersionError> for BootError {
  fn from(err: VersionError) -> Self {
    Self::SupportImport(err.into())
  }
}

impl From<LocateError> for BootError {
  fn from(err: LocateError) -> Self {
    Self::SupportImport(err.into())
  }
}

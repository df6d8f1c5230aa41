//! Interpreter version gate.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
  #[error("interpreter {actual} is older than the required {required}")]
  TooOld {
    actual: RuntimeVersion,
    required: RuntimeVersion,
  },

  #[error("failed to run {}: {message}", interpreter.display())]
  Probe { interpreter: PathBuf, message: String },

  #[error("unrecognized version output: {output:?}")]
  Unparsable { output: String },
}

/// Interpreter version, compared on `(major, minor)` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuntimeVersion {
  pub major: u32,
  pub minor: u32,
}

impl RuntimeVersion {
  pub const fn new(major: u32, minor: u32) -> Self {
    Self { major, minor }
  }

  /// Parse `Python 3.11.4`, `3.12.0rc1` or `3.9`.
  pub fn parse(text: &str) -> Result<Self, VersionError> {
    let unparsable = || VersionError::Unparsable {
      output: text.to_string(),
    };

    let number = text
      .split_whitespace()
      .find(|word| word.starts_with(|c: char| c.is_ascii_digit()))
      .ok_or_else(unparsable)?;

    let mut parts = number.split('.');
    let major = parts.next().and_then(leading_number).ok_or_else(unparsable)?;
    let minor = parts.next().and_then(leading_number).ok_or_else(unparsable)?;
    Ok(Self::new(major, minor))
  }
}

fn leading_number(part: &str) -> Option<u32> {
  let end = part.find(|c: char| !c.is_ascii_digit()).unwrap_or(part.len());
  part[..end].parse().ok()
}

impl From<(u32, u32)> for RuntimeVersion {
  fn from((major, minor): (u32, u32)) -> Self {
    Self::new(major, minor)
  }
}

impl fmt::Display for RuntimeVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

/// Fail when `actual` is below `required`.
pub fn check_version(actual: RuntimeVersion, required: RuntimeVersion) -> Result<(), VersionError> {
  if actual < required {
    return Err(VersionError::TooOld { actual, required });
  }
  Ok(())
}

/// Reports the version of the runtime that will execute the orchestrator.
pub trait RuntimeProbe {
  fn version(&self) -> Result<RuntimeVersion, VersionError>;
}

/// Asks the interpreter binary for its version.
#[derive(Debug, Clone)]
pub struct InterpreterProbe {
  interpreter: PathBuf,
}

impl InterpreterProbe {
  pub fn new(interpreter: impl Into<PathBuf>) -> Self {
    Self {
      interpreter: interpreter.into(),
    }
  }

  pub fn interpreter(&self) -> &Path {
    &self.interpreter
  }
}

impl RuntimeProbe for InterpreterProbe {
  fn version(&self) -> Result<RuntimeVersion, VersionError> {
    let output = Command::new(&self.interpreter)
      .arg("--version")
      .output()
      .map_err(|e| VersionError::Probe {
        interpreter: self.interpreter.clone(),
        message: e.to_string(),
      })?;

    if !output.status.success() {
      return Err(VersionError::Probe {
        interpreter: self.interpreter.clone(),
        message: format!("exited with {}", output.status),
      });
    }

    // Older interpreters print the banner on stderr.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let banner = if stdout.trim().is_empty() { stderr } else { stdout };
    debug!(interpreter = %self.interpreter.display(), banner = %banner.trim(), "probed interpreter");

    RuntimeVersion::parse(banner.trim())
  }
}

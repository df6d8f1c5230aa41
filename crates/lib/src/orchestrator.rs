//! Boundary to the external build orchestrator.
//!
//! The orchestrator is the `xed_mbuild` engine plus its companion
//! `xed_build_common` error handler. The launcher only needs three things from
//! it: confirmation that both modules import, a single synchronous `execute`
//! call, and a handler that turns an execute failure into a termination.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{COMPANION_MODULE, ENGINE_MODULE};
use crate::finder::{FindError, InterpreterFinder, ModuleFinder};
use crate::request::BuildRequest;
use crate::search::{ModuleSearchState, SearchError};

/// Exit code reported by the orchestrator.
///
/// Zero lets the launcher continue; anything else ends the process with that code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStatus(pub i32);

impl BuildStatus {
  pub const SUCCESS: Self = Self(0);

  pub fn code(self) -> i32 {
    self.0
  }

  pub fn is_success(self) -> bool {
    self.0 == 0
  }
}

/// A request to end the process, produced instead of exiting in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
  pub code: i32,
  pub diagnostic: String,
}

impl fmt::Display for Termination {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.diagnostic)
  }
}

#[derive(Debug, Error)]
pub enum ImportError {
  #[error("cannot import {module}: the interpreter has no module by that name")]
  Missing { module: String },

  #[error(transparent)]
  Find(#[from] FindError),
}

/// Failure raised while the orchestrator was executing.
#[derive(Debug, Error)]
pub enum OrchestratorError {
  #[error("failed to start {}: {source}", interpreter.display())]
  Spawn {
    interpreter: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("orchestrator was terminated without an exit code")]
  Killed,

  #[error("failed to encode module search path: {0}")]
  Encode(#[from] serde_json::Error),

  #[error(transparent)]
  Search(#[from] SearchError),

  #[error("{0}")]
  Raised(String),
}

pub trait Orchestrator {
  /// Confirm the engine and companion modules import through `search`.
  fn ensure_importable(&self, search: &ModuleSearchState) -> Result<(), ImportError>;

  /// Run the build once and report its exit code.
  fn execute(&self, request: &BuildRequest, search: &ModuleSearchState) -> Result<BuildStatus, OrchestratorError>;

  /// Format an execute failure and decide how the process ends.
  fn handle_failure(&self, failure: OrchestratorError) -> Termination;
}

/// Program run by the child interpreter.
///
/// Puts the launcher's search list in front of `sys.path`, restores
/// `sys.argv` to the build request and exits with the value of `execute()`.
/// Exceptions go to the companion handler, which exits non-zero on its own.
const BOOTSTRAP: &str = r#"import json, sys
sys.path[:0] = json.loads(sys.argv[1])
sys.argv = sys.argv[2:]
import xed_mbuild
import xed_build_common
try:
    status = xed_mbuild.execute()
except Exception as e:
    xed_build_common.handle_exception_and_die(e)
sys.exit(status or 0)
"#;

/// Runs the orchestrator inside a child interpreter.
#[derive(Debug, Clone)]
pub struct InterpreterOrchestrator {
  interpreter: PathBuf,
  cwd: PathBuf,
  finder: InterpreterFinder,
}

impl InterpreterOrchestrator {
  pub fn new(interpreter: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
    let interpreter = interpreter.into();
    let cwd = cwd.into();
    Self {
      finder: InterpreterFinder::new(&interpreter, &cwd),
      interpreter,
      cwd,
    }
  }

  fn command(&self, request: &BuildRequest, search: &ModuleSearchState) -> Result<Command, OrchestratorError> {
    let entries = serde_json::to_string(&search.entries_utf8()?)?;

    let mut command = Command::new(&self.interpreter);
    command
      .arg("-c")
      .arg(BOOTSTRAP)
      .arg(entries)
      .args(request.args())
      .current_dir(&self.cwd)
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit());
    search.apply_to(&mut command);
    Ok(command)
  }
}

impl Orchestrator for InterpreterOrchestrator {
  fn ensure_importable(&self, search: &ModuleSearchState) -> Result<(), ImportError> {
    for module in [ENGINE_MODULE, COMPANION_MODULE] {
      if !self.finder.find(module, search)? {
        return Err(ImportError::Missing {
          module: module.to_string(),
        });
      }
      debug!(module, "orchestrator module found");
    }
    Ok(())
  }

  fn execute(&self, request: &BuildRequest, search: &ModuleSearchState) -> Result<BuildStatus, OrchestratorError> {
    info!(
      interpreter = %self.interpreter.display(),
      args = ?request.args(),
      "running {}.execute()",
      ENGINE_MODULE
    );

    let status = self
      .command(request, search)?
      .status()
      .map_err(|source| OrchestratorError::Spawn {
        interpreter: self.interpreter.clone(),
        source,
      })?;

    let code = status.code().ok_or(OrchestratorError::Killed)?;
    debug!(code, "orchestrator finished");
    Ok(BuildStatus(code))
  }

  fn handle_failure(&self, failure: OrchestratorError) -> Termination {
    Termination {
      code: 1,
      diagnostic: format!("XED ERROR: {}", failure),
    }
  }
}

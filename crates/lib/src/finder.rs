//! Import lookups answered by the interpreter.
//!
//! Only the interpreter knows its whole search path: site-packages, the user
//! site, `.pth` files and, for `-c` programs, the working directory. Whether a
//! module imports is therefore asked of the same interpreter, run the same way
//! the build will run, instead of guessed from the filesystem.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::search::ModuleSearchState;

/// Exit code of [`FIND_SPEC`] for a module without an import spec.
const MISSING_EXIT_CODE: i32 = 3;

/// Puts the search entries in front of `sys.path`, then exits 0 when
/// `argv[1]` has an import spec and 3 when it has none.
const FIND_SPEC: &str = r#"import importlib.util, sys
sys.path[:0] = sys.argv[2:]
sys.exit(0 if importlib.util.find_spec(sys.argv[1]) is not None else 3)
"#;

#[derive(Debug, Error)]
pub enum FindError {
  #[error("failed to start {}: {source}", interpreter.display())]
  Spawn {
    interpreter: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(
    "import lookup for {module} exited with {}: {stderr}",
    code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c))
  )]
  Failed {
    module: String,
    code: Option<i32>,
    stderr: String,
  },
}

pub trait ModuleFinder {
  /// Whether `module` imports once `search` is in effect.
  fn find(&self, module: &str, search: &ModuleSearchState) -> Result<bool, FindError>;
}

/// Asks the build interpreter, in the build's working directory.
#[derive(Debug, Clone)]
pub struct InterpreterFinder {
  interpreter: PathBuf,
  cwd: PathBuf,
}

impl InterpreterFinder {
  pub fn new(interpreter: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      interpreter: interpreter.into(),
      cwd: cwd.into(),
    }
  }

  fn command(&self, module: &str, search: &ModuleSearchState) -> Command {
    let mut command = Command::new(&self.interpreter);
    command
      .arg("-c")
      .arg(FIND_SPEC)
      .arg(module)
      .args(search.entries())
      .current_dir(&self.cwd)
      .stdin(Stdio::null());
    search.apply_to(&mut command);
    command
  }
}

impl ModuleFinder for InterpreterFinder {
  fn find(&self, module: &str, search: &ModuleSearchState) -> Result<bool, FindError> {
    let output = self
      .command(module, search)
      .output()
      .map_err(|source| FindError::Spawn {
        interpreter: self.interpreter.clone(),
        source,
      })?;

    match output.status.code() {
      Some(0) => {
        debug!(module, "module importable");
        Ok(true)
      }
      Some(MISSING_EXIT_CODE) => {
        debug!(module, "module not importable");
        Ok(false)
      }
      code => Err(FindError::Failed {
        module: module.to_string(),
        code,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }),
    }
  }
}

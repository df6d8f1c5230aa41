//! Build dispatch: version gate, dependency lookup, orchestrator run.

use tracing::{debug, warn};

use crate::config::LaunchConfig;
use crate::error::BootError;
use crate::finder::ModuleFinder;
use crate::locate::locate_support;
use crate::orchestrator::{BuildStatus, Orchestrator};
use crate::request::BuildRequest;
use crate::search::ModuleSearchState;
use crate::version::{RuntimeProbe, check_version};

/// Outcome of a dispatch that reached the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
  pub status: BuildStatus,
  /// Search state the orchestrator ran with, reused by the packager.
  pub search: ModuleSearchState,
}

/// Run the build once.
///
/// The steps run in a fixed order and stop at the first failure:
/// 1. the interpreter must be at least `config.min_runtime`
/// 2. `mbuild` must be importable, as answered by `finder`, prepending an
///    install location if needed
/// 3. both orchestrator modules must be importable
/// 4. the orchestrator executes; a raised failure goes to its companion
///    handler, whose termination is returned as the error
///
/// The first two report as "mbuild import failed" with the cause attached.
pub fn dispatch(
  config: &LaunchConfig,
  request: &BuildRequest,
  runtime: &dyn RuntimeProbe,
  finder: &dyn ModuleFinder,
  orchestrator: &dyn Orchestrator,
) -> Result<Dispatched, BootError> {
  let actual = runtime.version()?;
  check_version(actual, config.min_runtime)?;
  debug!(%actual, required = %config.min_runtime, "interpreter version accepted");

  let search = locate_support(&config.search, &config.script, &config.cwd, finder)?.into_state();

  orchestrator.ensure_importable(&search)?;

  match orchestrator.execute(request, &search) {
    Ok(status) => Ok(Dispatched { status, search }),
    Err(failure) => {
      warn!(error = %failure, "orchestrator failed");
      Err(BootError::Orchestrator(orchestrator.handle_failure(failure)))
    }
  }
}

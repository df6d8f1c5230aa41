//! Shared test helpers for CLI integration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated launch environment.
///
/// ```text
/// <temp>/bin/python      stand-in interpreter
/// <temp>/modules/        orchestrator modules, exported through PYTHONPATH
/// <temp>/site/           installed packages, seen only by the interpreter
/// <temp>/mbuild/         `mbuild` above the working directory
/// <temp>/work/           working directory
/// <temp>/calls.log       one line per build or packaging run
/// ```
///
/// Import lookups are answered from the entries handed to the interpreter,
/// its working directory and `site/`, the way `sys.path` would.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Interpreter reports `banner` and exits every build with `exit_code`.
  pub fn new(banner: &str, exit_code: i32) -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };
    fs::create_dir_all(env.root().join("bin")).unwrap();
    fs::create_dir_all(env.modules()).unwrap();
    fs::create_dir_all(env.site()).unwrap();
    fs::create_dir_all(env.work()).unwrap();
    env.write_interpreter(banner, exit_code);
    env
  }

  /// Supported interpreter, orchestrator modules present, `mbuild` above the working directory.
  pub fn ready(exit_code: i32) -> Self {
    let env = Self::new("Python 3.11.4", exit_code);
    env.install_orchestrator();
    env.install_mbuild();
    env
  }

  /// Canonical root so paths match what the launcher sees as its working directory.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap_or_else(|_| self.temp.path().to_path_buf())
  }

  pub fn modules(&self) -> PathBuf {
    self.root().join("modules")
  }

  pub fn site(&self) -> PathBuf {
    self.root().join("site")
  }

  pub fn work(&self) -> PathBuf {
    self.root().join("work")
  }

  pub fn mbuild(&self) -> PathBuf {
    self.root().join("mbuild")
  }

  pub fn interpreter(&self) -> PathBuf {
    self.root().join("bin").join("python")
  }

  pub fn install_orchestrator(&self) {
    fs::write(self.modules().join("xed_mbuild.py"), "def execute():\n    return 0\n").unwrap();
    fs::write(self.modules().join("xed_build_common.py"), "").unwrap();
  }

  pub fn install_mbuild(&self) {
    fs::create_dir_all(self.mbuild()).unwrap();
  }

  /// `mbuild` installed as a package, outside every directory the launcher checks itself.
  pub fn install_site_mbuild(&self) {
    fs::create_dir_all(self.site().join("mbuild")).unwrap();
  }

  /// Orchestrator modules in the working directory instead of on PYTHONPATH.
  pub fn install_orchestrator_in_work(&self) {
    fs::write(self.work().join("xed_mbuild.py"), "def execute():\n    return 0\n").unwrap();
    fs::write(self.work().join("xed_build_common.py"), "").unwrap();
  }

  /// Everything the interpreter was asked to run.
  pub fn calls(&self) -> String {
    fs::read_to_string(self.root().join("calls.log")).unwrap_or_default()
  }

  /// The launcher, run in the working directory with this interpreter.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("mfile");
    cmd
      .current_dir(self.work())
      .env("MFILE_PYTHON", self.interpreter())
      .env("PYTHONPATH", self.modules());
    cmd
  }

  fn write_interpreter(&self, banner: &str, exit_code: i32) {
    let script = format!(
      r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "{banner}"
  exit 0
fi
case "$2" in
  *find_spec*)
    module="$3"
    shift 3
    for dir in "$@" . "{site}"; do
      if [ -z "$dir" ]; then dir=.; fi
      if [ -d "$dir/$module" ] || [ -f "$dir/$module.py" ]; then exit 0; fi
    done
    exit 3
    ;;
esac
echo "PYTHONPATH=$PYTHONPATH" >> "{log}"
echo "$@" >> "{log}"
exit {exit_code}
"#,
      banner = banner,
      site = self.site().display(),
      log = self.root().join("calls.log").display(),
      exit_code = exit_code,
    );
    let path = self.interpreter();
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  }
}

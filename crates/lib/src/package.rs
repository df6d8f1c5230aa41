//! Native extension packaging.
//!
//! After a successful build the `xed` Python extension can be packaged from
//! the example sources linked against the freshly built library kit. The
//! descriptor is a plain serializable record; a [`Packager`] turns it into a
//! build.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::platform::Os;
use crate::search::ModuleSearchState;

const EXTENSION_NAME: &str = "xed";
const PACKAGE_VERSION: &str = "1.0";

const EXAMPLE_SOURCES: &[&str] = &[
  "examples/xed-examples-util.c",
  "examples/xed-nm-symtab.c",
  "examples/xed-disas-raw.c",
  "examples/xed-dot-prep.c",
  "examples/xed-symbol-table.c",
  "examples/xed-dot.c",
  "examples/avltree.c",
  "examples/xed-disas-elf.c",
  "examples/xed-disas-macho.c",
];

/// Only built on Windows hosts.
const WINDOWS_SOURCE: &str = "examples/xed-disas-pecoff.cpp";

#[derive(Debug, Error)]
pub enum PackageError {
  #[error("failed to encode package description: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("failed to start {}: {source}", interpreter.display())]
  Spawn {
    interpreter: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("packaging exited with {}", code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c)))]
  Failed { code: Option<i32> },
}

/// One native extension module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
  pub name: String,
  pub sources: Vec<String>,
  pub include_dirs: Vec<String>,
  pub library_dirs: Vec<String>,
  pub libraries: Vec<String>,
  /// `(name, value)` preprocessor defines; `None` defines without a value.
  pub define_macros: Vec<(String, Option<String>)>,
}

impl ExtensionDescriptor {
  /// The `xed` extension as built on `os`.
  pub fn xed(os: Os) -> Self {
    let mut sources: Vec<String> = EXAMPLE_SOURCES.iter().map(|s| s.to_string()).collect();
    if os.is_windows() {
      sources.push(WINDOWS_SOURCE.to_string());
    }

    Self {
      name: EXTENSION_NAME.to_string(),
      sources,
      include_dirs: vec!["obj/wkit/include".to_string()],
      library_dirs: vec!["obj/wkit/lib".to_string()],
      libraries: vec!["xed".to_string()],
      define_macros: vec![("PYTHON".to_string(), None)],
    }
  }
}

/// Everything handed to the packaging routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
  pub name: String,
  pub version: String,
  /// Per-command options, e.g. `build.build_lib`.
  pub options: BTreeMap<String, BTreeMap<String, String>>,
  pub script_args: Vec<String>,
  pub ext_modules: Vec<ExtensionDescriptor>,
}

impl PackageSpec {
  /// Build the extension in place (`build_lib = "."`) in non-interactive `build` mode.
  pub fn xed(os: Os) -> Self {
    let build = BTreeMap::from([("build_lib".to_string(), ".".to_string())]);
    Self {
      name: EXTENSION_NAME.to_string(),
      version: PACKAGE_VERSION.to_string(),
      options: BTreeMap::from([("build".to_string(), build)]),
      script_args: vec!["build".to_string()],
      ext_modules: vec![ExtensionDescriptor::xed(os)],
    }
  }
}

pub trait Packager {
  fn package(&self, spec: &PackageSpec, search: &ModuleSearchState) -> Result<(), PackageError>;
}

/// Reads the JSON spec from `argv[1]` and calls `setuptools.setup`.
const SETUP_BOOTSTRAP: &str = r#"import json, sys
from setuptools import setup, Extension
spec = json.loads(sys.argv[1])
setup(
    name=spec["name"],
    version=spec["version"],
    options=spec["options"],
    script_args=spec["script_args"],
    ext_modules=[
        Extension(
            ext["name"],
            sources=ext["sources"],
            include_dirs=ext["include_dirs"],
            library_dirs=ext["library_dirs"],
            libraries=ext["libraries"],
            define_macros=[tuple(m) for m in ext["define_macros"]],
        )
        for ext in spec["ext_modules"]
    ],
)
"#;

/// Packages through `setuptools` in a child interpreter.
#[derive(Debug, Clone)]
pub struct SetuptoolsPackager {
  interpreter: PathBuf,
  cwd: PathBuf,
}

impl SetuptoolsPackager {
  pub fn new(interpreter: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      interpreter: interpreter.into(),
      cwd: cwd.into(),
    }
  }

  fn command(&self, spec: &PackageSpec, search: &ModuleSearchState) -> Result<Command, PackageError> {
    let encoded = serde_json::to_string(spec)?;

    let mut command = Command::new(&self.interpreter);
    command
      .arg("-c")
      .arg(SETUP_BOOTSTRAP)
      .arg(encoded)
      .current_dir(&self.cwd)
      .stdin(Stdio::null());
    search.apply_to(&mut command);
    Ok(command)
  }
}

impl Packager for SetuptoolsPackager {
  fn package(&self, spec: &PackageSpec, search: &ModuleSearchState) -> Result<(), PackageError> {
    info!(
      name = %spec.name,
      sources = spec.ext_modules.iter().map(|e| e.sources.len()).sum::<usize>(),
      "packaging native extension"
    );

    let status = self
      .command(spec, search)?
      .status()
      .map_err(|source| PackageError::Spawn {
        interpreter: self.interpreter.clone(),
        source,
      })?;

    if !status.success() {
      return Err(PackageError::Failed { code: status.code() });
    }
    Ok(())
  }
}

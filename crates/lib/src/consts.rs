//! Fixed names shared by the launcher.

/// Build-support package that must be importable before the orchestrator runs.
pub const SUPPORT_MODULE: &str = "mbuild";

/// Orchestrator engine module exposing `execute()`.
pub const ENGINE_MODULE: &str = "xed_mbuild";

/// Companion module exposing `handle_exception_and_die()`.
pub const COMPANION_MODULE: &str = "xed_build_common";

/// Argument token requesting the native extension package after the build.
pub const PACKAGE_TOKEN: &str = "pymodule";

/// Flag forwarded to the orchestrator when the extension package is requested.
pub const PIC_FLAG: &str = "--extra-flags=-fPIC";

/// Inheritable path-list variable consulted by the interpreter.
pub const SEARCH_PATH_VAR: &str = "PYTHONPATH";

/// Overrides the interpreter used for the orchestrator and packager.
pub const INTERPRETER_VAR: &str = "MFILE_PYTHON";

/// Minimum interpreter version as `(major, minor)`.
pub const MIN_RUNTIME: (u32, u32) = (3, 9);

#[cfg(windows)]
pub const DEFAULT_INTERPRETER: &str = "python";

#[cfg(not(windows))]
pub const DEFAULT_INTERPRETER: &str = "python3";

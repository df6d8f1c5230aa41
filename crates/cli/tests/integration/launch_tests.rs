//! Launch sequence tests: exit codes, search path export and packaging.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn successful_build_exits_zero_without_packaging() {
  let env = TestEnv::ready(0);

  env.cmd().arg("--static").assert().success();

  let calls = env.calls();
  assert!(calls.contains("xed_mbuild.execute()"), "{}", calls);
  assert!(calls.contains("--static"), "{}", calls);
  assert!(!calls.contains("setuptools"), "{}", calls);
}

#[test]
#[serial]
fn mbuild_is_prepended_for_the_orchestrator() {
  let env = TestEnv::ready(0);

  env.cmd().assert().success();

  let expected = format!("PYTHONPATH={}:{}", env.mbuild().display(), env.modules().display());
  assert!(env.calls().contains(&expected), "{}", env.calls());
}

#[test]
#[serial]
fn orchestrator_exit_code_is_propagated() {
  let env = TestEnv::ready(5);

  env.cmd().assert().code(5);
}

#[test]
#[serial]
fn non_zero_build_skips_requested_packaging() {
  let env = TestEnv::ready(3);

  env.cmd().arg("pymodule").assert().code(3);

  let calls = env.calls();
  assert!(calls.contains("--extra-flags=-fPIC"), "{}", calls);
  assert!(!calls.contains("setuptools"), "{}", calls);
}

#[test]
#[serial]
fn package_token_builds_extension_after_success() {
  let env = TestEnv::ready(0);

  env.cmd().arg("pymodule").assert().success();

  let calls = env.calls();
  assert!(calls.contains("--extra-flags=-fPIC"), "{}", calls);
  assert!(!calls.contains(" pymodule"), "{}", calls);
  assert!(calls.contains("from setuptools import setup, Extension"), "{}", calls);
  assert!(calls.contains("obj/wkit/include"), "{}", calls);
}

#[test]
#[serial]
fn old_interpreter_is_fatal() {
  let env = TestEnv::new("Python 3.8.10", 0);
  env.install_orchestrator();
  env.install_mbuild();

  env
    .cmd()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("XED build error: mbuild import failed"))
    .stderr(predicate::str::contains("3.8"));

  assert!(env.calls().is_empty());
}

#[test]
#[serial]
fn missing_mbuild_names_both_locations() {
  let env = TestEnv::new("Python 3.11.4", 0);
  env.install_orchestrator();

  env
    .cmd()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("mbuild import failed"))
    .stderr(predicate::str::contains("cannot find the mbuild directory"))
    .stderr(predicate::str::contains("/../mbuild]"));

  assert!(env.calls().is_empty());
}

#[test]
#[serial]
fn missing_orchestrator_modules_are_fatal() {
  let env = TestEnv::new("Python 3.11.4", 0);
  env.install_mbuild();

  env
    .cmd()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("orchestrator import failed"))
    .stderr(predicate::str::contains("xed_mbuild"));
}

#[test]
#[serial]
fn site_installed_mbuild_is_not_prepended() {
  let env = TestEnv::new("Python 3.11.4", 0);
  env.install_orchestrator();
  env.install_site_mbuild();

  env.cmd().assert().success();

  let calls = env.calls();
  assert!(calls.contains("xed_mbuild.execute()"), "{}", calls);
  assert!(calls.contains(&format!("PYTHONPATH={}\n", env.modules().display())), "{}", calls);
}

#[test]
#[serial]
fn site_installed_mbuild_wins_over_install_locations() {
  let env = TestEnv::ready(0);
  env.install_site_mbuild();

  env.cmd().assert().success();

  let calls = env.calls();
  assert!(!calls.contains(&env.mbuild().display().to_string()), "{}", calls);
}

#[test]
#[serial]
fn orchestrator_modules_in_working_directory_are_found() {
  let env = TestEnv::new("Python 3.11.4", 0);
  env.install_mbuild();
  env.install_orchestrator_in_work();

  env.cmd().env_remove("PYTHONPATH").assert().success();

  let calls = env.calls();
  assert!(calls.contains("xed_mbuild.execute()"), "{}", calls);
  assert!(calls.contains(&format!("PYTHONPATH={}\n", env.mbuild().display())), "{}", calls);
}

//! End-to-end tests driving the tcbuild binary against throwaway project trees

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tcbuild() -> Command {
    let mut cmd = Command::cargo_bin("tcbuild").unwrap();
    cmd.env_remove("TCBUILD_START_DIR").arg("--no-pause").arg("--no-color");
    cmd
}

/// TerraCraft/{main.c, data/src/*.c, data/inc/, config/}
fn create_project() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("TerraCraft");
    fs::create_dir_all(root.join("data/src")).unwrap();
    fs::create_dir_all(root.join("data/inc")).unwrap();
    fs::create_dir_all(root.join("config")).unwrap();
    fs::write(root.join("main.c"), "int main(void) { return 0; }\n").unwrap();
    fs::write(root.join("data/src/terrain.c"), "").unwrap();
    fs::write(root.join("data/src/player.c"), "").unwrap();
    (temp, root)
}

fn write_override(root: &Path, table: &str) {
    fs::write(root.join("build.toml"), table).unwrap();
}

#[test]
fn unknown_arguments_are_listed_together() {
    let (_temp, root) = create_project();
    tcbuild()
        .args(["-gcc", "-turbo", "linux"])
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown arguments ('-turbo', 'linux')"));
}

#[test]
fn conflicting_modes_fail() {
    let (_temp, root) = create_project();
    tcbuild()
        .args(["-debug", "-release"])
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Too many 'mode' arguments, please pick only one ('-debug', '-release')",
        ));
}

#[test]
fn conflicting_compilers_fail() {
    let (_temp, root) = create_project();
    tcbuild()
        .args(["-gcc", "-clang"])
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Too many 'compiler' arguments"));
}

#[test]
fn missing_root_fails() {
    let temp = TempDir::new().unwrap();
    let start = temp.path().join("SomethingElse");
    fs::create_dir_all(&start).unwrap();

    tcbuild()
        .arg("--start-dir")
        .arg(&start)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Couldn't find 'TerraCraft' root directory in the local file structure",
        ));
}

#[test]
fn unconfigured_compiler_fails_cleanly() {
    let (_temp, root) = create_project();
    tcbuild()
        .args(["-icpx", "-release"])
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No build command configured for icpx release"));

    assert!(!root.join("bin").exists());
}

#[test]
fn start_dir_from_environment() {
    let (_temp, root) = create_project();
    Command::cargo_bin("tcbuild")
        .unwrap()
        .args(["--no-pause", "--dry-run", "-mvsc"])
        .env("TCBUILD_START_DIR", root.join("data/src"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No build command configured for mvsc debug"));
}

#[cfg(unix)]
#[test]
fn dry_run_prints_command_and_keeps_bin() {
    let (_temp, root) = create_project();
    fs::create_dir_all(root.join("bin")).unwrap();
    fs::write(root.join("bin/TerraCraft"), "previous build").unwrap();

    tcbuild()
        .args(["-release", "--dry-run"])
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "gcc -std=c99 -Ofast main.c data/src/player.c data/src/terrain.c \
             -Idata/inc -Idata  -o bin/TerraCraft",
        ));

    assert_eq!(
        fs::read_to_string(root.join("bin/TerraCraft")).unwrap(),
        "previous build"
    );
}

#[cfg(unix)]
#[test]
fn options_after_selector_are_honoured() {
    let (_temp, root) = create_project();
    fs::create_dir_all(root.join("bin")).unwrap();
    fs::write(root.join("bin/TerraCraft"), "previous build").unwrap();

    Command::cargo_bin("tcbuild")
        .unwrap()
        .env_remove("TCBUILD_START_DIR")
        .args(["-release", "--dry-run", "--start-dir"])
        .arg(root.join("config"))
        .args(["--no-pause", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gcc -std=c99 -Ofast main.c"))
        .stderr(predicate::str::contains("Unknown argument").not());

    assert!(root.join("bin/TerraCraft").is_file());
}

#[cfg(unix)]
#[test]
fn options_before_selector_are_honoured() {
    let (_temp, root) = create_project();

    tcbuild()
        .arg("--dry-run")
        .arg("--start-dir")
        .arg(root.join("config"))
        .args(["--verbose", "-clang"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 'TerraCraft'"))
        .stdout(predicate::str::contains("clang -std=c99 -g -Wall -Wextra main.c"));
}

#[test]
fn unknown_long_token_is_a_selector_error() {
    let (_temp, root) = create_project();
    tcbuild()
        .args(["-release", "--turbo", "--start-dir"])
        .arg(root.join("config"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown argument ('--turbo')"))
        .stderr(predicate::str::contains("'--start-dir'").not());
}

#[cfg(unix)]
#[test]
fn root_found_from_current_directory() {
    let (_temp, root) = create_project();
    tcbuild()
        .args(["-release", "--dry-run"])
        .current_dir(root.join("data/src"))
        .assert()
        .success()
        .stdout(predicate::str::contains("gcc -std=c99 -Ofast main.c"));
}

#[cfg(unix)]
const FAKE_COMPILER: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-o" ]; then out="$2"; shift; fi
    shift
done
printf '#!/bin/sh\necho "world generated: 64 chunks"\n' > "$out"
chmod +x "$out"
"#;

#[cfg(unix)]
#[test]
fn build_and_run_relays_game_output() {
    let (_temp, root) = create_project();
    fs::create_dir_all(root.join("bin")).unwrap();
    fs::write(root.join("bin/TerraCraft"), "stale").unwrap();
    fs::write(root.join("bin/crash.log"), "stale").unwrap();
    fs::write(root.join("config/fake-cc.sh"), FAKE_COMPILER).unwrap();
    write_override(
        &root,
        "[compilers.clang.release]\ncmd = \"sh config/fake-cc.sh {options} {src} -o {exc}\"\n",
    );

    tcbuild()
        .args(["-clang", "-release"])
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaning binary directory . . ."))
        .stdout(predicate::str::contains("Build successful! Running game . . ."))
        .stdout(predicate::str::contains("world generated: 64 chunks"));

    let mut remaining: Vec<_> = fs::read_dir(root.join("bin"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec!["TerraCraft"]);
}

#[cfg(unix)]
#[test]
fn creates_missing_bin_directory() {
    let (_temp, root) = create_project();
    fs::write(root.join("config/fake-cc.sh"), FAKE_COMPILER).unwrap();
    write_override(
        &root,
        "[compilers.gcc.debug]\ncmd = \"sh config/fake-cc.sh {src} -o {exc}\"\n",
    );

    tcbuild()
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Binary directory was not found. Creating new one . . .",
        ));

    assert!(root.join("bin/TerraCraft").is_file());
}

#[cfg(unix)]
#[test]
fn compiler_errors_are_surfaced() {
    let (_temp, root) = create_project();
    fs::write(
        root.join("config/fail-cc.sh"),
        "echo 'terrain.c:12: undefined reference' >&2\nexit 7\n",
    )
    .unwrap();
    write_override(
        &root,
        "[compilers.gcc.debug]\ncmd = \"sh config/fail-cc.sh {src} -o {exc}\"\n",
    );

    tcbuild()
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build failed (exit code 7)"))
        .stderr(predicate::str::contains("undefined reference"))
        .stdout(predicate::str::contains("Build successful").not());
}

#[test]
fn invalid_override_file_is_reported() {
    let (_temp, root) = create_project();
    write_override(&root, "[compilers.tcc.debug]\ncmd = \"tcc {src}\"\n");

    tcbuild()
        .arg("--start-dir")
        .arg(root.join("config"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown compiler 'tcc'"));
}

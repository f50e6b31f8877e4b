use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, body: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Seed a binary under the default relative layout rooted at `root`.
fn seed(root: &Path, variant: &str, binary: &str, gt: bool, reassembled: bool) {
    write_file(&root.join("benchmark/setA").join(variant).join("bin").join(binary), b"elf");
    if gt {
        write_file(
            &root.join("gt/setA").join(variant).join(binary).join("norm_db/func.json"),
            b"gt\n",
        );
    }
    if reassembled {
        write_file(
            &root.join("output/setA").join(variant).join(binary).join("super/b2r2_meta.json"),
            b"re\n",
        );
    }
}

#[test]
fn invalid_dataset_is_a_usage_error() {
    let dir = tempdir().unwrap();
    cargo_bin_cmd!("table-compare")
        .current_dir(dir.path())
        .arg("setB")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("setB"));
}

#[test]
fn unknown_package_exits_cleanly() {
    let dir = tempdir().unwrap();
    cargo_bin_cmd!("table-compare")
        .current_dir(dir.path())
        .args(["setA", "--package", "glibc-2.37"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn dry_run_prints_jobs_with_default_paths() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    seed(root, "coreutils-9.1/gcc-11/o2_bfd", "ls", true, true);

    cargo_bin_cmd!("table-compare")
        .current_dir(root)
        .args(["setA", "--package", "coreutils-9.1", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Package coreutils-9.1 (setA): 1 jobs"))
        .stdout(predicate::str::contains(
            "stat/table/setA/coreutils-9.1/gcc-11/o2_bfd/ls/coreutils-9.1_gcc-11_o2_bfd_ls",
        ));
}

#[cfg(unix)]
#[test]
fn run_with_workers_only_fills_missing_results() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for name in ["a", "b", "c", "d", "e"] {
        seed(root, "coreutils-9.1/gcc-11/o2_bfd", name, true, true);
    }
    seed(root, "coreutils-9.1/gcc-11/o2_bfd", "no_gt", false, true);
    seed(root, "coreutils-9.1/gcc-11/o2_bfd", "no_re", true, false);
    let done = root.join("stat/table/setA/coreutils-9.1/gcc-11/o2_bfd/a/coreutils-9.1_gcc-11_o2_bfd_a");
    write_file(&done, b"previous");

    cargo_bin_cmd!("table-compare")
        .current_dir(root)
        .args(["setA", "--package", "coreutils-9.1", "--core", "3", "--compare-program", "cat"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "completed: 4, already done: 1, missing ground truth: 1, not ready: 1, failed: 0",
        ));

    assert_eq!(fs::read(&done).unwrap(), b"previous");
    let fresh = root.join("stat/table/setA/coreutils-9.1/gcc-11/o2_bfd/b/coreutils-9.1_gcc-11_o2_bfd_b");
    assert_eq!(fs::read_to_string(fresh).unwrap(), "gt\nre\n");
    assert!(!root.join("stat/table/setA/coreutils-9.1/gcc-11/o2_bfd/no_gt").exists());
    assert!(!root.join("stat/table/setA/coreutils-9.1/gcc-11/o2_bfd/no_re").exists());
}

#[cfg(unix)]
#[test]
fn failing_tool_is_reported_but_not_fatal() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    seed(root, "binutils-2.40/clang-13/o1_bfd", "nm", true, true);

    cargo_bin_cmd!("table-compare")
        .current_dir(root)
        .args(["setA", "--package", "binutils-2.40", "--compare-program", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("failed: 1"))
        .stdout(predicate::str::contains("binutils-2.40_clang-13_o1_bfd nm"));

    assert!(!root
        .join("stat/table/setA/binutils-2.40/clang-13/o1_bfd/nm/binutils-2.40_clang-13_o1_bfd_nm")
        .exists());
}

#[cfg(unix)]
#[test]
fn json_output_is_parseable() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    seed(root, "spec_cpu2017/gcc-11/o3_gold", "mcf_r", true, true);

    let output = cargo_bin_cmd!("table-compare")
        .current_dir(root)
        .args(["setA", "--package", "spec_cpu2017", "--compare-program", "cat", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["package"], "spec_cpu2017");
    assert_eq!(reports[0]["dataset"], "setA");
    assert_eq!(reports[0]["summary"]["completed"], 1);
}

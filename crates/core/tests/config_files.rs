use std::fs;

use tablecmp_core::config::OptionGrid;
use tablecmp_core::exclusion::{ExcludeList, ExclusionKey, ExclusionPredicate};
use tablecmp_core::model::{Dataset, Package};

#[test]
fn grid_yaml_overrides_only_given_axes() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("grid.yaml");
    fs::write(&path, "compilers: [gcc-11]\nopt_levels: [o0, o3]\n").unwrap();

    let grid = OptionGrid::load(&path).unwrap();
    assert_eq!(grid.compilers, vec!["gcc-11"]);
    assert_eq!(grid.opt_levels, vec!["o0", "o3"]);
    assert_eq!(grid.linkers, OptionGrid::default().linkers);
    assert_eq!(grid.points().len(), 4);
}

#[test]
fn grid_json_is_detected_by_extension() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("grid.json");
    fs::write(&path, r#"{"linkers": ["lld"]}"#).unwrap();

    let grid = OptionGrid::load(&path).unwrap();
    assert_eq!(grid.linkers, vec!["lld"]);
}

#[test]
fn grid_with_empty_axis_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("grid.yaml");
    fs::write(&path, "linkers: []\n").unwrap();

    let err = OptionGrid::load(&path).unwrap_err();
    assert!(err.to_string().contains("no linkers"), "unexpected error: {err}");
}

#[test]
fn grid_load_reports_missing_file() {
    let temp = tempfile::tempdir().unwrap();
    let err = OptionGrid::load(&temp.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read option grid"));
}

#[test]
fn exclude_list_loads_from_yaml() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("exclude.yml");
    fs::write(
        &path,
        "excludes:\n  - binary: gcc_r\n    dataset: setC\n    package: spec_cpu2017\n  - binary: ls\n",
    )
    .unwrap();

    let list = ExcludeList::load(&path).unwrap();
    assert_eq!(list.len(), 2);

    let gcc_r = ExclusionKey {
        dataset: Dataset::SetC,
        package: Package::SpecCpu2017,
        compiler: "clang-13",
        opt_level: "o1",
        binary: "gcc_r",
    };
    assert!(list.is_excluded(&gcc_r));
    assert!(!list.is_excluded(&ExclusionKey { dataset: Dataset::SetA, ..gcc_r }));
    assert!(list.is_excluded(&ExclusionKey { binary: "ls", ..gcc_r }));
}

#[test]
fn exclude_list_rejects_unknown_package() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("exclude.json");
    fs::write(&path, r#"{"excludes": [{"binary": "ls", "package": "glibc"}]}"#).unwrap();

    let err = ExcludeList::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse exclude list JSON"));
}

#[test]
fn grid_with_duplicate_entries_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("grid.yaml");
    fs::write(&path, "compilers: [gcc-11, gcc-11]\nopt_levels: [o2]\nlinkers: [bfd]\n").unwrap();

    let err = OptionGrid::load(&path).unwrap_err();
    assert!(err.to_string().contains("\"gcc-11\" appears more than once"), "unexpected error: {err}");
}

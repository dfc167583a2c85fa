use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tb_fs::dir;

#[test]
fn test_list_visible_dirs_skips_cruft_and_sorts() {
    let temp = TempDir::new().unwrap();
    temp.child("b-device").create_dir_all().unwrap();
    temp.child("a-device").create_dir_all().unwrap();
    temp.child("__MACOSX").create_dir_all().unwrap();
    temp.child(".hidden").create_dir_all().unwrap();
    temp.child("notes.txt").write_str("x").unwrap();

    let names: Vec<String> = dir::list_visible_dirs(temp.path())
        .unwrap()
        .iter()
        .map(|p| dir::file_name(p))
        .collect();

    assert_eq!(names, vec!["a-device".to_string(), "b-device".to_string()]);
}

#[test]
fn test_resolve_ignore_case_walks_each_segment() {
    let temp = TempDir::new().unwrap();
    temp.child("OPERATIONALDATA/dev1/TbData").create_dir_all().unwrap();

    let resolved = dir::resolve_ignore_case(temp.path(), &["OperationalData", "dev1", "tbdata"]);

    assert!(resolved.is_dir());
    assert_eq!(dir::file_name(&resolved), "TbData");
}

#[test]
fn test_list_files_where_filters_by_name() {
    let temp = TempDir::new().unwrap();
    temp.child("log_2.txt").write_str("").unwrap();
    temp.child("log_1.txt").write_str("").unwrap();
    temp.child("other.bin").write_str("").unwrap();

    let files = dir::list_files_where(temp.path(), |name| name.starts_with("log_")).unwrap();
    let names: Vec<String> = files.iter().map(|p| dir::file_name(p)).collect();

    assert_eq!(names, vec!["log_1.txt".to_string(), "log_2.txt".to_string()]);
}

#[test]
fn test_is_empty_dir() {
    let temp = TempDir::new().unwrap();
    let sync = temp.child("9m8d7h6m5s");
    sync.create_dir_all().unwrap();
    assert!(dir::is_empty_dir(sync.path()).unwrap());

    sync.child("log/log.txt").write_str("x").unwrap();
    assert!(!dir::is_empty_dir(sync.path()).unwrap());
}

#[test]
fn test_copy_dir_all_copies_nested_files() {
    let src = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    src.child("village/tb1/sync/log/log.txt").write_str("line").unwrap();
    src.child("village/tb1/sync/statistics/stats/msg1").write_binary(&[0u8; 4]).unwrap();

    let copied = dir::copy_dir_all(src.path(), &dest.path().join("out")).unwrap();

    assert_eq!(copied, 2);
    dest.child("out/village/tb1/sync/log/log.txt")
        .assert(predicate::str::contains("line"));
    dest.child("out/village/tb1/sync/statistics/stats/msg1")
        .assert(predicate::path::is_file());
}

// ==========================================
// 表格数据导入引擎 - 文件导入集成测试
// ==========================================
// 覆盖: CSV 文件导入 / 扩展名覆写 / 自定义分隔符 / 文件错误作为初始化失败
// ==========================================


use std::io::Write;
use tabular_import::{
    ImportError, ImportOptions, ImportSession, ImportSettings, InMemoryRecordStore, SessionState,
};
use tempfile::{Builder, NamedTempFile};
use tabular_import::logging;
use test_helpers::*;

fn write_lines(file: &mut NamedTempFile, lines: &[&str]) {
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
}

fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
    write_lines(&mut temp_file, lines);
    temp_file
}

#[test]
fn test_import_csv_file_with_preamble() {
    logging::init_test();
    let file = csv_file(&[
        "List of employees",
        "Name,Birth Date,Department,Manager",
        "John Doe,2013-10-25,IT,",
        "Invalid,2013-10-24,Management,",
        "Jane Doe,2013-10-26,Sales,",
    ]);
    let log = new_event_log();
    let importer = employee_importer(&log);
    let mut store = InMemoryRecordStore::<Employee>::new();

    let summary = importer
        .import_file(file.path(), &mut store, ImportOptions::default())
        .unwrap();

    assert_eq!(summary.state, SessionState::Finished);
    assert_eq!(summary.row_count, 3);
    assert_eq!(summary.rows_succeeded, 2);
    assert_eq!(summary.row_errors[0].row_index, 4);
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[1].department_id, Some(5));
}

#[test]
fn test_extension_override_for_extensionless_file() {
    logging::init_test();
    let mut file = NamedTempFile::new().unwrap();
    write_lines(&mut file, &["Name,Birth Date,Department,Manager", "John Doe,2013-10-25,IT,"]);
    let log = new_event_log();
    let importer = employee_importer(&log);
    let mut store = InMemoryRecordStore::<Employee>::new();

    let mut session = ImportSession::open(
        &importer,
        file.path(),
        &mut store,
        ImportOptions::new().with_extension("csv"),
    );
    assert_eq!(session.state(), SessionState::Ready);
    session.import().unwrap();
    drop(session);

    assert_eq!(store.len(), 1);
}

#[test]
fn test_custom_csv_delimiter() {
    logging::init_test();
    let file = csv_file(&["Name;Birth Date;Department;Manager", "Jane Doe;2013-10-26;Sales;"]);
    let log = new_event_log();
    let importer = employee_importer(&log);
    let mut store = InMemoryRecordStore::<Employee>::new();

    let options =
        ImportOptions::new().with_settings(ImportSettings::default().with_csv_delimiter(b';'));
    importer
        .import_file(file.path(), &mut store, options)
        .unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.records()[0].name.as_deref(), Some("Jane Doe"));
}

#[test]
fn test_missing_file_is_a_setup_failure() {
    logging::init_test();
    let log = new_event_log();
    let importer = employee_importer(&log);
    let mut store = InMemoryRecordStore::<Employee>::new();

    let mut session = ImportSession::open(
        &importer,
        "does/not/exist.csv",
        &mut store,
        ImportOptions::default(),
    );

    assert_eq!(session.state(), SessionState::SetupFailed);
    assert!(matches!(session.setup_error(), Some(ImportError::FileNotFound(_))));
    assert_eq!(count_events(&log, "import_failed"), 1);
    assert_eq!(session.import().unwrap().rows_processed, 0);
}

#[test]
fn test_unsupported_format_is_reported() {
    logging::init_test();
    let file = Builder::new().suffix(".txt").tempfile().unwrap();
    let log = new_event_log();
    let importer = employee_importer(&log);
    let mut store = InMemoryRecordStore::<Employee>::new();

    let err = importer
        .import_file(file.path(), &mut store, ImportOptions::default())
        .unwrap_err();

    assert!(matches!(err, ImportError::UnsupportedFormat(ref ext) if ext == "txt"));
    assert_eq!(count_events(&log, "import_failed"), 1);
}

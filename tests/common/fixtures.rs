use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use pomotask::{CsvStore, Language, PomodoroLength, Task};
use tempfile::TempDir;

pub struct TestStore {
    pub dir: TempDir,
    pub store: CsvStore,
}

pub fn setup_store() -> TestStore {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = CsvStore::new(dir.path());
    TestStore { dir, store }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn task(title: &str, language: Language) -> Task {
    Task::new(title, format!("{title} notes"), PomodoroLength::Short, language)
        .expect("valid task")
}

/// Write a day file by hand, bypassing the store, so tests can plant rows the
/// application would never produce.
pub fn write_day_file(store: &CsvStore, date: NaiveDate, body: &str) -> PathBuf {
    let path = store.day_file(date);
    fs::create_dir_all(path.parent().expect("day dir")).expect("create day dir");
    fs::write(&path, body).expect("write day file");
    path
}

pub fn data_rows(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read day file")
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

mod common;

use std::fs;

use common::fixtures::{data_rows, date, setup_store, task};
use pomotask::store::CsvStore;
use pomotask::{Language, PomodoroLength, Task, TaskList};
use pretty_assertions::assert_eq;

#[test]
fn n_adds_on_one_day_give_n_rows() {
    let t = setup_store();
    let mut list = TaskList::new();
    let day = date(2024, 5, 20);

    let mut path = None;
    for i in 0..4 {
        path = Some(
            t.store
                .append_and_persist(&mut list, task(&format!("task {i}"), Language::Java), day)
                .unwrap(),
        );
    }
    let path = path.unwrap();

    assert_eq!(path, t.dir.path().join("2024/May/20/2024-05-20_tasks.csv"));
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("Tanggal,Judul,Deskripsi,Durasi,Bahasa,Status")
    );
    assert_eq!(data_rows(&path).len(), 4);
}

#[test]
fn utf8_text_round_trips() {
    let t = setup_store();
    let mut list = TaskList::new();
    let day = date(2024, 8, 17);
    let title = "Kopi ☕ & café";
    let description = "naïve, \"quoted\", 日本語";
    let task = Task::new(title, description, PomodoroLength::Long, Language::Golang).unwrap();

    let path = t.store.append_and_persist(&mut list, task, day).unwrap();
    let rows = CsvStore::read_day_file(&path).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2024-08-17");
    assert_eq!(rows[0].title, title);
    assert_eq!(rows[0].description, description);
    assert_eq!(rows[0].duration, "45");
    assert_eq!(rows[0].language, "Golang");
    assert_eq!(rows[0].status, "Not Started");
}

#[test]
fn saving_after_a_reset_overwrites_the_day() {
    let t = setup_store();
    let day = date(2024, 2, 29);

    let mut first_session = TaskList::new();
    for title in ["a", "b", "c"] {
        t.store
            .append_and_persist(&mut first_session, task(title, Language::Python), day)
            .unwrap();
    }

    // A restart: the in-memory list starts over.
    let mut second_session = TaskList::new();
    let path = t
        .store
        .append_and_persist(&mut second_session, task("d", Language::Rust), day)
        .unwrap();

    let rows = CsvStore::read_day_file(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "d");
}

#[test]
fn unwritable_root_surfaces_an_io_error() {
    let t = setup_store();
    let blocker = t.dir.path().join("blocked");
    fs::write(&blocker, "not a directory").unwrap();
    let store = CsvStore::new(&blocker);

    let mut list = TaskList::new();
    let err = store
        .append_and_persist(&mut list, task("x", Language::Java), date(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(err, pomotask::Error::Io { .. }));
    assert!(!err.is_user_correctable());
}

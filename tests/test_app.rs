mod common;

use std::thread;
use std::time::{Duration, Instant};

use common::fixtures::date;
use pomotask::app::StatusLine;
use pomotask::notify::RecordingNotifier;
use pomotask::{App, Config, Countdown, Error, PomodoroLength, TimerEvent, TimerState};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn app(tmp: &TempDir) -> App<RecordingNotifier> {
    let config = Config {
        data_dir: tmp.path().to_path_buf(),
        tick_millis: 1,
        ..Config::default()
    };
    App::new(&config, RecordingNotifier::default())
}

#[test]
fn empty_fields_block_the_add() {
    let tmp = TempDir::new().unwrap();
    let mut app = app(&tmp);
    let today = date(2024, 7, 1);

    app.form.title = "Only a title".into();
    let err = app.add_task(today).unwrap_err();
    assert!(matches!(err, Error::Validation { field: "description" }));

    app.form.title.clear();
    app.form.description = "Only a description".into();
    let err = app.add_task(today).unwrap_err();
    assert!(matches!(err, Error::Validation { field: "title" }));

    assert!(app.tasks().is_empty());
    assert!(!app.store().day_file(today).exists());
    assert!(!app.store().year_dir(2024).exists());
    assert!(app.notifier().messages.is_empty());
    assert!(matches!(app.status(), Some(StatusLine::Warning(_))));
    // Inputs are kept so the user can finish them.
    assert_eq!(app.form.description, "Only a description");
}

#[test]
fn validation_failure_leaves_an_existing_file_alone() {
    let tmp = TempDir::new().unwrap();
    let mut app = app(&tmp);
    let today = date(2024, 7, 1);

    app.form.title = "first".into();
    app.form.description = "ok".into();
    let path = app.add_task(today).unwrap();
    let before = std::fs::read(&path).unwrap();

    app.form.title = "second".into();
    assert!(app.add_task(today).is_err());

    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(app.tasks().len(), 1);
}

#[test]
fn one_minute_countdown_emits_sixty_ticks_then_done() {
    let countdown = Countdown::start(60, Duration::from_millis(1));
    let mut events = Vec::new();
    while let Some(event) = countdown.recv() {
        events.push(event);
    }

    let expected: Vec<TimerEvent> = (1..=60)
        .rev()
        .map(TimerEvent::Tick)
        .chain(std::iter::once(TimerEvent::Done))
        .collect();
    assert_eq!(events, expected);
}

#[test]
fn finished_countdown_notifies_once() {
    let tmp = TempDir::new().unwrap();
    let mut app = app(&tmp);
    app.form.duration = PomodoroLength::Short;
    app.start_timer();
    assert_eq!(app.timer_state(), TimerState::Running);

    // 1500 one-millisecond ticks.
    let deadline = Instant::now() + Duration::from_secs(30);
    while app.timer_state() == TimerState::Running && Instant::now() < deadline {
        app.on_tick();
        thread::sleep(Duration::from_millis(5));
    }
    app.on_tick();

    assert_eq!(app.timer_state(), TimerState::Completed);
    assert_eq!(app.timer_display(), "00:00");
    assert_eq!(app.notifier().messages, vec!["Pomodoro finished!".to_string()]);
}

#[test]
fn stopped_countdown_never_notifies() {
    let tmp = TempDir::new().unwrap();
    let mut app = app(&tmp);
    app.start_timer();
    thread::sleep(Duration::from_millis(20));
    app.on_tick();
    app.stop_timer();

    thread::sleep(Duration::from_millis(20));
    app.on_tick();
    app.on_tick();

    assert_eq!(app.timer_state(), TimerState::Stopped);
    assert_eq!(app.timer_display(), "00:00");
    assert!(app.notifier().messages.is_empty());
}

#[test]
fn visualize_reports_the_saved_path() {
    let tmp = TempDir::new().unwrap();
    let mut app = app(&tmp);
    app.form.title = "t".into();
    app.form.description = "d".into();
    app.add_task(date(2031, 10, 10)).unwrap();

    let report = app.visualize(2031, Some("October")).unwrap();
    assert!(report.output.is_file());
    match app.status() {
        Some(StatusLine::Info(msg)) => assert!(msg.contains("Visualisasi_Tasks_2031_October.png")),
        other => panic!("unexpected status {other:?}"),
    }

    let err = app.visualize(2030, None).unwrap_err();
    assert!(matches!(err, Error::YearNotFound { year: 2030, .. }));
}

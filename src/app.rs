use std::ops::RangeInclusive;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{error, warn};

use crate::aggregate::{self, Visualization};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::notify::{LogNotifier, Notifier};
use crate::store::CsvStore;
use crate::task::{Language, PomodoroLength, Task};
use crate::task_list::TaskList;
use crate::timer::{Pomodoro, TimerEvent, TimerState};

/// Years offered by the visualization dialog.
pub const YEAR_RANGE: RangeInclusive<i32> = 2000..=2050;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Description,
    Duration,
    Language,
}

impl Field {
    const ORDER: [Field; 4] = [
        Field::Title,
        Field::Description,
        Field::Duration,
        Field::Language,
    ];

    pub fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Contents of the task entry row.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub title: String,
    pub description: String,
    pub duration: PomodoroLength,
    pub language: Language,
    pub focus: Field,
}

impl EntryForm {
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            Field::Title => self.title.push(c),
            Field::Description => self.description.push(c),
            Field::Duration | Field::Language => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Field::Title => {
                self.title.pop();
            }
            Field::Description => {
                self.description.pop();
            }
            Field::Duration | Field::Language => {}
        }
    }

    /// Step the focused choice forward or back. Text fields ignore it.
    pub fn cycle(&mut self, forward: bool) {
        match (self.focus, forward) {
            (Field::Duration, true) => self.duration = self.duration.next(),
            (Field::Duration, false) => self.duration = self.duration.prev(),
            (Field::Language, true) => self.language = self.language.next(),
            (Field::Language, false) => self.language = self.language.prev(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Info(String),
    Warning(String),
    Error(String),
}

impl StatusLine {
    fn from_error(err: &Error) -> Self {
        if err.is_user_correctable() {
            StatusLine::Warning(err.to_string())
        } else {
            StatusLine::Error(err.to_string())
        }
    }
}

/// Application controller. Owns the session's task list, the store, the
/// countdown and the notification hook; the UI shell only calls into it.
pub struct App<N: Notifier = LogNotifier> {
    pub form: EntryForm,
    tasks: TaskList,
    store: CsvStore,
    pomodoro: Pomodoro,
    notifier: N,
    status: Option<StatusLine>,
}

impl<N: Notifier> App<N> {
    pub fn new(config: &Config, notifier: N) -> Self {
        Self {
            form: EntryForm {
                duration: config.default_duration,
                language: config.default_language,
                ..EntryForm::default()
            },
            tasks: TaskList::new(),
            store: CsvStore::new(config.data_dir.clone()),
            pomodoro: Pomodoro::new(config.tick()),
            notifier,
            status: None,
        }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn store(&self) -> &CsvStore {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: StatusLine) {
        self.status = Some(status);
    }

    pub fn timer_display(&self) -> String {
        self.pomodoro.display()
    }

    pub fn timer_state(&self) -> TimerState {
        self.pomodoro.state()
    }

    /// Add the task described by the entry form and rewrite `today`'s file.
    /// A validation failure changes nothing. On success the text inputs are
    /// cleared and the choices kept.
    pub fn add_task(&mut self, today: NaiveDate) -> Result<PathBuf> {
        let task = match Task::new(
            self.form.title.clone(),
            self.form.description.clone(),
            self.form.duration,
            self.form.language,
        ) {
            Ok(task) => task,
            Err(err) => {
                self.status = Some(StatusLine::Warning("Please fill in every field.".into()));
                return Err(err);
            }
        };

        let (title, description) = (task.title.clone(), task.description.clone());
        match self.store.append_and_persist(&mut self.tasks, task, today) {
            Ok(path) => {
                self.notifier.task_added(&title, &description);
                self.form.title.clear();
                self.form.description.clear();
                self.status = Some(StatusLine::Info(format!("Saved to {}", path.display())));
                Ok(path)
            }
            Err(err) => {
                error!(error = %err, "failed to save tasks");
                self.status = Some(StatusLine::from_error(&err));
                Err(err)
            }
        }
    }

    /// Start a countdown for the duration currently selected in the form.
    pub fn start_timer(&mut self) {
        self.pomodoro.start(self.form.duration);
        self.status = Some(StatusLine::Info(format!(
            "Pomodoro started: {} minutes",
            self.form.duration.minutes()
        )));
    }

    pub fn pause_timer(&mut self) {
        self.pomodoro.pause();
    }

    pub fn stop_timer(&mut self) {
        self.pomodoro.stop();
    }

    /// Apply pending countdown events. Call from the UI loop; never blocks.
    pub fn on_tick(&mut self) {
        for event in self.pomodoro.poll() {
            if event == TimerEvent::Done {
                self.notifier.countdown_finished();
                self.status = Some(StatusLine::Info(
                    "Pomodoro finished! Take a break or start the next task.".into(),
                ));
            }
        }
    }

    /// Run the aggregation for `year` (and optionally one month) and report
    /// where the image went.
    pub fn visualize(&mut self, year: i32, month: Option<&str>) -> Result<Visualization> {
        let result = if YEAR_RANGE.contains(&year) {
            aggregate::aggregate(&self.store, year, month)
        } else {
            Err(Error::InvalidYear(year))
        };

        match &result {
            Ok(report) => {
                self.status = Some(StatusLine::Info(format!(
                    "Visualization saved to {}",
                    report.output.display()
                )));
                if !report.skipped.is_empty() {
                    warn!(files = report.skipped.len(), "some day files were skipped");
                }
            }
            Err(err) => self.status = Some(StatusLine::from_error(err)),
        }
        result
    }
}

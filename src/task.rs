use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_STATUS: &str = "Not Started";

/// Length of one work interval, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PomodoroLength {
    #[default]
    Short,
    Standard,
    Long,
    Hour,
}

impl PomodoroLength {
    pub const ALL: [PomodoroLength; 4] = [
        PomodoroLength::Short,
        PomodoroLength::Standard,
        PomodoroLength::Long,
        PomodoroLength::Hour,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            PomodoroLength::Short => 25,
            PomodoroLength::Standard => 30,
            PomodoroLength::Long => 45,
            PomodoroLength::Hour => 60,
        }
    }

    pub fn seconds(self) -> u32 {
        self.minutes() * 60
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

impl TryFrom<u32> for PomodoroLength {
    type Error = String;

    fn try_from(minutes: u32) -> std::result::Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|l| l.minutes() == minutes)
            .ok_or_else(|| format!("unsupported pomodoro length: {minutes} minutes"))
    }
}

impl From<PomodoroLength> for u32 {
    fn from(length: PomodoroLength) -> u32 {
        length.minutes()
    }
}

impl fmt::Display for PomodoroLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.minutes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Python,
    Golang,
    Java,
    Rust,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Python,
        Language::Golang,
        Language::Java,
        Language::Rust,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Golang => "Golang",
            Language::Java => "Java",
            Language::Rust => "Rust",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown language: {s}"))
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
    let len = all.len() as isize;
    let index = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
    all[(index + step).rem_euclid(len) as usize]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub duration: PomodoroLength,
    pub language: Language,
    pub status: String,
}

impl Task {
    /// Build a task from raw entry fields. Title and description must be
    /// non-empty; nothing else is checked.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        duration: PomodoroLength,
        language: Language,
    ) -> Result<Self> {
        let title = title.into();
        let description = description.into();
        if title.is_empty() {
            return Err(Error::Validation { field: "title" });
        }
        if description.is_empty() {
            return Err(Error::Validation {
                field: "description",
            });
        }
        Ok(Self {
            title,
            description,
            duration,
            language,
            status: DEFAULT_STATUS.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_rejected() {
        let err = Task::new("", "desc", PomodoroLength::Short, Language::Rust).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "title" }));

        let err = Task::new("title", "", PomodoroLength::Short, Language::Rust).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "description" }));
    }

    #[test]
    fn new_task_starts_not_started() {
        let task = Task::new("Write parser", "lexer first", PomodoroLength::Long, Language::Golang)
            .unwrap();
        assert_eq!(task.status, "Not Started");
        assert_eq!(task.duration.minutes(), 45);
    }

    #[test]
    fn length_only_accepts_the_four_choices() {
        assert_eq!(PomodoroLength::try_from(60), Ok(PomodoroLength::Hour));
        assert!(PomodoroLength::try_from(50).is_err());
        assert_eq!(PomodoroLength::Short.seconds(), 1500);
    }

    #[test]
    fn choices_cycle_in_both_directions() {
        assert_eq!(PomodoroLength::Hour.next(), PomodoroLength::Short);
        assert_eq!(PomodoroLength::Short.prev(), PomodoroLength::Hour);
        assert_eq!(Language::Rust.next(), Language::Python);
        assert_eq!(Language::Python.prev(), Language::Rust);
    }

    #[test]
    fn language_parses_case_insensitively() {
        assert_eq!("golang".parse::<Language>(), Ok(Language::Golang));
        assert!("cobol".parse::<Language>().is_err());
    }
}

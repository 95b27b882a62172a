use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::task::{Language, Task};
use crate::task_list::TaskList;

pub const CSV_HEADER: [&str; 6] = ["Tanggal", "Judul", "Deskripsi", "Durasi", "Bahasa", "Status"];
pub const DAILY_SUFFIX: &str = "_tasks.csv";
pub const VISUALIZATION_DIR: &str = "Visualisasi";

/// One row of a day file as written.
#[derive(Debug, Serialize)]
struct TaskRecord<'a> {
    #[serde(rename = "Tanggal")]
    date: NaiveDate,
    #[serde(rename = "Judul")]
    title: &'a str,
    #[serde(rename = "Deskripsi")]
    description: &'a str,
    #[serde(rename = "Durasi")]
    duration: u32,
    #[serde(rename = "Bahasa")]
    language: Language,
    #[serde(rename = "Status")]
    status: &'a str,
}

/// One row of a day file as read back. Everything stays textual so that
/// files edited by hand still load; the date is parsed by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredRow {
    #[serde(rename = "Tanggal")]
    pub date: String,
    #[serde(rename = "Judul")]
    pub title: String,
    #[serde(rename = "Deskripsi")]
    pub description: String,
    #[serde(rename = "Durasi")]
    pub duration: String,
    #[serde(rename = "Bahasa")]
    pub language: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// Date-partitioned CSV tree rooted at `root`:
/// `<root>/<YYYY>/<MonthName>/<D>/<YYYY-MM-DD>_tasks.csv`.
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn year_dir(&self, year: i32) -> PathBuf {
        self.root.join(year.to_string())
    }

    pub fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.year_dir(date.year())
            .join(date.format("%B").to_string())
            .join(date.day().to_string())
    }

    pub fn day_file(&self, date: NaiveDate) -> PathBuf {
        self.day_dir(date)
            .join(format!("{}{}", date.format("%Y-%m-%d"), DAILY_SUFFIX))
    }

    pub fn visualization_dir(&self, year: i32) -> PathBuf {
        self.year_dir(year).join(VISUALIZATION_DIR)
    }

    /// Push `task` onto the session list, then rewrite the day file with the
    /// whole list.
    pub fn append_and_persist(
        &self,
        tasks: &mut TaskList,
        task: Task,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        tasks.add_task(task);
        self.save_day(tasks, date)
    }

    /// Overwrite the file for `date` with every task in `tasks`. Every row
    /// carries `date`, whatever day the task was entered.
    pub fn save_day(&self, tasks: &TaskList, date: NaiveDate) -> Result<PathBuf> {
        let dir = self.day_dir(date);
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let path = self.day_file(date);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(|e| Error::csv(&path, e))?;

        writer
            .write_record(CSV_HEADER)
            .map_err(|e| Error::csv(&path, e))?;
        for task in tasks.tasks() {
            writer
                .serialize(TaskRecord {
                    date,
                    title: &task.title,
                    description: &task.description,
                    duration: task.duration.minutes(),
                    language: task.language,
                    status: &task.status,
                })
                .map_err(|e| Error::csv(&path, e))?;
        }
        writer.flush().map_err(|e| Error::io(&path, e))?;

        info!(path = %path.display(), rows = tasks.len(), "saved day file");
        Ok(path)
    }

    /// Every day file under `<root>/<year>`, optionally restricted to the
    /// month folder whose name matches `month` case-insensitively. Paths are
    /// sorted so results do not depend on directory iteration order.
    pub fn day_files(&self, year: i32, month: Option<&str>) -> Result<Vec<PathBuf>> {
        let year_dir = self.year_dir(year);
        if !year_dir.is_dir() {
            return Err(Error::YearNotFound {
                year,
                path: year_dir,
            });
        }

        let mut files = Vec::new();
        for month_dir in sorted_subdirs(&year_dir)? {
            let name = file_name(&month_dir);
            if name == VISUALIZATION_DIR {
                continue;
            }
            if let Some(month) = month {
                if !name.eq_ignore_ascii_case(month) {
                    continue;
                }
            }
            for day_dir in sorted_subdirs(&month_dir)? {
                let mut found = day_csvs(&day_dir)?;
                debug!(dir = %day_dir.display(), files = found.len(), "scanned day folder");
                files.append(&mut found);
            }
        }
        Ok(files)
    }

    pub fn read_day_file(path: &Path) -> std::result::Result<Vec<StoredRow>, csv::Error> {
        let mut reader = csv::Reader::from_path(path)?;
        reader.deserialize::<StoredRow>().collect()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn day_csvs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && file_name(&path).ends_with(DAILY_SUFFIX) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

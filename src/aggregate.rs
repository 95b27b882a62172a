use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate};
use tracing::{debug, info, warn};

use crate::chart::{self, Captions};
use crate::error::{Error, Result};
use crate::store::{CsvStore, StoredRow};

/// A day file that could not be read. Logged and left out of the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    /// ISO week of year, used when a month was selected.
    Week,
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Tasks per language, most frequent first.
    pub languages: Vec<(String, usize)>,
    pub period_kind: PeriodKind,
    /// Tasks per week number or month name, in calendar order.
    pub periods: Vec<(String, usize)>,
}

/// A dated row, ready for grouping.
#[derive(Debug, Clone)]
struct DatedRow {
    date: NaiveDate,
    language: String,
}

#[derive(Debug, Clone)]
pub struct Visualization {
    pub year: i32,
    pub month: Option<Month>,
    pub summary: Summary,
    pub rows: usize,
    pub dropped_rows: usize,
    pub skipped: Vec<SkippedFile>,
    pub output: PathBuf,
}

pub fn parse_month(name: &str) -> Result<Month> {
    Month::from_str(name.trim()).map_err(|_| Error::InvalidMonth(name.to_string()))
}

/// Load every day file for `year` (optionally one month), summarise it and
/// write the chart image under `<root>/<year>/Visualisasi`.
pub fn aggregate(store: &CsvStore, year: i32, month: Option<&str>) -> Result<Visualization> {
    let month = month.map(parse_month).transpose()?;
    let month_name = month.map(|m| m.name());

    let files = store.day_files(year, month_name)?;

    let mut rows = Vec::new();
    let mut dropped_rows = 0;
    let mut skipped = Vec::new();
    for path in files {
        match CsvStore::read_day_file(&path) {
            Ok(stored) => {
                let before = rows.len();
                dropped_rows += collect_dated(stored, &mut rows);
                debug!(path = %path.display(), rows = rows.len() - before, "loaded day file");
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable day file");
                skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }

    if dropped_rows > 0 {
        warn!(dropped_rows, "rows with unparseable dates were left out");
    }
    if rows.is_empty() {
        return Err(Error::NoDataFound {
            year,
            month: month_name.map(str::to_string),
        });
    }

    let summary = summarize(&rows, month.is_some());

    let out_dir = store.visualization_dir(year);
    fs::create_dir_all(&out_dir).map_err(|e| Error::io(&out_dir, e))?;
    let output = out_dir.join(output_file_name(year, month_name));

    let img = chart::render(
        &summary.languages,
        &summary.periods,
        &captions(year, month_name),
    );
    chart::save(&img, &output)?;
    info!(path = %output.display(), rows = rows.len(), "visualization saved");

    Ok(Visualization {
        year,
        month,
        summary,
        rows: rows.len(),
        dropped_rows,
        skipped,
        output,
    })
}

fn captions(year: i32, month: Option<&str>) -> Captions {
    let (bar_title, bar_axis) = match month {
        Some(month) => (format!("Tasks per Week, {month} {year}"), "Week"),
        None => (format!("Tasks per Month, {year}"), "Month"),
    };
    Captions {
        pie_title: format!("Language Distribution {year}"),
        bar_title,
        bar_axis: bar_axis.to_string(),
    }
}

pub fn output_file_name(year: i32, month: Option<&str>) -> String {
    match month {
        Some(month) => format!("Visualisasi_Tasks_{year}_{month}.png"),
        None => format!("Visualisasi_Tasks_{year}.png"),
    }
}

/// Keep rows whose date parses as `YYYY-MM-DD`. Returns how many were dropped.
fn collect_dated(stored: Vec<StoredRow>, out: &mut Vec<DatedRow>) -> usize {
    let mut dropped = 0;
    for row in stored {
        match NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d") {
            Ok(date) => out.push(DatedRow {
                date,
                language: row.language,
            }),
            Err(_) => dropped += 1,
        }
    }
    dropped
}

/// Rows with a blank language still count toward the period totals.
fn summarize(rows: &[DatedRow], by_week: bool) -> Summary {
    let mut languages: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        let language = row.language.trim();
        if !language.is_empty() {
            *languages.entry(language).or_default() += 1;
        }
    }
    let mut languages: Vec<(String, usize)> = languages
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut periods: BTreeMap<u32, usize> = BTreeMap::new();
    for row in rows {
        let key = if by_week {
            row.date.iso_week().week()
        } else {
            row.date.month()
        };
        *periods.entry(key).or_default() += 1;
    }
    let periods = periods
        .into_iter()
        .map(|(key, count)| {
            let label = if by_week {
                key.to_string()
            } else {
                month_label(key)
            };
            (label, count)
        })
        .collect();

    Summary {
        languages,
        period_kind: if by_week {
            PeriodKind::Week
        } else {
            PeriodKind::Month
        },
        periods,
    }
}

fn month_label(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(date: &str, language: &str) -> DatedRow {
        DatedRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            language: language.to_string(),
        }
    }

    #[test]
    fn months_are_in_calendar_order() {
        let rows = [
            row("2024-11-02", "Rust"),
            row("2024-02-10", "Java"),
            row("2024-02-11", "Rust"),
        ];
        let summary = summarize(&rows, false);
        assert_eq!(summary.period_kind, PeriodKind::Month);
        assert_eq!(
            summary.periods,
            vec![("February".to_string(), 2), ("November".to_string(), 1)]
        );
        assert_eq!(
            summary.languages,
            vec![("Rust".to_string(), 2), ("Java".to_string(), 1)]
        );
    }

    #[test]
    fn weeks_use_iso_numbering() {
        // 2024-03-03 is a Sunday (week 9), 2024-03-04 a Monday (week 10).
        let rows = [row("2024-03-03", "Go"), row("2024-03-04", "Go"), row("2024-03-05", "Go")];
        let summary = summarize(&rows, true);
        assert_eq!(
            summary.periods,
            vec![("9".to_string(), 1), ("10".to_string(), 2)]
        );
    }

    #[test]
    fn blank_languages_are_left_out_of_the_share() {
        let rows = [
            row("2024-04-01", ""),
            row("2024-04-01", "  "),
            row("2024-04-01", "Rust"),
        ];
        let summary = summarize(&rows, false);
        assert_eq!(summary.languages, vec![("Rust".to_string(), 1)]);
        assert_eq!(summary.periods, vec![("April".to_string(), 3)]);
    }

    #[test]
    fn captions_follow_the_selection() {
        let yearly = captions(2024, None);
        assert_eq!(yearly.pie_title, "Language Distribution 2024");
        assert_eq!(yearly.bar_title, "Tasks per Month, 2024");
        assert_eq!(yearly.bar_axis, "Month");
        let monthly = captions(2024, Some("March"));
        assert_eq!(monthly.bar_title, "Tasks per Week, March 2024");
        assert_eq!(monthly.bar_axis, "Week");
    }

    #[test]
    fn bad_dates_are_dropped() {
        let stored = vec![
            StoredRow {
                date: "2024-13-40".into(),
                title: "t".into(),
                description: "d".into(),
                duration: "25".into(),
                language: "Rust".into(),
                status: "Not Started".into(),
            },
            StoredRow {
                date: "2024-01-02".into(),
                title: "t".into(),
                description: "d".into(),
                duration: "25".into(),
                language: "Rust".into(),
                status: "Not Started".into(),
            },
        ];
        let mut out = Vec::new();
        assert_eq!(collect_dated(stored, &mut out), 1);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn month_names_parse_loosely() {
        assert_eq!(parse_month("march").unwrap(), Month::March);
        assert_eq!(parse_month(" December ").unwrap(), Month::December);
        assert!(matches!(parse_month("Smarch"), Err(Error::InvalidMonth(_))));
    }

    #[test]
    fn output_names() {
        assert_eq!(output_file_name(2024, None), "Visualisasi_Tasks_2024.png");
        assert_eq!(
            output_file_name(2024, Some("March")),
            "Visualisasi_Tasks_2024_March.png"
        );
    }
}

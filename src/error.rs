use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required entry field was left empty. Nothing is stored.
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    #[error("year folder {year} not found at {}", path.display())]
    YearNotFound { year: i32, path: PathBuf },

    #[error("no task data found for {}", period(*year, month.as_deref()))]
    NoDataFound { year: i32, month: Option<String> },

    #[error("unknown month: {0}")]
    InvalidMonth(String),

    #[error("year {0} is out of range (2000-2050)")]
    InvalidYear(i32),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            source,
        }
    }

    /// Whether the user can fix this by changing their input, as opposed to
    /// an environment failure such as a full disk.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. }
                | Error::YearNotFound { .. }
                | Error::NoDataFound { .. }
                | Error::InvalidMonth(_)
                | Error::InvalidYear(_)
        )
    }
}

fn period(year: i32, month: Option<&str>) -> String {
    match month {
        Some(month) => format!("{month} {year}"),
        None => year.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_period() {
        let err = Error::NoDataFound {
            year: 2024,
            month: Some("March".into()),
        };
        assert_eq!(err.to_string(), "no task data found for March 2024");

        let err = Error::NoDataFound {
            year: 2024,
            month: None,
        };
        assert_eq!(err.to_string(), "no task data found for 2024");
    }

    #[test]
    fn io_failures_are_not_user_correctable() {
        let err = Error::io(
            "/tmp/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_user_correctable());
        assert!(Error::Validation { field: "title" }.is_user_correctable());
    }
}

pub mod aggregate;
pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod notify;
pub mod store;
pub mod task;
pub mod task_list;
pub mod timer;

pub use aggregate::{aggregate, Summary, Visualization};
pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use store::CsvStore;
pub use task::{Language, PomodoroLength, Task};
pub use task_list::TaskList;
pub use timer::{Countdown, Pomodoro, TimerEvent, TimerState};

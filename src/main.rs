use std::{io, path::PathBuf};

use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pomotask::{
    config::CONFIG_FILE, notify::LogNotifier, timer::format_remaining, App, Config, Countdown,
    PomodoroLength, TimerEvent,
};
use ratatui::{backend::CrosstermBackend, Terminal};

mod logging;
mod ui;

#[derive(Parser)]
#[command(name = "pomotask")]
#[command(about = "Pomodoro timer with daily task bookkeeping")]
struct Cli {
    /// Config file (defaults to ./pomotask.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Storage root for the year/month/day CSV tree
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal UI (default)
    Tui,
    /// Chart a year of tasks, optionally one month
    Visualize {
        #[arg(long)]
        year: Option<i32>,
        /// Full English month name, e.g. "March"
        #[arg(long)]
        month: Option<String>,
    },
    /// Run a single countdown in the terminal
    Timer {
        /// 25, 30, 45 or 60
        #[arg(long, default_value_t = 25)]
        minutes: u32,
    },
    /// Write a default config file
    Init,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let mut config = Config::load(&config_path)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(config),
        Command::Visualize { year, month } => {
            logging::init_stderr()?;
            let year = year.unwrap_or_else(|| Local::now().year());
            let mut app = App::new(&config, LogNotifier);
            let report = app.visualize(year, month.as_deref())?;
            for (language, count) in &report.summary.languages {
                println!("{language}: {count}");
            }
            for skipped in &report.skipped {
                println!("skipped {}: {}", skipped.path.display(), skipped.reason);
            }
            println!("Visualization saved to {}", report.output.display());
            Ok(())
        }
        Command::Timer { minutes } => {
            logging::init_stderr()?;
            let length = PomodoroLength::try_from(minutes).map_err(anyhow::Error::msg)?;
            let countdown = Countdown::start(length.seconds(), config.tick());
            while let Some(event) = countdown.recv() {
                match event {
                    TimerEvent::Tick(remaining) => println!("{}", format_remaining(remaining)),
                    TimerEvent::Done => {
                        println!("00:00 Pomodoro finished!");
                        break;
                    }
                    TimerEvent::Cancelled => break,
                }
            }
            Ok(())
        }
        Command::Init => {
            if Config::init(&config_path)? {
                println!("Config written to {}", config_path.display());
            } else {
                println!("Config already exists at {}", config_path.display());
            }
            Ok(())
        }
    }
}

fn run_tui(config: Config) -> anyhow::Result<()> {
    let _guard = logging::init_file(&config.log_dir())?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, LogNotifier);
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("terminal UI failed")
}

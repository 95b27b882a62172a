use std::io;
use std::time::Duration;

use chrono::{Datelike, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use pomotask::app::{App, Field, StatusLine, YEAR_RANGE};
use pomotask::notify::Notifier;
use pomotask::timer::TimerState;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run_app<B: Backend, N: Notifier>(
    terminal: &mut Terminal<B>,
    app: &mut App<N>,
) -> io::Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|f| draw(f, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()), // Quit
                KeyCode::Tab => app.form.focus = app.form.focus.next(),
                KeyCode::BackTab => app.form.focus = app.form.focus.prev(),
                KeyCode::Left => app.form.cycle(false),
                KeyCode::Right => app.form.cycle(true),
                KeyCode::Backspace => app.form.backspace(),
                KeyCode::Enter => {
                    // Outcome is shown on the status line.
                    let _ = app.add_task(Local::now().date_naive());
                }
                KeyCode::F(5) => app.start_timer(),
                KeyCode::F(6) => app.pause_timer(),
                KeyCode::F(7) => app.stop_timer(),
                KeyCode::F(8) => {
                    visualization_dialog(app);
                    terminal.clear()?;
                }
                KeyCode::Char(c) => app.form.push_char(c),
                _ => {}
            }
        }
    }
}

fn visualization_dialog<N: Notifier>(app: &mut App<N>) {
    let current_year = Local::now().year();
    let Some(year) = prompt(&format!(
        "Year ({}-{}, blank for {current_year}):",
        YEAR_RANGE.start(),
        YEAR_RANGE.end()
    )) else {
        return;
    };
    let year = if year.is_empty() {
        current_year
    } else {
        match year.parse::<i32>() {
            Ok(year) => year,
            Err(_) => {
                app.set_status(StatusLine::Warning(format!("Not a year: {year}")));
                return;
            }
        }
    };
    let Some(month) = prompt("Month (January-December, blank for all months):") else {
        return;
    };
    let month = Some(month.as_str()).filter(|m| !m.is_empty());

    // Outcome is shown on the status line.
    let _ = app.visualize(year, month);
}

fn draw<N: Notifier>(f: &mut Frame, app: &App<N>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_timer(f, app, chunks[0]);
    draw_form(f, app, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" add task  "),
        Span::styled("F5", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" start  "),
        Span::styled("F6", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" pause  "),
        Span::styled("F7", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" stop  "),
        Span::styled("F8", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" visualize  "),
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" next field  "),
        Span::styled("←/→", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" change choice  "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    draw_tasks(f, app, chunks[3]);

    let status = match app.status() {
        Some(StatusLine::Info(msg)) => Span::styled(msg.as_str(), Style::default().fg(Color::Green)),
        Some(StatusLine::Warning(msg)) => {
            Span::styled(msg.as_str(), Style::default().fg(Color::Yellow))
        }
        Some(StatusLine::Error(msg)) => Span::styled(msg.as_str(), Style::default().fg(Color::Red)),
        None => Span::raw(""),
    };
    f.render_widget(Paragraph::new(Line::from(status)), chunks[4]);
}

fn draw_timer<N: Notifier>(f: &mut Frame, app: &App<N>, area: Rect) {
    let state = match app.timer_state() {
        TimerState::Idle => "Idle",
        TimerState::Running => "Running",
        TimerState::Stopped => "Stopped",
        TimerState::Completed => "Done",
    };
    let timer = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            app.timer_display(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(format!("Pomodoro ({state})"))
            .borders(Borders::ALL),
    );
    f.render_widget(timer, area);
}

fn draw_form<N: Notifier>(f: &mut Frame, app: &App<N>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ])
        .split(area);

    let fields = [
        (Field::Title, "Task Title", app.form.title.clone()),
        (Field::Description, "Task Description", app.form.description.clone()),
        (
            Field::Duration,
            "Pomodoro Length",
            format!("< {} min >", app.form.duration.minutes()),
        ),
        (
            Field::Language,
            "Language",
            format!("< {} >", app.form.language),
        ),
    ];

    for (i, (field, title, value)) in fields.into_iter().enumerate() {
        let input = Paragraph::new(value).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(if app.form.focus == field {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        );
        f.render_widget(input, chunks[i]);
    }
}

fn draw_tasks<N: Notifier>(f: &mut Frame, app: &App<N>, area: Rect) {
    let header = Row::new(vec![
        "Title",
        "Description",
        "Duration (min)",
        "Language",
        "Status",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .tasks()
        .tasks()
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.title.as_str()),
                Cell::from(t.description.as_str()),
                Cell::from(t.duration.to_string()),
                Cell::from(t.language.as_str()),
                Cell::from(t.status.as_str()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(16),
        ],
    )
    .header(header)
    .block(Block::default().title("Tasks").borders(Borders::ALL));
    f.render_widget(table, area);
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        enable_raw_mode().ok();
        Some(input.trim().to_string())
    } else {
        enable_raw_mode().ok();
        None
    }
}

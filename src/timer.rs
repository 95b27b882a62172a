//! Pomodoro countdown.
//!
//! [`Countdown`] is the background worker: it decrements once per tick on
//! its own thread and reports through an ordered channel. [`Pomodoro`] is the
//! control-side state machine that the UI loop polls without blocking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::task::PomodoroLength;

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Seconds left, sent before sleeping through that second.
    Tick(u32),
    /// Reached zero without being stopped.
    Done,
    /// Stopped before reaching zero.
    Cancelled,
}

impl TimerEvent {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TimerEvent::Tick(_))
    }
}

/// A running countdown. Dropping it stops the worker.
#[derive(Debug)]
pub struct Countdown {
    stop: Arc<AtomicBool>,
    events: Receiver<TimerEvent>,
}

impl Countdown {
    pub fn start(total_seconds: u32, tick: Duration) -> Self {
        let (tx, events) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        thread::spawn(move || {
            let mut remaining = total_seconds;
            while remaining > 0 && !flag.load(Ordering::SeqCst) {
                if tx.send(TimerEvent::Tick(remaining)).is_err() {
                    // Receiver dropped: nobody is tracking this countdown.
                    return;
                }
                thread::sleep(tick);
                remaining -= 1;
            }
            let last = if flag.load(Ordering::SeqCst) {
                TimerEvent::Cancelled
            } else {
                TimerEvent::Done
            };
            let _ = tx.send(last);
        });

        Self { stop, events }
    }

    /// Ask the worker to halt. Takes effect at its next tick boundary.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Block until the next event. `None` once the worker has exited and
    /// every event was consumed.
    pub fn recv(&self) -> Option<TimerEvent> {
        self.events.recv().ok()
    }

    pub fn try_recv(&self) -> Option<TimerEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Stopped,
    Completed,
}

/// Control-side view of the single active countdown.
#[derive(Debug)]
pub struct Pomodoro {
    tick: Duration,
    state: TimerState,
    remaining: u32,
    countdown: Option<Countdown>,
}

impl Pomodoro {
    pub fn new(tick: Duration) -> Self {
        Self {
            tick,
            state: TimerState::Idle,
            remaining: PomodoroLength::default().seconds(),
            countdown: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn display(&self) -> String {
        format_remaining(self.remaining)
    }

    /// Begin a fresh session. Any previous countdown is abandoned; its
    /// events are never applied.
    pub fn start(&mut self, length: PomodoroLength) {
        let total = length.seconds();
        info!(minutes = length.minutes(), "countdown started");
        self.countdown = Some(Countdown::start(total, self.tick));
        self.remaining = total;
        self.state = TimerState::Running;
    }

    /// Cancel and keep the last displayed value.
    pub fn pause(&mut self) {
        if self.cancel() {
            info!(remaining = self.remaining, "countdown paused");
        }
    }

    /// Cancel and reset the display to zero.
    pub fn stop(&mut self) {
        if self.cancel() {
            info!(remaining = self.remaining, "countdown stopped");
        }
        self.remaining = 0;
    }

    fn cancel(&mut self) -> bool {
        match (&self.countdown, self.state) {
            (Some(countdown), TimerState::Running) => {
                countdown.stop();
                self.state = TimerState::Stopped;
                true
            }
            _ => false,
        }
    }

    /// Apply every event the worker has sent so far, in order. Returns the
    /// events that changed state so the caller can react to `Done`.
    pub fn poll(&mut self) -> Vec<TimerEvent> {
        let mut applied = Vec::new();
        let Some(countdown) = &self.countdown else {
            return applied;
        };

        let mut finished = false;
        while let Some(event) = countdown.try_recv() {
            match event {
                TimerEvent::Tick(remaining) if self.state == TimerState::Running => {
                    debug!(remaining, "tick");
                    self.remaining = remaining;
                    applied.push(event);
                }
                TimerEvent::Tick(_) => {}
                TimerEvent::Done if self.state == TimerState::Running => {
                    info!("countdown finished");
                    self.remaining = 0;
                    self.state = TimerState::Completed;
                    applied.push(event);
                    finished = true;
                }
                TimerEvent::Done | TimerEvent::Cancelled => {
                    applied.push(TimerEvent::Cancelled);
                    finished = true;
                }
            }
            if finished {
                break;
            }
        }

        if finished {
            self.countdown = None;
        }
        applied
    }
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

/// `MM:SS`, minutes not capped at 59.
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

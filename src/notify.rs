use tracing::info;

/// Hooks for side effects outside the core, such as desktop notifications.
/// Implementations must not fail the operation that triggered them.
pub trait Notifier {
    fn task_added(&mut self, title: &str, description: &str);
    fn countdown_finished(&mut self);
}

/// Records notifications in the log only.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn task_added(&mut self, title: &str, description: &str) {
        info!(notification = %format!("{title} - {description}"), "task added");
    }

    fn countdown_finished(&mut self) {
        info!("pomodoro finished: take a break or start the next task");
    }
}

/// Keeps every notification in memory, newest last.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn task_added(&mut self, title: &str, description: &str) {
        self.messages.push(format!("Task added: {title} - {description}"));
    }

    fn countdown_finished(&mut self) {
        self.messages.push("Pomodoro finished!".to_string());
    }
}

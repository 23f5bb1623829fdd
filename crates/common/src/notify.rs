use std::cell::RefCell;

/// Default on-screen time for a notification.
pub const DEFAULT_NOTIFICATION_MS: u64 = 3000;

/// Fire-and-forget user notifications. Nothing is acknowledged and nothing
/// in the core synchronizes on a notification.
pub trait NotificationSink {
    fn display(&self, message: &str, duration_ms: u64);
}

/// Starts an opaque mini-game by name. The core never observes its state.
pub trait MiniGameLauncher {
    fn start(&self, name: &str);
}

/// Sink that writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn display(&self, message: &str, duration_ms: u64) {
        tracing::info!(target: "oasis::notify", duration_ms, "{message}");
    }
}

/// Launcher that only logs the request.
#[derive(Debug, Default)]
pub struct LogLauncher;

impl MiniGameLauncher for LogLauncher {
    fn start(&self, name: &str) {
        tracing::info!(target: "oasis::minigame", game = name, "mini-game started");
    }
}

/// A notification captured by [`NotificationLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub duration_ms: u64,
}

/// Sink that records every notification. Used by tests and tooling.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether any recorded message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|n| n.message.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl NotificationSink for NotificationLog {
    fn display(&self, message: &str, duration_ms: u64) {
        self.entries.borrow_mut().push(Notification {
            message: message.to_string(),
            duration_ms,
        });
    }
}

/// Launcher that records every start request.
#[derive(Debug, Default)]
pub struct LaunchLog {
    started: RefCell<Vec<String>>,
}

impl LaunchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> Vec<String> {
        self.started.borrow().clone()
    }
}

impl MiniGameLauncher for LaunchLog {
    fn start(&self, name: &str) {
        self.started.borrow_mut().push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_log_records_in_order() {
        let log = NotificationLog::new();
        log.display("Loading ARCADE...", 3000);
        log.display("Entered ARCADE", 1500);
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages(), vec!["Loading ARCADE...", "Entered ARCADE"]);
        assert_eq!(log.entries()[1].duration_ms, 1500);
        assert!(log.contains("Entered"));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn launch_log_records_names() {
        let log = LaunchLog::new();
        log.start("PAC-MAN");
        log.start("GALAGA");
        assert_eq!(log.started(), vec!["PAC-MAN", "GALAGA"]);
    }

    #[test]
    fn sinks_are_object_safe() {
        let sink: Box<dyn NotificationSink> = Box::new(LogNotifier);
        sink.display("hello", DEFAULT_NOTIFICATION_MS);
        let launcher: Box<dyn MiniGameLauncher> = Box::new(LogLauncher);
        launcher.start("JOUST");
    }
}

use oasis_common::DEFAULT_NOTIFICATION_MS;

/// A side effect requested by an interactable handler.
///
/// Handlers never hold references to the world manager or the avatar; they
/// push commands and the session applies them before the dispatch call
/// returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Transition to the named world.
    LoadWorld(String),
    /// Start an opaque mini-game.
    StartMiniGame(String),
    /// Show a message to the user.
    Notify { message: String, duration_ms: u64 },
}

/// Ordered buffer of commands produced during one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push(command);
    }

    pub fn load_world(&mut self, name: impl Into<String>) {
        self.push(Command::LoadWorld(name.into()));
    }

    pub fn start_mini_game(&mut self, name: impl Into<String>) {
        self.push(Command::StartMiniGame(name.into()));
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notify_for(message, DEFAULT_NOTIFICATION_MS);
    }

    pub fn notify_for(&mut self, message: impl Into<String>, duration_ms: u64) {
        self.push(Command::Notify {
            message: message.into(),
            duration_ms,
        });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.queue.iter()
    }

    /// Take every queued command, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}

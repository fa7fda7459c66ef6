use super::SessionConfig;
use crate::command::Command;
use crate::mvi::{Action, State};
use crate::storage::VersionedStore;
use std::collections::VecDeque;

/// Whether a confirmation prompt is on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Hidden,
    LastCommandConfirmation { message: String },
}

#[derive(Debug)]
pub enum SessionAction {
    Apply(Command),
}

impl Action for SessionAction {}

/// Everything a front end session owns
pub struct SessionState {
    pub(crate) storage: VersionedStore<String, String>,
    pub(crate) pending_command: Option<Command>,
    pub(crate) dialog: DialogState,
    pub(crate) operations_log: VecDeque<String>,
    pub(crate) state_version: u64,
    pub(crate) config: SessionConfig,
}

impl SessionState {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            storage: VersionedStore::new(),
            pending_command: None,
            dialog: DialogState::Hidden,
            operations_log: VecDeque::with_capacity(config.log_capacity),
            state_version: 0,
            config,
        }
    }

    pub fn storage(&self) -> &VersionedStore<String, String> {
        &self.storage
    }

    /// Append a log line, dropping the oldest beyond the configured capacity
    pub(crate) fn log(&mut self, line: impl Into<String>) {
        self.operations_log.push_back(line.into());
        while self.operations_log.len() > self.config.log_capacity {
            self.operations_log.pop_front();
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// Snapshot published to front ends after each action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub dialog: DialogState,
    pub operations_log: Vec<String>,
    pub pending_command: Option<Command>,
    pub state_version: u64,
    pub transaction_depth: usize,
}

impl SessionView {
    pub fn last_log(&self) -> Option<&str> {
        self.operations_log.last().map(String::as_str)
    }

    /// Line a line-oriented front end prints: the prompt if one is shown,
    /// otherwise the latest log entry
    pub fn display_line(&self) -> Option<&str> {
        match &self.dialog {
            DialogState::LastCommandConfirmation { message } => Some(message),
            DialogState::Hidden => self.last_log(),
        }
    }
}

impl State for SessionState {
    type View = SessionView;

    fn view(&self) -> SessionView {
        SessionView {
            dialog: self.dialog.clone(),
            operations_log: self.operations_log.iter().cloned().collect(),
            pending_command: self.pending_command.clone(),
            state_version: self.state_version,
            transaction_depth: self.storage.depth(),
        }
    }
}

use super::{DialogState, SessionAction, SessionState};
use crate::command::Command;
use crate::core::{KvError, Result};
use crate::mvi::Reducer;
use crate::storage::KeyValueStorage;
use tracing::debug;

/// Maps user commands onto store calls and log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionReducer;

fn outcome(result: &Result<()>) -> String {
    match result {
        Ok(()) => "OK".to_string(),
        Err(KvError::ActiveTransactionNotFound) => "ActiveTransactionNotFound".to_string(),
        Err(other) => other.to_string(),
    }
}

impl SessionReducer {
    fn run_transaction_control(state: &mut SessionState, command: &Command) -> Option<Result<()>> {
        match command {
            Command::Commit => Some(state.storage.commit()),
            Command::Rollback => Some(state.storage.rollback()),
            _ => None,
        }
    }

    fn on_command(state: &mut SessionState, command: Command) {
        match command {
            Command::Begin => {
                let transaction = state.storage.begin();
                state.log(format!(
                    "{} transaction with id = {}",
                    command.name(),
                    transaction.id()
                ));
            }

            Command::Commit | Command::Rollback if state.config.confirm_transactions => {
                state.dialog = DialogState::LastCommandConfirmation {
                    message: format!(
                        "are you sure you want to perform the operation {} ? (y/n):",
                        command.name()
                    ),
                };
                state.log(format!("Try to {} last transaction.", command.name()));
                state.pending_command = Some(command);
            }

            Command::Commit | Command::Rollback => {
                if let Some(result) = Self::run_transaction_control(state, &command) {
                    state.log(format!("{} result: {}", command.name(), outcome(&result)));
                }
            }

            Command::Confirm => {
                let pending = state.pending_command.take();
                state.dialog = DialogState::Hidden;
                match pending {
                    Some(pending) => {
                        if let Some(result) = Self::run_transaction_control(state, &pending) {
                            state.log(format!("{} result: {}", pending.name(), outcome(&result)));
                        }
                    }
                    None => state.log("Nothing to confirm."),
                }
            }

            Command::Deny => {
                state.pending_command = None;
                state.dialog = DialogState::Hidden;
                state.log("Deny.");
            }

            Command::Count { value } => {
                let count = state.storage.count(&value);
                state.log(count.to_string());
            }

            Command::Delete { key } => {
                state.storage.delete(&key);
                state.log("Deleted.");
            }

            Command::Get { key } => {
                let line = match state.storage.get(&key) {
                    Some(value) => value.clone(),
                    None => "key not set.".to_string(),
                };
                state.log(line);
            }

            Command::Set { key, value } => {
                state.storage.set(key, value);
                state.log("Value accepted.");
            }

            Command::Error(message) => {
                state.log(format!("Error:{}.", message));
            }

            // front ends end the session themselves
            Command::Exit => return,
        }

        state.state_version += 1;
    }
}

impl Reducer<SessionState, SessionAction> for SessionReducer {
    fn reduce(&self, state: &mut SessionState, action: SessionAction) {
        match action {
            SessionAction::Apply(command) => {
                debug!(command = %command, version = state.state_version, "apply");
                Self::on_command(state, command);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;

    fn apply(state: &mut SessionState, line: &str) {
        SessionReducer.reduce(state, SessionAction::Apply(Command::from_input(line)));
    }

    fn last(state: &SessionState) -> &str {
        state.operations_log.back().map(String::as_str).unwrap_or("")
    }

    #[test]
    fn test_set_and_get() {
        let mut state = SessionState::default();
        apply(&mut state, "set foo 123");
        assert_eq!(last(&state), "Value accepted.");
        apply(&mut state, "get foo");
        assert_eq!(last(&state), "123");
        apply(&mut state, "get bar");
        assert_eq!(last(&state), "key not set.");
        assert_eq!(state.state_version, 3);
    }

    #[test]
    fn test_commit_waits_for_confirmation() {
        let mut state = SessionState::default();
        apply(&mut state, "begin");
        assert_eq!(last(&state), "begin transaction with id = 1");

        apply(&mut state, "set foo 1");
        apply(&mut state, "commit");
        assert_eq!(last(&state), "Try to commit last transaction.");
        assert_eq!(state.pending_command, Some(Command::Commit));
        assert_eq!(state.storage.depth(), 1);

        apply(&mut state, "y");
        assert_eq!(last(&state), "commit result: OK");
        assert_eq!(state.dialog, DialogState::Hidden);
        assert_eq!(state.storage.depth(), 0);
    }

    #[test]
    fn test_deny_keeps_transaction_open() {
        let mut state = SessionState::default();
        apply(&mut state, "begin");
        apply(&mut state, "rollback");
        apply(&mut state, "n");

        assert_eq!(last(&state), "Deny.");
        assert!(state.pending_command.is_none());
        assert_eq!(state.storage.depth(), 1);
    }

    #[test]
    fn test_confirm_without_pending() {
        let mut state = SessionState::default();
        apply(&mut state, "y");
        assert_eq!(last(&state), "Nothing to confirm.");
    }

    #[test]
    fn test_no_confirm_mode_reports_missing_transaction() {
        let mut state = SessionState::new(SessionConfig::new().confirm_transactions(false));
        apply(&mut state, "rollback");
        assert_eq!(last(&state), "rollback result: ActiveTransactionNotFound");
        assert_eq!(state.dialog, DialogState::Hidden);
    }

    #[test]
    fn test_errors_are_logged() {
        let mut state = SessionState::default();
        apply(&mut state, "frobnicate");
        assert_eq!(last(&state), "Error:Unknown command..");
        apply(&mut state, "set only_key");
        assert_eq!(last(&state), "Error:Wrong command format..");
    }

    #[test]
    fn test_exit_leaves_state_untouched() {
        let mut state = SessionState::default();
        apply(&mut state, "q");
        assert_eq!(state.state_version, 0);
        assert!(state.operations_log.is_empty());
    }

    #[test]
    fn test_log_is_bounded() {
        let mut state = SessionState::new(SessionConfig::new().log_capacity(3));
        for i in 0..10 {
            apply(&mut state, &format!("set k{} v", i));
        }
        apply(&mut state, "count v");

        assert_eq!(state.operations_log.len(), 3);
        assert_eq!(last(&state), "10");
    }
}

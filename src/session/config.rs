/// Session configuration
///
/// Builder style, like a connection config: start from `default()` and
/// override what you need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of lines kept in the operations log
    pub log_capacity: usize,

    /// Ask for `y`/`n` before running commit or rollback
    pub confirm_transactions: bool,

    /// Bound of the dispatch mailbox
    pub mailbox_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_capacity: 15,
            confirm_transactions: true,
            mailbox_capacity: 64,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operations log capacity (at least one line is kept)
    pub fn log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity.max(1);
        self
    }

    pub fn confirm_transactions(mut self, confirm: bool) -> Self {
        self.confirm_transactions = confirm;
        self
    }

    pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.log_capacity, 15);
        assert!(config.confirm_transactions);
        assert_eq!(config.mailbox_capacity, 64);
    }

    #[test]
    fn test_builder_clamps_zero() {
        let config = SessionConfig::new()
            .log_capacity(0)
            .mailbox_capacity(0)
            .confirm_transactions(false);
        assert_eq!(config.log_capacity, 1);
        assert_eq!(config.mailbox_capacity, 1);
        assert!(!config.confirm_transactions);
    }
}

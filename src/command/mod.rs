// ============================================================================
// Command Protocol
// ============================================================================
//
// One line of user input maps to one Command. Parsing never reaches the
// store: malformed input becomes Command::Error carrying the message that
// front ends show to the user.
//
// ============================================================================

pub mod parser;

/// A single user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Count { value: String },
    Begin,
    Commit,
    Rollback,
    /// `q`: end the session
    Exit,
    /// `y`: accept the pending commit/rollback
    Confirm,
    /// `n`: drop the pending commit/rollback
    Deny,
    Error(String),
}

impl Command {
    /// Tokens accepted as the first word of a command
    pub const KEYWORDS: [&'static str; 10] = [
        "set", "get", "delete", "count", "begin", "commit", "rollback", "q", "y", "n",
    ];

    /// Protocol token naming this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "set",
            Command::Get { .. } => "get",
            Command::Delete { .. } => "delete",
            Command::Count { .. } => "count",
            Command::Begin => "begin",
            Command::Commit => "commit",
            Command::Rollback => "rollback",
            Command::Exit => "q",
            Command::Confirm => "y",
            Command::Deny => "n",
            Command::Error(_) => "error",
        }
    }

    /// Parse a line, turning any parse failure into `Command::Error`
    pub fn from_input(input: &str) -> Self {
        input
            .parse()
            .unwrap_or_else(|err: crate::core::KvError| Command::Error(err.to_string()))
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Set { key, value } => write!(f, "set {} {}", key, value),
            Command::Get { key } | Command::Delete { key } => write!(f, "{} {}", self.name(), key),
            Command::Count { value } => write!(f, "count {}", value),
            Command::Error(message) => write!(f, "error: {}", message),
            other => f.write_str(other.name()),
        }
    }
}

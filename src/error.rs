use thiserror::Error;

/// Errors raised by the arcade runtime
///
/// None of these are process-fatal: each one is local to a single game or
/// request and is surfaced to the player as status text.
#[derive(Error, Debug)]
pub enum ArcadeError {
    #[error("Set your player name first.")]
    MissingPlayerName,
    #[error("Score ledger is not configured - play is disabled")]
    LedgerUnavailable,
    #[error("Unknown game: {0}")]
    UnknownGame(String),
    #[error("{0}")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by the score ledger collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Login required to submit coins.")]
    Unauthorized,
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_show_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store");
        assert_eq!(ArcadeError::from(io).to_string(), "read-only store");

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        let expected = json.to_string();
        assert_eq!(ArcadeError::from(json).to_string(), expected);
    }
}

use serde::Serialize;
use std::fmt;

/// Why a call attempt failed; the caller may retry after `reset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", content = "message", rename_all = "snake_case")]
pub enum FailureReason {
    /// The issuing service did not provide a credential
    Credential(String),
    /// The transport client rejected the join
    Transport(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Credential(message) => write!(f, "credential: {}", message),
            FailureReason::Transport(message) => write!(f, "transport: {}", message),
        }
    }
}

/// Lifecycle of one call attempt
///
/// Local device handles exist only in `AcquiringDevices`, `Joining`,
/// `Joined`, `Renewing` and `Leaving`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AcquiringDevices,
    Joining,
    Joined,
    Renewing,
    Leaving,
    Left,
    Failed(FailureReason),
}

impl SessionState {
    /// True while the transport connection is up from the caller's view
    pub fn is_joined(&self) -> bool {
        matches!(self, SessionState::Joined | SessionState::Renewing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Left | SessionState::Failed(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::AcquiringDevices => f.write_str("acquiring devices"),
            SessionState::Joining => f.write_str("joining"),
            SessionState::Joined => f.write_str("joined"),
            SessionState::Renewing => f.write_str("renewing"),
            SessionState::Leaving => f.write_str("leaving"),
            SessionState::Left => f.write_str("left"),
            SessionState::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&SessionState::AcquiringDevices).unwrap();
        assert_eq!(json, r#"{"state":"acquiring_devices"}"#);

        let failed = SessionState::Failed(FailureReason::Credential("denied".to_string()));
        let json = serde_json::to_string(&failed).unwrap();
        assert_eq!(
            json,
            r#"{"state":"failed","reason":{"cause":"credential","message":"denied"}}"#
        );
    }

    #[test]
    fn test_joined_covers_renewing() {
        assert!(SessionState::Joined.is_joined());
        assert!(SessionState::Renewing.is_joined());
        assert!(!SessionState::Joining.is_joined());
        assert!(SessionState::Left.is_terminal());
        assert!(!SessionState::Leaving.is_terminal());
    }
}

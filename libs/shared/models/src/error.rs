use thiserror::Error;

use crate::role::Role;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Please login as {0} to continue")]
    NotAuthenticated(Role),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Appointment is {from} and cannot be {action}")]
    InvalidTransition { from: String, action: String },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl PanelError {
    /// Errors that should send the user back to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, PanelError::Auth(_) | PanelError::NotAuthenticated(_))
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        PanelError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        PanelError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_only_for_auth_failures() {
        assert!(PanelError::Auth("expired".into()).requires_login());
        assert!(PanelError::NotAuthenticated(Role::Doctor).requires_login());
        assert!(!PanelError::Rejected("Doctor not found".into()).requires_login());
        assert!(!PanelError::Transport("connection refused".into()).requires_login());
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = PanelError::Validation("Image not selected".into());
        assert_eq!(err.to_string(), "Image not selected");
    }
}

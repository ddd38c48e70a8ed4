use std::fmt;

use serde::Serialize;

use shared_models::PanelError;

/// Email and password submitted to a role's login endpoint.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are required and the email needs something on each side of `@`.
    pub fn validate(&self) -> Result<(), PanelError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(PanelError::Validation("Email and password are required".to_string()));
        }
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(PanelError::Validation(format!("'{}' is not a valid email address", email))),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

use serde::Deserialize;

use crate::error::PanelError;

/// `{ success, message, ...payload }` wrapper used by the admin and doctor APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> ApiEnvelope<T> {
    /// Turn `success: false` into [`PanelError::Rejected`] carrying the backend's message.
    /// The auth middleware answers a bad token with HTTP 200 and "Not Authorized ...",
    /// which becomes [`PanelError::Auth`].
    pub fn into_result(self) -> Result<(Option<String>, T), PanelError> {
        if self.success {
            return Ok((self.message, self.payload));
        }

        let message = self
            .message
            .unwrap_or_else(|| "Request was not successful".to_string());
        if message.starts_with("Not Authorized") {
            Err(PanelError::Auth(message))
        } else {
            Err(PanelError::Rejected(message))
        }
    }
}

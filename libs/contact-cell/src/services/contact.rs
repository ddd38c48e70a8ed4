use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_api::{BackendAuth, BackendClient};
use shared_models::PanelError;

use crate::models::{ContactMessage, ContactStatus, Feedback};

/// The `/api/user-contact/*` endpoints. These answer with bare JSON rather
/// than the `{success, message}` envelope.
pub struct ContactService {
    backend: Arc<BackendClient>,
}

impl ContactService {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    pub async fn get_contacts(&self) -> Result<Vec<ContactMessage>, PanelError> {
        let body: Value = self
            .backend
            .request(Method::GET, "/api/user-contact/contactlist", BackendAuth::None, None)
            .await?;
        list_from(body, "contact list")
    }

    pub async fn update_status(&self, contact_id: &str, status: ContactStatus) -> Result<(), PanelError> {
        debug!("Setting contact {} to {}", contact_id, status);
        let path = format!(
            "/api/user-contact/contact/update-status/{}",
            urlencoding::encode(contact_id)
        );
        self.backend
            .send(Method::PATCH, &path, BackendAuth::None, Some(json!({ "status": status })))
            .await
    }

    pub async fn get_feedbacks(&self, token: &str) -> Result<Vec<Feedback>, PanelError> {
        let body: Value = self
            .backend
            .request(Method::GET, "/api/user-contact/feedbacks", BackendAuth::Bearer(token), None)
            .await?;

        let list = match body {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            other => other,
        };
        list_from(list, "feedback list")
    }
}

/// Decode a JSON array into records; anything that is not an array is an
/// empty list.
fn list_from<T>(body: Value, what: &str) -> Result<Vec<T>, PanelError>
where
    T: DeserializeOwned,
{
    if !body.is_array() {
        warn!("Backend returned a non-array {}, treating it as empty", what);
        return Ok(Vec::new());
    }
    serde_json::from_value(body).map_err(PanelError::from)
}

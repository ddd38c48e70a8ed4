use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use session_cell::SessionStore;
use shared_api::BackendClient;
use shared_models::{report_failure, Notice, Notifier, PanelError, Role};

use crate::models::{ContactMessage, ContactStatus, Feedback};
use crate::services::ContactService;

#[derive(Debug, Clone, Default)]
pub struct ContactCache {
    pub contacts: Option<Vec<ContactMessage>>,
    pub feedbacks: Option<Vec<Feedback>>,
}

/// Contact messages and patient feedback. Contacts need no token; feedback
/// is read with the doctor's token.
pub struct ContactContext {
    service: ContactService,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    cache: RwLock<ContactCache>,
}

impl ContactContext {
    pub fn new(backend: Arc<BackendClient>, session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service: ContactService::new(backend),
            session,
            notifier,
            cache: RwLock::new(ContactCache::default()),
        }
    }

    pub async fn contacts(&self) -> Vec<ContactMessage> {
        self.cache.read().await.contacts.clone().unwrap_or_default()
    }

    pub async fn feedbacks(&self) -> Vec<Feedback> {
        self.cache.read().await.feedbacks.clone().unwrap_or_default()
    }

    pub async fn fetch_contacts(&self) -> Result<Vec<ContactMessage>, PanelError> {
        match self.service.get_contacts().await {
            Ok(contacts) => {
                self.cache.write().await.contacts = Some(contacts.clone());
                Ok(contacts)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch contacts", err)),
        }
    }

    /// Flip a contact between pending and replied, then re-fetch the list.
    pub async fn toggle_contact_status(&self, contact_id: &str) -> Result<ContactStatus, PanelError> {
        let result = async {
            let current = self.known_status(contact_id).await?;
            let next = current.toggled();
            self.service.update_status(contact_id, next).await?;
            Ok::<_, PanelError>(next)
        }
        .await;

        let next = match result {
            Ok(next) => next,
            Err(err) => return Err(report_failure(self.notifier.as_ref(), "Update contact status", err)),
        };

        info!("Contact {} marked {}", contact_id, next);
        self.notifier
            .notify(Notice::success(format!("Status updated to {}", next)));
        match self.service.get_contacts().await {
            Ok(contacts) => self.cache.write().await.contacts = Some(contacts),
            Err(err) => warn!("Contact list not refreshed after status change: {}", err),
        }
        Ok(next)
    }

    /// Current status as the backend sees it, so the toggle never flips a stale value.
    async fn known_status(&self, contact_id: &str) -> Result<ContactStatus, PanelError> {
        let contacts = self.service.get_contacts().await?;
        let status = contacts.iter().find(|c| c.id == contact_id).map(|c| c.status);
        self.cache.write().await.contacts = Some(contacts);
        status.ok_or_else(|| PanelError::NotFound(format!("Contact {}", contact_id)))
    }

    pub async fn fetch_feedbacks(&self) -> Result<Vec<Feedback>, PanelError> {
        let result = async {
            let token = self.session.require(Role::Doctor)?;
            self.service.get_feedbacks(&token).await.map_err(|err| match err {
                PanelError::Auth(_) => PanelError::Auth("Please login to view feedbacks".to_string()),
                other => other,
            })
        }
        .await;

        match result {
            Ok(feedbacks) => {
                self.cache.write().await.feedbacks = Some(feedbacks.clone());
                Ok(feedbacks)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch feedbacks", err)),
        }
    }
}

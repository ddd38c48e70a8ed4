use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use appointment_cell::Appointment;
use doctor_cell::Doctor;
use session_cell::Credentials;
use shared_api::{BackendAuth, BackendClient};
use shared_models::{ApiEnvelope, PanelError, Role};

use crate::models::AdminDashboard;

#[derive(Debug, Deserialize)]
struct LoginPayload {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DashboardPayload {
    #[serde(default, rename = "dashData")]
    dash_data: Option<AdminDashboard>,
}

#[derive(Debug, Deserialize)]
struct DoctorsPayload {
    #[serde(default)]
    doctors: Option<Vec<Doctor>>,
}

#[derive(Debug, Deserialize)]
struct AppointmentsPayload {
    #[serde(default)]
    appointments: Option<Vec<Appointment>>,
}

#[derive(Debug, Deserialize)]
struct NoPayload {}

/// Stateless wrapper over the `/api/admin/*` endpoints.
pub struct AdminService {
    backend: Arc<BackendClient>,
}

impl AdminService {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<String, PanelError> {
        debug!("Admin login for {}", credentials.email);

        let body = serde_json::to_value(credentials)?;
        let (_, payload): (_, LoginPayload) = self
            .call(Method::POST, "/api/admin/login", None, Some(body))
            .await?;

        payload
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PanelError::Auth("Login response did not include a token".to_string()))
    }

    pub async fn get_dashboard(&self, token: &str) -> Result<AdminDashboard, PanelError> {
        let (_, payload): (_, DashboardPayload) = self
            .call(Method::GET, "/api/admin/dashboard", Some(token), None)
            .await?;
        Ok(payload.dash_data.unwrap_or_default())
    }

    pub async fn get_doctors(&self, token: &str) -> Result<Vec<Doctor>, PanelError> {
        let (_, payload): (_, DoctorsPayload) = self
            .call(Method::GET, "/api/admin/all-doctors", Some(token), None)
            .await?;
        Ok(payload.doctors.unwrap_or_default())
    }

    pub async fn add_doctor(&self, token: &str, form: Form) -> Result<Option<String>, PanelError> {
        debug!("Uploading new dentist");
        let (message, _) = self
            .backend
            .request_multipart::<ApiEnvelope<NoPayload>>("/api/admin/adddoctor", BackendAuth::Role(Role::Admin, token), form)
            .await?
            .into_result()?;
        Ok(message)
    }

    pub async fn change_availability(&self, token: &str, doctor_id: &str) -> Result<Option<String>, PanelError> {
        debug!("Toggling availability for doctor {}", doctor_id);
        self.call_for_message(
            Method::POST,
            "/api/admin/change-availability",
            token,
            Some(json!({ "docId": doctor_id })),
        )
        .await
    }

    pub async fn get_appointments(&self, token: &str) -> Result<Vec<Appointment>, PanelError> {
        let (_, payload): (_, AppointmentsPayload) = self
            .call(Method::GET, "/api/admin/appointments", Some(token), None)
            .await?;
        Ok(payload.appointments.unwrap_or_default())
    }

    pub async fn cancel_appointment(&self, token: &str, appointment_id: &str) -> Result<Option<String>, PanelError> {
        debug!("Cancelling appointment {} as admin", appointment_id);
        self.call_for_message(
            Method::POST,
            "/api/admin/cancel-appointment",
            token,
            Some(json!({ "appointmentId": appointment_id })),
        )
        .await
    }

    async fn call<T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(Option<String>, T), PanelError>
    where
        T: DeserializeOwned,
    {
        let auth = match token {
            Some(token) => BackendAuth::Role(Role::Admin, token),
            None => BackendAuth::None,
        };
        self.backend
            .request::<ApiEnvelope<T>>(method, path, auth, body)
            .await?
            .into_result()
    }

    async fn call_for_message(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<Value>,
    ) -> Result<Option<String>, PanelError> {
        let (message, _): (_, NoPayload) = self.call(method, path, Some(token), body).await?;
        Ok(message)
    }
}

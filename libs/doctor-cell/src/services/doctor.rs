use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use appointment_cell::Appointment;
use session_cell::Credentials;
use shared_api::{BackendAuth, BackendClient};
use shared_models::{ApiEnvelope, PanelError, Role};

use crate::models::{Doctor, DoctorDashboard, HistoryScope, ProfileUpdate};

#[derive(Debug, Deserialize)]
struct LoginPayload {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppointmentsPayload {
    #[serde(default)]
    appointments: Option<Vec<Appointment>>,
}

#[derive(Debug, Deserialize)]
struct DashboardPayload {
    #[serde(default, rename = "dashData")]
    dash_data: Option<DoctorDashboard>,
}

#[derive(Debug, Deserialize)]
struct ProfilePayload {
    #[serde(default)]
    doctor: Option<Doctor>,
}

#[derive(Debug, Deserialize)]
struct HistoryPayload {
    #[serde(default)]
    history: Option<Vec<Appointment>>,
}

#[derive(Debug, Deserialize)]
struct NoPayload {}

/// Stateless wrapper over the `/api/doctor/*` endpoints.
pub struct DoctorService {
    backend: Arc<BackendClient>,
}

impl DoctorService {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<String, PanelError> {
        debug!("Doctor login for {}", credentials.email);

        let body = serde_json::to_value(credentials)?;
        let (_, payload): (_, LoginPayload) = self
            .call(Method::POST, "/api/doctor/login", None, Some(body))
            .await?;

        payload
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PanelError::Auth("Login response did not include a token".to_string()))
    }

    pub async fn get_dashboard(&self, token: &str) -> Result<DoctorDashboard, PanelError> {
        let (_, payload): (_, DashboardPayload) = self
            .call(Method::GET, "/api/doctor/dashboard", Some(token), None)
            .await?;
        Ok(payload.dash_data.unwrap_or_default())
    }

    pub async fn get_profile(&self, token: &str) -> Result<Doctor, PanelError> {
        let (_, payload): (_, ProfilePayload) = self
            .call(Method::GET, "/api/doctor/profile", Some(token), None)
            .await?;
        payload
            .doctor
            .ok_or_else(|| PanelError::NotFound("Doctor profile".to_string()))
    }

    pub async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<Option<String>, PanelError> {
        debug!("Updating doctor profile");
        let body = serde_json::to_value(update)?;
        self.call_for_message(Method::POST, "/api/doctor/update-profile", token, Some(body))
            .await
    }

    pub async fn change_availability(&self, token: &str, doctor_id: &str) -> Result<Option<String>, PanelError> {
        debug!("Toggling availability for doctor {}", doctor_id);
        self.call_for_message(
            Method::POST,
            "/api/doctor/change-availability",
            token,
            Some(json!({ "docId": doctor_id })),
        )
        .await
    }

    pub async fn get_appointments(&self, token: &str) -> Result<Vec<Appointment>, PanelError> {
        let (_, payload): (_, AppointmentsPayload) = self
            .call(Method::GET, "/api/doctor/appointments", Some(token), None)
            .await?;
        Ok(payload.appointments.unwrap_or_default())
    }

    pub async fn get_appointments_by_date(&self, token: &str, date: NaiveDate) -> Result<Vec<Appointment>, PanelError> {
        let path = format!("/api/doctor/appointments-by-date?date={}", date.format("%Y-%m-%d"));
        let (_, payload): (_, AppointmentsPayload) = self.call(Method::GET, &path, Some(token), None).await?;
        Ok(payload.appointments.unwrap_or_default())
    }

    pub async fn cancel_appointment(&self, token: &str, appointment_id: &str) -> Result<Option<String>, PanelError> {
        debug!("Cancelling appointment {}", appointment_id);
        self.call_for_message(
            Method::POST,
            "/api/doctor/cancel-appointment",
            token,
            Some(json!({ "appointmentId": appointment_id })),
        )
        .await
    }

    pub async fn complete_appointment(&self, token: &str, appointment_id: &str) -> Result<Option<String>, PanelError> {
        debug!("Completing appointment {}", appointment_id);
        self.call_for_message(
            Method::POST,
            "/api/doctor/complete-appointment",
            token,
            Some(json!({ "appointmentId": appointment_id })),
        )
        .await
    }

    pub async fn get_patient_history(
        &self,
        token: &str,
        user_id: &str,
        scope: HistoryScope,
    ) -> Result<Vec<Appointment>, PanelError> {
        let path = format!(
            "/api/doctor/{}/{}",
            scope.path_segment(),
            urlencoding::encode(user_id)
        );
        let (_, payload): (_, HistoryPayload) = self.call(Method::GET, &path, Some(token), None).await?;
        Ok(payload.history.unwrap_or_default())
    }

    pub async fn add_prescription(
        &self,
        token: &str,
        appointment_id: &str,
        prescription: &str,
    ) -> Result<Option<String>, PanelError> {
        debug!("Adding prescription to appointment {}", appointment_id);
        self.call_for_message(
            Method::POST,
            "/api/doctor/add-prescription",
            token,
            Some(json!({ "appointmentId": appointment_id, "prescription": prescription })),
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
            Some(token) => BackendAuth::Role(Role::Doctor, token),
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

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{info, warn};

use appointment_cell::{find_appointment, Appointment, AppointmentAction, AppointmentLifecycleService};
use session_cell::{Credentials, SessionStore};
use shared_api::BackendClient;
use shared_models::{report_failure, Notice, Notifier, PanelError, Role};

use crate::models::{DaySchedule, Doctor, DoctorDashboard, HistoryScope, PatientHistory, ProfileEdits, ProfileUpdate};
use crate::services::DoctorService;

/// Last successfully fetched doctor-side collections. Each field is replaced
/// wholesale by its fetch and left alone when a fetch fails.
#[derive(Debug, Clone, Default)]
pub struct DoctorCache {
    pub appointments: Option<Vec<Appointment>>,
    pub dashboard: Option<DoctorDashboard>,
    pub profile: Option<Doctor>,
    pub day: Option<DaySchedule>,
    pub history: Option<PatientHistory>,
}

/// Session and data for the Doctor panel. Every write reads the backend's
/// current record before validating and re-fetches the collection it touched
/// afterwards. A failed re-fetch after a confirmed write only leaves the
/// cache stale.
pub struct DoctorContext {
    service: DoctorService,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    lifecycle: AppointmentLifecycleService,
    cache: RwLock<DoctorCache>,
}

impl DoctorContext {
    pub fn new(backend: Arc<BackendClient>, session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service: DoctorService::new(backend),
            session,
            notifier,
            lifecycle: AppointmentLifecycleService::new(),
            cache: RwLock::new(DoctorCache::default()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.has(Role::Doctor)
    }

    pub async fn snapshot(&self) -> DoctorCache {
        self.cache.read().await.clone()
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.cache.read().await.appointments.clone().unwrap_or_default()
    }

    pub async fn patient_history(&self) -> Option<PatientHistory> {
        self.cache.read().await.history.clone()
    }

    pub async fn day_schedule(&self) -> Option<DaySchedule> {
        self.cache.read().await.day.clone()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), PanelError> {
        let result = async {
            credentials.validate()?;
            let token = self.service.login(credentials).await?;
            self.session.set(Role::Doctor, &token)
        }
        .await;

        match result {
            Ok(()) => {
                *self.cache.write().await = DoctorCache::default();
                self.notifier.notify(Notice::success("Doctor Login successful!"));
                Ok(())
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Doctor login", err)),
        }
    }

    /// Drop the doctor token and cached data. Returns whether a session was held.
    pub async fn logout(&self) -> Result<bool, PanelError> {
        let held = self.session.clear(Role::Doctor)?;
        *self.cache.write().await = DoctorCache::default();
        Ok(held)
    }

    pub async fn fetch_appointments(&self) -> Result<Vec<Appointment>, PanelError> {
        let result = async {
            let token = self.session.require(Role::Doctor)?;
            self.service.get_appointments(&token).await
        }
        .await;

        match result {
            Ok(appointments) => {
                self.cache.write().await.appointments = Some(appointments.clone());
                Ok(appointments)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch doctor appointments", err)),
        }
    }

    pub async fn fetch_dashboard(&self) -> Result<DoctorDashboard, PanelError> {
        let result = async {
            let token = self.session.require(Role::Doctor)?;
            self.service.get_dashboard(&token).await
        }
        .await;

        match result {
            Ok(dashboard) => {
                self.cache.write().await.dashboard = Some(dashboard.clone());
                Ok(dashboard)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch doctor dashboard", err)),
        }
    }

    pub async fn fetch_profile(&self) -> Result<Doctor, PanelError> {
        let result = async {
            let token = self.session.require(Role::Doctor)?;
            self.service.get_profile(&token).await
        }
        .await;

        match result {
            Ok(profile) => {
                self.cache.write().await.profile = Some(profile.clone());
                Ok(profile)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch doctor profile", err)),
        }
    }

    pub async fn fetch_appointments_by_date(&self, date: NaiveDate) -> Result<DaySchedule, PanelError> {
        let result = async {
            let token = self.session.require(Role::Doctor)?;
            self.service.get_appointments_by_date(&token, date).await
        }
        .await;

        match result {
            Ok(appointments) => {
                let day = DaySchedule { date, appointments };
                self.cache.write().await.day = Some(day.clone());
                Ok(day)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch appointments by date", err)),
        }
    }

    pub async fn fetch_patient_history(&self, user_id: &str, scope: HistoryScope) -> Result<PatientHistory, PanelError> {
        let result = async {
            if user_id.trim().is_empty() {
                return Err(PanelError::Validation("Patient id is required".to_string()));
            }
            let token = self.session.require(Role::Doctor)?;
            self.service.get_patient_history(&token, user_id, scope).await
        }
        .await;

        match result {
            Ok(entries) => {
                let history = PatientHistory {
                    user_id: user_id.to_string(),
                    scope,
                    entries,
                };
                self.cache.write().await.history = Some(history.clone());
                Ok(history)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch patient history", err)),
        }
    }

    pub async fn cancel_appointment(&self, appointment_id: &str) -> Result<(), PanelError> {
        self.transition_appointment(appointment_id, AppointmentAction::Cancel).await
    }

    pub async fn complete_appointment(&self, appointment_id: &str) -> Result<(), PanelError> {
        self.transition_appointment(appointment_id, AppointmentAction::Complete).await
    }

    async fn transition_appointment(&self, appointment_id: &str, action: AppointmentAction) -> Result<(), PanelError> {
        let result = async {
            let token = self.session.require(Role::Doctor)?;
            let appointment = self.current_appointment(&token, appointment_id).await?;
            self.lifecycle.validate(&appointment, action)?;

            let message = match action {
                AppointmentAction::Cancel => self.service.cancel_appointment(&token, appointment_id).await?,
                _ => self.service.complete_appointment(&token, appointment_id).await?,
            };
            Ok::<_, PanelError>((token, message))
        }
        .await;

        let (token, message) = match result {
            Ok(done) => done,
            Err(err) => return Err(report_failure(self.notifier.as_ref(), "Update appointment", err)),
        };

        info!("Appointment {} {}", appointment_id, action);
        self.notifier
            .notify(Notice::success(message.unwrap_or_else(|| format!("Appointment {}", action))));

        match self.service.get_appointments(&token).await {
            Ok(appointments) => self.cache.write().await.appointments = Some(appointments),
            Err(err) => warn!("Appointments not refreshed after {}: {}", action, err),
        }
        let dashboard_cached = self.cache.read().await.dashboard.is_some();
        if dashboard_cached {
            match self.service.get_dashboard(&token).await {
                Ok(dashboard) => self.cache.write().await.dashboard = Some(dashboard),
                Err(err) => warn!("Dashboard not refreshed after {}: {}", action, err),
            }
        }
        Ok(())
    }

    /// The backend's current record for `appointment_id`. The fetched list
    /// replaces the cached one.
    async fn current_appointment(&self, token: &str, appointment_id: &str) -> Result<Appointment, PanelError> {
        let appointments = self.service.get_appointments(token).await?;
        let found = find_appointment(&appointments, appointment_id).cloned();
        self.cache.write().await.appointments = Some(appointments);

        found.ok_or_else(|| PanelError::NotFound(format!("Appointment {}", appointment_id)))
    }

    pub async fn toggle_availability(&self) -> Result<Doctor, PanelError> {
        let result = async {
            let token = self.session.require(Role::Doctor)?;
            let profile = self.current_profile(&token).await?;
            self.service.change_availability(&token, &profile.id).await?;
            Ok::<_, PanelError>((token, profile))
        }
        .await;

        let (token, before) = match result {
            Ok(done) => done,
            Err(err) => return Err(report_failure(self.notifier.as_ref(), "Toggle availability", err)),
        };

        let profile = match self.service.get_profile(&token).await {
            Ok(profile) => {
                self.cache.write().await.profile = Some(profile.clone());
                profile
            }
            Err(err) => {
                warn!("Profile not refreshed after availability change: {}", err);
                Doctor {
                    available: !before.available,
                    ..before
                }
            }
        };
        self.notifier.notify(Notice::success(format!(
            "You are now {}",
            if profile.available { "available" } else { "unavailable" }
        )));
        Ok(profile)
    }

    pub async fn update_profile(&self, edits: ProfileEdits) -> Result<Doctor, PanelError> {
        let result = async {
            if edits.is_empty() {
                return Err(PanelError::Validation("Nothing to update".to_string()));
            }
            let token = self.session.require(Role::Doctor)?;
            let profile = self.current_profile(&token).await?;
            let update = edits.apply(ProfileUpdate::from_profile(&profile));
            self.service.update_profile(&token, &update).await?;
            Ok::<_, PanelError>((token, update.applied_to(profile)))
        }
        .await;

        let (token, expected) = match result {
            Ok(done) => done,
            Err(err) => return Err(report_failure(self.notifier.as_ref(), "Update profile", err)),
        };

        self.notifier.notify(Notice::success("Profile updated!"));
        match self.service.get_profile(&token).await {
            Ok(profile) => {
                self.cache.write().await.profile = Some(profile.clone());
                Ok(profile)
            }
            Err(err) => {
                warn!("Profile not refreshed after update: {}", err);
                Ok(expected)
            }
        }
    }

    async fn current_profile(&self, token: &str) -> Result<Doctor, PanelError> {
        let profile = self.service.get_profile(token).await?;
        self.cache.write().await.profile = Some(profile.clone());
        Ok(profile)
    }

    /// Attach a prescription to one of `user_id`'s completed appointments,
    /// then re-fetch that history in the scope last viewed.
    pub async fn add_prescription(
        &self,
        user_id: &str,
        appointment_id: &str,
        prescription: &str,
    ) -> Result<PatientHistory, PanelError> {
        let result = async {
            if prescription.trim().is_empty() {
                return Err(PanelError::Validation("Prescription cannot be empty".to_string()));
            }
            let token = self.session.require(Role::Doctor)?;
            let history = self.current_history(&token, user_id).await?;
            let appointment = find_appointment(&history.entries, appointment_id)
                .ok_or_else(|| PanelError::NotFound(format!("Appointment {} for patient {}", appointment_id, user_id)))?;
            self.lifecycle.validate(appointment, AppointmentAction::AddPrescription)?;

            let message = self
                .service
                .add_prescription(&token, appointment_id, prescription.trim())
                .await?;
            Ok::<_, PanelError>((token, history, message))
        }
        .await;

        let (token, history, message) = match result {
            Ok(done) => done,
            Err(err) => return Err(report_failure(self.notifier.as_ref(), "Add prescription", err)),
        };

        self.notifier
            .notify(Notice::success(message.unwrap_or_else(|| "Prescription added".to_string())));

        match self.service.get_patient_history(&token, user_id, history.scope).await {
            Ok(entries) => {
                let refreshed = PatientHistory { entries, ..history };
                self.cache.write().await.history = Some(refreshed.clone());
                Ok(refreshed)
            }
            Err(err) => {
                warn!("History for {} not refreshed after prescription: {}", user_id, err);
                Ok(history)
            }
        }
    }

    /// `user_id`'s history as the backend has it now, in the scope last
    /// viewed for that patient (all doctors otherwise).
    async fn current_history(&self, token: &str, user_id: &str) -> Result<PatientHistory, PanelError> {
        let scope = match self.cache.read().await.history.as_ref() {
            Some(history) if history.user_id == user_id => history.scope,
            _ => HistoryScope::All,
        };

        let entries = self.service.get_patient_history(token, user_id, scope).await?;
        let history = PatientHistory {
            user_id: user_id.to_string(),
            scope,
            entries,
        };
        self.cache.write().await.history = Some(history.clone());
        Ok(history)
    }
}

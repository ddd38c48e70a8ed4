use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use appointment_cell::{find_appointment, Appointment, AppointmentAction, AppointmentLifecycleService};
use doctor_cell::Doctor;
use session_cell::{Credentials, SessionStore};
use shared_api::BackendClient;
use shared_models::{report_failure, Notice, Notifier, PanelError, Role};

use crate::models::{AdminDashboard, NewDentist};
use crate::services::AdminService;

#[derive(Debug, Clone, Default)]
pub struct AdminCache {
    pub doctors: Option<Vec<Doctor>>,
    pub appointments: Option<Vec<Appointment>>,
    pub dashboard: Option<AdminDashboard>,
}

/// Session and data for the Admin panel. Writes re-fetch what they touched;
/// when that re-fetch fails the write still stands and the cache stays stale.
pub struct AdminContext {
    service: AdminService,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    lifecycle: AppointmentLifecycleService,
    cache: RwLock<AdminCache>,
}

impl AdminContext {
    pub fn new(backend: Arc<BackendClient>, session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service: AdminService::new(backend),
            session,
            notifier,
            lifecycle: AppointmentLifecycleService::new(),
            cache: RwLock::new(AdminCache::default()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.has(Role::Admin)
    }

    pub async fn snapshot(&self) -> AdminCache {
        self.cache.read().await.clone()
    }

    pub async fn doctors(&self) -> Vec<Doctor> {
        self.cache.read().await.doctors.clone().unwrap_or_default()
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.cache.read().await.appointments.clone().unwrap_or_default()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), PanelError> {
        let result = async {
            credentials.validate()?;
            let token = self.service.login(credentials).await?;
            self.session.set(Role::Admin, &token)
        }
        .await;

        match result {
            Ok(()) => {
                *self.cache.write().await = AdminCache::default();
                self.notifier.notify(Notice::success("Login successful!"));
                Ok(())
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Admin login", err)),
        }
    }

    pub async fn logout(&self) -> Result<bool, PanelError> {
        let held = self.session.clear(Role::Admin)?;
        *self.cache.write().await = AdminCache::default();
        Ok(held)
    }

    pub async fn fetch_dashboard(&self) -> Result<AdminDashboard, PanelError> {
        let result = async {
            let token = self.session.require(Role::Admin)?;
            self.service.get_dashboard(&token).await
        }
        .await;

        match result {
            Ok(dashboard) => {
                self.cache.write().await.dashboard = Some(dashboard.clone());
                Ok(dashboard)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch admin dashboard", err)),
        }
    }

    pub async fn fetch_doctors(&self) -> Result<Vec<Doctor>, PanelError> {
        let result = async {
            let token = self.session.require(Role::Admin)?;
            self.service.get_doctors(&token).await
        }
        .await;

        match result {
            Ok(doctors) => {
                self.cache.write().await.doctors = Some(doctors.clone());
                Ok(doctors)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch doctors", err)),
        }
    }

    pub async fn fetch_appointments(&self) -> Result<Vec<Appointment>, PanelError> {
        let result = async {
            let token = self.session.require(Role::Admin)?;
            self.service.get_appointments(&token).await
        }
        .await;

        match result {
            Ok(appointments) => {
                self.cache.write().await.appointments = Some(appointments.clone());
                Ok(appointments)
            }
            Err(err) => Err(report_failure(self.notifier.as_ref(), "Fetch all appointments", err)),
        }
    }

    /// Upload a new dentist. The form is checked before the session so a
    /// missing image never reaches the network.
    pub async fn add_doctor(&self, form: &NewDentist) -> Result<Vec<Doctor>, PanelError> {
        let result = async {
            let multipart = form.to_form()?;
            let token = self.session.require(Role::Admin)?;
            let message = self.service.add_doctor(&token, multipart).await?;
            Ok::<_, PanelError>((token, message))
        }
        .await;

        let (token, message) = match result {
            Ok(done) => done,
            Err(err) => return Err(report_failure(self.notifier.as_ref(), "Add dentist", err)),
        };

        info!("Added dentist {}", form.email);
        self.notifier
            .notify(Notice::success(message.unwrap_or_else(|| "Doctor added".to_string())));
        Ok(self.refresh_doctors(&token).await)
    }

    pub async fn toggle_availability(&self, doctor_id: &str) -> Result<Vec<Doctor>, PanelError> {
        let result = async {
            if doctor_id.trim().is_empty() {
                return Err(PanelError::Validation("Doctor id is required".to_string()));
            }
            let token = self.session.require(Role::Admin)?;
            let message = self.service.change_availability(&token, doctor_id).await?;
            Ok::<_, PanelError>((token, message))
        }
        .await;

        let (token, message) = match result {
            Ok(done) => done,
            Err(err) => return Err(report_failure(self.notifier.as_ref(), "Change availability", err)),
        };

        self.notifier
            .notify(Notice::success(message.unwrap_or_else(|| "Availability changed".to_string())));
        Ok(self.refresh_doctors(&token).await)
    }

    async fn refresh_doctors(&self, token: &str) -> Vec<Doctor> {
        match self.service.get_doctors(token).await {
            Ok(doctors) => {
                self.cache.write().await.doctors = Some(doctors.clone());
                doctors
            }
            Err(err) => {
                warn!("Doctor list not refreshed after write: {}", err);
                self.doctors().await
            }
        }
    }

    pub async fn cancel_appointment(&self, appointment_id: &str) -> Result<(), PanelError> {
        let result = async {
            let token = self.session.require(Role::Admin)?;
            let appointment = self.current_appointment(&token, appointment_id).await?;
            self.lifecycle.validate(&appointment, AppointmentAction::Cancel)?;
            let message = self.service.cancel_appointment(&token, appointment_id).await?;
            Ok::<_, PanelError>((token, message))
        }
        .await;

        let (token, message) = match result {
            Ok(done) => done,
            Err(err) => return Err(report_failure(self.notifier.as_ref(), "Cancel appointment", err)),
        };

        info!("Appointment {} cancelled by admin", appointment_id);
        self.notifier
            .notify(Notice::success(message.unwrap_or_else(|| "Appointment cancelled".to_string())));

        match self.service.get_appointments(&token).await {
            Ok(appointments) => self.cache.write().await.appointments = Some(appointments),
            Err(err) => warn!("Appointments not refreshed after cancel: {}", err),
        }
        let dashboard_cached = self.cache.read().await.dashboard.is_some();
        if dashboard_cached {
            match self.service.get_dashboard(&token).await {
                Ok(dashboard) => self.cache.write().await.dashboard = Some(dashboard),
                Err(err) => warn!("Dashboard not refreshed after cancel: {}", err),
            }
        }
        Ok(())
    }

    async fn current_appointment(&self, token: &str, appointment_id: &str) -> Result<Appointment, PanelError> {
        let appointments = self.service.get_appointments(token).await?;
        let found = find_appointment(&appointments, appointment_id).cloned();
        self.cache.write().await.appointments = Some(appointments);

        found.ok_or_else(|| PanelError::NotFound(format!("Appointment {}", appointment_id)))
    }
}

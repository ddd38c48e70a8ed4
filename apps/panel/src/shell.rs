use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use admin_cell::{AdminContext, DentistImage, NewDentist, EXPERIENCE_CHOICES, SPECIALITIES};
use contact_cell::ContactContext;
use doctor_cell::{DoctorContext, HistoryScope, ProfileEdits};
use session_cell::{Credentials, Session, SessionStore};
use shared_api::BackendClient;
use shared_config::PanelConfig;
use shared_models::{report_failure, Notice, Notifier, PanelError, Role};

use crate::cli::Command;
use crate::routes::{Access, Route};

/// Owns the three contexts and routes commands to them according to who is
/// logged in. Every error is reported through the notifier once.
pub struct Shell {
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    admin: AdminContext,
    doctor: DoctorContext,
    contacts: ContactContext,
}

impl Shell {
    pub fn new(config: &PanelConfig, notifier: Arc<dyn Notifier>) -> Result<Self, PanelError> {
        let session = Arc::new(SessionStore::open(&config.session_path)?);
        let backend = Arc::new(BackendClient::new(config)?);
        debug!("Panel talking to {}", backend.base_url());

        Ok(Self {
            admin: AdminContext::new(backend.clone(), session.clone(), notifier.clone()),
            doctor: DoctorContext::new(backend.clone(), session.clone(), notifier.clone()),
            contacts: ContactContext::new(backend, session.clone(), notifier.clone()),
            session,
            notifier,
        })
    }

    pub fn session(&self) -> Session {
        self.session.session()
    }

    /// Run one command and return the screen to print.
    pub async fn run(&self, command: Command) -> Result<String, PanelError> {
        match self.session.session() {
            Session::Anonymous => match command {
                Command::Login { role, email, password } => self.login(role, &email, &password).await,
                Command::Logout { role } => self.logout(role).await,
                Command::Whoami => Ok(self.whoami()),
                _ => Err(self.fail("Shell", PanelError::Auth("Please login to continue".to_string()))),
            },
            Session::Admin(_) => self.dispatch_or_hint(Role::Admin, command).await,
            Session::Doctor(_) => self.dispatch_or_hint(Role::Doctor, command).await,
        }
    }

    /// A rejected or missing token points the user back at `login`.
    async fn dispatch_or_hint(&self, active: Role, command: Command) -> Result<String, PanelError> {
        let result = self.dispatch(active, command).await;
        if let Err(err) = &result {
            if err.requires_login() {
                self.notifier.notify(Notice::info(
                    "Log in with: dental-panel login --role <admin|doctor> --email <email> --password <password>",
                ));
            }
        }
        result
    }

    async fn dispatch(&self, active: Role, command: Command) -> Result<String, PanelError> {
        match command {
            Command::Login { role, email, password } => self.login(role, &email, &password).await,
            Command::Logout { role } => self.logout(role).await,
            Command::Whoami => Ok(self.whoami()),
            Command::Open { path } => {
                let route = match path {
                    Some(path) => path.parse::<Route>().map_err(|e| self.fail("Open screen", e))?,
                    None => Route::home(active),
                };
                self.open(route).await
            }
            Command::AddDentist {
                image,
                name,
                email,
                password,
                experience,
                about,
                speciality,
                address,
                phone,
            } => {
                self.require(Role::Admin)?;
                let image = match image {
                    Some(path) => Some(self.load_image(&path).await?),
                    None => None,
                };
                let form = NewDentist {
                    image,
                    name,
                    email,
                    password,
                    experience,
                    about,
                    speciality,
                    address,
                    phone_no: phone,
                };
                let doctors = self.admin.add_doctor(&form).await?;
                Ok(admin_cell::views::render_doctor_list(&doctors))
            }
            Command::ToggleAvailability { doctor_id } => match active {
                Role::Admin => {
                    let doctors = self
                        .admin
                        .toggle_availability(doctor_id.as_deref().unwrap_or_default())
                        .await?;
                    Ok(admin_cell::views::render_doctor_list(&doctors))
                }
                Role::Doctor => {
                    if doctor_id.is_some() {
                        debug!("Ignoring doctor id, doctors toggle their own availability");
                    }
                    let profile = self.doctor.toggle_availability().await?;
                    Ok(doctor_cell::views::render_profile(&profile))
                }
            },
            Command::Cancel { appointment_id } => match active {
                Role::Admin => {
                    self.admin.cancel_appointment(&appointment_id).await?;
                    Ok(admin_cell::views::render_all_appointments(&self.admin.appointments().await))
                }
                Role::Doctor => {
                    self.doctor.cancel_appointment(&appointment_id).await?;
                    Ok(doctor_cell::views::render_appointments(&self.doctor.appointments().await))
                }
            },
            Command::Complete { appointment_id } => {
                self.doctor.complete_appointment(&appointment_id).await?;
                Ok(doctor_cell::views::render_appointments(&self.doctor.appointments().await))
            }
            Command::UpdateProfile {
                address,
                phone,
                about,
                fees,
                experience,
            } => {
                let edits = ProfileEdits {
                    address,
                    phone_no: phone,
                    about,
                    fees,
                    experience,
                };
                let profile = self.doctor.update_profile(edits).await?;
                Ok(doctor_cell::views::render_profile(&profile))
            }
            Command::Prescribe {
                user_id,
                appointment_id,
                text,
            } => {
                let history = self.doctor.add_prescription(&user_id, &appointment_id, &text).await?;
                Ok(doctor_cell::views::render_patient_history(&history))
            }
            Command::ContactStatus { contact_id } => {
                self.contacts.toggle_contact_status(&contact_id).await?;
                Ok(contact_cell::views::render_contacts(&self.contacts.contacts().await))
            }
            Command::Calendar { date } => self.calendar(date.unwrap_or_else(|| Local::now().date_naive())).await,
            Command::History { user_id, mine } => {
                let scope = if mine { HistoryScope::Mine } else { HistoryScope::All };
                let history = self.doctor.fetch_patient_history(&user_id, scope).await?;
                Ok(doctor_cell::views::render_patient_history(&history))
            }
        }
    }

    /// Render `route` after checking the session may see it.
    pub async fn open(&self, route: Route) -> Result<String, PanelError> {
        if let Access::Token(role) = route.access() {
            self.require(role)?;
        }
        info!("Opening {}", route);

        match route {
            Route::AdminDashboard => {
                let dashboard = self.admin.fetch_dashboard().await?;
                Ok(admin_cell::views::render_dashboard(&dashboard))
            }
            Route::AllAppointments => {
                let appointments = self.admin.fetch_appointments().await?;
                Ok(admin_cell::views::render_all_appointments(&appointments))
            }
            Route::AddDentist => Ok(add_dentist_help()),
            Route::DentistList => {
                let doctors = self.admin.fetch_doctors().await?;
                Ok(admin_cell::views::render_doctor_list(&doctors))
            }
            Route::DoctorDashboard => {
                let dashboard = self.doctor.fetch_dashboard().await?;
                Ok(doctor_cell::views::render_dashboard(&dashboard))
            }
            Route::DoctorAppointments => {
                let appointments = self.doctor.fetch_appointments().await?;
                Ok(doctor_cell::views::render_appointments(&appointments))
            }
            Route::DoctorProfile => {
                let profile = self.doctor.fetch_profile().await?;
                Ok(doctor_cell::views::render_profile(&profile))
            }
            Route::ContactList => {
                let contacts = self.contacts.fetch_contacts().await?;
                Ok(contact_cell::views::render_contacts(&contacts))
            }
            Route::FeedbackList => {
                let feedbacks = self.contacts.fetch_feedbacks().await?;
                Ok(contact_cell::views::render_feedbacks(&feedbacks))
            }
            Route::PatientHistory { user_id } => {
                let history = self.doctor.fetch_patient_history(&user_id, HistoryScope::All).await?;
                Ok(doctor_cell::views::render_patient_history(&history))
            }
            Route::AppointmentsByDate => self.calendar(Local::now().date_naive()).await,
        }
    }

    async fn calendar(&self, date: NaiveDate) -> Result<String, PanelError> {
        let day = self.doctor.fetch_appointments_by_date(date).await?;
        Ok(doctor_cell::views::render_calendar(&day))
    }

    async fn login(&self, role: Role, email: &str, password: &str) -> Result<String, PanelError> {
        let credentials = Credentials::new(email, password);
        match role {
            Role::Admin => self.admin.login(&credentials).await?,
            Role::Doctor => self.doctor.login(&credentials).await?,
        }
        Ok(format!("{} Panel\nNext: open {}", role, Route::home(role)))
    }

    async fn logout(&self, role: Option<Role>) -> Result<String, PanelError> {
        let roles = match role {
            Some(role) => vec![role],
            None => Role::ALL.to_vec(),
        };

        let mut cleared = Vec::new();
        for role in roles {
            let held = match role {
                Role::Admin => self.admin.logout().await,
                Role::Doctor => self.doctor.logout().await,
            }
            .map_err(|e| self.fail("Logout", e))?;
            if held {
                cleared.push(role.to_string());
            }
        }

        if cleared.is_empty() {
            return Ok("No session to log out of".to_string());
        }
        self.notifier
            .notify(Notice::info(format!("Logged out ({})", cleared.join(", "))));
        Ok(self.whoami())
    }

    fn whoami(&self) -> String {
        let session = self.session.session();
        let mut out = session.panel_label();
        for role in Role::ALL {
            let state = if self.session.has(role) { "logged in" } else { "-" };
            out.push_str(&format!("\n  {:<7} {}", role.to_string(), state));
        }

        if let Some(role) = session.role() {
            out.push_str("\n\nScreens:");
            for route in Route::sidebar(role) {
                out.push_str(&format!("\n  {}", route));
            }
        }
        out
    }

    fn require(&self, role: Role) -> Result<(), PanelError> {
        self.session
            .require(role)
            .map(|_| ())
            .map_err(|e| self.fail("Check access", e))
    }

    async fn load_image(&self, path: &Path) -> Result<DentistImage, PanelError> {
        DentistImage::from_path(path)
            .await
            .map_err(|e| self.fail("Add dentist", e))
    }

    fn fail(&self, operation: &str, err: PanelError) -> PanelError {
        report_failure(self.notifier.as_ref(), operation, err)
    }
}

fn add_dentist_help() -> String {
    format!(
        "Add Dentist\n\n\
         dental-panel add-dentist --image <file> --name <name> --email <email> --password <password>\n\
         \x20   [--experience <experience>] [--speciality <speciality>] [--about <text>]\n\
         \x20   [--address <address>] [--phone <phone>]\n\n\
         Experience:  {} (default: 1 Year)\n\
         Speciality:  {} (default: General)",
        EXPERIENCE_CHOICES.join(", "),
        SPECIALITIES.join(", "),
    )
}

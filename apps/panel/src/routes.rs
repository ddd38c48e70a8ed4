use std::fmt;
use std::str::FromStr;

use shared_models::{PanelError, Role};

/// Screens reachable from the sidebar, addressed by their URL paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    AdminDashboard,
    AllAppointments,
    AddDentist,
    DentistList,
    DoctorDashboard,
    DoctorAppointments,
    DoctorProfile,
    ContactList,
    FeedbackList,
    PatientHistory { user_id: String },
    AppointmentsByDate,
}

/// What a route needs before it can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    AnySession,
    Token(Role),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::AdminDashboard => "/admin-dashboard".to_string(),
            Route::AllAppointments => "/all-appointments".to_string(),
            Route::AddDentist => "/add-dentist".to_string(),
            Route::DentistList => "/dentist-list".to_string(),
            Route::DoctorDashboard => "/doctor-dashboard".to_string(),
            Route::DoctorAppointments => "/doctor-appointments".to_string(),
            Route::DoctorProfile => "/doctor-profile".to_string(),
            Route::ContactList => "/contact-list".to_string(),
            Route::FeedbackList => "/feedback-list".to_string(),
            Route::PatientHistory { user_id } => format!("/doctor/patient/{}", user_id),
            Route::AppointmentsByDate => "/appointments-by-date".to_string(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::AdminDashboard | Route::AllAppointments | Route::AddDentist | Route::DentistList => {
                Access::Token(Role::Admin)
            }
            Route::DoctorDashboard
            | Route::DoctorAppointments
            | Route::DoctorProfile
            | Route::FeedbackList
            | Route::PatientHistory { .. }
            | Route::AppointmentsByDate => Access::Token(Role::Doctor),
            Route::ContactList => Access::AnySession,
        }
    }

    /// Landing screen after login.
    pub fn home(role: Role) -> Self {
        match role {
            Role::Admin => Route::AdminDashboard,
            Role::Doctor => Route::DoctorDashboard,
        }
    }

    /// Sidebar entries for a role, in display order.
    pub fn sidebar(role: Role) -> Vec<Route> {
        match role {
            Role::Admin => vec![
                Route::AdminDashboard,
                Route::AllAppointments,
                Route::AddDentist,
                Route::DentistList,
                Route::ContactList,
            ],
            Role::Doctor => vec![
                Route::DoctorDashboard,
                Route::DoctorAppointments,
                Route::AppointmentsByDate,
                Route::DoctorProfile,
                Route::ContactList,
                Route::FeedbackList,
            ],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = PanelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let path = raw.trim().trim_end_matches('/');
        let route = match path {
            "/admin-dashboard" => Route::AdminDashboard,
            "/all-appointments" => Route::AllAppointments,
            "/add-dentist" => Route::AddDentist,
            "/dentist-list" => Route::DentistList,
            "/doctor-dashboard" => Route::DoctorDashboard,
            "/doctor-appointments" => Route::DoctorAppointments,
            "/doctor-profile" => Route::DoctorProfile,
            "/contact-list" => Route::ContactList,
            "/feedback-list" => Route::FeedbackList,
            "/appointments-by-date" => Route::AppointmentsByDate,
            other => match other.strip_prefix("/doctor/patient/") {
                Some(user_id) if !user_id.is_empty() && !user_id.contains('/') => Route::PatientHistory {
                    user_id: user_id.to_string(),
                },
                _ => return Err(PanelError::NotFound(format!("No screen at '{}'", raw.trim()))),
            },
        };
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for role in Role::ALL {
            for route in Route::sidebar(role) {
                assert_eq!(route.path().parse::<Route>().unwrap(), route);
            }
        }
        let history: Route = "/doctor/patient/u-42".parse().unwrap();
        assert_eq!(history, Route::PatientHistory { user_id: "u-42".into() });
        assert_eq!(history.to_string(), "/doctor/patient/u-42");
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!("/dentist-list/".parse::<Route>().unwrap(), Route::DentistList);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert!(matches!("/settings".parse::<Route>(), Err(PanelError::NotFound(_))));
        assert!(matches!("/doctor/patient/".parse::<Route>(), Err(PanelError::NotFound(_))));
        assert!(matches!("/doctor/patient/a/b".parse::<Route>(), Err(PanelError::NotFound(_))));
    }

    #[test]
    fn access_follows_role() {
        assert_eq!(Route::AddDentist.access(), Access::Token(Role::Admin));
        assert_eq!(Route::FeedbackList.access(), Access::Token(Role::Doctor));
        assert_eq!(Route::ContactList.access(), Access::AnySession);
        assert_eq!(Route::home(Role::Doctor), Route::DoctorDashboard);
    }
}

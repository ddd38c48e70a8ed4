use tracing::{debug, warn};

use shared_models::PanelError;

use crate::models::{Appointment, AppointmentAction, AppointmentStatus};

/// Client-side appointment state machine. Cancel and complete are only
/// accepted from pending; a prescription only once, after completion.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Status an appointment moves to once `action` is applied, or an error
    /// if `action` is not allowed from `current`.
    pub fn validate_transition(
        &self,
        current: AppointmentStatus,
        action: AppointmentAction,
    ) -> Result<AppointmentStatus, PanelError> {
        debug!("Validating {:?} on a {} appointment", action, current);

        let next = match (current, action) {
            (AppointmentStatus::Pending, AppointmentAction::Cancel) => Some(AppointmentStatus::Cancelled),
            (AppointmentStatus::Pending, AppointmentAction::Complete) => Some(AppointmentStatus::Completed),
            (AppointmentStatus::Completed, AppointmentAction::AddPrescription) => Some(AppointmentStatus::Completed),
            _ => None,
        };

        next.ok_or_else(|| {
            warn!("Rejected {:?} on a {} appointment", action, current);
            PanelError::InvalidTransition {
                from: current.to_string(),
                action: action.to_string(),
            }
        })
    }

    pub fn valid_actions(&self, current: AppointmentStatus) -> Vec<AppointmentAction> {
        match current {
            AppointmentStatus::Pending => vec![AppointmentAction::Complete, AppointmentAction::Cancel],
            AppointmentStatus::Completed => vec![AppointmentAction::AddPrescription],
            AppointmentStatus::Cancelled => vec![],
        }
    }

    /// Check a concrete record, including the one-prescription rule.
    pub fn validate(&self, appointment: &Appointment, action: AppointmentAction) -> Result<AppointmentStatus, PanelError> {
        if action == AppointmentAction::AddPrescription && appointment.has_prescription() {
            warn!("Appointment {} already has a prescription", appointment.id);
            return Err(PanelError::InvalidTransition {
                from: "already prescribed".to_string(),
                action: action.to_string(),
            });
        }
        self.validate_transition(appointment.status(), action)
    }

    /// Whether the history view should offer "add prescription". Same rule
    /// as [`validate`](Self::validate) without logging a rejection.
    pub fn can_add_prescription(&self, appointment: &Appointment) -> bool {
        appointment.status() == AppointmentStatus::Completed && !appointment.has_prescription()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_models::null_as_default;
use shared_utils::NOT_AVAILABLE;

/// Patient snapshot the backend embeds in each appointment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientSummary {
    pub name: Option<String>,
    pub email: Option<String>,
    pub note: Option<String>,
    pub phone: Option<String>,
}

/// Doctor snapshot the backend embeds in each appointment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorSummary {
    pub name: Option<String>,
    pub image: Option<String>,
    pub speciality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub slot_date: Option<String>,
    #[serde(default)]
    pub slot_time: Option<String>,
    #[serde(default)]
    pub user_data: Option<PatientSummary>,
    #[serde(default)]
    pub doc_data: Option<DoctorSummary>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cancelled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_completed: bool,
    #[serde(default)]
    pub prescription: Option<Value>,
}

impl Appointment {
    /// Collapse the two backend flags into one status. A record flagged both
    /// cancelled and completed reads as cancelled.
    pub fn status(&self) -> AppointmentStatus {
        if self.cancelled {
            AppointmentStatus::Cancelled
        } else if self.is_completed {
            AppointmentStatus::Completed
        } else {
            AppointmentStatus::Pending
        }
    }

    pub fn patient_name(&self) -> Option<&str> {
        self.user_data.as_ref().and_then(|u| u.name.as_deref())
    }

    pub fn doctor_name(&self) -> Option<&str> {
        self.doc_data.as_ref().and_then(|d| d.name.as_deref())
    }

    /// The appointment's own note, else the one the patient left when booking.
    pub fn note_text(&self) -> Option<&str> {
        self.note
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.user_data.as_ref().and_then(|u| u.note.as_deref()))
            .filter(|n| !n.trim().is_empty())
    }

    pub fn has_prescription(&self) -> bool {
        match &self.prescription {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Prescription rendered as text: strings verbatim, anything else as JSON.
    pub fn prescription_text(&self) -> String {
        match &self.prescription {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(value) if self.has_prescription() => value.to_string(),
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Label used on the calendar, where pending reads as upcoming.
    pub fn calendar_label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Upcoming",
            other => other.label(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentAction {
    Cancel,
    Complete,
    AddPrescription,
}

impl AppointmentAction {
    /// Shell command that performs the action.
    pub fn command(&self) -> &'static str {
        match self {
            AppointmentAction::Cancel => "cancel",
            AppointmentAction::Complete => "complete",
            AppointmentAction::AddPrescription => "prescribe",
        }
    }
}

impl fmt::Display for AppointmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentAction::Cancel => write!(f, "cancelled"),
            AppointmentAction::Complete => write!(f, "completed"),
            AppointmentAction::AddPrescription => write!(f, "given a prescription"),
        }
    }
}

pub fn find_appointment<'a>(appointments: &'a [Appointment], id: &str) -> Option<&'a Appointment> {
    appointments.iter().find(|a| a.id == id)
}

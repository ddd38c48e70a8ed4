use std::fmt;

use serde::{Deserialize, Serialize};

use appointment_cell::Appointment;
use shared_models::{null_as_default, LooseValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub speciality: Option<String>,
    #[serde(default)]
    pub experience: Option<LooseValue>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub fees: Option<LooseValue>,
    #[serde(default)]
    pub address: Option<LooseValue>,
    #[serde(default)]
    pub phone_no: Option<LooseValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available: bool,
}

impl Doctor {
    pub fn field_text(value: &Option<LooseValue>) -> Option<String> {
        value.as_ref().filter(|v| !v.is_blank()).map(|v| v.to_string())
    }

    pub fn availability_label(&self) -> &'static str {
        if self.available {
            "Available"
        } else {
            "Not Available"
        }
    }
}

/// Counters and recent bookings shown on the doctor's landing screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub appointments: u64,
    pub patients: u64,
    pub completed_appointments: u64,
    pub latest_appointments: Vec<Appointment>,
}

/// Editable subset of the profile. Start from [`ProfileUpdate::from_profile`]
/// so untouched fields are sent back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub address: String,
    pub phone_no: String,
    pub about: String,
    pub fees: String,
    pub experience: String,
    pub available: bool,
}

impl ProfileUpdate {
    pub fn from_profile(profile: &Doctor) -> Self {
        Self {
            address: Doctor::field_text(&profile.address).unwrap_or_default(),
            phone_no: Doctor::field_text(&profile.phone_no).unwrap_or_default(),
            about: profile.about.clone().unwrap_or_default(),
            fees: Doctor::field_text(&profile.fees).unwrap_or_default(),
            experience: Doctor::field_text(&profile.experience).unwrap_or_default(),
            available: profile.available,
        }
    }

    /// `profile` as it reads once this update has been saved.
    pub fn applied_to(&self, profile: Doctor) -> Doctor {
        Doctor {
            address: Some(LooseValue::Text(self.address.clone())),
            phone_no: Some(LooseValue::Text(self.phone_no.clone())),
            about: Some(self.about.clone()),
            fees: Some(LooseValue::Text(self.fees.clone())),
            experience: Some(LooseValue::Text(self.experience.clone())),
            available: self.available,
            ..profile
        }
    }
}

/// Edits requested by the user; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEdits {
    pub address: Option<String>,
    pub phone_no: Option<String>,
    pub about: Option<String>,
    pub fees: Option<String>,
    pub experience: Option<String>,
}

impl ProfileEdits {
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.phone_no.is_none()
            && self.about.is_none()
            && self.fees.is_none()
            && self.experience.is_none()
    }

    pub fn apply(self, mut update: ProfileUpdate) -> ProfileUpdate {
        if let Some(address) = self.address {
            update.address = address;
        }
        if let Some(phone_no) = self.phone_no {
            update.phone_no = phone_no;
        }
        if let Some(about) = self.about {
            update.about = about;
        }
        if let Some(fees) = self.fees {
            update.fees = fees;
        }
        if let Some(experience) = self.experience {
            update.experience = experience;
        }
        update
    }
}

/// Which records a patient history covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryScope {
    /// Only appointments with the signed-in doctor.
    Mine,
    /// Appointments with every doctor.
    #[default]
    All,
}

impl HistoryScope {
    pub fn path_segment(&self) -> &'static str {
        match self {
            HistoryScope::Mine => "patient-history",
            HistoryScope::All => "patient-full-history",
        }
    }
}

impl fmt::Display for HistoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryScope::Mine => write!(f, "my records"),
            HistoryScope::All => write!(f, "all doctors"),
        }
    }
}

/// A patient's history as last fetched, tagged with what was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientHistory {
    pub user_id: String,
    pub scope: HistoryScope,
    pub entries: Vec<Appointment>,
}

/// Appointments on one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    pub date: chrono::NaiveDate,
    pub appointments: Vec<Appointment>,
}

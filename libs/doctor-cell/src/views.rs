//! Text renderings of the doctor screens. Each function is a pure view of
//! cached data.

use appointment_cell::{Appointment, AppointmentLifecycleService, AppointmentStatus};
use shared_utils::{
    format_time_12h, format_weekday_heading, or_placeholder, slot_date_short, truncate, TextTable, DASH,
    NOT_AVAILABLE,
};

use crate::models::{DaySchedule, Doctor, DoctorDashboard, PatientHistory};

const NOTE_WIDTH: usize = 40;

pub fn render_dashboard(dash: &DoctorDashboard) -> String {
    let mut out = String::new();
    out.push_str(&format!("Appointments: {}\n", dash.appointments));
    out.push_str(&format!("Patients:     {}\n", dash.patients));
    out.push_str(&format!("Completed:    {}\n", dash.completed_appointments));
    out.push_str("\nLatest Appointments\n");

    if dash.latest_appointments.is_empty() {
        out.push_str("No appointments found");
        return out;
    }

    for item in &dash.latest_appointments {
        out.push_str(&format!(
            "\n- {} | {} at {} | {} | {}",
            or_placeholder(item.patient_name(), NOT_AVAILABLE),
            slot_date_short(item.slot_date.as_deref()),
            or_placeholder(item.slot_time.as_deref(), NOT_AVAILABLE),
            truncate(item.note_text().unwrap_or("No notes provided"), NOTE_WIDTH),
            action_hint(item),
        ));
    }
    out
}

pub fn render_appointments(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "No appointments found".to_string();
    }

    let mut table = TextTable::new(["#", "Id", "Patient", "Note", "Date", "Time", "Status / Action", "Patient Id"]);
    for (index, item) in appointments.iter().enumerate() {
        table.push_row([
            (index + 1).to_string(),
            item.id.clone(),
            truncate(&or_placeholder(item.patient_name(), NOT_AVAILABLE), 24),
            truncate(item.note_text().unwrap_or(NOT_AVAILABLE), NOTE_WIDTH),
            slot_date_short(item.slot_date.as_deref()),
            or_placeholder(item.slot_time.as_deref(), NOT_AVAILABLE),
            action_hint(item),
            or_placeholder(item.user_id.as_deref(), DASH),
        ]);
    }
    table.render()
}

pub fn render_calendar(day: &DaySchedule) -> String {
    let mut out = format_weekday_heading(day.date);
    out.push('\n');

    if day.appointments.is_empty() {
        out.push_str("\nNo appointments scheduled");
        return out;
    }

    for appt in &day.appointments {
        let status = appt.status();
        out.push_str(&format!(
            "\n{} {}\n  {}  {}",
            status_dot(status),
            or_placeholder(appt.patient_name(), "Unknown Patient"),
            appt.slot_time.as_deref().map(format_time_12h).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status.calendar_label(),
        ));
        if let Some(note) = appt.note_text() {
            out.push_str(&format!("\n  \"{}\"", note));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn render_patient_history(history: &PatientHistory) -> String {
    let lifecycle = AppointmentLifecycleService::new();
    let mut out = format!("Patient History ({}) for {}\n", history.scope, history.user_id);

    if history.entries.is_empty() {
        out.push_str("\nNo history found for this patient.");
        return out;
    }

    for item in &history.entries {
        out.push_str(&format!(
            "\n[{}]\n  Doctor:       {}\n  Date:         {}\n  Time:         {}\n  Status:       {}\n  Note:         {}\n  Prescription: {}",
            item.id,
            or_placeholder(item.doctor_name(), NOT_AVAILABLE),
            or_placeholder(item.slot_date.as_deref(), NOT_AVAILABLE),
            or_placeholder(item.slot_time.as_deref(), NOT_AVAILABLE),
            item.status().label(),
            item.note_text().unwrap_or(NOT_AVAILABLE),
            item.prescription_text(),
        ));
        if lifecycle.can_add_prescription(item) {
            out.push_str("\n  [can add prescription]");
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// "4" and "3-5" get a unit; "1 Year" already carries one.
fn experience_line(experience: &str) -> String {
    let bare = experience
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ' '));
    if bare {
        format!("{} years experience", experience.trim())
    } else {
        format!("{} experience", experience.trim())
    }
}

pub fn render_profile(profile: &Doctor) -> String {
    let experience = Doctor::field_text(&profile.experience)
        .map(|e| experience_line(&e))
        .unwrap_or_else(|| DASH.to_string());

    [
        profile.name.clone(),
        or_placeholder(profile.speciality.as_deref(), DASH),
        experience,
        String::new(),
        format!("Address: {}", Doctor::field_text(&profile.address).unwrap_or_else(|| DASH.to_string())),
        format!("Phone:   {}", Doctor::field_text(&profile.phone_no).unwrap_or_else(|| DASH.to_string())),
        format!("Fees:    Rs. {}", Doctor::field_text(&profile.fees).unwrap_or_else(|| DASH.to_string())),
        format!("About:   {}", or_placeholder(profile.about.as_deref(), DASH)),
        String::new(),
        format!("[{}]", profile.availability_label()),
    ]
    .join("\n")
}

fn status_dot(status: AppointmentStatus) -> char {
    match status {
        AppointmentStatus::Cancelled => '✖',
        AppointmentStatus::Completed => '✔',
        AppointmentStatus::Pending => '•',
    }
}

fn action_hint(item: &Appointment) -> String {
    match item.status() {
        AppointmentStatus::Pending => AppointmentLifecycleService::new()
            .valid_actions(AppointmentStatus::Pending)
            .iter()
            .map(|action| action.command())
            .collect::<Vec<_>>()
            .join(" | "),
        other => other.label().to_string(),
    }
}

use appointment_cell::{Appointment, AppointmentStatus};
use doctor_cell::Doctor;
use shared_models::LooseValue;
use shared_utils::{or_placeholder, slot_date_long, slot_date_short, truncate, TextTable, DASH, NOT_AVAILABLE};

use crate::models::AdminDashboard;

pub fn render_dashboard(dash: &AdminDashboard) -> String {
    let mut out = String::new();
    out.push_str(&format!("Doctors:      {}\n", dash.doctors));
    out.push_str(&format!("Appointments: {}\n", dash.appointments));
    out.push_str(&format!("Patients:     {}\n", dash.patients));
    out.push_str("\nLatest Appointments\n");

    if dash.latest_appointments.is_empty() {
        out.push_str("No appointments found");
        return out;
    }

    for item in &dash.latest_appointments {
        out.push_str(&format!(
            "\n- {} | Booking on {} | {}",
            or_placeholder(item.doctor_name(), NOT_AVAILABLE),
            slot_date_long(item.slot_date.as_deref()),
            item.status().label(),
        ));
    }
    out
}

pub fn render_doctor_list(doctors: &[Doctor]) -> String {
    if doctors.is_empty() {
        return "No doctors found".to_string();
    }

    let field = |value: &Option<LooseValue>| Doctor::field_text(value).unwrap_or_else(|| DASH.to_string());

    let mut table = TextTable::new([
        "Id",
        "Name",
        "Address",
        "Experience",
        "Speciality",
        "Phone",
        "Email",
        "Available",
    ]);
    for doctor in doctors {
        table.push_row([
            doctor.id.clone(),
            or_placeholder(Some(doctor.name.as_str()), DASH),
            truncate(&field(&doctor.address), 30),
            field(&doctor.experience),
            or_placeholder(doctor.speciality.as_deref(), DASH),
            field(&doctor.phone_no),
            or_placeholder(doctor.email.as_deref(), DASH),
            if doctor.available { "[x]" } else { "[ ]" }.to_string(),
        ]);
    }
    table.render()
}

pub fn render_all_appointments(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "No appointments found".to_string();
    }

    let mut table = TextTable::new(["#", "Id", "Doctor", "Date", "Time", "Notes", "Patient", "Status"]);
    for (index, item) in appointments.iter().enumerate() {
        let status = match item.status() {
            AppointmentStatus::Pending => "Pending (cancel)".to_string(),
            other => other.label().to_string(),
        };
        table.push_row([
            (index + 1).to_string(),
            item.id.clone(),
            or_placeholder(item.doctor_name(), NOT_AVAILABLE),
            slot_date_short(item.slot_date.as_deref()),
            or_placeholder(item.slot_time.as_deref(), NOT_AVAILABLE),
            truncate(item.note_text().unwrap_or(NOT_AVAILABLE), 40),
            or_placeholder(item.patient_name(), NOT_AVAILABLE),
            status,
        ]);
    }
    table.render()
}

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use shared_models::Role;

/// dental-panel: Admin and Doctor panel for the dental clinic backend
#[derive(Debug, Parser)]
#[command(name = "dental-panel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in as admin or doctor
    Login {
        /// Role to log in as (admin, doctor)
        #[arg(short, long)]
        role: Role,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Log out of one role, or of both when no role is given
    Logout {
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// Show the current session and the screens it can open
    Whoami,

    /// Render a screen, e.g. /dentist-list or /doctor/patient/<userId>
    Open {
        /// Screen path (default: the role's dashboard)
        path: Option<String>,
    },

    /// Add a dentist (admin)
    AddDentist {
        /// Profile picture to upload
        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Experience (1-3, 3-5, 5+)
        #[arg(long, default_value = "1 Year")]
        experience: String,

        #[arg(long, default_value = "")]
        about: String,

        #[arg(long, default_value = "General")]
        speciality: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Flip a doctor's availability (admin: by id, doctor: own profile)
    ToggleAvailability {
        doctor_id: Option<String>,
    },

    /// Cancel a pending appointment
    Cancel {
        appointment_id: String,
    },

    /// Mark a pending appointment as completed (doctor)
    Complete {
        appointment_id: String,
    },

    /// Edit the doctor's own profile
    UpdateProfile {
        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        about: Option<String>,

        #[arg(long)]
        fees: Option<String>,

        #[arg(long)]
        experience: Option<String>,
    },

    /// Attach a prescription to a completed appointment (doctor)
    Prescribe {
        user_id: String,

        appointment_id: String,

        #[arg(short, long)]
        text: String,
    },

    /// Toggle a contact message between pending and replied
    ContactStatus {
        contact_id: String,
    },

    /// Show the doctor's appointments for one day
    Calendar {
        /// Day to show, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show a patient's appointment history
    History {
        user_id: String,

        /// Only this doctor's appointments with the patient
        #[arg(long)]
        mine: bool,
    },
}

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use appointment_cell::Appointment;
use shared_models::PanelError;

pub const SPECIALITIES: [&str; 5] = [
    "General",
    "Orthodontist",
    "Oral and maxillofacial surgeon",
    "Periodontist",
    "Prosthodontist",
];

pub const EXPERIENCE_CHOICES: [&str; 3] = ["1-3", "3-5", "5+"];

/// Clinic-wide counters and the most recent bookings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminDashboard {
    pub doctors: u64,
    pub appointments: u64,
    pub patients: u64,
    pub latest_appointments: Vec<Appointment>,
}

/// Profile picture attached to a new dentist.
#[derive(Debug, Clone, PartialEq)]
pub struct DentistImage {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl DentistImage {
    pub async fn from_path(path: &Path) -> Result<Self, PanelError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PanelError::Validation(format!("Cannot read image {}: {}", path.display(), e)))?;

        if bytes.is_empty() {
            return Err(PanelError::Validation(format!("Image {} is empty", path.display())));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "doctor.jpg".to_string());

        Ok(Self {
            mime: guess_image_mime(&file_name),
            file_name,
            bytes,
        })
    }
}

fn guess_image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// The "Add Dentist" form. Defaults match the form's initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDentist {
    pub image: Option<DentistImage>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub experience: String,
    pub about: String,
    pub speciality: String,
    pub address: String,
    pub phone_no: String,
}

impl Default for NewDentist {
    fn default() -> Self {
        Self {
            image: None,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            experience: "1 Year".to_string(),
            about: String::new(),
            speciality: "General".to_string(),
            address: String::new(),
            phone_no: String::new(),
        }
    }
}

impl NewDentist {
    /// The image is checked before anything else; the remaining fields are
    /// left to the backend apart from the speciality choice.
    pub fn image(&self) -> Result<&DentistImage, PanelError> {
        self.image
            .as_ref()
            .ok_or_else(|| PanelError::Validation("Image not selected".to_string()))
    }

    pub fn validate(&self) -> Result<&DentistImage, PanelError> {
        let image = self.image()?;
        if !SPECIALITIES.contains(&self.speciality.as_str()) {
            return Err(PanelError::Validation(format!(
                "Unknown speciality '{}', expected one of: {}",
                self.speciality,
                SPECIALITIES.join(", ")
            )));
        }
        Ok(image)
    }

    pub fn to_form(&self) -> Result<Form, PanelError> {
        let image = self.validate()?;
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)
            .map_err(|e| PanelError::Validation(e.to_string()))?;

        Ok(Form::new()
            .part("image", part)
            .text("name", self.name.clone())
            .text("email", self.email.clone())
            .text("password", self.password.clone())
            .text("experience", self.experience.clone())
            .text("about", self.about.clone())
            .text("speciality", self.speciality.clone())
            .text("address", self.address.clone())
            .text("phone_no", self.phone_no.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_defaults() {
        let form = NewDentist::default();
        assert_eq!(form.speciality, "General");
        assert_eq!(form.experience, "1 Year");
        assert_eq!(form.image().unwrap_err().to_string(), "Image not selected");
        assert!(form.to_form().is_err());
    }

    #[test]
    fn speciality_must_be_offered() {
        let form = NewDentist {
            image: Some(DentistImage {
                file_name: "a.png".to_string(),
                mime: "image/png",
                bytes: vec![1, 2, 3],
            }),
            speciality: "Cardiologist".to_string(),
            ..NewDentist::default()
        };
        assert!(form.validate().unwrap_err().to_string().starts_with("Unknown speciality"));

        let form = NewDentist {
            speciality: "Orthodontist".to_string(),
            ..form
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_image_mime("rai.PNG"), "image/png");
        assert_eq!(guess_image_mime("rai.jpeg"), "image/jpeg");
        assert_eq!(guess_image_mime("rai"), "application/octet-stream");
    }
}

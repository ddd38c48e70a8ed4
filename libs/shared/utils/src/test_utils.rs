//! Fixtures shared by the cell test suites: configs that point at a mock
//! backend and canned payloads shaped like the real API's.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use shared_config::PanelConfig;

pub struct TestConfig {
    pub backend_url: String,
    pub session_path: PathBuf,
}

impl TestConfig {
    pub fn new(backend_url: &str, session_dir: &Path) -> Self {
        Self {
            backend_url: backend_url.to_string(),
            session_path: session_dir.join("session.json"),
        }
    }

    pub fn to_panel_config(&self) -> PanelConfig {
        PanelConfig::new(self.backend_url.clone(), self.session_path.clone())
    }
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn login_success(token: &str) -> Value {
        json!({ "success": true, "token": token })
    }

    pub fn failure(message: &str) -> Value {
        json!({ "success": false, "message": message })
    }

    pub fn message(message: &str) -> Value {
        json!({ "success": true, "message": message })
    }

    pub fn doctor(id: &str, name: &str, available: bool) -> Value {
        json!({
            "_id": id,
            "name": name,
            "email": format!("{}@dentalpark.test", id),
            "image": format!("https://cdn.dentalpark.test/{}.png", id),
            "speciality": "General",
            "experience": "3-5",
            "about": "Gentle general dentistry",
            "fees": 800,
            "address": "Lakeside, Pokhara",
            "phone_no": "9800000000",
            "available": available,
            "date": 1714000000000i64
        })
    }

    pub fn appointment(id: &str, cancelled: bool, completed: bool) -> Value {
        json!({
            "_id": id,
            "userId": format!("user-{}", id),
            "docId": "doc-1",
            "slotDate": "2025-05-20",
            "slotTime": "14:30",
            "userData": {
                "name": "Sita Sharma",
                "email": "sita@patients.test",
                "note": "Sensitive molar"
            },
            "docData": {
                "name": "Dr. Rai",
                "image": "https://cdn.dentalpark.test/doc-1.png",
                "speciality": "Orthodontist"
            },
            "amount": 800,
            "cancelled": cancelled,
            "isCompleted": completed,
            "date": 1714000000000i64
        })
    }

    pub fn appointment_with_prescription(id: &str, prescription: Value) -> Value {
        let mut appointment = Self::appointment(id, false, true);
        appointment["prescription"] = prescription;
        appointment
    }

    pub fn appointments(appointments: Vec<Value>) -> Value {
        json!({ "success": true, "appointments": appointments })
    }

    pub fn history(entries: Vec<Value>) -> Value {
        json!({ "success": true, "history": entries })
    }

    pub fn contact(id: &str, status: &str) -> Value {
        json!({
            "_id": id,
            "name": "Ram Thapa",
            "email": "ram@visitors.test",
            "phoneNo": "9811111111",
            "message": "Do you offer weekend braces consultations?",
            "status": status,
            "createdAt": "2025-05-18T10:15:00Z"
        })
    }

    pub fn feedback(id: &str, rating: u8) -> Value {
        json!({
            "_id": id,
            "rating": rating,
            "comment": "Painless cleaning, friendly staff",
            "userData": { "name": "gita", "email": "gita@patients.test" },
            "createdAt": "2025-05-19T08:00:00Z"
        })
    }
}

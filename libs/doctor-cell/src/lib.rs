pub mod context;
pub mod models;
pub mod services;
pub mod views;

pub use context::DoctorContext;
pub use models::*;
pub use services::DoctorService;

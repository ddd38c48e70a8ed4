pub mod context;
pub mod models;
pub mod services;
pub mod views;

pub use context::{AdminCache, AdminContext};
pub use models::*;
pub use services::AdminService;

pub mod context;
pub mod models;
pub mod services;
pub mod views;

pub use context::ContactContext;
pub use models::*;
pub use services::ContactService;

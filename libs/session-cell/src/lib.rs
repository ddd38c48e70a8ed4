pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::Credentials;
pub use session::Session;
pub use store::SessionStore;

pub mod client;

pub use client::{BackendAuth, BackendClient};

pub mod cli;
pub mod console;
pub mod routes;
pub mod shell;

pub use cli::{Cli, Command};
pub use console::ConsoleNotifier;
pub use routes::{Access, Route};
pub use shell::Shell;

pub mod display;
pub mod table;
pub mod test_utils;

pub use display::*;
pub use table::TextTable;

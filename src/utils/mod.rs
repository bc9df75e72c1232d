//! Terminal helpers shared by the library and the binary

pub mod logging;
pub mod progress;
pub mod styling;

//! Command implementations for econet-cli

pub mod read;
pub mod settings;
pub mod write;

pub use read::{params, status, sys};
pub use settings::settings;
pub use write::{boiler, set, write_setting};

pub mod capabilities;
pub mod paths;

pub use capabilities::{load_capabilities, resolve_capabilities, save_capabilities, ConfigError};

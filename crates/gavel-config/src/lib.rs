//! KDL configuration parsing for the Gavel online judge.

pub mod error;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{DatabaseConfig, Settings, load_settings, parse_settings};

//! Imagelens configuration
//!
//! Settings are an explicit value handed to the pipeline at construction time.
//! [`SettingsLoader`] assembles them from defaults, an optional TOML file and
//! environment variables; tests build [`Settings`] directly or feed the loader
//! an in-memory variable map.

pub mod error;
pub mod loader;
pub mod provider;
pub mod settings;

pub use error::{ConfigError, Result};
pub use loader::SettingsLoader;
pub use provider::ProviderKind;
pub use settings::{Credentials, Settings};

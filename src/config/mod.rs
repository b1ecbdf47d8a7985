//! Configuration module for procmem
//!
//! Provides configuration loading, validation, and default settings
//! for the scanner, the freezer and the command shell.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults, DEFAULT_CONFIG_FILE};
pub use loader::{load_config, ConfigLoader};
pub use validator::{validate_config, ConfigValidator, LOG_LEVELS, MAX_CYCLE_DELAY_US};

// Re-export the configuration structures
pub use loader::{Config, FreezerConfig, LoggingConfig, MemoryConfig, ScannerConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Loads and validates the configuration at `path`, or the default file
pub fn load_validated(path: Option<&std::path::Path>) -> ConfigResult<Config> {
    let config = match path {
        // An explicitly named file must exist
        Some(path) => ConfigLoader::new(path).load()?,
        None => load_config()?,
    };
    validate_config(&config)?;
    Ok(config)
}

//! Configuration validator for procmem
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, FreezerConfig, LoggingConfig, MemoryConfig, ScannerConfig};

/// Log levels accepted by the `[logging]` section and `--log-level`
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Longest pause the freezer may take between passes (1s)
pub const MAX_CYCLE_DELAY_US: u64 = 1_000_000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_scanner(&config.scanner)?;
        Self::validate_freezer(&config.freezer)?;
        Self::validate_memory(&config.memory)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_scanner(scanner: &ScannerConfig) -> Result<(), ConfigError> {
        if scanner.max_threads == 0 {
            return Err(ConfigError::Invalid(
                "Scanner threads must be at least 1".to_string(),
            ));
        }

        if scanner.max_threads > 128 {
            return Err(ConfigError::Invalid(
                "Scanner threads cannot exceed 128".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_freezer(freezer: &FreezerConfig) -> Result<(), ConfigError> {
        if freezer.cycle_delay_us > MAX_CYCLE_DELAY_US {
            return Err(ConfigError::Invalid(format!(
                "Freezer cycle delay cannot exceed {}us",
                MAX_CYCLE_DELAY_US
            )));
        }

        Ok(())
    }

    fn validate_memory(memory: &MemoryConfig) -> Result<(), ConfigError> {
        if memory.max_dump_size == 0 {
            return Err(ConfigError::Invalid(
                "Maximum dump size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates logging configuration
    pub fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, LOG_LEVELS
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

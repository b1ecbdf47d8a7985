//! Default configuration values for procmem

use serde::{Deserialize, Serialize};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "procmem.toml";

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub scanner: ScannerDefaults,
    pub freezer: FreezerDefaults,
    pub memory: MemoryDefaults,
    pub logging: LoggingDefaults,
}

/// Default scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerDefaults {
    pub parallel: bool,
    pub max_threads: usize,
}

/// Default freezer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreezerDefaults {
    pub cycle_delay_us: u64,
}

/// Default memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDefaults {
    pub max_dump_size: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        scanner: ScannerDefaults {
            parallel: true,
            max_threads: num_cpus::get().min(8),
        },
        freezer: FreezerDefaults {
            cycle_delay_us: 1000, // 1ms
        },
        memory: MemoryDefaults {
            max_dump_size: 1048576, // 1MB
        },
        logging: LoggingDefaults {
            level: "warn".to_string(),
        },
    }
}

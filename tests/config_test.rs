//! Configuration files feeding a session

use procmem::cli::{CommandRegistry, LineOutcome, Session};
use procmem::config::{load_validated, Config, ConfigError, ConfigLoader};
use procmem::core::types::*;
use procmem::memory::MockMemory;
use procmem::process::StaticProcess;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[cfg(test)]
mod config_file_tests {
    use super::*;

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("procmem.toml");

        let mut config = Config::default();
        config.scanner.parallel = false;
        config.freezer.cycle_delay_us = 250;
        config.logging.level = "debug".to_string();

        let loader = ConfigLoader::new(&path);
        loader.save(&config).unwrap();
        assert_eq!(load_validated(Some(path.as_path())).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("procmem.toml");
        fs::write(&path, "[memory]\nmax_dump_size = 64\n").unwrap();

        let config = load_validated(Some(path.as_path())).unwrap();
        let defaults = Config::default();
        assert_eq!(config.memory.max_dump_size, 64);
        assert_eq!(config.scanner, defaults.scanner);
        assert_eq!(config.freezer, defaults.freezer);
        assert_eq!(config.logging, defaults.logging);
    }

    #[test]
    fn test_invalid_files_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("procmem.toml");

        fs::write(&path, "[freezer]\ncycle_delay_us = 5000000\n").unwrap();
        assert!(matches!(load_validated(Some(path.as_path())), Err(ConfigError::Invalid(_))));

        fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(matches!(load_validated(Some(path.as_path())), Err(ConfigError::Invalid(_))));

        fs::write(&path, "[scanner\n").unwrap();
        assert!(matches!(load_validated(Some(path.as_path())), Err(ConfigError::TomlParse(_))));
        assert!(ConfigLoader::new(&path).load_or_default().is_err());
    }

    #[test]
    fn test_dump_limit_comes_from_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("procmem.toml");
        fs::write(&path, "[memory]\nmax_dump_size = 16\n").unwrap();
        let config = load_validated(Some(path.as_path())).unwrap();

        let memory = Arc::new(MockMemory::new().with_segment(0x1000, vec![0; 64]));
        let mut session = Session::new(memory, config);
        let region = MemoryRegion::new(0x1000, 0x1040, RegionPermissions::parse("rw-p"), "[heap]");
        session.attach_provider(Box::new(StaticProcess::new(1234, vec![region])));
        let registry = CommandRegistry::new();

        assert!(matches!(
            registry.execute_line(&mut session, "dump 1000 16"),
            LineOutcome::Output(_)
        ));
        assert!(matches!(
            registry.execute_line(&mut session, "dump 1000 17"),
            LineOutcome::Failed(_)
        ));
    }
}

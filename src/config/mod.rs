pub mod batch_config;

#[cfg(feature = "cli")]
use crate::domain::ports::{SessionSettings, StoreSettings};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_database_url, validate_positive_number, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "hydro-control")]
#[command(about = "Track daily water consumption per neighborhood")]
pub struct CliConfig {
    #[arg(long, default_value = "sqlite://hydro_control.db")]
    pub database_url: String,

    #[arg(long, default_value = "5")]
    pub max_connections: u32,

    #[arg(long, default_value = "1000", help = "Residents per unit typed at the population prompt")]
    pub population_unit: i64,

    #[arg(long, help = "Classify readings without saving them")]
    pub no_persist: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl StoreSettings for CliConfig {
    fn database_url(&self) -> &str {
        &self.database_url
    }

    fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

#[cfg(feature = "cli")]
impl SessionSettings for CliConfig {
    fn population_unit(&self) -> i64 {
        self.population_unit
    }

    fn persist_enabled(&self) -> bool {
        !self.no_persist
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_database_url("database_url", &self.database_url)?;
        validate_positive_number("max_connections", i64::from(self.max_connections))?;
        validate_positive_number("population_unit", self.population_unit)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["hydro-control"]);
        assert_eq!(config.database_url(), "sqlite://hydro_control.db");
        assert_eq!(config.population_unit(), 1000);
        assert!(config.persist_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_and_validation() {
        let config = CliConfig::parse_from([
            "hydro-control",
            "--database-url",
            "postgres://localhost/db",
            "--population-unit",
            "1",
            "--no-persist",
        ]);
        assert!(!config.persist_enabled());
        assert_eq!(config.population_unit(), 1);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["hydro-control", "--population-unit", "0"]);
        assert!(config.validate().is_err());
    }
}

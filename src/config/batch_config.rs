use crate::domain::ports::StoreSettings;
use crate::utils::error::{HydroError, Result};
use crate::utils::validation::{validate_database_url, validate_positive_number, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_POPULATION_UNIT: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub store: StoreConfig,
    pub input: Option<InputConfig>,
    pub report: Option<ReportConfig>,
    #[serde(default)]
    pub neighborhoods: Vec<NeighborhoodEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Residents per unit of the `population` field.
    pub population_unit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub csv_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodEntry {
    pub name: String,
    pub population: i64,
    #[serde(default)]
    pub readings: Vec<f64>,
}

impl BatchConfig {
    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${HYDRO_DB})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| HydroError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn population_unit(&self) -> i64 {
        self.input
            .as_ref()
            .and_then(|i| i.population_unit)
            .unwrap_or(DEFAULT_POPULATION_UNIT)
    }

    pub fn report_path(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.csv_path.as_str())
    }
}

impl StoreSettings for BatchConfig {
    fn database_url(&self) -> &str {
        &self.store.database_url
    }

    fn max_connections(&self) -> u32 {
        self.store.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<()> {
        validate_database_url("store.database_url", &self.store.database_url)?;
        validate_positive_number("store.max_connections", i64::from(self.max_connections()))?;
        validate_positive_number("input.population_unit", self.population_unit())?;

        if self.neighborhoods.is_empty() {
            return Err(HydroError::config("No [[neighborhoods]] entries to import"));
        }
        if let Some(path) = self.report_path() {
            if path.trim().is_empty() {
                return Err(HydroError::config("report.csv_path cannot be empty"));
            }
        }
        Ok(())
    }
}

use crate::adapters::statistics::{
    StatisticsSettings, DEFAULT_DATASET, DEFAULT_HECTARES_TO_VALUE, DEFAULT_MEASURE,
    DEFAULT_SPARQL_ENDPOINT,
};
use crate::adapters::what3words::DEFAULT_W3W_ENDPOINT;
use crate::adapters::DEFAULT_TIMEOUT_SECONDS;
use crate::config::DataStrategy;
use crate::core::agr::{DEFAULT_DISCOUNT_RATE, DEFAULT_PLOT_AREA_SQM};
use crate::core::area::{
    AreaResolver, DEFAULT_BOUNDARY_LATITUDE, DEFAULT_NORTH_REGION, DEFAULT_SOUTH_REGION,
};
use crate::core::estimator::{EstimatorSettings, DEFAULT_FALLBACK_VALUE};
use crate::core::static_table::StaticTable;
use crate::domain::model::{DiscountRateMode, Region};
use crate::utils::error::{AgrError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub geocoder: GeocoderConfig,
    pub land_values: LandValuesConfig,
    pub statistics: StatisticsConfig,
    pub calculation: CalculationConfig,
    pub area: AreaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_W3W_ENDPOINT.to_string(),
            api_key: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandValuesConfig {
    pub strategy: DataStrategy,
    /// CSV: area,land_value_per_sqm,discount_rate
    pub static_table: Option<String>,
    pub fallback_value: f64,
}

impl Default for LandValuesConfig {
    fn default() -> Self {
        Self {
            strategy: DataStrategy::Static,
            static_table: None,
            fallback_value: DEFAULT_FALLBACK_VALUE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    pub endpoint: String,
    pub dataset: String,
    pub measure: String,
    pub hectares_to_value: f64,
    pub cache_ttl_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            measure: DEFAULT_MEASURE.to_string(),
            hectares_to_value: DEFAULT_HECTARES_TO_VALUE,
            cache_ttl_seconds: 3600,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    pub plot_area_sqm: f64,
    pub discount_rate_mode: DiscountRateMode,
    pub default_discount_rate: f64,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            plot_area_sqm: DEFAULT_PLOT_AREA_SQM,
            discount_rate_mode: DiscountRateMode::LegacyFixedRate,
            default_discount_rate: DEFAULT_DISCOUNT_RATE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    pub boundary_latitude: f64,
    pub north_region: String,
    pub south_region: String,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            boundary_latitude: DEFAULT_BOUNDARY_LATITUDE,
            north_region: DEFAULT_NORTH_REGION.to_string(),
            south_region: DEFAULT_SOUTH_REGION.to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AgrError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${W3W_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("geocoder.endpoint", &self.geocoder.endpoint)?;
        validation::validate_positive_number(
            "geocoder.timeout_seconds",
            self.geocoder.timeout_seconds,
            1,
        )?;

        if let Some(path) = &self.land_values.static_table {
            validation::validate_path("land_values.static_table", path)?;
        }
        validation::validate_non_negative(
            "land_values.fallback_value",
            self.land_values.fallback_value,
        )?;

        validation::validate_url("statistics.endpoint", &self.statistics.endpoint)?;
        validation::validate_url("statistics.dataset", &self.statistics.dataset)?;
        validation::validate_url("statistics.measure", &self.statistics.measure)?;
        validation::validate_non_negative(
            "statistics.hectares_to_value",
            self.statistics.hectares_to_value,
        )?;
        validation::validate_positive_number(
            "statistics.timeout_seconds",
            self.statistics.timeout_seconds,
            1,
        )?;

        validation::validate_non_negative(
            "calculation.plot_area_sqm",
            self.calculation.plot_area_sqm,
        )?;
        validation::validate_range(
            "calculation.default_discount_rate",
            self.calculation.default_discount_rate,
            0.0,
            1.0,
        )?;

        validation::validate_range(
            "area.boundary_latitude",
            self.area.boundary_latitude,
            -90.0,
            90.0,
        )?;
        validation::validate_non_empty_string("area.north_region", &self.area.north_region)?;
        validation::validate_non_empty_string("area.south_region", &self.area.south_region)?;

        Ok(())
    }

    /// Geocoding 需要 API key；未替換的 ${VAR} 視為未設定
    pub fn api_key(&self) -> Result<&str> {
        match self.geocoder.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() && !ENV_VAR.is_match(key) => Ok(key),
            _ => Err(AgrError::MissingConfigError {
                field: "geocoder.api_key (or W3W_API_KEY)".to_string(),
            }),
        }
    }

    pub fn static_table(&self) -> Result<StaticTable> {
        match &self.land_values.static_table {
            Some(path) => StaticTable::from_csv_path(path),
            None => Ok(StaticTable::default()),
        }
    }

    pub fn area_resolver(&self) -> AreaResolver {
        AreaResolver::new(
            self.area.boundary_latitude,
            Region::new(self.area.north_region.trim()),
            Region::new(self.area.south_region.trim()),
        )
    }

    pub fn estimator_settings(&self) -> EstimatorSettings {
        EstimatorSettings {
            plot_area_sqm: self.calculation.plot_area_sqm,
            rate_mode: self.calculation.discount_rate_mode,
            default_discount_rate: self.calculation.default_discount_rate,
            fallback_value: self.land_values.fallback_value,
        }
    }

    pub fn statistics_settings(&self) -> StatisticsSettings {
        StatisticsSettings {
            endpoint: self.statistics.endpoint.clone(),
            dataset: self.statistics.dataset.clone(),
            measure: self.statistics.measure.clone(),
            hectares_to_value: self.statistics.hectares_to_value,
            cache_ttl: Duration::from_secs(self.statistics.cache_ttl_seconds),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

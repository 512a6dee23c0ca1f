use crate::config::{DataStrategy, TomlConfig};
use crate::domain::model::DiscountRateMode;
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "agr-config.toml";

#[derive(Debug, Clone, Parser)]
#[command(name = "agr-map")]
#[command(about = "Estimate Annual Ground Rent for a what3words address in Scotland")]
pub struct CliConfig {
    /// what3words address, e.g. filled.count.soap
    pub address: String,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override the land value strategy from config
    #[arg(long, value_enum)]
    pub strategy: Option<DataStrategy>,

    #[arg(long, env = "W3W_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Plot area in square meters
    #[arg(long)]
    pub plot_area: Option<f64>,

    #[arg(long, value_enum)]
    pub rate_mode: Option<DiscountRateMode>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 預設路徑的設定檔不存在時使用內建預設值
    pub fn load_config(&self) -> Result<TomlConfig> {
        let mut config = if self.config == DEFAULT_CONFIG_PATH && !Path::new(&self.config).exists()
        {
            tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
            TomlConfig::default()
        } else {
            TomlConfig::from_file(&self.config)?
        };

        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(strategy) = self.strategy {
            config.land_values.strategy = strategy;
            tracing::info!("🔧 Strategy overridden to: {:?}", strategy);
        }
        if let Some(key) = &self.api_key {
            config.geocoder.api_key = Some(key.clone());
        }
        if let Some(area) = self.plot_area {
            config.calculation.plot_area_sqm = area;
        }
        if let Some(mode) = self.rate_mode {
            config.calculation.discount_rate_mode = mode;
        }
    }
}

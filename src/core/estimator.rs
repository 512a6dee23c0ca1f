use crate::core::agr::{self, DEFAULT_DISCOUNT_RATE, DEFAULT_PLOT_AREA_SQM};
use crate::core::area::AreaResolver;
use crate::core::static_table::StaticTable;
use crate::domain::model::{AgrReport, DiscountRateMode, LandValueRecord, Region};
use crate::domain::ports::{Geocoder, LandValueSource};
use crate::utils::error::{AgrError, Result};
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_FALLBACK_VALUE: f64 = 100.0;

static THREE_WORD_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{L}+\.\p{L}+\.\p{L}+$").expect("three-word address pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorSettings {
    pub plot_area_sqm: f64,
    pub rate_mode: DiscountRateMode,
    pub default_discount_rate: f64,
    pub fallback_value: f64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            plot_area_sqm: DEFAULT_PLOT_AREA_SQM,
            rate_mode: DiscountRateMode::LegacyFixedRate,
            default_discount_rate: DEFAULT_DISCOUNT_RATE,
            fallback_value: DEFAULT_FALLBACK_VALUE,
        }
    }
}

/// Runs one address through geocode → region → land value → AGR.
pub struct AgrEstimator<G: Geocoder> {
    geocoder: G,
    resolver: AreaResolver,
    source: Box<dyn LandValueSource>,
    table: StaticTable,
    settings: EstimatorSettings,
}

impl<G: Geocoder> AgrEstimator<G> {
    pub fn new(
        geocoder: G,
        resolver: AreaResolver,
        source: Box<dyn LandValueSource>,
        table: StaticTable,
        settings: EstimatorSettings,
    ) -> Self {
        Self {
            geocoder,
            resolver,
            source,
            table,
            settings,
        }
    }

    pub async fn estimate(&self, address: &str) -> Result<AgrReport> {
        let words = normalize_address(address)?;

        tracing::debug!("Geocoding ///{}", words);
        let coordinate = match self.geocoder.to_coordinates(&words).await {
            Ok(Some(coordinate)) => coordinate,
            Ok(None) => {
                tracing::warn!("❌ No coordinates returned for ///{}", words);
                return Err(AgrError::GeocodeFailure {
                    address: words,
                    message: "response has no coordinates".to_string(),
                });
            }
            Err(e) => {
                tracing::warn!("❌ Geocoding request failed for ///{}: {}", words, e);
                return Err(AgrError::GeocodeFailure {
                    address: words,
                    message: e.to_string(),
                });
            }
        };

        let region = self.resolver.resolve(&coordinate);
        tracing::info!(
            "📍 ///{} -> ({}, {}) -> {}",
            words,
            coordinate.lat,
            coordinate.lng,
            region
        );

        let record = self.resolve_land_value(&region).await;
        let discount_rate = self.discount_rate(&region);
        let estimate = agr::estimate(record.value_per_sqm, self.settings.plot_area_sqm, discount_rate);

        tracing::info!(
            "💷 AGR for {}: £{:.2} (base £{:.2}/sqm, rate {}, {} sqm)",
            region,
            estimate.agr,
            estimate.value_per_sqm,
            estimate.discount_rate,
            estimate.plot_area_sqm
        );

        Ok(AgrReport {
            address: words,
            coordinate,
            region,
            record,
            estimate,
        })
    }

    /// 取值鏈中的任何錯誤都以預設值取代，不向上傳遞
    pub async fn resolve_land_value(&self, region: &Region) -> LandValueRecord {
        match self.source.land_value(region).await {
            Ok(record) => record,
            Err(e) => {
                if e.is_fallback_eligible() {
                    tracing::warn!(
                        "⚠️ {} lookup failed for {} ({:?}): {}; using fallback £{}/sqm",
                        self.source.name(),
                        region,
                        e.category(),
                        e,
                        self.settings.fallback_value
                    );
                } else {
                    // 非取值鏈錯誤 (例如查詢設定錯誤) 代表設定有問題，仍以預設值繼續
                    tracing::error!(
                        "❌ {} is misconfigured for {} ({:?}): {}; using fallback £{}/sqm",
                        self.source.name(),
                        region,
                        e.category(),
                        e,
                        self.settings.fallback_value
                    );
                    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                }
                LandValueRecord::fallback(region.clone(), self.settings.fallback_value)
            }
        }
    }

    pub fn discount_rate(&self, region: &Region) -> f64 {
        let rate = match self.settings.rate_mode {
            DiscountRateMode::LegacyFixedRate => self.table.first_rate(),
            DiscountRateMode::PerRegion => self.table.lookup(region).map(|row| row.discount_rate),
        };
        rate.unwrap_or(self.settings.default_discount_rate)
    }
}

/// 去除前置 `///` 與空白，並檢查 word.word.word 格式
pub fn normalize_address(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let words = trimmed.strip_prefix("///").unwrap_or(trimmed);

    if words.is_empty() {
        return Err(AgrError::InvalidAddress {
            address: input.to_string(),
            reason: "address is empty".to_string(),
        });
    }

    if !THREE_WORD_ADDRESS.is_match(words) {
        return Err(AgrError::InvalidAddress {
            address: input.to_string(),
            reason: "expected three words separated by dots".to_string(),
        });
    }

    Ok(words.to_lowercase())
}

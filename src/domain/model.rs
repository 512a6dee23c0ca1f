use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// 粗略的地區名稱，作為土地價值查詢的鍵
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Static,
    Live,
    Fallback,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueSource::Static => "static",
            ValueSource::Live => "live",
            ValueSource::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandValueRecord {
    pub region: Region,
    pub value_per_sqm: f64,
    /// 觀測期間或來源標籤
    pub period: String,
    pub source: ValueSource,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LandValueRecord {
    pub fn from_static(region: Region, value_per_sqm: f64) -> Self {
        Self {
            region,
            value_per_sqm,
            period: "static-table".to_string(),
            source: ValueSource::Static,
            fetched_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn fallback(region: Region, value_per_sqm: f64) -> Self {
        Self {
            region,
            value_per_sqm,
            period: "fallback".to_string(),
            source: ValueSource::Fallback,
            fetched_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| now >= expiry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgrEstimate {
    pub agr: f64,
    pub value_per_sqm: f64,
    pub plot_area_sqm: f64,
    pub discount_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum DiscountRateMode {
    /// 沿用舊邏輯：無論地區一律取靜態表第一列的利率
    #[default]
    LegacyFixedRate,
    PerRegion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgrReport {
    pub address: String,
    pub coordinate: Coordinate,
    pub region: Region,
    pub record: LandValueRecord,
    pub estimate: AgrEstimate,
}

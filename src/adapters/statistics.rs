use crate::adapters::sparql;
use crate::core::cache::TtlCache;
use crate::domain::model::{LandValueRecord, Region, ValueSource};
use crate::domain::ports::LandValueSource;
use crate::utils::error::{AgrError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://statistics.gov.scot/sparql";
pub const DEFAULT_DATASET: &str = "http://statistics.gov.scot/data/vacant-and-derelict-land";
pub const DEFAULT_MEASURE: &str = "http://statistics.gov.scot/def/measure-properties/count";
pub const DEFAULT_HECTARES_TO_VALUE: f64 = 10.0;
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

#[derive(Debug, Clone)]
pub struct StatisticsSettings {
    pub endpoint: String,
    pub dataset: String,
    pub measure: String,
    /// 公頃 → 每平方公尺價值的線性換算係數
    pub hectares_to_value: f64,
    pub cache_ttl: Duration,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            measure: DEFAULT_MEASURE.to_string(),
            hectares_to_value: DEFAULT_HECTARES_TO_VALUE,
            cache_ttl: crate::core::cache::DEFAULT_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Observation {
    hectares: f64,
    period: String,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: ResultSet,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    bindings: Vec<HashMap<String, RdfTerm>>,
}

#[derive(Debug, Deserialize)]
struct RdfTerm {
    value: String,
}

/// Live land values from a SPARQL endpoint, cached per query text.
pub struct StatisticsSource {
    client: Client,
    settings: StatisticsSettings,
    cache: TtlCache<String, Observation>,
}

impl StatisticsSource {
    pub fn new(client: Client, settings: StatisticsSettings) -> Self {
        let cache = TtlCache::new(settings.cache_ttl);
        Self {
            client,
            settings,
            cache,
        }
    }

    pub fn query_for(&self, region: &Region) -> Result<String> {
        sparql::latest_observation_query(
            &self.settings.dataset,
            &self.settings.measure,
            region.as_str(),
        )
    }

    async fn fetch_observation(&self, query: &str, region: &Region) -> Result<Observation> {
        tracing::debug!("Making SPARQL request to: {}", self.settings.endpoint);
        let response = self
            .client
            .post(&self.settings.endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await?;

        tracing::debug!("SPARQL response status: {}", response.status());

        if response.status() != StatusCode::OK {
            return Err(AgrError::NonSuccessStatus {
                endpoint: self.settings.endpoint.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let results: SparqlResults = serde_json::from_str(&body).map_err(|e| AgrError::Parse {
            message: format!("SPARQL results are not valid JSON: {}", e),
        })?;

        let binding = results
            .results
            .bindings
            .into_iter()
            .next()
            .ok_or_else(|| AgrError::RegionNotFound {
                region: region.to_string(),
            })?;

        let raw = binding.get("value").ok_or_else(|| AgrError::Parse {
            message: "binding has no 'value' field".to_string(),
        })?;

        let hectares: f64 = raw.value.trim().parse().map_err(|_| AgrError::Parse {
            message: format!("statistic '{}' is not a number", raw.value),
        })?;

        // "NaN"、"inf" 與負數都能被 parse，但不是有效的面積
        if !hectares.is_finite() || hectares < 0.0 {
            return Err(AgrError::Parse {
                message: format!("statistic '{}' is not a non-negative area", raw.value),
            });
        }

        let period = binding
            .get("period")
            .map(|term| term.value.clone())
            .unwrap_or_else(|| "unknown period".to_string());

        Ok(Observation {
            hectares,
            period,
            fetched_at: Utc::now(),
        })
    }

    fn to_record(&self, region: &Region, observation: Observation) -> LandValueRecord {
        let expires_at = chrono::Duration::from_std(self.settings.cache_ttl)
            .ok()
            .map(|ttl| observation.fetched_at + ttl);

        LandValueRecord {
            region: region.clone(),
            value_per_sqm: observation.hectares * self.settings.hectares_to_value,
            period: observation.period,
            source: ValueSource::Live,
            fetched_at: observation.fetched_at,
            expires_at,
        }
    }
}

#[async_trait]
impl LandValueSource for StatisticsSource {
    async fn land_value(&self, region: &Region) -> Result<LandValueRecord> {
        let query = self.query_for(region)?;

        if let Some(observation) = self.cache.get(&query).await {
            tracing::debug!("Cache hit for {} ({})", region, observation.period);
            return Ok(self.to_record(region, observation));
        }

        let observation = self.fetch_observation(&query, region).await?;
        tracing::info!(
            "📊 {}: {} ha ({}) from {}",
            region,
            observation.hectares,
            observation.period,
            self.settings.endpoint
        );

        // 只快取成功結果
        self.cache.insert(query, observation.clone()).await;
        Ok(self.to_record(region, observation))
    }

    fn name(&self) -> &'static str {
        "statistics.gov.scot"
    }
}

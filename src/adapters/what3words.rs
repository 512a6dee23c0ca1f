use crate::domain::model::Coordinate;
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_W3W_ENDPOINT: &str = "https://api.what3words.com/v3";

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    coordinates: Option<RawCoordinates>,
}

#[derive(Debug, Deserialize)]
struct RawCoordinates {
    lat: Option<f64>,
    lng: Option<f64>,
}

pub struct What3WordsGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl What3WordsGeocoder {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// 任何非座標的回應一律視為找不到
    fn parse_coordinates(body: &str) -> Option<Coordinate> {
        let response: ConvertResponse = match serde_json::from_str(body) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Unexpected what3words response: {}", e);
                return None;
            }
        };

        let coordinates = response.coordinates?;
        match (coordinates.lat, coordinates.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

#[async_trait]
impl Geocoder for What3WordsGeocoder {
    async fn to_coordinates(&self, words: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/convert-to-coordinates", self.endpoint);
        tracing::debug!("Making what3words request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("words", words), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("what3words response status: {}", status);

        // 錯誤回應的內容 (例如 BadWords、InvalidKey) 同樣沒有座標
        let body = response.text().await?;
        let coordinate = Self::parse_coordinates(&body);
        if coordinate.is_none() && !status.is_success() {
            tracing::warn!("what3words returned HTTP {} for ///{}", status, words);
        }

        Ok(coordinate)
    }
}

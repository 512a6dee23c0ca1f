use crate::domain::model::{Coordinate, LandValueRecord, Region};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` 表示服務有回應但沒有座標
    async fn to_coordinates(&self, words: &str) -> Result<Option<Coordinate>>;
}

#[async_trait]
pub trait LandValueSource: Send + Sync {
    async fn land_value(&self, region: &Region) -> Result<LandValueRecord>;

    fn name(&self) -> &'static str;
}

use crate::domain::model::{LandValueRecord, Region};
use crate::domain::ports::LandValueSource;
use crate::utils::error::{AgrError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticRow {
    pub area: String,
    pub land_value_per_sqm: f64,
    pub discount_rate: f64,
}

/// In-memory land value table, one row per region.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticTable {
    rows: Vec<StaticRow>,
}

impl StaticTable {
    pub fn new(rows: Vec<StaticRow>) -> Self {
        Self { rows }
    }

    /// 從 CSV 檔案載入 (標頭: area,land_value_per_sqm,discount_rate)
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(&path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for row in csv_reader.deserialize::<StaticRow>() {
            rows.push(row?);
        }

        if rows.is_empty() {
            return Err(AgrError::ConfigValidationError {
                field: "land_values.static_table".to_string(),
                message: "static land value table has no rows".to_string(),
            });
        }

        tracing::debug!("Loaded {} static land value rows", rows.len());
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[StaticRow] {
        &self.rows
    }

    pub fn lookup(&self, region: &Region) -> Option<&StaticRow> {
        self.rows
            .iter()
            .find(|row| row.area.eq_ignore_ascii_case(region.as_str()))
    }

    /// 第一列的利率 (舊邏輯固定使用此值)
    pub fn first_rate(&self) -> Option<f64> {
        self.rows.first().map(|row| row.discount_rate)
    }
}

impl Default for StaticTable {
    fn default() -> Self {
        Self::new(vec![
            StaticRow {
                area: "Edinburgh".to_string(),
                land_value_per_sqm: 1500.0,
                discount_rate: 0.05,
            },
            StaticRow {
                area: "Highlands".to_string(),
                land_value_per_sqm: 50.0,
                discount_rate: 0.05,
            },
        ])
    }
}

#[async_trait]
impl LandValueSource for StaticTable {
    async fn land_value(&self, region: &Region) -> Result<LandValueRecord> {
        self.lookup(region)
            .map(|row| LandValueRecord::from_static(region.clone(), row.land_value_per_sqm))
            .ok_or_else(|| AgrError::RegionNotFound {
                region: region.to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "static table"
    }
}

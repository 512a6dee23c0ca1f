use crate::domain::model::AgrReport;
use crate::utils::error::Result;

pub const GEOCODE_FAILURE_MESSAGE: &str = "Invalid what3words address - check key/address.";

impl AgrReport {
    pub fn coords_line(&self) -> String {
        format!("Coords: {}, {}", self.coordinate.lat, self.coordinate.lng)
    }

    pub fn agr_line(&self) -> String {
        format!("Estimated AGR: £{:.2}", self.estimate.agr)
    }

    pub fn base_line(&self) -> String {
        format!(
            "Base: £{:.2}/sqm ({}, {} {})",
            self.record.value_per_sqm, self.region, self.record.source, self.record.period
        )
    }

    pub fn render_lines(&self) -> Vec<String> {
        vec![self.coords_line(), self.agr_line(), self.base_line()]
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgrError {
    #[error("Invalid what3words address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Geocoding failed for '{address}': {message}")]
    GeocodeFailure { address: String, message: String },

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Endpoint {endpoint} returned HTTP {status}")]
    NonSuccessStatus { endpoint: String, status: u16 },

    #[error("Response parsing error: {message}")]
    Parse { message: String },

    #[error("No land value found for region '{region}'")]
    RegionNotFound { region: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AgrError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AgrError::InvalidAddress { .. } | AgrError::GeocodeFailure { .. } => {
                ErrorCategory::Input
            }
            AgrError::Network(_) | AgrError::NonSuccessStatus { .. } => ErrorCategory::Network,
            AgrError::Parse { .. }
            | AgrError::RegionNotFound { .. }
            | AgrError::Csv(_)
            | AgrError::Serialization(_) => ErrorCategory::Data,
            AgrError::ConfigValidationError { .. }
            | AgrError::InvalidConfigValueError { .. }
            | AgrError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AgrError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 取值失敗一律以預設值取代，不影響流程
            ErrorCategory::Network | ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 是否可用預設土地價值取代 (取值鏈中的錯誤)
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            AgrError::Network(_)
                | AgrError::NonSuccessStatus { .. }
                | AgrError::Parse { .. }
                | AgrError::RegionNotFound { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AgrError::InvalidAddress { .. } => {
                "Use three words separated by dots, e.g. filled.count.soap"
            }
            AgrError::GeocodeFailure { .. } => {
                "Check the what3words API key and that the address exists"
            }
            AgrError::Network(_) => "Check network connectivity or raise the request timeout",
            AgrError::NonSuccessStatus { .. } => "The remote service may be down, try again later",
            AgrError::Parse { .. } => "The remote service changed its response shape",
            AgrError::RegionNotFound { .. } => "Add the region to the static land value table",
            AgrError::Io(_) => "Check that the file exists and is readable",
            AgrError::Csv(_) => "Expected header: area,land_value_per_sqm,discount_rate",
            AgrError::Serialization(_) => "Report this as a bug",
            AgrError::ConfigValidationError { .. }
            | AgrError::InvalidConfigValueError { .. }
            | AgrError::MissingConfigError { .. } => "Fix the configuration file or CLI flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AgrError::InvalidAddress { .. } | AgrError::GeocodeFailure { .. } => {
                "Invalid what3words address - check key/address.".to_string()
            }
            AgrError::MissingConfigError { field } => {
                format!("Missing configuration value: {}", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_chain_errors_are_fallback_eligible() {
        let not_found = AgrError::RegionNotFound {
            region: "Orkney".to_string(),
        };
        let status = AgrError::NonSuccessStatus {
            endpoint: "https://statistics.gov.scot/sparql".to_string(),
            status: 503,
        };
        let parse = AgrError::Parse {
            message: "missing results".to_string(),
        };

        assert!(not_found.is_fallback_eligible());
        assert!(status.is_fallback_eligible());
        assert!(parse.is_fallback_eligible());
        assert_eq!(status.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_geocode_failure_message() {
        let err = AgrError::GeocodeFailure {
            address: "filled.count.soap".to_string(),
            message: "no coordinates".to_string(),
        };

        assert!(!err.is_fallback_eligible());
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(
            err.user_friendly_message(),
            "Invalid what3words address - check key/address."
        );
    }
}

// Application wiring: turns a validated config into a ready estimator.

use crate::adapters::statistics::StatisticsSource;
use crate::adapters::what3words::What3WordsGeocoder;
use crate::adapters::build_http_client;
use crate::config::{DataStrategy, TomlConfig};
use crate::core::estimator::AgrEstimator;
use crate::domain::ports::LandValueSource;
use crate::utils::error::Result;

pub fn build_estimator(config: &TomlConfig) -> Result<AgrEstimator<What3WordsGeocoder>> {
    let geocoder = What3WordsGeocoder::new(
        build_http_client(config.geocoder.timeout_seconds)?,
        config.geocoder.endpoint.clone(),
        config.api_key()?,
    );

    let table = config.static_table()?;
    let source: Box<dyn LandValueSource> = match config.land_values.strategy {
        DataStrategy::Static => Box::new(table.clone()),
        DataStrategy::Live => Box::new(StatisticsSource::new(
            build_http_client(config.statistics.timeout_seconds)?,
            config.statistics_settings(),
        )),
    };

    tracing::debug!(
        "Estimator ready: strategy={:?}, rate_mode={:?}",
        config.land_values.strategy,
        config.calculation.discount_rate_mode
    );

    Ok(AgrEstimator::new(
        geocoder,
        config.area_resolver(),
        source,
        table,
        config.estimator_settings(),
    ))
}

use crate::domain::model::AgrEstimate;

pub const DEFAULT_PLOT_AREA_SQM: f64 = 9.0;
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.05;

/// `round(value_per_sqm * plot_area_sqm * discount_rate, 2)`
pub fn calculate_agr(value_per_sqm: f64, plot_area_sqm: f64, discount_rate: f64) -> f64 {
    round_to_cents(value_per_sqm * plot_area_sqm * discount_rate)
}

pub fn estimate(value_per_sqm: f64, plot_area_sqm: f64, discount_rate: f64) -> AgrEstimate {
    AgrEstimate {
        agr: calculate_agr(value_per_sqm, plot_area_sqm, discount_rate),
        value_per_sqm,
        plot_area_sqm,
        discount_rate,
    }
}

/// 依 f64 的精確十進位展開四捨六入 (同 Python 的 round(x, 2))；
/// 先乘 100 會多一次捨入，0.854999... 會被推成 0.855
fn round_to_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

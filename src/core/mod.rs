pub mod agr;
pub mod area;
pub mod cache;
pub mod estimator;
pub mod report;
pub mod static_table;

pub use crate::domain::model::{
    AgrEstimate, AgrReport, Coordinate, DiscountRateMode, LandValueRecord, Region, ValueSource,
};
pub use crate::domain::ports::{Geocoder, LandValueSource};
pub use crate::utils::error::Result;

use crate::domain::model::{Coordinate, Region};

pub const DEFAULT_BOUNDARY_LATITUDE: f64 = 55.9;
pub const DEFAULT_NORTH_REGION: &str = "Edinburgh";
pub const DEFAULT_SOUTH_REGION: &str = "Highlands";

/// Maps a coordinate to a coarse region by a single latitude cut.
///
/// This is a placeholder boundary, not a geographic lookup: everything strictly
/// north of `boundary_latitude` is the north region, everything else (the
/// boundary itself included) is the south region.
#[derive(Debug, Clone)]
pub struct AreaResolver {
    boundary_latitude: f64,
    north: Region,
    south: Region,
}

impl AreaResolver {
    pub fn new(boundary_latitude: f64, north: Region, south: Region) -> Self {
        Self {
            boundary_latitude,
            north,
            south,
        }
    }

    pub fn resolve(&self, coordinate: &Coordinate) -> Region {
        if coordinate.lat > self.boundary_latitude {
            self.north.clone()
        } else {
            self.south.clone()
        }
    }

    pub fn regions(&self) -> [&Region; 2] {
        [&self.north, &self.south]
    }
}

impl Default for AreaResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_BOUNDARY_LATITUDE,
            Region::new(DEFAULT_NORTH_REGION),
            Region::new(DEFAULT_SOUTH_REGION),
        )
    }
}

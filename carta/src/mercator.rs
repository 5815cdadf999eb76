//! Spherical web-mercator projection math and world-space constants.
//!
//! Projected meters form a 2D coordinate system with the origin at longitude
//! and latitude zero, x growing east and y growing north. Tiles are addressed
//! from the top-left corner of projection space, with `2^z` tiles per axis at
//! zoom `z`.

use nalgebra::{Point2, Vector2};

use crate::tile_id::TileID;

/// Equatorial radius of the WGS84 ellipsoid, in meters.
pub const EARTH_RADIUS_M: f64 = 6378137.0;

/// Half the length of the equator, in meters.
pub const EARTH_HALF_CIRCUMFERENCE_M: f64 = std::f64::consts::PI * EARTH_RADIUS_M;

/// Length of the equator, in meters.
pub const EARTH_CIRCUMFERENCE_M: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M;

/// Northern/southern latitude limit of the square mercator world.
pub const MAX_LATITUDE_DEGREES: f64 = 85.051_128_78;

/// Width and height of a map tile, in logical pixels.
pub const TILE_SIZE: f64 = 256.0;

/// A geographic position as longitude and latitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LngLat {
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Latitude in degrees, positive north.
    pub latitude: f64,
}

impl LngLat {
    /// Creates a new position from longitude and latitude in degrees.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns the same position with the longitude wrapped into [-180, 180).
    pub fn wrapped(self) -> Self {
        let longitude = self.longitude - (self.longitude / 360.0).round() * 360.0;
        Self {
            longitude,
            latitude: self.latitude,
        }
    }
}

/// An axis-aligned rectangle in projected meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedBounds {
    /// South-west corner.
    pub min: Point2<f64>,
    /// North-east corner.
    pub max: Point2<f64>,
}

impl ProjectedBounds {
    /// Creates bounds from the south-west and north-east corners.
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Returns true if the two rectangles share any area or edge.
    pub fn intersects(&self, other: ProjectedBounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Projects a geographic position into projected meters.
///
/// The latitude is clamped to the mercator range so that the result is
/// always finite.
pub fn lng_lat_to_projected_meters(lng_lat: LngLat) -> Point2<f64> {
    let latitude = lng_lat.latitude.clamp(-MAX_LATITUDE_DEGREES, MAX_LATITUDE_DEGREES);
    let x = lng_lat.longitude * EARTH_HALF_CIRCUMFERENCE_M / 180.0;
    let y = (std::f64::consts::FRAC_PI_4 + latitude.to_radians() * 0.5).tan().ln() * EARTH_RADIUS_M;
    Point2::new(x, y)
}

/// Inverse of [`lng_lat_to_projected_meters`].
pub fn projected_meters_to_lng_lat(meters: Point2<f64>) -> LngLat {
    let longitude = meters.x * 180.0 / EARTH_HALF_CIRCUMFERENCE_M;
    let latitude =
        (2.0 * (meters.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    LngLat {
        longitude,
        latitude,
    }
}

/// Side length of one tile at the given zoom, in projected meters.
pub fn meters_per_tile_at_zoom(zoom: i32) -> f64 {
    EARTH_CIRCUMFERENCE_M * (-f64::from(zoom)).exp2()
}

/// South-west corner of a tile, in projected meters.
pub fn tile_south_west_corner(tile: TileID) -> Point2<f64> {
    let meters_per_tile = meters_per_tile_at_zoom(i32::from(tile.z));
    Point2::new(
        f64::from(tile.x) * meters_per_tile - EARTH_HALF_CIRCUMFERENCE_M,
        EARTH_HALF_CIRCUMFERENCE_M - f64::from(tile.y + 1) * meters_per_tile,
    )
}

/// Center of a tile, in projected meters.
pub fn tile_center(tile: TileID) -> Point2<f64> {
    let meters_per_tile = meters_per_tile_at_zoom(i32::from(tile.z));
    tile_south_west_corner(tile) + Vector2::new(meters_per_tile * 0.5, meters_per_tile * 0.5)
}

/// Bounding rectangle of a tile, in projected meters.
pub fn tile_bounds(tile: TileID) -> ProjectedBounds {
    let meters_per_tile = meters_per_tile_at_zoom(i32::from(tile.z));
    let sw = tile_south_west_corner(tile);
    ProjectedBounds::new(sw, sw + Vector2::new(meters_per_tile, meters_per_tile))
}

/// Bounds of the whole projected world.
pub fn map_projected_meters_bounds() -> ProjectedBounds {
    ProjectedBounds::new(
        Point2::new(-EARTH_HALF_CIRCUMFERENCE_M, -EARTH_HALF_CIRCUMFERENCE_M),
        Point2::new(EARTH_HALF_CIRCUMFERENCE_M, EARTH_HALF_CIRCUMFERENCE_M),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn origin_projects_to_origin() {
        let meters = lng_lat_to_projected_meters(LngLat::new(0.0, 0.0));
        assert_relative_eq!(meters.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(meters.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn projection_round_trips() {
        for &(lng, lat) in &[(13.4, 52.5), (-122.42, 37.77), (179.9, -45.0), (-179.9, 80.0)] {
            let back = projected_meters_to_lng_lat(lng_lat_to_projected_meters(LngLat::new(lng, lat)));
            assert_relative_eq!(back.longitude, lng, epsilon = 1e-9);
            assert_relative_eq!(back.latitude, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn mercator_world_is_square() {
        let top = lng_lat_to_projected_meters(LngLat::new(0.0, MAX_LATITUDE_DEGREES));
        assert_relative_eq!(top.y, EARTH_HALF_CIRCUMFERENCE_M, epsilon = 1.0);

        let east = lng_lat_to_projected_meters(LngLat::new(180.0, 0.0));
        assert_relative_eq!(east.x, EARTH_HALF_CIRCUMFERENCE_M, epsilon = 1e-6);
    }

    #[test]
    fn wrapping_normalizes_longitude() {
        assert_relative_eq!(LngLat::new(190.0, 0.0).wrapped().longitude, -170.0);
        assert_relative_eq!(LngLat::new(-541.0, 0.0).wrapped().longitude, 179.0);
        assert_relative_eq!(LngLat::new(179.9, 10.0).wrapped().longitude, 179.9);
    }

    #[test]
    fn root_tile_covers_the_world() {
        let bounds = tile_bounds(TileID::new(0, 0, 0));
        assert_relative_eq!(bounds.min.x, -EARTH_HALF_CIRCUMFERENCE_M);
        assert_relative_eq!(bounds.min.y, -EARTH_HALF_CIRCUMFERENCE_M);
        assert_relative_eq!(bounds.max.x, EARTH_HALF_CIRCUMFERENCE_M);
        assert_relative_eq!(bounds.max.y, EARTH_HALF_CIRCUMFERENCE_M);
    }

    #[test]
    fn tile_size_halves_with_each_zoom() {
        assert_relative_eq!(meters_per_tile_at_zoom(0), EARTH_CIRCUMFERENCE_M);
        assert_relative_eq!(meters_per_tile_at_zoom(3), EARTH_CIRCUMFERENCE_M / 8.0);
    }

    #[test]
    fn tile_bounds_partition_their_parent() {
        let parent = tile_bounds(TileID::new(2, 2, 2));
        let child = tile_bounds(TileID::new(4, 4, 3));
        assert!(parent.intersects(child));
        assert!(parent.contains(tile_center(TileID::new(4, 4, 3))));
    }
}

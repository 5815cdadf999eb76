//! Carta is a camera and visible-tile computation engine for tile-based
//! maps.
//!
//! The [`View`] owns the map camera (position, zoom, roll, pitch,
//! projection model and viewport) and derives everything a renderer needs
//! each frame:
//!
//! * view and projection matrices for three camera models (perspective,
//!   isometric and flat),
//! * conversion between screen pixels and geographic coordinates by casting
//!   rays against the ground plane,
//! * the exact set of map tiles, each tagged with a level of detail, that
//!   covers the visible area.
//!
//! ```
//! use carta::{LngLat, View};
//!
//! let mut view = View::new(800, 600);
//! view.set_center_coordinates(LngLat::new(13.4, 52.5));
//! view.set_zoom(10.0);
//! view.update(false);
//!
//! let mut tiles = Vec::new();
//! view.get_visible_tiles(|tile| tiles.push(tile));
//! assert!(!tiles.is_empty());
//! ```
//!
//! Tile fetching, caching and drawing are out of scope: the view only
//! determines *which* tile identifiers are currently needed, and makes no
//! assumption about how they are loaded.

mod cached;

pub mod camera;
pub mod error;
pub mod mercator;
pub mod rasterize;
pub mod stops;
pub mod tile_id;
pub mod view;

pub use camera::{Camera, CameraProjection, CameraType};
pub use error::CartaError;
pub use mercator::LngLat;
pub use stops::{Stops, ZoomDependent};
pub use tile_id::TileID;
pub use view::{GroundIntersection, View, ViewState, MAX_LOD};

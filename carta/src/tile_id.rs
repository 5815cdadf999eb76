//! Immutable identifiers for map tiles.

use std::cmp::Ordering;
use std::fmt;

/// An identifier for a map tile in a quad tree.
///
/// `x` counts from the left edge of projection space and `y` from the top
/// edge; `z` is the zoom level the tile's data is addressed at. `s` is the
/// source zoom the tile is styled/rendered at, which differs from `z` for
/// reduced-resolution (LOD) and over-zoomed proxy tiles.
///
/// Identifiers are ordered by `s` highest to lowest, then `z` highest to
/// lowest, then `x` and `y` lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileID {
    /// Column index from the left edge of projection space.
    pub x: i32,
    /// Row index from the top edge of projection space.
    pub y: i32,
    /// Zoom level the tile data is addressed at.
    pub z: i8,
    /// Source zoom the tile is displayed at.
    pub s: i8,
}

impl TileID {
    /// Creates a tile identifier displayed at its own zoom level.
    pub fn new(x: i32, y: i32, z: i8) -> Self {
        Self { x, y, z, s: z }
    }

    /// Creates a tile identifier with an explicit source zoom.
    pub fn new_with_source(x: i32, y: i32, z: i8, s: i8) -> Self {
        Self { x, y, z, s }
    }

    /// Returns true if the coordinates address an existing tile at zoom `z`.
    pub fn is_valid(&self) -> bool {
        let max = 1 << self.z;
        self.x >= 0 && self.x < max && self.y >= 0 && self.y < max && self.z >= 0
    }

    /// Like [`is_valid`](Self::is_valid), additionally bounded by a maximum zoom.
    pub fn is_valid_for(&self, max_zoom: i8) -> bool {
        self.is_valid() && self.z <= max_zoom
    }

    /// Re-addresses the tile at `max_zoom` if its data zoom exceeds it,
    /// keeping the source zoom.
    pub fn with_max_source_zoom(self, max_zoom: i8) -> Self {
        if self.z <= max_zoom {
            return self;
        }
        let over = i32::from(self.z - max_zoom);
        Self {
            x: self.x >> over,
            y: self.y >> over,
            z: max_zoom,
            s: self.s,
        }
    }

    /// The tile one zoom level up that contains this tile.
    ///
    /// An over-zoomed tile keeps its data coordinates and only steps its
    /// source zoom down.
    pub fn parent(self) -> Self {
        if self.s > self.z {
            return Self {
                x: self.x,
                y: self.y,
                z: self.z,
                s: self.s - 1,
            };
        }
        Self {
            x: self.x >> 1,
            y: self.y >> 1,
            z: self.z - 1,
            s: self.s - 1,
        }
    }

    /// One of the four children of this tile, with `index` in `0..4`,
    /// re-addressed through `max_zoom` when over-zoomed.
    ///
    /// Returns `None` for an out-of-range index.
    pub fn child(self, index: i32, max_zoom: i8) -> Option<Self> {
        if !(0..4).contains(&index) {
            return None;
        }
        let i = index / 2;
        let j = index % 2;
        let child = Self {
            x: (self.x << 1) + i,
            y: (self.y << 1) + j,
            z: self.z + 1,
            s: self.s + 1,
        };
        Some(child.with_max_source_zoom(max_zoom))
    }
}

impl Ord for TileID {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .s
            .cmp(&self.s)
            .then(other.z.cmp(&self.z))
            .then(self.x.cmp(&other.x))
            .then(self.y.cmp(&other.y))
    }
}

impl PartialOrd for TileID {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TileID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/s:{}", self.x, self.y, self.z, self.s)?;
        Ok(())
    }
}

//! Explicit coordinate-normalization context.

use crate::node::Position;

/// Offset and scale applied uniformly to every coordinate of a document.
///
/// Passed explicitly to every parse and convert call. Nothing in the
/// crate holds this as process state, so concurrent imports with
/// different contexts cannot interfere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImportContext {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Default for ImportContext {
    fn default() -> Self {
        ImportContext {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

impl ImportContext {
    /// Map an interchange location (stored `[y, x]`) to a canvas position.
    pub fn to_position(&self, location: [f64; 2]) -> Position {
        let [y, x] = location;

        Position {
            x: (x + self.offset_x) * self.safe_scale(),
            y: (y + self.offset_y) * self.safe_scale(),
        }
    }

    /// Inverse of [`to_position`](Self::to_position), back to `[y, x]`.
    pub fn to_location(&self, position: Position) -> [f64; 2] {
        [
            position.y / self.safe_scale() - self.offset_y,
            position.x / self.safe_scale() - self.offset_x,
        ]
    }

    // A zero scale would divide by zero on export; treat it as identity.
    fn safe_scale(&self) -> f64 {
        if self.scale == 0.0 {
            1.0
        } else {
            self.scale
        }
    }
}

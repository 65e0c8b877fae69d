use serde::Serialize;

use crate::error::{GridError, Result};

/// Pointer or cursor position in container-relative pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel rectangle for one tile, relative to the grid container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TileRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TileRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Edge-inclusive hit test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// Region to pack tiles into. Offsets place a sub-region inside the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ContainerBounds {
    pub width: f64,
    pub height: f64,
    pub offset_left: f64,
    pub offset_top: f64,
}

impl ContainerBounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset_left: 0.0,
            offset_top: 0.0,
        }
    }

    /// Validating constructor for measurements coming from the host.
    pub fn try_new(width: f64, height: f64) -> Result<Self> {
        let bounds = Self::new(width, height);
        if bounds.is_degenerate() {
            return Err(GridError::InvalidBounds { width, height });
        }
        Ok(bounds)
    }

    pub const fn with_offset(mut self, left: f64, top: f64) -> Self {
        self.offset_left = left;
        self.offset_top = top;
        self
    }

    /// Zero, negative or non-finite sizes cannot be laid out.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Round half up (towards positive infinity), matching browser layout math.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_edge_inclusive() {
        let rect = TileRect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(30.0, 30.0)));
        assert!(rect.contains(Point::new(20.0, 15.0)));
        assert!(!rect.contains(Point::new(30.5, 15.0)));
        assert!(!rect.contains(Point::new(15.0, 9.9)));
    }

    #[test]
    fn round_half_up_goes_towards_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(387.4), 387.0);
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        assert!(ContainerBounds::new(0.0, 600.0).is_degenerate());
        assert!(ContainerBounds::new(800.0, -1.0).is_degenerate());
        assert!(ContainerBounds::new(f64::NAN, 600.0).is_degenerate());
        assert!(ContainerBounds::try_new(800.0, 600.0).is_ok());
        assert!(matches!(
            ContainerBounds::try_new(0.0, 0.0),
            Err(GridError::InvalidBounds { .. })
        ));
    }
}

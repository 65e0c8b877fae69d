//! Aspect-ratio buckets and the per-bucket arrangement tables.
//!
//! Every sizing decision of the geometry engine is data in this module so the
//! policy can be inspected and tested without walking the solver.

use serde::Serialize;

use crate::geometry::ContainerBounds;

/// Widescreen tile aspect ratio.
pub const WIDESCREEN: f64 = 16.0 / 9.0;
/// Square tiles.
pub const SQUARE: f64 = 1.0;
/// Fill the box, ignore aspect ratio.
pub const FILL: f64 = 0.0;

/// Discrete classification of the container by its width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutBucket {
    Phone,
    Tablet,
    Desktop,
    Ultrawide,
    SuperUltrawide,
}

impl LayoutBucket {
    pub const ALL: [LayoutBucket; 5] = [
        LayoutBucket::Phone,
        LayoutBucket::Tablet,
        LayoutBucket::Desktop,
        LayoutBucket::Ultrawide,
        LayoutBucket::SuperUltrawide,
    ];

    pub fn classify(bounds: &ContainerBounds) -> Self {
        Self::from_aspect_ratio(bounds.aspect_ratio())
    }

    pub fn from_aspect_ratio(ratio: f64) -> Self {
        if ratio < 3.0 / 4.0 {
            LayoutBucket::Phone
        } else if ratio < 1.0 {
            LayoutBucket::Tablet
        } else if ratio < 17.0 / 9.0 {
            LayoutBucket::Desktop
        } else if ratio <= 32.0 / 9.0 {
            LayoutBucket::Ultrawide
        } else {
            LayoutBucket::SuperUltrawide
        }
    }

    /// Portrait buckets stack presenters above the secondary grid.
    pub fn is_portrait(self) -> bool {
        matches!(self, LayoutBucket::Phone | LayoutBucket::Tablet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutBucket::Phone => "phone",
            LayoutBucket::Tablet => "tablet",
            LayoutBucket::Desktop => "desktop",
            LayoutBucket::Ultrawide => "ultrawide",
            LayoutBucket::SuperUltrawide => "super_ultrawide",
        }
    }
}

/// How a band turns a tile count into columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    Fixed { columns: usize, rows: usize },
    /// One column, one row per tile.
    SingleColumn,
    /// One row, one column per tile.
    SingleRow,
    /// Fixed column count, rows grow with `ceil(n / columns)`.
    Columns(usize),
    /// Fixed row count, columns grow with `ceil(n / rows)`.
    Rows(usize),
}

impl Arrangement {
    pub fn resolve(self, tile_count: usize) -> (usize, usize) {
        match self {
            Arrangement::Fixed { columns, rows } => (columns, rows),
            Arrangement::SingleColumn => (1, tile_count),
            Arrangement::SingleRow => (tile_count, 1),
            Arrangement::Columns(columns) => (columns, tile_count.div_ceil(columns)),
            Arrangement::Rows(rows) => (tile_count.div_ceil(rows), rows),
        }
    }
}

/// One row of a lookup table: applies to counts up to and including `up_to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub up_to: usize,
    pub arrangement: Arrangement,
    pub aspect_ratio: f64,
}

const fn band(up_to: usize, arrangement: Arrangement, aspect_ratio: f64) -> Band {
    Band {
        up_to,
        arrangement,
        aspect_ratio,
    }
}

const fn fixed(columns: usize, rows: usize) -> Arrangement {
    Arrangement::Fixed { columns, rows }
}

const PHONE_GRID: &[Band] = &[
    band(1, fixed(1, 1), FILL),
    band(4, Arrangement::SingleColumn, WIDESCREEN),
    band(12, Arrangement::Columns(2), FILL),
    band(usize::MAX, Arrangement::Columns(3), SQUARE),
];

const TABLET_GRID: &[Band] = &[
    band(1, fixed(1, 1), FILL),
    band(4, Arrangement::SingleColumn, WIDESCREEN),
    band(12, Arrangement::Columns(2), WIDESCREEN),
    band(usize::MAX, Arrangement::Columns(3), SQUARE),
];

const DESKTOP_GRID: &[Band] = &[
    band(1, fixed(1, 1), WIDESCREEN),
    band(2, fixed(2, 1), WIDESCREEN),
    band(4, fixed(2, 2), FILL),
    band(6, fixed(3, 2), WIDESCREEN),
    band(8, fixed(4, 2), SQUARE),
    band(12, fixed(4, 3), SQUARE),
    band(usize::MAX, Arrangement::Columns(4), WIDESCREEN),
];

const ULTRAWIDE_GRID: &[Band] = &[
    band(1, fixed(1, 1), WIDESCREEN),
    band(2, fixed(2, 1), WIDESCREEN),
    band(4, fixed(2, 2), WIDESCREEN),
    band(6, fixed(3, 2), WIDESCREEN),
    band(8, fixed(4, 2), WIDESCREEN),
    band(12, fixed(4, 3), WIDESCREEN),
    band(usize::MAX, Arrangement::Columns(4), WIDESCREEN),
];

const SUPER_ULTRAWIDE_GRID: &[Band] = &[
    band(6, Arrangement::SingleRow, WIDESCREEN),
    band(usize::MAX, Arrangement::Rows(2), WIDESCREEN),
];

/// Secondary grid below the presenters on portrait containers, for three or
/// more secondary tiles. Fewer tiles are handled by [`portrait_secondary`].
const PORTRAIT_SECONDARY: &[Band] = &[
    band(4, fixed(2, 2), WIDESCREEN),
    band(6, fixed(2, 3), WIDESCREEN),
    band(9, fixed(3, 3), WIDESCREEN),
    band(usize::MAX, fixed(4, 3), WIDESCREEN),
];

/// Resolved columns, rows and tile aspect ratio for one sub-grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
    pub aspect_ratio: f64,
}

impl GridShape {
    pub const EMPTY: GridShape = GridShape {
        columns: 0,
        rows: 0,
        aspect_ratio: WIDESCREEN,
    };

    pub const fn new(columns: usize, rows: usize, aspect_ratio: f64) -> Self {
        Self {
            columns,
            rows,
            aspect_ratio,
        }
    }
}

fn lookup(table: &[Band], tile_count: usize) -> GridShape {
    let band = table
        .iter()
        .find(|band| tile_count <= band.up_to)
        .or_else(|| table.last())
        .copied()
        .unwrap_or(band(usize::MAX, fixed(1, 1), WIDESCREEN));
    let (columns, rows) = band.arrangement.resolve(tile_count);
    GridShape::new(columns, rows, band.aspect_ratio)
}

/// Arrangement table used when no tile is pinned.
pub fn grid_table(bucket: LayoutBucket) -> &'static [Band] {
    match bucket {
        LayoutBucket::Phone => PHONE_GRID,
        LayoutBucket::Tablet => TABLET_GRID,
        LayoutBucket::Desktop => DESKTOP_GRID,
        LayoutBucket::Ultrawide => ULTRAWIDE_GRID,
        LayoutBucket::SuperUltrawide => SUPER_ULTRAWIDE_GRID,
    }
}

/// Shape of the full grid when there are no presenters.
pub fn grid_shape(bucket: LayoutBucket, tile_count: usize) -> GridShape {
    lookup(grid_table(bucket), tile_count)
}

/// Shape of the presenter region.
pub fn presenter_shape(bucket: LayoutBucket, presenter_count: usize) -> GridShape {
    match bucket {
        LayoutBucket::Phone | LayoutBucket::Tablet if presenter_count > 2 => {
            GridShape::new(2, 2, FILL)
        }
        LayoutBucket::Phone | LayoutBucket::Tablet => {
            GridShape::new(1, presenter_count, WIDESCREEN)
        }
        LayoutBucket::Desktop => GridShape::new(1, presenter_count, FILL),
        LayoutBucket::Ultrawide | LayoutBucket::SuperUltrawide => {
            GridShape::new(1, presenter_count, WIDESCREEN)
        }
    }
}

/// Shape of the secondary region next to (or below) the presenters.
pub fn secondary_shape(
    bucket: LayoutBucket,
    presenter_count: usize,
    secondary_count: usize,
) -> GridShape {
    match side_column_capacity(bucket) {
        None => portrait_secondary(presenter_count, secondary_count),
        Some(_) if secondary_count == 0 => GridShape::EMPTY,
        Some(per_column) => {
            let columns = secondary_count.div_ceil(per_column);
            let rows = secondary_count.div_ceil(columns);
            GridShape::new(columns, rows, WIDESCREEN)
        }
    }
}

/// Tiles stacked per column in the side strip of landscape containers.
pub fn side_column_capacity(bucket: LayoutBucket) -> Option<usize> {
    match bucket {
        LayoutBucket::Phone | LayoutBucket::Tablet => None,
        LayoutBucket::Desktop => Some(6),
        LayoutBucket::Ultrawide => Some(4),
        LayoutBucket::SuperUltrawide => Some(3),
    }
}

fn portrait_secondary(presenter_count: usize, secondary_count: usize) -> GridShape {
    if secondary_count >= 3 {
        return lookup(PORTRAIT_SECONDARY, secondary_count);
    }

    if presenter_count == 1 {
        GridShape::new(1, secondary_count, WIDESCREEN)
    } else {
        GridShape::new(secondary_count, 1, FILL)
    }
}

//! Sub-grid packer - places a homogeneous run of tiles on a fixed column/row grid.
//!
//! The region is divided into `columns x rows` boxes separated by [`GRID_GAP`].
//! Each tile is fitted into its box (optionally preserving an aspect ratio),
//! the whole block is centered inside the region, and an incomplete last row
//! is shifted so it sits centered rather than left-aligned.
//!
//! # Example
//! ```
//! use callgrid::ContainerBounds;
//! use callgrid::layout::grid::pack_sub_grid;
//!
//! let rects = pack_sub_grid(4, 2, 2, 0.0, &ContainerBounds::new(800.0, 600.0));
//! assert_eq!(rects.len(), 4);
//! assert_eq!(rects[0].width, 388.0);
//! assert_eq!(rects[0].height, 288.0);
//! ```

use crate::geometry::{ContainerBounds, TileRect, round_half_up};

/// Spacing between tiles and around the outer edge, in pixels.
pub const GRID_GAP: f64 = 8.0;

/// Pack `tile_count` tiles into `region` on a `column_count x row_count` grid.
///
/// A `tile_aspect_ratio` of `0.0` makes every tile fill its box exactly.
pub fn pack_sub_grid(
    tile_count: usize,
    column_count: usize,
    row_count: usize,
    tile_aspect_ratio: f64,
    region: &ContainerBounds,
) -> Vec<TileRect> {
    if tile_count == 0 || column_count == 0 || row_count == 0 {
        return Vec::new();
    }

    let gap = GRID_GAP;
    let columns = column_count as f64;
    let rows = row_count as f64;
    let region_width = region.width;
    let region_height = region.height;

    let box_width = round_half_up((region_width - gap * (columns + 1.0)) / columns).max(0.0);
    let box_height = round_half_up((region_height - gap * (rows + 1.0)) / rows).max(0.0);

    let (tile_width, tile_height) = fit_tile(box_width, box_height, tile_aspect_ratio);

    let padding_top = (region_height - tile_height * rows - gap * (rows - 1.0)) / 2.0;
    let padding_left = (region_width - tile_width * columns - gap * (columns - 1.0)) / 2.0;

    let remainder = tile_count % column_count;
    let mut rects = Vec::with_capacity(tile_count);

    for index in 0..tile_count {
        let row = index / column_count;
        let column = index % column_count;

        let top = region.offset_top + row as f64 * (tile_height + gap) + padding_top;

        let row_item_count = if row + 1 == row_count && remainder != 0 {
            remainder
        } else {
            column_count
        };

        let centering = if row_item_count < column_count {
            let items = row_item_count as f64;
            // The `- 1` binds to the gap product, not the whole span.
            round_half_up(
                (region_width - (tile_width * items + (gap * items - 1.0) + padding_left * 2.0))
                    / 2.0,
            )
        } else {
            0.0
        };

        let left = region.offset_left
            + padding_left
            + centering
            + gap * column as f64
            + tile_width * column as f64;

        rects.push(TileRect::new(left, top, tile_width, tile_height));
    }

    rects
}

fn fit_tile(box_width: f64, box_height: f64, aspect_ratio: f64) -> (f64, f64) {
    if aspect_ratio <= 0.0 {
        return (box_width, box_height);
    }

    if box_width == 0.0 || box_height == 0.0 {
        return (0.0, 0.0);
    }

    if box_width / box_height > aspect_ratio {
        (box_height * aspect_ratio, box_height)
    } else {
        (box_width, box_width / aspect_ratio)
    }
}

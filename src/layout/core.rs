use serde::Serialize;
use serde_json::json;

use crate::geometry::{ContainerBounds, TileRect, round_half_up};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};

use super::bucket::{
    GridShape, LayoutBucket, grid_shape, presenter_shape, secondary_shape,
};
use super::grid::pack_sub_grid;

/// Largest tile count the arrangement tables are tuned for.
pub const MAX_SUPPORTED_TILES: usize = 12;
/// Largest presenter count the split tables are tuned for.
pub const MAX_SUPPORTED_PRESENTERS: usize = 3;

/// Share of the container width given to presenters on landscape buckets.
const PRESENTER_WIDTH_SHARE: f64 = 2.0 / 3.0;

/// A configuration outside the tuned tables. Layout still proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Unsupported {
    pub tile_count: usize,
    pub presenter_count: usize,
    pub too_many_tiles: bool,
    pub too_many_presenters: bool,
}

pub fn unsupported_configuration(tile_count: usize, presenter_count: usize) -> Option<Unsupported> {
    let too_many_tiles = tile_count > MAX_SUPPORTED_TILES;
    let too_many_presenters = presenter_count > MAX_SUPPORTED_PRESENTERS;
    (too_many_tiles || too_many_presenters).then_some(Unsupported {
        tile_count,
        presenter_count,
        too_many_tiles,
        too_many_presenters,
    })
}

/// Compute one rect per tile. Presenters occupy the first `presenter_count`
/// positions and their rects come first in the output.
///
/// Degenerate bounds yield zero rects so callers keep one rect per tile
/// until a real measurement arrives.
pub fn compute_layout(
    tile_count: usize,
    bounds: &ContainerBounds,
    presenter_count: usize,
) -> Vec<TileRect> {
    if tile_count == 0 {
        return Vec::new();
    }

    if bounds.is_degenerate() {
        return vec![TileRect::default(); tile_count];
    }

    let bucket = LayoutBucket::classify(bounds);
    let presenter_count = presenter_count.min(tile_count);

    if presenter_count == 0 {
        let shape = grid_shape(bucket, tile_count);
        return pack(tile_count, shape, bounds);
    }

    let secondary_count = tile_count - presenter_count;
    let presenter = presenter_shape(bucket, presenter_count);
    let secondary = secondary_shape(bucket, presenter_count, secondary_count);
    let (presenter_region, secondary_region) = split_regions(bucket, bounds, presenter, secondary);

    let mut rects = pack(presenter_count, presenter, &presenter_region);
    rects.extend(pack(secondary_count, secondary, &secondary_region));
    rects
}

/// Same as [`compute_layout`], warning through `logger` on unsupported input.
pub fn compute_layout_logged(
    tile_count: usize,
    bounds: &ContainerBounds,
    presenter_count: usize,
    logger: Option<&Logger>,
) -> Vec<TileRect> {
    if let (Some(logger), Some(unsupported)) = (
        logger,
        unsupported_configuration(tile_count, presenter_count),
    ) {
        let event = event_with_fields(
            LogLevel::Warn,
            "callgrid::layout",
            "unsupported_configuration",
            [
                json_kv("tile_count", json!(unsupported.tile_count)),
                json_kv("presenter_count", json!(unsupported.presenter_count)),
                json_kv("too_many_tiles", json!(unsupported.too_many_tiles)),
                json_kv("too_many_presenters", json!(unsupported.too_many_presenters)),
            ],
        );
        let _ = logger.log_event(event);
    }

    compute_layout(tile_count, bounds, presenter_count)
}

fn pack(tile_count: usize, shape: GridShape, region: &ContainerBounds) -> Vec<TileRect> {
    pack_sub_grid(
        tile_count,
        shape.columns,
        shape.rows,
        shape.aspect_ratio,
        region,
    )
}

/// Split the container into the presenter region and the secondary region.
fn split_regions(
    bucket: LayoutBucket,
    bounds: &ContainerBounds,
    presenter: GridShape,
    secondary: GridShape,
) -> (ContainerBounds, ContainerBounds) {
    let origin_left = bounds.offset_left;
    let origin_top = bounds.offset_top;

    if bucket.is_portrait() {
        let presenter_height = portrait_presenter_height(bounds.height, presenter.rows, secondary.rows);
        let presenter_region =
            ContainerBounds::new(bounds.width, presenter_height).with_offset(origin_left, origin_top);
        let secondary_region = ContainerBounds::new(bounds.width, bounds.height - presenter_height)
            .with_offset(origin_left, origin_top + presenter_height);
        return (presenter_region, secondary_region);
    }

    let presenter_width = bounds.width * PRESENTER_WIDTH_SHARE;
    let presenter_region =
        ContainerBounds::new(presenter_width, bounds.height).with_offset(origin_left, origin_top);
    let secondary_region = ContainerBounds::new(bounds.width - presenter_width, bounds.height)
        .with_offset(origin_left + presenter_width, origin_top);
    (presenter_region, secondary_region)
}

/// Presenters get more of the height the fewer secondary rows compete for it.
fn portrait_presenter_height(height: f64, presenter_rows: usize, secondary_rows: usize) -> f64 {
    let competing = secondary_rows.saturating_sub(1);
    let divisor = (presenter_rows + 2).saturating_sub(competing).max(2);
    round_half_up(height * (1.0 - 1.0 / divisor as f64))
}

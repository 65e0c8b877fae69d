//! Drag-to-reorder controller.
//!
//! A drag is an explicit [`DragState`] value threaded through [`reduce`]. Each
//! gesture event is fully reduced before the next one is looked at, so a
//! burst of move events never queues up.
//!
//! While a tile is dragged the cursor is tested against the current rects;
//! the first other tile under the cursor swaps places with the dragged one
//! (array move) and the two exchange presenter flags, so pinning follows the
//! grid position rather than the participant.

use serde::Serialize;

use crate::geometry::{Point, TileRect};
use crate::tiles::{ParticipantId, Tile, index_of, sort_presenters_first};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

/// One pointer-drag sample bound to the tile it started on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gesture {
    pub phase: GesturePhase,
    pub key: ParticipantId,
    /// Pointer position in page coordinates.
    pub position: Point,
    /// Movement since the gesture started.
    pub movement: Point,
}

impl Gesture {
    pub fn new(phase: GesturePhase, key: impl Into<ParticipantId>, position: Point, movement: Point) -> Self {
        Self {
            phase,
            key: key.into(),
            position,
            movement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragState {
    pub dragged_key: ParticipantId,
    /// Rect of the dragged tile when the gesture started.
    pub origin_rect: TileRect,
    pub pointer_offset: Point,
}

impl DragState {
    /// Where the lifted tile is drawn: its start position plus pointer travel.
    pub fn lifted_position(&self) -> Point {
        Point::new(
            self.origin_rect.x + self.pointer_offset.x,
            self.origin_rect.y + self.pointer_offset.y,
        )
    }
}

/// Output of reducing one gesture event.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStep {
    pub state: Option<DragState>,
    /// New tile order when the event caused a reorder.
    pub reordered: Option<Vec<Tile>>,
}

impl DragStep {
    fn idle(state: Option<DragState>) -> Self {
        Self {
            state,
            reordered: None,
        }
    }
}

/// Begin dragging `key`. Returns `None` for keys that are no longer tiled.
pub fn start(tiles: &[Tile], rects: &[TileRect], key: &ParticipantId) -> Option<DragState> {
    let index = index_of(tiles, key)?;
    let origin_rect = rects.get(index).copied()?;
    Some(DragState {
        dragged_key: key.clone(),
        origin_rect,
        pointer_offset: Point::default(),
    })
}

/// First tile other than `dragged` whose rect contains `cursor`.
pub fn hover_target(
    tiles: &[Tile],
    rects: &[TileRect],
    dragged: &ParticipantId,
    cursor: Point,
) -> Option<usize> {
    tiles
        .iter()
        .zip(rects)
        .position(|(tile, rect)| &tile.key != dragged && rect.contains(cursor))
}

/// Move the element at `from` so it ends up at `to`, shifting the rest.
pub fn move_tile(tiles: &[Tile], from: usize, to: usize) -> Vec<Tile> {
    let mut next = tiles.to_vec();
    if from >= next.len() || to >= next.len() || from == to {
        return next;
    }
    let tile = next.remove(from);
    next.insert(to, tile);
    next
}

/// Move the dragged tile onto the hover position and swap presenter flags.
pub fn reorder(tiles: &[Tile], from: usize, to: usize) -> Vec<Tile> {
    let (Some(dragged), Some(hovered)) = (tiles.get(from), tiles.get(to)) else {
        return tiles.to_vec();
    };
    let dragged_key = dragged.key.clone();
    let hovered_key = hovered.key.clone();
    let dragged_presenter = dragged.presenter;
    let hovered_presenter = hovered.presenter;

    let mut next = move_tile(tiles, from, to);
    for (slot, tile) in next.iter_mut().enumerate() {
        if tile.key == dragged_key {
            tile.presenter = hovered_presenter;
        } else if tile.key == hovered_key {
            tile.presenter = dragged_presenter;
        }
        tile.slot = slot as u64;
    }
    sort_presenters_first(&mut next);
    next
}

/// Reduce one gesture event against the current tiles and rects.
///
/// `origin` is the container's page position, used to turn the pointer into
/// container-relative coordinates.
pub fn reduce(
    state: Option<DragState>,
    gesture: &Gesture,
    tiles: &[Tile],
    rects: &[TileRect],
    origin: Point,
) -> DragStep {
    match gesture.phase {
        GesturePhase::Start => {
            let state = start(tiles, rects, &gesture.key).map(|mut state| {
                state.pointer_offset = gesture.movement;
                state
            });
            DragStep::idle(state)
        }
        GesturePhase::Move => {
            let current = match state {
                Some(state) if state.dragged_key == gesture.key => Some(state),
                Some(other) => return DragStep::idle(Some(other)),
                // Hosts may skip the start sample; the first move lifts the tile.
                None => start(tiles, rects, &gesture.key),
            };
            let Some(mut state) = current else {
                return DragStep::idle(None);
            };
            let Some(from) = index_of(tiles, &state.dragged_key) else {
                return DragStep::idle(None);
            };
            state.pointer_offset = gesture.movement;

            let cursor = Point::new(gesture.position.x - origin.x, gesture.position.y - origin.y);
            let reordered = hover_target(tiles, rects, &state.dragged_key, cursor)
                .map(|to| reorder(tiles, from, to));

            DragStep {
                state: Some(state),
                reordered,
            }
        }
        GesturePhase::End => DragStep::idle(None),
    }
}

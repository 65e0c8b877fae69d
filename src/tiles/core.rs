use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Stable participant identifier; doubles as the tile key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Media state reported by the participant feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub audio_muted: bool,
    pub video_muted: bool,
    pub speaking: bool,
    pub has_stream: bool,
}

/// One entry of the participant feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display: DisplayState,
}

impl Participant {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            display: DisplayState::default(),
        }
    }

    pub fn with_display(mut self, display: DisplayState) -> Self {
        self.display = display;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TilePhase {
    Active,
    Exiting,
}

/// A participant's place in the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub key: ParticipantId,
    pub participant: Participant,
    pub presenter: bool,
    pub pending_removal: bool,
    /// Ordering among tiles with the same presenter flag.
    pub slot: u64,
}

impl Tile {
    pub fn new(participant: Participant, slot: u64) -> Self {
        Self {
            key: participant.id.clone(),
            participant,
            presenter: false,
            pending_removal: false,
            slot,
        }
    }

    pub fn phase(&self) -> TilePhase {
        if self.pending_removal {
            TilePhase::Exiting
        } else {
            TilePhase::Active
        }
    }
}

/// Result of diffing the tile list against the participant feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub tiles: Vec<Tile>,
    /// Keys of tiles created in this pass.
    pub entered: Vec<ParticipantId>,
    /// Keys of tiles flagged for removal after this pass.
    pub exited: Vec<ParticipantId>,
}

/// Presenters first, then by slot. Equivalent to a stable sort on the
/// presenter flag as long as the list is kept in slot order.
pub fn sort_presenters_first(tiles: &mut [Tile]) {
    tiles.sort_by_key(|tile| (!tile.presenter, tile.slot));
}

pub fn presenter_count(tiles: &[Tile]) -> usize {
    tiles.iter().filter(|tile| tile.presenter).count()
}

pub fn index_of(tiles: &[Tile], key: &ParticipantId) -> Option<usize> {
    tiles.iter().position(|tile| &tile.key == key)
}

/// Diff `current` against `incoming`.
///
/// Present participants keep their tile and presenter flag, missing ones are
/// flagged for removal but stay in the list, and new ones are appended.
pub fn reconcile(current: &[Tile], incoming: &[Participant]) -> Reconciliation {
    let mut next_slot = current
        .iter()
        .map(|tile| tile.slot + 1)
        .max()
        .unwrap_or(0);

    let mut tiles = Vec::with_capacity(current.len() + incoming.len());
    let mut exited = Vec::new();
    let mut seen: HashSet<&ParticipantId> = HashSet::with_capacity(current.len());

    for tile in current {
        seen.insert(&tile.key);
        match incoming.iter().find(|p| p.id == tile.key) {
            Some(participant) => tiles.push(Tile {
                participant: participant.clone(),
                pending_removal: false,
                ..tile.clone()
            }),
            None => {
                exited.push(tile.key.clone());
                tiles.push(Tile {
                    pending_removal: true,
                    ..tile.clone()
                });
            }
        }
    }

    let mut entered = Vec::new();
    for participant in incoming {
        if !seen.insert(&participant.id) {
            continue;
        }
        entered.push(participant.id.clone());
        tiles.push(Tile::new(participant.clone(), next_slot));
        next_slot += 1;
    }

    sort_presenters_first(&mut tiles);

    Reconciliation {
        tiles,
        entered,
        exited,
    }
}

/// Flip one tile's presenter flag. Unknown keys leave the list unchanged.
pub fn toggle_presenter(tiles: &[Tile], key: &ParticipantId) -> Vec<Tile> {
    let mut next = tiles.to_vec();
    if let Some(tile) = next.iter_mut().find(|tile| &tile.key == key) {
        tile.presenter = !tile.presenter;
        sort_presenters_first(&mut next);
    }
    next
}

/// Drop tiles named in `keys` that are still waiting for removal.
///
/// `keys` is a snapshot taken when the removal was scheduled; a participant
/// that came back in the meantime is no longer pending and is kept.
pub fn purge(tiles: &[Tile], keys: &[ParticipantId]) -> Vec<Tile> {
    tiles
        .iter()
        .filter(|tile| !(tile.pending_removal && keys.contains(&tile.key)))
        .cloned()
        .collect()
}

use std::collections::{HashMap, HashSet};

use blake3::Hash;
use serde::Serialize;

use crate::render::{SpringTarget, TileFrame};
use crate::tiles::{Participant, ParticipantId};

#[derive(Serialize)]
struct FrameFingerprint<'a> {
    spring: &'a SpringTarget,
    participant: &'a Participant,
    presenter: bool,
}

fn fingerprint<A>(frame: &TileFrame<A>) -> Hash {
    let view = FrameFingerprint {
        spring: &frame.spring,
        participant: &frame.participant,
        presenter: frame.presenter,
    };
    // Serializing plain data structs into a Vec cannot fail.
    let bytes = serde_json::to_vec(&view).unwrap_or_default();
    blake3::hash(&bytes)
}

/// Remembers the last frame handed to the renderer per tile so unchanged
/// tiles are not re-sent.
#[derive(Debug, Default)]
pub struct FrameRegistry {
    hashes: HashMap<ParticipantId, Hash>,
    dirty: HashSet<ParticipantId>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest frames. Returns the keys whose frame changed, in
    /// frame order. Tiles missing from `frames` are forgotten.
    pub fn sync<A>(&mut self, frames: &[TileFrame<A>]) -> Vec<ParticipantId> {
        let mut changed = Vec::new();

        for frame in frames {
            let hash = fingerprint(frame);
            let previous = self.hashes.insert(frame.key.clone(), hash);
            if previous != Some(hash) {
                self.dirty.insert(frame.key.clone());
                changed.push(frame.key.clone());
            }
        }

        let live: HashSet<&ParticipantId> = frames.iter().map(|frame| &frame.key).collect();
        self.hashes.retain(|key, _| live.contains(key));
        self.dirty.retain(|key| live.contains(key));

        changed
    }

    /// Frames whose content changed since the last call, in frame order.
    pub fn take_dirty<A: Clone>(&mut self, frames: &[TileFrame<A>]) -> Vec<TileFrame<A>> {
        self.sync(frames);
        let dirty: Vec<_> = frames
            .iter()
            .filter(|frame| self.dirty.contains(&frame.key))
            .cloned()
            .collect();
        self.dirty.clear();
        dirty
    }

    pub fn is_tracked(&self, key: &ParticipantId) -> bool {
        self.hashes.contains_key(key)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TileRect;
    use crate::render::{NoAvatars, build_frames};
    use crate::tiles::{Participant, reconcile};

    fn frames(rects: &[TileRect]) -> Vec<TileFrame<()>> {
        let tiles = reconcile(&[], &[Participant::new("a"), Participant::new("b")]).tiles;
        build_frames(&tiles, rects, None, &NoAvatars)
    }

    #[test]
    fn new_frames_are_dirty_once() {
        let rects = [
            TileRect::new(0.0, 0.0, 10.0, 10.0),
            TileRect::new(20.0, 0.0, 10.0, 10.0),
        ];
        let mut registry = FrameRegistry::new();

        assert_eq!(registry.take_dirty(&frames(&rects)).len(), 2);
        assert!(registry.take_dirty(&frames(&rects)).is_empty());
        assert!(!registry.has_dirty());
    }

    #[test]
    fn only_moved_tiles_are_reported() {
        let mut registry = FrameRegistry::new();
        registry.take_dirty(&frames(&[
            TileRect::new(0.0, 0.0, 10.0, 10.0),
            TileRect::new(20.0, 0.0, 10.0, 10.0),
        ]));

        let changed = registry.sync(&frames(&[
            TileRect::new(0.0, 0.0, 10.0, 10.0),
            TileRect::new(40.0, 0.0, 10.0, 10.0),
        ]));
        assert_eq!(changed, vec![ParticipantId::from("b")]);
    }

    #[test]
    fn departed_tiles_are_forgotten() {
        let mut registry = FrameRegistry::new();
        let all = frames(&[
            TileRect::new(0.0, 0.0, 10.0, 10.0),
            TileRect::new(20.0, 0.0, 10.0, 10.0),
        ]);
        registry.sync(&all);
        registry.sync(&all[..1]);

        assert!(registry.is_tracked(&"a".into()));
        assert!(!registry.is_tracked(&"b".into()));
    }
}

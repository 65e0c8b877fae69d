use serde::Serialize;

use crate::drag::DragState;
use crate::geometry::TileRect;
use crate::tiles::{Participant, ParticipantId, Tile};

const LIFTED_SCALE: f64 = 1.1;
const LIFTED_SHADOW: f64 = 15.0;
const RESTING_SHADOW: f64 = 1.0;

/// Animated properties of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileStyle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub opacity: f64,
    pub z_index: i32,
    pub shadow: f64,
}

impl TileStyle {
    /// CSS `box-shadow` value for the current elevation.
    pub fn box_shadow(&self) -> String {
        format!(
            "rgba(0, 0, 0, 0.5) 0px {}px {}px 0px",
            self.shadow,
            2.0 * self.shadow
        )
    }
}

/// Starting values for tiles that have just been mounted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnterFrom {
    pub scale: f64,
    pub opacity: f64,
}

impl Default for EnterFrom {
    fn default() -> Self {
        Self {
            scale: 0.0,
            opacity: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatedField {
    X,
    Y,
    ZIndex,
}

/// Declarative spring target; the host owns the animation clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpringTarget {
    pub from: EnterFrom,
    pub to: TileStyle,
    /// Fields that jump to `to` without animating.
    pub immediate: Vec<AnimatedField>,
    pub reset: bool,
}

impl SpringTarget {
    pub fn is_immediate(&self, field: AnimatedField) -> bool {
        self.immediate.contains(&field)
    }
}

/// Spring target for a tile resting at its computed rect.
pub fn resting_target(rect: &TileRect, pending_removal: bool) -> SpringTarget {
    let visible = if pending_removal { 0.0 } else { 1.0 };
    SpringTarget {
        from: EnterFrom::default(),
        to: TileStyle {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            scale: visible,
            opacity: visible,
            z_index: 0,
            shadow: RESTING_SHADOW,
        },
        immediate: vec![AnimatedField::ZIndex],
        reset: false,
    }
}

/// Spring target for the tile under the pointer.
pub fn lifted_target(rect: &TileRect, drag: &DragState) -> SpringTarget {
    let position = drag.lifted_position();
    SpringTarget {
        from: EnterFrom::default(),
        to: TileStyle {
            x: position.x,
            y: position.y,
            width: rect.width,
            height: rect.height,
            scale: LIFTED_SCALE,
            opacity: 1.0,
            z_index: 1,
            shadow: LIFTED_SHADOW,
        },
        immediate: vec![AnimatedField::ZIndex, AnimatedField::X, AnimatedField::Y],
        reset: false,
    }
}

/// Supplies a placeholder for participants without a live stream.
pub trait AvatarResolver {
    type Avatar;

    fn resolve(&self, participant: &Participant, width: f64, height: f64) -> Self::Avatar;
}

/// Resolver for hosts that draw no avatars.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAvatars;

impl AvatarResolver for NoAvatars {
    type Avatar = ();

    fn resolve(&self, _participant: &Participant, _width: f64, _height: f64) {}
}

/// Everything the renderer needs for one tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileFrame<A> {
    pub key: ParticipantId,
    pub rect: TileRect,
    pub spring: SpringTarget,
    pub participant: Participant,
    pub presenter: bool,
    pub avatar: Option<A>,
}

/// Pair every tile with its rect and spring target.
///
/// Tiles without a rect (layout pending) are skipped.
pub fn build_frames<R>(
    tiles: &[Tile],
    rects: &[TileRect],
    drag: Option<&DragState>,
    avatars: &R,
) -> Vec<TileFrame<R::Avatar>>
where
    R: AvatarResolver + ?Sized,
{
    tiles
        .iter()
        .zip(rects)
        .map(|(tile, rect)| {
            let spring = match drag {
                Some(drag) if drag.dragged_key == tile.key => lifted_target(rect, drag),
                _ => resting_target(rect, tile.pending_removal),
            };
            let avatar = (!tile.participant.display.has_stream)
                .then(|| avatars.resolve(&tile.participant, rect.width, rect.height));
            TileFrame {
                key: tile.key.clone(),
                rect: *rect,
                spring,
                participant: tile.participant.clone(),
                presenter: tile.presenter,
                avatar,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::tiles::{DisplayState, Participant, reconcile};

    struct Initials;

    impl AvatarResolver for Initials {
        type Avatar = String;

        fn resolve(&self, participant: &Participant, width: f64, height: f64) -> String {
            format!("{}@{}x{}", participant.id, width, height)
        }
    }

    fn tiles() -> Vec<Tile> {
        let streaming = Participant::new("b").with_display(DisplayState {
            has_stream: true,
            ..DisplayState::default()
        });
        reconcile(&[], &[Participant::new("a"), streaming]).tiles
    }

    fn rects() -> Vec<TileRect> {
        vec![
            TileRect::new(8.0, 8.0, 100.0, 50.0),
            TileRect::new(116.0, 8.0, 100.0, 50.0),
        ]
    }

    #[test]
    fn resting_frames_follow_rects() {
        let frames = build_frames(&tiles(), &rects(), None, &NoAvatars);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].spring.to.x, 116.0);
        assert_eq!(frames[1].spring.to.scale, 1.0);
        assert_eq!(frames[1].spring.to.z_index, 0);
        assert!(frames[1].spring.is_immediate(AnimatedField::ZIndex));
        assert!(!frames[1].spring.is_immediate(AnimatedField::X));
        assert_eq!(frames[0].spring.from, EnterFrom::default());
    }

    #[test]
    fn exiting_tiles_fade_out() {
        let target = resting_target(&rects()[0], true);
        assert_eq!(target.to.scale, 0.0);
        assert_eq!(target.to.opacity, 0.0);
    }

    #[test]
    fn dragged_tile_is_lifted_and_tracks_pointer() {
        let drag = DragState {
            dragged_key: "a".into(),
            origin_rect: rects()[0],
            pointer_offset: Point::new(40.0, 12.0),
        };
        let frames = build_frames(&tiles(), &rects(), Some(&drag), &NoAvatars);
        let lifted = &frames[0].spring;

        assert_eq!((lifted.to.x, lifted.to.y), (48.0, 20.0));
        assert_eq!(lifted.to.scale, 1.1);
        assert_eq!(lifted.to.z_index, 1);
        assert!(lifted.is_immediate(AnimatedField::X));
        assert!(lifted.is_immediate(AnimatedField::Y));
        assert_eq!(lifted.to.box_shadow(), "rgba(0, 0, 0, 0.5) 0px 15px 30px 0px");

        assert_eq!(frames[1].spring.to.z_index, 0);
    }

    #[test]
    fn avatars_only_for_tiles_without_stream() {
        let frames = build_frames(&tiles(), &rects(), None, &Initials);
        assert_eq!(frames[0].avatar.as_deref(), Some("a@100x50"));
        assert_eq!(frames[1].avatar, None);
    }
}

use std::time::Duration;

use callgrid::{
    BufferedSessionAudit, ContainerBounds, GridConfig, GridEvent, GridSession, LayoutBucket,
    NoAvatars, Participant, SessionAuditStage, TileRect, compute_layout,
};

fn feed(ids: &[&str]) -> GridEvent {
    GridEvent::Participants(ids.iter().map(|id| Participant::new(*id)).collect())
}

fn keys(session: &GridSession) -> Vec<String> {
    session
        .tiles()
        .iter()
        .map(|tile| tile.key.to_string())
        .collect()
}

#[test]
fn four_tiles_on_a_desktop_container() {
    let rects = compute_layout(4, &ContainerBounds::new(800.0, 600.0), 0);
    assert_eq!(
        rects,
        vec![
            TileRect::new(8.0, 8.0, 388.0, 288.0),
            TileRect::new(404.0, 8.0, 388.0, 288.0),
            TileRect::new(8.0, 304.0, 388.0, 288.0),
            TileRect::new(404.0, 304.0, 388.0, 288.0),
        ]
    );
}

#[test]
fn every_bucket_yields_one_rect_per_tile() {
    let containers = [
        ContainerBounds::new(390.0, 844.0),
        ContainerBounds::new(820.0, 1000.0),
        ContainerBounds::new(1280.0, 720.0),
        ContainerBounds::new(2560.0, 1080.0),
        ContainerBounds::new(5120.0, 1200.0),
    ];
    for bounds in containers {
        for tiles in 0..=14 {
            for presenters in 0..=4 {
                let rects = compute_layout(tiles, &bounds, presenters);
                assert_eq!(rects.len(), tiles, "{bounds:?} {tiles} {presenters}");
                assert!(rects.iter().all(|r| r.width >= 0.0 && r.height >= 0.0));
            }
        }
    }
}

#[test]
fn participant_churn_with_deferred_removal() {
    let audit = BufferedSessionAudit::default();
    let mut session = GridSession::new(GridConfig::default().with_audit(audit.clone()));
    session.handle(GridEvent::Resize(
        ContainerBounds::new(1280.0, 720.0).with_offset(100.0, 50.0),
    ));
    assert_eq!(session.bucket(), Some(LayoutBucket::Desktop));

    session.handle(feed(&["a", "b"]));
    session.handle(feed(&["b", "c"]));
    assert_eq!(keys(&session), vec!["a", "b", "c"]);

    let frames = session.frames(&NoAvatars);
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].spring.to.opacity, 0.0);
    assert_eq!(frames[2].spring.to.opacity, 1.0);

    session.handle(GridEvent::Tick {
        elapsed: Duration::from_millis(250),
    });
    assert_eq!(keys(&session), vec!["b", "c"]);
    assert_eq!(session.rects().len(), 2);

    let stages = audit.stages();
    assert!(stages.contains(&SessionAuditStage::PurgeScheduled));
    assert!(stages.contains(&SessionAuditStage::PurgeApplied));
}

#[test]
fn teardown_before_purge_leaves_tiles_alone() {
    let mut session = GridSession::with_default();
    session.handle(GridEvent::Resize(ContainerBounds::new(800.0, 600.0)));
    session.handle(feed(&["a", "b"]));
    session.handle(feed(&["b"]));
    session.handle(GridEvent::Teardown);
    session.handle(GridEvent::Tick {
        elapsed: Duration::from_secs(1),
    });

    assert_eq!(keys(&session), vec!["a", "b"]);
    assert_eq!(session.pending_purges(), 0);
}

#[test]
fn presenters_sit_in_front_and_shape_the_layout() {
    let mut session = GridSession::with_default();
    session.handle(GridEvent::Resize(ContainerBounds::new(1000.0, 600.0)));
    session.handle(feed(&["a", "b", "c", "d"]));
    session.handle(GridEvent::NameTagClicked("d".into()));

    assert_eq!(keys(&session), vec!["d", "a", "b", "c"]);
    let rects = session.rects();
    // Presenter takes the wide left region, the rest stack in a side column.
    assert!(rects[0].width > rects[1].width);
    assert!(rects[1..].iter().all(|r| r.x > rects[0].right()));
}

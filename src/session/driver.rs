//! Terminal pointer driver.
//!
//! Maps crossterm mouse, resize and key events onto [`GridEvent`]s so a
//! `GridSession` can be exercised from a terminal. Terminal cells are scaled
//! to pixels with a fixed cell size.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};

use super::{EventOutcome, GridEvent, GridSession};
use crate::drag::{Gesture, GesturePhase};
use crate::error::{GridError, Result};
use crate::geometry::{ContainerBounds, Point};
use crate::tiles::ParticipantId;

#[derive(Debug, Clone)]
struct Press {
    key: ParticipantId,
    origin: Point,
}

pub struct PointerDriver {
    cell_width: f64,
    cell_height: f64,
    tick_interval: Duration,
    pressed: Option<Press>,
}

impl Default for PointerDriver {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

impl PointerDriver {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width,
            cell_height,
            tick_interval: Duration::from_millis(50),
            pressed: None,
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn is_dragging(&self) -> bool {
        self.pressed.is_some()
    }

    fn to_pixels(&self, column: u16, row: u16) -> Point {
        Point::new(
            f64::from(column) * self.cell_width,
            f64::from(row) * self.cell_height,
        )
    }

    /// Translate one terminal event. Returns `None` for events the grid
    /// does not care about.
    pub fn translate(&mut self, session: &GridSession, event: Event) -> Option<GridEvent> {
        match event {
            Event::Resize(columns, rows) => {
                let size = self.to_pixels(columns, rows);
                Some(GridEvent::Resize(ContainerBounds::new(size.x, size.y)))
            }
            Event::Mouse(mouse) => self.translate_mouse(session, mouse),
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(GridEvent::Teardown),
                _ => None,
            },
            _ => None,
        }
    }

    fn translate_mouse(&mut self, session: &GridSession, mouse: MouseEvent) -> Option<GridEvent> {
        let position = self.to_pixels(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let key = session.tile_at(position)?.clone();
                self.pressed = Some(Press {
                    key: key.clone(),
                    origin: position,
                });
                Some(GridEvent::Gesture(Gesture::new(
                    GesturePhase::Start,
                    key,
                    position,
                    Point::default(),
                )))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let press = self.pressed.as_ref()?;
                let movement = Point::new(position.x - press.origin.x, position.y - press.origin.y);
                Some(GridEvent::Gesture(Gesture::new(
                    GesturePhase::Move,
                    press.key.clone(),
                    position,
                    movement,
                )))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let press = self.pressed.take()?;
                let movement = Point::new(position.x - press.origin.x, position.y - press.origin.y);
                Some(GridEvent::Gesture(Gesture::new(
                    GesturePhase::End,
                    press.key,
                    position,
                    movement,
                )))
            }
            _ => None,
        }
    }

    /// Wait up to `timeout` for the next grid event.
    pub fn poll(&mut self, session: &GridSession, timeout: Duration) -> Result<Option<GridEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let event = event::read()?;
        Ok(self.translate(session, event))
    }

    /// Drive `session` from the terminal until it is torn down.
    ///
    /// `on_update` runs after every handled event, including ticks.
    pub fn run<F>(mut self, session: &mut GridSession, mut on_update: F) -> Result<()>
    where
        F: FnMut(&mut GridSession, &EventOutcome) -> Result<()>,
    {
        let mut stdout = io::stdout();
        enter(&mut stdout)?;
        let result = self.run_inner(session, &mut on_update);
        exit(&mut stdout);
        result
    }

    fn run_inner<F>(&mut self, session: &mut GridSession, on_update: &mut F) -> Result<()>
    where
        F: FnMut(&mut GridSession, &EventOutcome) -> Result<()>,
    {
        let (columns, rows) = terminal::size()?;
        let size = self.to_pixels(columns, rows);
        let outcome = session.handle(GridEvent::Resize(ContainerBounds::new(size.x, size.y)));
        on_update(session, &outcome)?;

        let mut last_tick = Instant::now();
        while session.is_alive() {
            let timeout = self
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(0));

            if let Some(grid_event) = self.poll(session, timeout)? {
                let outcome = session.handle(grid_event);
                on_update(session, &outcome)?;
            }

            if last_tick.elapsed() >= self.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                let outcome = session.handle(GridEvent::Tick { elapsed });
                on_update(session, &outcome)?;
            }
        }
        Ok(())
    }
}

fn enter(stdout: &mut impl Write) -> Result<()> {
    terminal::enable_raw_mode().map_err(|err| GridError::Driver(err.to_string()))?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

fn exit(stdout: &mut impl Write) {
    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen).ok();
    terminal::disable_raw_mode().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::Participant;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn session() -> GridSession {
        let mut session = GridSession::with_default();
        session.handle(GridEvent::Resize(ContainerBounds::new(800.0, 600.0)));
        session.handle(GridEvent::Participants(vec![
            Participant::new("a"),
            Participant::new("b"),
            Participant::new("c"),
            Participant::new("d"),
        ]));
        session
    }

    #[test]
    fn resize_scales_cells_to_pixels() {
        let mut driver = PointerDriver::default();
        let event = driver.translate(&GridSession::with_default(), Event::Resize(100, 40));
        match event {
            Some(GridEvent::Resize(bounds)) => {
                assert_eq!((bounds.width, bounds.height), (800.0, 640.0));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn press_drag_release_becomes_a_gesture() {
        let session = session();
        let mut driver = PointerDriver::default();

        // Cell (2, 1) is pixel (16, 16), inside the first tile.
        let start = driver
            .translate(&session, mouse(MouseEventKind::Down(MouseButton::Left), 2, 1))
            .expect("start");
        assert!(matches!(
            start,
            GridEvent::Gesture(Gesture { phase: GesturePhase::Start, ref key, .. }) if key.as_str() == "a"
        ));
        assert!(driver.is_dragging());

        let drag = driver
            .translate(&session, mouse(MouseEventKind::Drag(MouseButton::Left), 12, 3))
            .expect("move");
        match drag {
            GridEvent::Gesture(gesture) => {
                assert_eq!(gesture.phase, GesturePhase::Move);
                assert_eq!(gesture.movement, Point::new(80.0, 32.0));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let end = driver.translate(&session, mouse(MouseEventKind::Up(MouseButton::Left), 12, 3));
        assert!(matches!(
            end,
            Some(GridEvent::Gesture(Gesture { phase: GesturePhase::End, .. }))
        ));
        assert!(!driver.is_dragging());
    }

    #[test]
    fn press_outside_tiles_is_ignored() {
        let session = session();
        let mut driver = PointerDriver::default();
        // Pixel (0, 0) sits in the outer gap.
        let event = driver.translate(&session, mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        assert!(event.is_none());
        let drag = driver.translate(&session, mouse(MouseEventKind::Drag(MouseButton::Left), 5, 5));
        assert!(drag.is_none());
    }

    #[test]
    fn escape_tears_down() {
        let mut driver = PointerDriver::default();
        let event = driver.translate(
            &GridSession::with_default(),
            Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
        );
        assert!(matches!(event, Some(GridEvent::Teardown)));
    }
}

//! Pointer gestures: the terminal stand-in for touch swipes and taps
//!
//! A left-button press starts a gesture. Dragging far enough along one axis
//! reports a swipe in that direction; releasing without having swiped
//! reports a tap.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Default swipe threshold, in column widths
pub const MIN_SWIPE_DISTANCE: i32 = 4;

/// Terminal cells are roughly twice as tall as they are wide
const ROW_TO_COLUMN_SCALE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Swipe(Direction),
    Tap,
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    min_distance: i32,
    /// Where the current press started, cleared once it produced a swipe
    start: Option<(u16, u16)>,
    /// Whether the current press already produced a swipe
    swiped: bool,
    pressed: bool,
}

impl GestureTracker {
    pub fn new(min_distance: i32) -> Self {
        Self {
            min_distance: min_distance.max(1),
            start: None,
            swiped: false,
            pressed: false,
        }
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Gesture> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press(event.column, event.row);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => self.drag(event.column, event.row),
            MouseEventKind::Up(MouseButton::Left) => self.release(),
            _ => None,
        }
    }

    pub fn press(&mut self, column: u16, row: u16) {
        self.start = Some((column, row));
        self.swiped = false;
        self.pressed = true;
    }

    pub fn drag(&mut self, column: u16, row: u16) -> Option<Gesture> {
        let (start_col, start_row) = self.start?;

        let dx = column as i32 - start_col as i32;
        let dy = (row as i32 - start_row as i32) * ROW_TO_COLUMN_SCALE;

        if dx.abs() < self.min_distance && dy.abs() < self.min_distance {
            return None;
        }

        let direction = if dx.abs() > dy.abs() {
            if dx > 0 { Direction::Right } else { Direction::Left }
        } else if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        };

        // One swipe per press
        self.start = None;
        self.swiped = true;
        Some(Gesture::Swipe(direction))
    }

    pub fn release(&mut self) -> Option<Gesture> {
        let was_tap = self.pressed && !self.swiped;
        self.start = None;
        self.swiped = false;
        self.pressed = false;

        was_tap.then_some(Gesture::Tap)
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(MIN_SWIPE_DISTANCE)
    }
}

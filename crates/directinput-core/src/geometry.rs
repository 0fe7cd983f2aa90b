//! Screen geometry, mouse buttons, and cursor motion planning.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cursor path resolution: intermediate positions per second of movement.
pub const PATH_STEPS_PER_SECOND: f64 = 50.0;

/// A position in screen pixels, origin at the primary display's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by the given offsets.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Display dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The centre pixel of a display of this size.
    pub fn center(self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

/// Mouse button identifier used for injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// First extra button ("back").
    #[serde(rename = "xbutton1")]
    X1,
    /// Second extra button ("forward").
    #[serde(rename = "xbutton2")]
    X2,
}

impl MouseButton {
    /// The name accepted by [`MouseButton::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
            MouseButton::X1 => "xbutton1",
            MouseButton::X2 => "xbutton2",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a mouse-button name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mouse button: {0:?}")]
pub struct ParseButtonError(pub String);

impl FromStr for MouseButton {
    type Err = ParseButtonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            "xbutton1" => Ok(MouseButton::X1),
            "xbutton2" => Ok(MouseButton::X2),
            _ => Err(ParseButtonError(s.to_string())),
        }
    }
}

/// One hop of a timed cursor move: wait `delay`, then place the cursor at `point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub delay: Duration,
    pub point: Point,
}

/// Plans a straight-line cursor move from `from` to `to` over `duration`.
///
/// The move is split into `floor(duration × 50)` evenly timed steps.  A
/// duration too short for a single step yields one immediate jump.  The last
/// step always lands exactly on `to`.
pub fn linear_path(from: Point, to: Point, duration: Duration) -> Vec<PathStep> {
    let steps = (duration.as_secs_f64() * PATH_STEPS_PER_SECOND) as u32;
    if steps == 0 {
        return vec![PathStep {
            delay: Duration::ZERO,
            point: to,
        }];
    }

    let delay = duration / steps;
    let step_x = f64::from(to.x - from.x) / f64::from(steps);
    let step_y = f64::from(to.y - from.y) / f64::from(steps);

    let mut x = f64::from(from.x);
    let mut y = f64::from(from.y);
    let mut path: Vec<PathStep> = (0..steps)
        .map(|_| {
            x += step_x;
            y += step_y;
            PathStep {
                delay,
                point: Point::new(x as i32, y as i32),
            }
        })
        .collect();

    // Float accumulation can leave the final hop a pixel short.
    if let Some(last) = path.last_mut() {
        last.point = to;
    }
    path
}

//! Normalized gamepad readings shared by the sampler and the edge detector.
//!
//! Buttons and axes use the web gamepad ordering of the console's browser, so a
//! snapshot taken from `gilrs` and one replayed from a test script look the same
//! to everything downstream.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pad slots the sampler reports on.
pub const MAX_SLOTS: usize = 4;

/// Number of buttons carried in a [`PadSnapshot`].
pub const BUTTON_COUNT: usize = 16;

/// Number of axes carried in a [`PadSnapshot`].
pub const AXIS_COUNT: usize = 4;

/// Physical button, indexed like `Gamepad.buttons` in the web-view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadButton {
    B,
    A,
    Y,
    X,
    L,
    R,
    ZL,
    ZR,
    Minus,
    Plus,
    LeftStick,
    RightStick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl PadButton {
    pub const ALL: [PadButton; BUTTON_COUNT] = [
        PadButton::B,
        PadButton::A,
        PadButton::Y,
        PadButton::X,
        PadButton::L,
        PadButton::R,
        PadButton::ZL,
        PadButton::ZR,
        PadButton::Minus,
        PadButton::Plus,
        PadButton::LeftStick,
        PadButton::RightStick,
        PadButton::DPadUp,
        PadButton::DPadDown,
        PadButton::DPadLeft,
        PadButton::DPadRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_dpad(self) -> bool {
        matches!(
            self,
            PadButton::DPadUp | PadButton::DPadDown | PadButton::DPadLeft | PadButton::DPadRight
        )
    }
}

impl fmt::Display for PadButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
impl std::str::FromStr for PadButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PadButton::ALL
            .iter()
            .copied()
            .find(|button| button.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown pad button '{}'", s))
    }
}

/// Analog axis, indexed like `Gamepad.axes`. Negative Y points up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

impl PadAxis {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One sample of one device, taken at a poll tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadSnapshot {
    pub slot: usize,
    pub buttons: [bool; BUTTON_COUNT],
    pub axes: [f32; AXIS_COUNT],
}

impl PadSnapshot {
    pub fn idle(slot: usize) -> Self {
        Self {
            slot,
            ..Default::default()
        }
    }

    pub fn pressed(&self, button: PadButton) -> bool {
        self.buttons[button.index()]
    }

    pub fn axis(&self, axis: PadAxis) -> f32 {
        self.axes[axis.index()]
    }

    pub fn with_button(mut self, button: PadButton) -> Self {
        self.buttons[button.index()] = true;
        self
    }

    pub fn with_axis(mut self, axis: PadAxis, value: f32) -> Self {
        self.axes[axis.index()] = value.clamp(-1.0, 1.0);
        self
    }
}

/// Anything that can be sampled once per poll tick.
///
/// Returns one snapshot per connected device; a slot missing from the result is
/// treated as disconnected.
pub trait InputSource {
    fn sample(&mut self) -> Vec<PadSnapshot>;
}

/// Replays a fixed list of frames, one per tick, then reports idle pads.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: std::collections::VecDeque<Vec<PadSnapshot>>,
}

#[cfg(test)]
impl ScriptedSource {
    pub fn new(frames: Vec<Vec<PadSnapshot>>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
impl InputSource for ScriptedSource {
    fn sample(&mut self) -> Vec<PadSnapshot> {
        self.frames.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_indices_follow_web_gamepad_order() {
        assert_eq!(PadButton::B.index(), 0);
        assert_eq!(PadButton::A.index(), 1);
        assert_eq!(PadButton::L.index(), 4);
        assert_eq!(PadButton::Plus.index(), 9);
        assert_eq!(PadButton::DPadUp.index(), 12);
        assert_eq!(PadButton::DPadRight.index(), 15);
    }

    #[test]
    fn parses_button_names_case_insensitively() {
        assert_eq!("zl".parse::<PadButton>(), Ok(PadButton::ZL));
        assert_eq!("DPadLeft".parse::<PadButton>(), Ok(PadButton::DPadLeft));
        assert!("Home".parse::<PadButton>().is_err());
    }

    #[test]
    fn snapshot_builders_set_readings() {
        let snap = PadSnapshot::idle(2)
            .with_button(PadButton::A)
            .with_axis(PadAxis::RightY, 1.5);
        assert_eq!(snap.slot, 2);
        assert!(snap.pressed(PadButton::A));
        assert!(!snap.pressed(PadButton::B));
        assert_eq!(snap.axis(PadAxis::RightY), 1.0);
    }

    #[test]
    fn scripted_source_goes_idle_when_drained() {
        let mut source = ScriptedSource::new(vec![vec![PadSnapshot::idle(0)]]);
        assert_eq!(source.sample().len(), 1);
        assert!(source.is_exhausted());
        assert!(source.sample().is_empty());
    }
}

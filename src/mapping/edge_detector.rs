//! Turns per-tick pad samples into logical actions.
//!
//! Momentary buttons are edge-triggered per device, so holding A across many
//! ticks toggles once. Directional input is level-triggered: the poll interval
//! already limits how fast focus can travel while the stick is held.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::controller::pad::{PadAxis, PadButton, PadSnapshot};
use crate::mapping::action::{LogicalAction, MomentaryAction, NavDirection};
use crate::mapping::bindings::ButtonBindings;

/// Thresholds used when reading analog input.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSettings {
    /// Stick deflection that counts as a directional press
    pub stick_threshold: f32,
    /// Upper end of the description scroll delta range
    pub scroll_scale: f32,
}

impl Default for EdgeSettings {
    fn default() -> Self {
        Self {
            stick_threshold: 0.7,
            scroll_scale: 20.0,
        }
    }
}

#[derive(Clone, Copy)]
enum Deflection {
    Negative,
    Positive,
}

// Checked in order, first match wins
const DIRECTION_CHECKS: [(NavDirection, PadButton, PadAxis, Deflection); 4] = [
    (NavDirection::Left, PadButton::DPadLeft, PadAxis::LeftX, Deflection::Negative),
    (NavDirection::Up, PadButton::DPadUp, PadAxis::LeftY, Deflection::Negative),
    (NavDirection::Right, PadButton::DPadRight, PadAxis::LeftX, Deflection::Positive),
    (NavDirection::Down, PadButton::DPadDown, PadAxis::LeftY, Deflection::Positive),
];

/// Per-device record of which momentary actions were down on the last sample.
#[derive(Debug, Clone, Default)]
pub struct ButtonHoldState {
    held: HashMap<MomentaryAction, bool>,
}

impl ButtonHoldState {
    pub fn is_held(&self, action: MomentaryAction) -> bool {
        self.held.get(&action).copied().unwrap_or(false)
    }

    /// Records the current level and reports whether this is a fresh press.
    fn press_edge(&mut self, action: MomentaryAction, pressed: bool) -> bool {
        let was_held = self.held.insert(action, pressed).unwrap_or(false);
        pressed && !was_held
    }
}

#[derive(Debug, Clone)]
pub struct EdgeDetector {
    bindings: ButtonBindings,
    settings: EdgeSettings,
    devices: HashMap<usize, ButtonHoldState>,
}

impl EdgeDetector {
    pub fn new(bindings: ButtonBindings, settings: EdgeSettings) -> Self {
        Self {
            bindings,
            settings,
            devices: HashMap::new(),
        }
    }

    pub fn connect(&mut self, slot: usize) {
        if self.devices.insert(slot, ButtonHoldState::default()).is_none() {
            info!("Tracking button holds for pad slot {}", slot);
        }
    }

    pub fn disconnect(&mut self, slot: usize) {
        if self.devices.remove(&slot).is_some() {
            info!("Dropped button holds for pad slot {}", slot);
        }
    }

    pub fn connected(&self) -> impl Iterator<Item = usize> + '_ {
        self.devices.keys().copied()
    }

    pub fn hold_state(&self, slot: usize) -> Option<&ButtonHoldState> {
        self.devices.get(&slot)
    }

    pub fn on_poll(&mut self, slot: usize, snapshot: &PadSnapshot) -> Vec<LogicalAction> {
        let bindings = &self.bindings;
        let hold = self.devices.entry(slot).or_default();
        let mut actions = Vec::new();

        for action in MomentaryAction::ALL {
            let pressed = snapshot.pressed(bindings.button_for(action));
            if hold.press_edge(action, pressed) {
                actions.push(LogicalAction::from(action));
            }
        }

        if let Some(direction) = self.direction(snapshot) {
            actions.push(LogicalAction::from(direction));
        }

        let delta = scroll_delta(snapshot.axis(PadAxis::RightY), self.settings.scroll_scale);
        if delta > 0.0 {
            actions.push(LogicalAction::ScrollDescription(delta));
        }

        if !actions.is_empty() {
            debug!("Slot {} produced actions: {:?}", slot, actions);
        }
        actions
    }

    fn direction(&self, snapshot: &PadSnapshot) -> Option<NavDirection> {
        let threshold = self.settings.stick_threshold;

        DIRECTION_CHECKS
            .iter()
            .find(|(_, button, axis, deflection)| {
                let value = snapshot.axis(*axis);
                let stick = match deflection {
                    Deflection::Negative => value < -threshold,
                    Deflection::Positive => value > threshold,
                };
                snapshot.pressed(*button) || stick
            })
            .map(|(direction, ..)| *direction)
    }
}

/// Linear rescale of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
pub fn rescale(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    ((value - in_min) * (out_max - out_min) / (in_max - in_min)) + out_min
}

/// Description scroll speed for a right-stick Y reading.
///
/// The reading is rounded to two decimals and mapped from `[0, 1]` onto
/// `[0, scale]`. Upward deflection maps below zero and is floored, so it never
/// scrolls back up.
pub fn scroll_delta(raw: f32, scale: f32) -> f32 {
    let rounded = (raw * 100.0).round() / 100.0;
    rescale(rounded, 0.0, 1.0, 0.0, scale).max(0.0)
}

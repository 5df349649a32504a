use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

use crate::controller::pad::{InputSource, PadAxis, PadButton, PadSnapshot, MAX_SLOTS};

// Collector settings
#[derive(Clone, Debug)]
pub struct CollectorSettings {
    pub max_slots: usize,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            max_slots: MAX_SLOTS,
        }
    }
}

// Collector errors
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),

    #[error("No free pad slot for gamepad {0}")]
    NoFreeSlot(String),
}

// Define collector states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

#[machine]
#[derive(Debug)]
pub struct EventCollector<S: CollectionState> {
    // Gilrs context
    gilrs: Gilrs,

    // Collector settings
    settings: CollectorSettings,

    // Gamepad occupying each slot
    slots: [Option<GamepadId>; MAX_SLOTS],
}

// Implementation of methods available in all states
impl<S: CollectionState> EventCollector<S> {
    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    pub fn connected_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| id.map(|_| slot))
            .collect()
    }

    fn slot_limit(&self) -> usize {
        self.settings.max_slots.min(MAX_SLOTS)
    }

    fn assign_slot(&mut self, id: GamepadId) -> Result<usize, CollectorError> {
        if let Some(slot) = self.slots.iter().position(|s| *s == Some(id)) {
            return Ok(slot);
        }

        let limit = self.slot_limit();
        match self.slots[..limit].iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(id);
                Ok(slot)
            }
            None => Err(CollectorError::NoFreeSlot(id.to_string())),
        }
    }

    fn release_slot(&mut self, id: GamepadId) -> Option<usize> {
        let slot = self.slots.iter().position(|s| *s == Some(id))?;
        self.slots[slot] = None;
        Some(slot)
    }
}

// Implementation for Initializing state
impl EventCollector<Initializing> {
    pub fn create(settings: Option<CollectorSettings>) -> Result<Self, CollectorError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating Event Collector with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, settings, [None; MAX_SLOTS]))
    }

    // Assign slots to the pads already connected and transition to Collecting state
    pub fn initialize(mut self) -> Result<EventCollector<Collecting>, CollectorError> {
        let connected: Vec<(GamepadId, String)> = self
            .gilrs
            .gamepads()
            .map(|(id, gamepad)| (id, gamepad.name().to_string()))
            .collect();

        if connected.is_empty() {
            warn!("No gamepad connected, waiting for one to appear");
        } else {
            info!("Found {} gamepads:", connected.len());
        }

        for (id, name) in connected {
            match self.assign_slot(id) {
                Ok(slot) => info!("  [{}] ID: {}, Name: {}", slot, id, name),
                Err(e) => warn!("Ignoring gamepad {}: {}", name, e),
            }
        }

        info!("Event Collector initialized, transitioning to Collecting state");
        Ok(self.transition())
    }
}

// Implementation for Collecting state
impl EventCollector<Collecting> {
    // Drain pending gilrs events so the cached pad state is current
    fn pump_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => match self.assign_slot(id) {
                    Ok(slot) => info!("Gamepad {} connected on slot {}", id, slot),
                    Err(e) => warn!("{}", e),
                },
                EventType::Disconnected => {
                    if let Some(slot) = self.release_slot(id) {
                        warn!("Gamepad {} disconnected from slot {}", id, slot);
                    }
                }
                other => debug!("Gamepad {} event: {:?}", id, other),
            }
        }
    }

    fn snapshot(&self, slot: usize, id: GamepadId) -> Option<PadSnapshot> {
        let gamepad = self.gilrs.connected_gamepad(id)?;
        let mut snap = PadSnapshot::idle(slot);

        for button in PadButton::ALL {
            snap.buttons[button.index()] = gamepad.is_pressed(gilrs_button(button));
        }

        // gilrs reports positive Y as up, the web-view as down
        snap.axes[PadAxis::LeftX.index()] = gamepad.value(Axis::LeftStickX);
        snap.axes[PadAxis::LeftY.index()] = -gamepad.value(Axis::LeftStickY);
        snap.axes[PadAxis::RightX.index()] = gamepad.value(Axis::RightStickX);
        snap.axes[PadAxis::RightY.index()] = -gamepad.value(Axis::RightStickY);

        Some(snap)
    }
}

impl InputSource for EventCollector<Collecting> {
    fn sample(&mut self) -> Vec<PadSnapshot> {
        self.pump_events();

        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| id.and_then(|id| self.snapshot(slot, id)))
            .collect()
    }
}

/// Creates and initializes a collector in one step.
pub fn spawn_collector(
    settings: Option<CollectorSettings>,
) -> Result<EventCollector<Collecting>, CollectorError> {
    info!("Spawning Event Collector with settings: {:?}", settings);
    EventCollector::create(settings)?.initialize()
}

// Nintendo layout: labels sit at different positions than on an Xbox pad
fn gilrs_button(button: PadButton) -> Button {
    match button {
        PadButton::B => Button::South,
        PadButton::A => Button::East,
        PadButton::Y => Button::West,
        PadButton::X => Button::North,
        PadButton::L => Button::LeftTrigger,
        PadButton::R => Button::RightTrigger,
        PadButton::ZL => Button::LeftTrigger2,
        PadButton::ZR => Button::RightTrigger2,
        PadButton::Minus => Button::Select,
        PadButton::Plus => Button::Start,
        PadButton::LeftStick => Button::LeftThumb,
        PadButton::RightStick => Button::RightThumb,
        PadButton::DPadUp => Button::DPadUp,
        PadButton::DPadDown => Button::DPadDown,
        PadButton::DPadLeft => Button::DPadLeft,
        PadButton::DPadRight => Button::DPadRight,
    }
}

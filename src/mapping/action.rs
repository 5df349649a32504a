//! Logical actions, decoupled from the physical input that produced them.

use std::fmt::{self, Display};

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NavDirection {
    /// Whether moving this way walks toward the end of the list.
    pub fn is_forward(self) -> bool {
        matches!(self, NavDirection::Down | NavDirection::Right)
    }

    /// Left/Right jump a block of items, Up/Down a single step.
    pub fn is_block(self) -> bool {
        matches!(self, NavDirection::Left | NavDirection::Right)
    }
}

/// Actions that fire once per press and are debounced per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MomentaryAction {
    ActivateSelected,
    Cancel,
    ToggleCategoryMenu,
    PrevPage,
    NextPage,
    PrevCategory,
    NextCategory,
}

impl MomentaryAction {
    pub const ALL: [MomentaryAction; 7] = [
        MomentaryAction::ActivateSelected,
        MomentaryAction::Cancel,
        MomentaryAction::ToggleCategoryMenu,
        MomentaryAction::PrevPage,
        MomentaryAction::NextPage,
        MomentaryAction::PrevCategory,
        MomentaryAction::NextCategory,
    ];
}

/// Abstract input event handed to the menu controllers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalAction {
    ActivateSelected,
    Cancel,
    ToggleCategoryMenu,
    PrevPage,
    NextPage,
    PrevCategory,
    NextCategory,
    MoveUp,
    MoveDown,
    MoveLeftBlock,
    MoveRightBlock,
    ScrollDescription(f32),
}

impl LogicalAction {
    pub fn direction(self) -> Option<NavDirection> {
        match self {
            LogicalAction::MoveUp => Some(NavDirection::Up),
            LogicalAction::MoveDown => Some(NavDirection::Down),
            LogicalAction::MoveLeftBlock => Some(NavDirection::Left),
            LogicalAction::MoveRightBlock => Some(NavDirection::Right),
            _ => None,
        }
    }
}

impl From<MomentaryAction> for LogicalAction {
    fn from(action: MomentaryAction) -> Self {
        match action {
            MomentaryAction::ActivateSelected => LogicalAction::ActivateSelected,
            MomentaryAction::Cancel => LogicalAction::Cancel,
            MomentaryAction::ToggleCategoryMenu => LogicalAction::ToggleCategoryMenu,
            MomentaryAction::PrevPage => LogicalAction::PrevPage,
            MomentaryAction::NextPage => LogicalAction::NextPage,
            MomentaryAction::PrevCategory => LogicalAction::PrevCategory,
            MomentaryAction::NextCategory => LogicalAction::NextCategory,
        }
    }
}

impl From<NavDirection> for LogicalAction {
    fn from(direction: NavDirection) -> Self {
        match direction {
            NavDirection::Up => LogicalAction::MoveUp,
            NavDirection::Down => LogicalAction::MoveDown,
            NavDirection::Left => LogicalAction::MoveLeftBlock,
            NavDirection::Right => LogicalAction::MoveRightBlock,
        }
    }
}

impl Display for LogicalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalAction::ScrollDescription(delta) => write!(f, "ScrollDescription({:.2})", delta),
            other => write!(f, "{:?}", other),
        }
    }
}

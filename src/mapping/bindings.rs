//! Button bindings for the momentary actions, plus the host's footer buttons.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::config::ConfigError;
use crate::controller::pad::PadButton;
use crate::mapping::action::{LogicalAction, MomentaryAction};

/// Which pad button triggers each momentary action.
///
/// Directional input is not bindable: the d-pad and the left stick always move
/// focus, so binding a d-pad button here is rejected by [`ButtonBindings::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonBindings {
    pub activate: PadButton,
    pub cancel: PadButton,
    pub category_menu: PadButton,
    pub prev_page: PadButton,
    pub next_page: PadButton,
    pub prev_category: PadButton,
    pub next_category: PadButton,
}

impl Default for ButtonBindings {
    fn default() -> Self {
        Self {
            activate: PadButton::A,
            cancel: PadButton::B,
            category_menu: PadButton::Y,
            prev_page: PadButton::L,
            next_page: PadButton::R,
            prev_category: PadButton::ZL,
            next_category: PadButton::ZR,
        }
    }
}

impl ButtonBindings {
    pub fn button_for(&self, action: MomentaryAction) -> PadButton {
        match action {
            MomentaryAction::ActivateSelected => self.activate,
            MomentaryAction::Cancel => self.cancel,
            MomentaryAction::ToggleCategoryMenu => self.category_menu,
            MomentaryAction::PrevPage => self.prev_page,
            MomentaryAction::NextPage => self.next_page,
            MomentaryAction::PrevCategory => self.prev_category,
            MomentaryAction::NextCategory => self.next_category,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<PadButton, MomentaryAction> = HashMap::new();

        for action in MomentaryAction::ALL {
            let button = self.button_for(action);
            if button.is_dpad() {
                return Err(ConfigError::InvalidBinding(format!(
                    "{:?} cannot be bound to the d-pad ({})",
                    action, button
                )));
            }
            if let Some(previous) = seen.insert(button, action) {
                return Err(ConfigError::InvalidBinding(format!(
                    "{} is bound to both {:?} and {:?}",
                    button, previous, action
                )));
            }
        }

        debug!("Button bindings validated: {:?}", self);
        Ok(())
    }
}

/// Buttons the host shell exposes through its footer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FooterButton {
    A,
    B,
    X,
    Y,
}

impl FooterButton {
    /// Footer presses go through the same action set as the polled pad.
    pub fn action(self) -> Option<LogicalAction> {
        match self {
            FooterButton::A => Some(LogicalAction::ActivateSelected),
            FooterButton::B => Some(LogicalAction::Cancel),
            FooterButton::Y => Some(LogicalAction::ToggleCategoryMenu),
            FooterButton::X => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_are_valid() {
        assert!(ButtonBindings::default().validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_buttons() {
        let bindings = ButtonBindings {
            next_page: PadButton::L,
            ..Default::default()
        };
        let err = bindings.validate().unwrap_err();
        assert!(err.to_string().contains("PrevPage"));
    }

    #[test]
    fn rejects_dpad_bindings() {
        let bindings = ButtonBindings {
            activate: PadButton::DPadDown,
            ..Default::default()
        };
        assert!(bindings.validate().is_err());
    }

    #[test]
    fn footer_buttons_match_default_pad_bindings() {
        let bindings = ButtonBindings::default();
        assert_eq!(
            FooterButton::A.action(),
            Some(MomentaryAction::ActivateSelected.into())
        );
        assert_eq!(bindings.button_for(MomentaryAction::ActivateSelected), PadButton::A);
        assert_eq!(FooterButton::B.action(), Some(LogicalAction::Cancel));
        assert_eq!(bindings.button_for(MomentaryAction::Cancel), PadButton::B);
        assert_eq!(
            FooterButton::Y.action(),
            Some(LogicalAction::ToggleCategoryMenu)
        );
        assert_eq!(FooterButton::X.action(), None);
    }

    #[test]
    fn bindings_deserialize_from_partial_toml() {
        let bindings: ButtonBindings = toml::from_str("activate = \"X\"\ncancel = \"A\"").unwrap();
        assert_eq!(bindings.activate, PadButton::X);
        assert_eq!(bindings.cancel, PadButton::A);
        assert_eq!(bindings.category_menu, PadButton::Y);
        assert!(bindings.validate().is_ok());
    }
}

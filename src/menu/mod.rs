//! Menu controllers and the building blocks they share.
//!
//! Every menu is a set of [`list_view::ListView`]s plus a small state enum.
//! A controller owns everything it touches, so one poll tick mutates one
//! value and nothing else:
//!
//! ```text
//! LogicalAction ──► MenuController ──► ListView ──► ViewSink
//!                         │
//!                         └──► HostBridge
//! ```

pub mod configurator;
pub mod error;
pub mod filter;
pub mod focus;
pub mod item;
pub mod list_view;
pub mod mod_menu;
pub mod paginator;
pub mod scroll;
pub mod sub_menu;
pub mod view;
pub mod workspaces;

use crate::host::message::HostUpdate;
use crate::mapping::action::LogicalAction;
use crate::mapping::bindings::FooterButton;

pub use configurator::ConfiguratorMenu;
pub use error::MenuError;
pub use mod_menu::ModMenu;
pub use view::{TracingSink, ViewEffect, ViewSink};
pub use workspaces::WorkspaceMenu;

/// What the poll loop drives.
pub trait MenuController {
    /// Handle one action. User mistakes are reported to the user and return `Ok`;
    /// an `Err` means the menu cannot continue.
    fn handle(&mut self, action: LogicalAction) -> Result<(), MenuError>;

    /// Merge an informational update from the host.
    fn apply_update(&mut self, update: HostUpdate);

    fn is_closed(&self) -> bool;

    /// A footer button clicked in the host UI. Returns whether it did anything.
    fn footer(&mut self, button: FooterButton) -> Result<bool, MenuError> {
        match button.action() {
            Some(action) => self.handle(action).map(|_| true),
            None => Ok(false),
        }
    }
}

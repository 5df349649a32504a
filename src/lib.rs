//! Gamepad driven mod, workspace and configurator menus.
//!
//! ```text
//! gilrs ──► controller ──► mapping ──► menu ──► host
//! ```

pub mod config;
pub mod controller;
pub mod host;
pub mod mapping;
pub mod menu;

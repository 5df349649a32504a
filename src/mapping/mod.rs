//! Turns controller snapshots into logical menu actions.
//!
//! Physical buttons are mapped through configurable [`bindings::ButtonBindings`];
//! the [`edge_detector::EdgeDetector`] debounces them per device and adds
//! directional and analog scroll input.

pub mod action;
pub mod bindings;
pub mod edge_detector;

pub use action::{LogicalAction, MomentaryAction, NavDirection};
pub use bindings::{ButtonBindings, FooterButton};
pub use edge_detector::{EdgeDetector, EdgeSettings};

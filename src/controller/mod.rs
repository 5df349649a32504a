//! Controller subsystem for gamepad input handling
//!
//! Implements the sampling side of the pipeline:
//!
//! 1. [`event_collector`] - gilrs backed pad sampling, one snapshot per slot
//! 2. [`pad`] - normalized snapshots and the [`pad::InputSource`] seam
//! 3. [`poll_loop`] - the timer that feeds snapshots through the edge detector
//!    into a menu
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► Collector ──► EdgeDetector ──► MenuController
//!             (Snapshots)   (LogicalAction)
//! ```
//!
//! Everything runs on one task at a 100-150ms period, fast enough for held
//! d-pad navigation without skipping rows.

pub mod event_collector;
pub mod pad;
pub mod poll_loop;

pub use event_collector::{spawn_collector, CollectorError, CollectorSettings};
pub use pad::{InputSource, PadAxis, PadButton, PadSnapshot};
pub use poll_loop::PollLoop;

//! Focus movement inside one rendered page.

use tracing::debug;

use crate::mapping::action::NavDirection;
use crate::menu::view::{ContainerId, ViewEffect, ViewSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEdge {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Move focus to this row
    Target(usize),
    /// Stepped off the page, the caller decides whether to turn it
    PageBoundary(PageEdge),
    NoOp,
}

#[derive(Debug, Clone, Copy)]
pub struct FocusNavigator {
    block: usize,
}

impl Default for FocusNavigator {
    fn default() -> Self {
        Self { block: 6 }
    }
}

impl FocusNavigator {
    pub fn new(block: usize) -> Self {
        Self {
            block: block.max(1),
        }
    }

    /// `visible` has one flag per row of the current page.
    pub fn move_focus(
        &self,
        current: Option<usize>,
        direction: NavDirection,
        visible: &[bool],
    ) -> NavOutcome {
        let Some(current) = current.filter(|c| *c < visible.len()) else {
            return first_visible(visible).map_or(NavOutcome::NoOp, NavOutcome::Target);
        };

        let candidates: Vec<usize> = if direction.is_forward() {
            (current + 1..visible.len()).filter(|i| visible[*i]).collect()
        } else {
            (0..current).rev().filter(|i| visible[*i]).collect()
        };

        if direction.is_block() {
            // Jump the full block when possible, otherwise as far as the list allows
            let distance = self.block.min(candidates.len());
            return match distance {
                0 => NavOutcome::NoOp,
                d => NavOutcome::Target(candidates[d - 1]),
            };
        }

        match candidates.first() {
            Some(target) => NavOutcome::Target(*target),
            None if direction.is_forward() => NavOutcome::PageBoundary(PageEdge::End),
            None => NavOutcome::PageBoundary(PageEdge::Start),
        }
    }
}

pub fn first_visible(visible: &[bool]) -> Option<usize> {
    visible.iter().position(|v| *v)
}

pub fn last_visible(visible: &[bool]) -> Option<usize> {
    visible.iter().rposition(|v| *v)
}

/// The single focused row of one container.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusState {
    container: ContainerId,
    focused: Option<usize>,
}

impl FocusState {
    pub fn new(container: ContainerId) -> Self {
        Self {
            container,
            focused: None,
        }
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Removes the marker from the current holder, if any.
    pub fn clear(&mut self, sink: &mut dyn ViewSink) {
        if let Some(index) = self.focused.take() {
            sink.apply(ViewEffect::ClearFocus {
                container: self.container,
                index,
            });
        }
    }

    pub fn set(&mut self, index: usize, sink: &mut dyn ViewSink) {
        self.focused = Some(index);
        debug!("Focus {:?} row {}", self.container, index);
        sink.apply(ViewEffect::SetFocus {
            container: self.container,
            index,
        });
    }

    /// Forget the focus without emitting anything, the rows it pointed at are gone.
    pub fn reset(&mut self) {
        self.focused = None;
    }
}

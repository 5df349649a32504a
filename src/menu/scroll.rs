//! Keeping the focused row inside its scrolling container, and the
//! stick-driven description pane.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::menu::focus::FocusState;
use crate::menu::view::{ContainerId, ViewEffect, ViewSink};

/// Vertical extent in container-relative pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f32,
    pub bottom: f32,
}

/// A scrolling list of fixed-height rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollContainer {
    id: ContainerId,
    height: f32,
    row_height: f32,
    rows: usize,
    scroll_top: f32,
}

impl ScrollContainer {
    pub fn new(id: ContainerId, height: f32, row_height: f32) -> Self {
        Self {
            id,
            height,
            row_height,
            rows: 0,
            scroll_top: 0.0,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    /// New content was rendered; browsers keep the offset only while it still fits.
    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
        self.scroll_top = self.scroll_top.min(self.max_offset());
    }

    pub fn row_rect(&self, index: usize) -> Rect {
        let top = index as f32 * self.row_height - self.scroll_top;
        Rect {
            top,
            bottom: top + self.row_height,
        }
    }

    pub fn contains(&self, rect: Rect) -> bool {
        rect.top >= 0.0 && rect.bottom <= self.height
    }

    fn max_offset(&self) -> f32 {
        (self.rows as f32 * self.row_height - self.height).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollPlan {
    InView,
    JumpTo(f32),
}

#[derive(Debug, Clone, Copy)]
pub struct ViewportScroller {
    margin: f32,
}

impl Default for ViewportScroller {
    fn default() -> Self {
        Self { margin: 50.0 }
    }
}

impl ViewportScroller {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    pub fn plan(&self, container: &ScrollContainer, target: Rect) -> ScrollPlan {
        if container.contains(target) {
            return ScrollPlan::InView;
        }

        let offset = if target.top < 0.0 {
            // above the window, leave a margin under the top edge
            container.scroll_top + target.top - self.margin
        } else {
            container.scroll_top + target.bottom - container.height + self.margin
        };
        ScrollPlan::JumpTo(offset.clamp(0.0, container.max_offset()))
    }

    /// Moves focus to `target`, scrolling first when the row is not fully visible.
    pub fn scroll_into_view(
        &self,
        container: &mut ScrollContainer,
        focus: &mut FocusState,
        target: usize,
        sink: &mut dyn ViewSink,
    ) {
        match self.plan(container, container.row_rect(target)) {
            ScrollPlan::InView => {
                focus.clear(sink);
                focus.set(target, sink);
            }
            ScrollPlan::JumpTo(offset) => {
                focus.clear(sink);
                sink.apply(ViewEffect::CancelScroll {
                    container: container.id,
                });
                debug!("Scrolling {:?} to {:.1}", container.id, offset);
                container.scroll_top = offset;
                sink.apply(ViewEffect::ScrollTo {
                    container: container.id,
                    offset,
                });
                focus.set(target, sink);
            }
        }
    }
}

/// Text layout figures used to estimate how tall a description renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionMetrics {
    pub line_height: f32,
    pub chars_per_line: usize,
    pub visible_height: f32,
}

impl Default for DescriptionMetrics {
    fn default() -> Self {
        Self {
            line_height: 24.0,
            chars_per_line: 48,
            visible_height: 146.0,
        }
    }
}

impl DescriptionMetrics {
    pub fn content_height(&self, text: &str) -> f32 {
        let per_line = self.chars_per_line.max(1);
        let lines: usize = text
            .lines()
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum();
        lines as f32 * self.line_height
    }
}

/// Scroll position of the focused item's description.
#[derive(Debug, Clone)]
pub struct DescriptionPane {
    metrics: DescriptionMetrics,
    offset: f32,
    overflow: f32,
}

impl DescriptionPane {
    pub fn new(metrics: DescriptionMetrics) -> Self {
        Self {
            metrics,
            offset: 0.0,
            overflow: 0.0,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn overflows(&self) -> bool {
        self.overflow > 0.0
    }

    /// A new description took the pane: start from the top.
    pub fn reset(&mut self, text: &str, sink: &mut dyn ViewSink) {
        self.overflow =
            (self.metrics.content_height(text) - self.metrics.visible_height).max(0.0);
        self.offset = 0.0;
        sink.apply(ViewEffect::ScrollTo {
            container: ContainerId::Description,
            offset: 0.0,
        });
    }

    pub fn scroll(&mut self, delta: f32, sink: &mut dyn ViewSink) {
        let offset = (self.offset + delta).clamp(0.0, self.overflow);
        if offset != self.offset {
            self.offset = offset;
            sink.apply(ViewEffect::ScrollTo {
                container: ContainerId::Description,
                offset,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> ScrollContainer {
        // 4 rows fit
        let mut c = ScrollContainer::new(ContainerId::Mods, 400.0, 100.0);
        c.set_rows(20);
        c
    }

    #[test]
    fn visible_row_only_moves_focus() {
        let mut c = container();
        let mut focus = FocusState::new(ContainerId::Mods);
        let mut sink: Vec<ViewEffect> = Vec::new();
        focus.set(0, &mut sink);
        sink.clear();

        ViewportScroller::default().scroll_into_view(&mut c, &mut focus, 3, &mut sink);
        assert_eq!(
            sink,
            vec![
                ViewEffect::ClearFocus { container: ContainerId::Mods, index: 0 },
                ViewEffect::SetFocus { container: ContainerId::Mods, index: 3 },
            ]
        );
        assert_eq!(c.scroll_top(), 0.0);
    }

    #[test]
    fn hidden_row_scrolls_before_focus() {
        let mut c = container();
        let mut focus = FocusState::new(ContainerId::Mods);
        let mut sink: Vec<ViewEffect> = Vec::new();
        focus.set(3, &mut sink);
        sink.clear();

        ViewportScroller::default().scroll_into_view(&mut c, &mut focus, 4, &mut sink);
        // bottom 500 - height 400 + margin 50
        assert_eq!(
            sink,
            vec![
                ViewEffect::ClearFocus { container: ContainerId::Mods, index: 3 },
                ViewEffect::CancelScroll { container: ContainerId::Mods },
                ViewEffect::ScrollTo { container: ContainerId::Mods, offset: 150.0 },
                ViewEffect::SetFocus { container: ContainerId::Mods, index: 4 },
            ]
        );
        assert_eq!(c.scroll_top(), 150.0);
    }

    #[test]
    fn row_above_window_gets_top_margin() {
        let mut c = container();
        c.scroll_top = 800.0;
        let plan = ViewportScroller::default().plan(&c, c.row_rect(5));
        assert_eq!(plan, ScrollPlan::JumpTo(450.0));

        let plan = ViewportScroller::default().plan(&c, c.row_rect(0));
        assert_eq!(plan, ScrollPlan::JumpTo(0.0));
    }

    #[test]
    fn partially_visible_row_is_not_in_view() {
        let mut c = container();
        c.scroll_top = 30.0;
        assert!(!c.contains(c.row_rect(0)));
        assert!(c.contains(c.row_rect(1)));
    }

    #[test]
    fn description_scroll_is_clamped() {
        let metrics = DescriptionMetrics {
            line_height: 20.0,
            chars_per_line: 10,
            visible_height: 100.0,
        };
        let mut pane = DescriptionPane::new(metrics);
        let mut sink: Vec<ViewEffect> = Vec::new();

        // 8 lines of 20px, 60px overflow
        pane.reset(&"x".repeat(80), &mut sink);
        assert!(pane.overflows());
        pane.scroll(40.0, &mut sink);
        pane.scroll(40.0, &mut sink);
        assert_eq!(pane.offset(), 60.0);

        let before = sink.len();
        pane.scroll(20.0, &mut sink);
        assert_eq!(sink.len(), before);

        pane.reset("short", &mut sink);
        assert_eq!(pane.offset(), 0.0);
        pane.scroll(20.0, &mut sink);
        assert_eq!(pane.offset(), 0.0);
    }
}

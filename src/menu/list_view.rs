//! A paged, focusable, scrolling list. Every menu view is one of these.

use std::ops::Range;
use tracing::debug;

use crate::mapping::action::NavDirection;
use crate::menu::focus::{first_visible, last_visible, FocusNavigator, FocusState, NavOutcome, PageEdge};
use crate::menu::paginator::Paginator;
use crate::menu::scroll::{ScrollContainer, ViewportScroller};
use crate::menu::view::{ContainerId, Row, ViewEffect, ViewSink};

/// Geometry and paging of a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSettings {
    /// `None` shows every row on one page without a page label
    pub page_size: Option<usize>,
    pub block: usize,
    pub row_height: f32,
    pub viewport_height: f32,
    pub scroll_margin: f32,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: Some(7),
            block: 6,
            row_height: 96.0,
            viewport_height: 520.0,
            scroll_margin: 50.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListView {
    page_size: Option<usize>,
    rows: Vec<Row>,
    paginator: Paginator,
    navigator: FocusNavigator,
    focus: FocusState,
    scroller: ViewportScroller,
    container: ScrollContainer,
}

impl ListView {
    pub fn new(id: ContainerId, settings: &ListSettings) -> Self {
        Self {
            page_size: settings.page_size,
            rows: Vec::new(),
            paginator: Paginator::new(0, settings.page_size.unwrap_or(1)),
            navigator: FocusNavigator::new(settings.block),
            focus: FocusState::new(id),
            scroller: ViewportScroller::new(settings.scroll_margin),
            container: ScrollContainer::new(id, settings.viewport_height, settings.row_height),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.container.id()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn page_range(&self) -> Range<usize> {
        self.paginator.range()
    }

    /// Position of the focused row within the whole list.
    pub fn selected(&self) -> Option<usize> {
        self.focus
            .focused()
            .map(|index| self.paginator.range().start + index)
    }

    pub fn label(&self) -> Option<String> {
        self.page_size.map(|_| self.paginator.label())
    }

    /// Replace the list, clamp the page, re-render and focus the first row.
    pub fn set_rows(&mut self, rows: Vec<Row>, sink: &mut dyn ViewSink) {
        match self.page_size {
            Some(_) => self.paginator.set_len(rows.len()),
            None => self.paginator = Paginator::new(rows.len(), rows.len().max(1)),
        }
        self.rows = rows;
        self.show_page(sink);
    }

    /// Like [`ListView::set_rows`], but starts over from the first page.
    pub fn reset_rows(&mut self, rows: Vec<Row>, sink: &mut dyn ViewSink) {
        self.paginator.first_page();
        self.set_rows(rows, sink);
    }

    /// Re-render the current page and focus its first visible row.
    pub fn show_page(&mut self, sink: &mut dyn ViewSink) {
        self.render(sink);
        if let Some(first) = first_visible(&self.visible()) {
            self.focus_index(first, sink);
        }
    }

    /// Focus a row by list position, turning the page if needed.
    pub fn focus_position(&mut self, position: usize, sink: &mut dyn ViewSink) {
        if position >= self.rows.len() {
            return;
        }
        let page = position / self.paginator.page_size();
        if self.paginator.go_to(page) {
            self.render(sink);
        }
        self.focus_index(position - self.paginator.range().start, sink);
    }

    /// Returns whether the focus moved.
    pub fn move_focus(&mut self, direction: NavDirection, sink: &mut dyn ViewSink) -> bool {
        let visible = self.visible();
        match self
            .navigator
            .move_focus(self.focus.focused(), direction, &visible)
        {
            NavOutcome::Target(index) => {
                self.focus_index(index, sink);
                true
            }
            NavOutcome::PageBoundary(edge) => self.cross_page(edge, sink),
            // Nothing to focus here, look for the next page that has something
            NavOutcome::NoOp if self.focus.focused().is_none() && !visible.contains(&true) => {
                let edge = if direction.is_forward() {
                    PageEdge::End
                } else {
                    PageEdge::Start
                };
                self.cross_page(edge, sink)
            }
            NavOutcome::NoOp => false,
        }
    }

    pub fn next_page(&mut self, sink: &mut dyn ViewSink) -> bool {
        if !self.paginator.next() {
            return false;
        }
        self.show_page(sink);
        true
    }

    pub fn previous_page(&mut self, sink: &mut dyn ViewSink) -> bool {
        if !self.paginator.previous() {
            return false;
        }
        self.show_page(sink);
        true
    }

    /// Change one row in place, keeping page and focus.
    pub fn update_row(&mut self, position: usize, row: Row, sink: &mut dyn ViewSink) {
        let Some(slot) = self.rows.get_mut(position) else {
            return;
        };
        *slot = row.clone();

        let range = self.paginator.range();
        if range.contains(&position) {
            sink.apply(ViewEffect::UpdateRow {
                container: self.id(),
                index: position - range.start,
                row,
            });
        }
    }

    /// Show or hide one row in place. A focused row that gets hidden hands the
    /// focus to the next visible row.
    pub fn set_row_visible(&mut self, position: usize, visible: bool, sink: &mut dyn ViewSink) {
        let Some(row) = self.rows.get(position) else {
            return;
        };
        if row.visible == visible {
            return;
        }
        let row = Row {
            visible,
            ..row.clone()
        };
        self.update_row(position, row, sink);

        if !visible && self.selected() == Some(position) {
            if !self.move_focus(NavDirection::Down, sink) {
                self.focus.clear(sink);
            }
        } else if visible && self.focus.focused().is_none() {
            let range = self.paginator.range();
            if range.contains(&position) {
                self.focus_index(position - range.start, sink);
            }
        }
    }

    fn cross_page(&mut self, edge: PageEdge, sink: &mut dyn ViewSink) -> bool {
        let start = self.paginator.current();
        let mut turned = false;
        // Skip pages where every row is hidden
        loop {
            let moved = match edge {
                PageEdge::Start => self.paginator.previous(),
                PageEdge::End => self.paginator.next(),
            };
            if !moved {
                break;
            }
            turned = true;
            if self.paginator.current() == start || self.visible().contains(&true) {
                break;
            }
        }
        if turned {
            debug!("{:?} turned to page {}", self.id(), self.paginator.label());
            self.render(sink);
        }

        // Single page: wrap around within it
        let visible = self.visible();
        let target = match edge {
            PageEdge::Start => last_visible(&visible),
            PageEdge::End => first_visible(&visible),
        };
        match target {
            Some(index) if turned || Some(index) != self.focus.focused() => {
                self.focus_index(index, sink);
                true
            }
            _ => false,
        }
    }

    fn focus_index(&mut self, index: usize, sink: &mut dyn ViewSink) {
        self.scroller
            .scroll_into_view(&mut self.container, &mut self.focus, index, sink);
    }

    fn render(&mut self, sink: &mut dyn ViewSink) {
        let rows: Vec<Row> = self.rows[self.paginator.range()].to_vec();
        self.focus.reset();
        self.container.set_rows(rows.len());
        sink.apply(ViewEffect::RenderPage {
            container: self.id(),
            rows,
            label: self.label(),
        });
    }

    fn visible(&self) -> Vec<bool> {
        self.rows[self.paginator.range()]
            .iter()
            .map(|row| row.visible)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| Row::new(format!("mod {}", i), false)).collect()
    }

    fn view(page_size: Option<usize>) -> ListView {
        let settings = ListSettings {
            page_size,
            row_height: 10.0,
            viewport_height: 1000.0,
            ..Default::default()
        };
        ListView::new(ContainerId::Mods, &settings)
    }

    fn focus_sets(sink: &[ViewEffect]) -> Vec<usize> {
        sink.iter()
            .filter_map(|e| match e {
                ViewEffect::SetFocus { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn set_rows_renders_first_page_and_focuses_first_row() {
        let mut list = view(Some(7));
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(10), &mut sink);

        match &sink[0] {
            ViewEffect::RenderPage { rows, label, .. } => {
                assert_eq!(rows.len(), 7);
                assert_eq!(label.as_deref(), Some("1 of 2"));
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn moving_down_off_the_page_turns_it() {
        let mut list = view(Some(7));
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(10), &mut sink);
        list.focus_position(6, &mut sink);

        assert!(list.move_focus(NavDirection::Down, &mut sink));
        assert_eq!(list.paginator().current(), 1);
        assert_eq!(list.selected(), Some(7));

        // and back up lands on the last row of the previous page
        assert!(list.move_focus(NavDirection::Up, &mut sink));
        assert_eq!(list.selected(), Some(6));
    }

    #[test]
    fn moving_up_from_first_page_wraps_to_last_page() {
        let mut list = view(Some(7));
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(10), &mut sink);

        assert!(list.move_focus(NavDirection::Up, &mut sink));
        assert_eq!(list.paginator().current(), 1);
        assert_eq!(list.selected(), Some(9));
    }

    #[test]
    fn single_page_wraps_in_place() {
        let mut list = view(None);
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(3), &mut sink);

        assert!(list.move_focus(NavDirection::Up, &mut sink));
        assert_eq!(list.selected(), Some(2));
        assert!(list.move_focus(NavDirection::Down, &mut sink));
        assert_eq!(list.selected(), Some(0));
        assert_eq!(list.label(), None);
    }

    #[test]
    fn single_row_does_not_refocus_itself() {
        let mut list = view(None);
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(1), &mut sink);
        sink.clear();
        assert!(!list.move_focus(NavDirection::Down, &mut sink));
        assert!(sink.is_empty());
    }

    #[test]
    fn exactly_one_focus_after_each_move() {
        let mut list = view(Some(7));
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(20), &mut sink);
        sink.clear();

        list.move_focus(NavDirection::Right, &mut sink);
        assert_eq!(
            sink,
            vec![
                ViewEffect::ClearFocus { container: ContainerId::Mods, index: 0 },
                ViewEffect::SetFocus { container: ContainerId::Mods, index: 6 },
            ]
        );
        // block jump never leaves the page
        assert!(!list.move_focus(NavDirection::Right, &mut sink));
        assert_eq!(focus_sets(&sink), vec![6]);
    }

    #[test]
    fn hidden_rows_are_skipped() {
        let mut list = view(None);
        let mut sink: Vec<ViewEffect> = Vec::new();
        let mut all = rows(4);
        all[1] = all[1].clone().hidden();
        list.set_rows(all, &mut sink);

        list.move_focus(NavDirection::Down, &mut sink);
        assert_eq!(list.selected(), Some(2));
    }

    #[test]
    fn update_row_only_touches_the_rendered_page() {
        let mut list = view(Some(7));
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(10), &mut sink);
        sink.clear();

        list.update_row(8, Row::new("mod 8", true), &mut sink);
        assert!(sink.is_empty());
        assert!(list.row(8).unwrap().checked);

        list.update_row(2, Row::new("mod 2", true), &mut sink);
        assert!(matches!(sink[0], ViewEffect::UpdateRow { index: 2, .. }));
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn shrinking_list_clamps_page_and_refocuses() {
        let mut list = view(Some(7));
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(20), &mut sink);
        list.next_page(&mut sink);
        list.next_page(&mut sink);
        assert_eq!(list.paginator().current(), 2);

        list.set_rows(rows(9), &mut sink);
        assert_eq!(list.paginator().current(), 1);
        assert_eq!(list.selected(), Some(7));
    }

    #[test]
    fn empty_list_renders_without_focus() {
        let mut list = view(Some(7));
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(Vec::new(), &mut sink);
        assert_eq!(list.selected(), None);
        assert!(!list.move_focus(NavDirection::Down, &mut sink));
        assert!(!list.next_page(&mut sink));
    }

    /// Replays focus effects the way the host applies them. Panics if a row
    /// gains focus while another one still holds it.
    fn replay(focused: &mut Vec<usize>, effects: &[ViewEffect]) {
        for effect in effects {
            match effect {
                ViewEffect::RenderPage { .. } => focused.clear(),
                ViewEffect::ClearFocus { index, .. } => {
                    assert_eq!(focused.as_slice(), &[*index], "cleared a row without focus");
                    focused.clear();
                }
                ViewEffect::SetFocus { index, .. } => {
                    assert!(focused.is_empty(), "{} focused while {:?} still is", index, focused);
                    focused.push(*index);
                }
                _ => {}
            }
        }
    }

    fn assert_single_focus(list: &ListView, focused: &[usize]) {
        assert_eq!(focused.len(), 1);
        assert_eq!(list.selected(), Some(list.page_range().start + focused[0]));
        assert!(list.row(list.selected().unwrap()).unwrap().visible);
    }

    #[test]
    fn long_walk_keeps_exactly_one_focused_row() {
        let mut list = view(Some(7));
        let mut sink: Vec<ViewEffect> = Vec::new();
        let mut all = rows(23);
        for position in [3, 7, 8, 9, 10, 11, 12, 13, 22] {
            all[position] = all[position].clone().hidden();
        }
        list.set_rows(all, &mut sink);
        let mut focused = Vec::new();
        replay(&mut focused, &sink);

        let script = [
            NavDirection::Down,
            NavDirection::Down,
            NavDirection::Down,
            NavDirection::Right,
            NavDirection::Down,
            NavDirection::Down,
            NavDirection::Left,
            NavDirection::Up,
            NavDirection::Up,
            NavDirection::Up,
            NavDirection::Right,
            NavDirection::Right,
            NavDirection::Down,
        ];
        for direction in script.iter().cycle().take(200) {
            sink.clear();
            list.move_focus(*direction, &mut sink);
            replay(&mut focused, &sink);
            assert_single_focus(&list, &focused);
            // page 2 holds only hidden rows and is never shown
            assert_ne!(list.paginator().current(), 1);
        }
    }

    #[test]
    fn hiding_the_focused_row_moves_focus_on() {
        let mut list = view(None);
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(3), &mut sink);
        let mut focused = Vec::new();
        replay(&mut focused, &sink);

        sink.clear();
        list.set_row_visible(0, false, &mut sink);
        replay(&mut focused, &sink);
        assert!(matches!(sink[0], ViewEffect::UpdateRow { index: 0, .. }));
        assert_eq!(list.selected(), Some(1));

        list.set_row_visible(1, false, &mut sink);
        list.set_row_visible(2, false, &mut sink);
        assert_eq!(list.selected(), None);

        sink.clear();
        list.set_row_visible(1, true, &mut sink);
        replay(&mut focused, &sink);
        assert_eq!(list.selected(), Some(1));
        assert_single_focus(&list, &focused);
    }

    #[test]
    fn showing_a_row_that_is_already_visible_is_silent() {
        let mut list = view(None);
        let mut sink: Vec<ViewEffect> = Vec::new();
        list.set_rows(rows(2), &mut sink);
        sink.clear();
        list.set_row_visible(1, true, &mut sink);
        list.set_row_visible(5, false, &mut sink);
        assert!(sink.is_empty());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn arb_direction() -> impl Strategy<Value = NavDirection> {
            prop_oneof![
                Just(NavDirection::Up),
                Just(NavDirection::Down),
                Just(NavDirection::Left),
                Just(NavDirection::Right),
            ]
        }

        fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
            proptest::collection::vec(any::<bool>(), 1..40).prop_map(|flags| {
                flags
                    .into_iter()
                    .enumerate()
                    .map(|(i, visible)| {
                        let row = Row::new(format!("mod {}", i), false);
                        if visible {
                            row
                        } else {
                            row.hidden()
                        }
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn one_focused_row_after_every_move(
                all in arb_rows(),
                page_size in 1usize..9,
                moves in proptest::collection::vec(arb_direction(), 1..80),
            ) {
                let any_visible = all.iter().any(|row| row.visible);
                let mut list = view(Some(page_size));
                let mut sink: Vec<ViewEffect> = Vec::new();
                list.set_rows(all, &mut sink);
                let mut focused = Vec::new();
                replay(&mut focused, &sink);

                for direction in moves {
                    sink.clear();
                    list.move_focus(direction, &mut sink);
                    replay(&mut focused, &sink);
                    if any_visible {
                        prop_assert_eq!(focused.len(), 1);
                        prop_assert_eq!(
                            list.selected(),
                            Some(list.page_range().start + focused[0])
                        );
                    } else {
                        prop_assert!(focused.is_empty());
                        prop_assert_eq!(list.selected(), None);
                    }
                }
            }
        }
    }
}

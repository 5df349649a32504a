//! Category and sort sub-menu of the mod menu.

use tracing::debug;

use crate::mapping::action::NavDirection;
use crate::menu::filter::FilterState;
use crate::menu::list_view::{ListSettings, ListView};
use crate::menu::view::{ContainerId, Row, ViewEffect, ViewSink};

#[derive(Debug, Clone, PartialEq)]
pub enum SubMenuEntry {
    Category(String),
    Sort,
    Descending,
    EnableAll,
    DisableAll,
    EnableShown,
    DisableShown,
}

/// Bulk operations the mod menu has to carry out for the sub-menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMenuCommand {
    /// Only the filter changed
    FilterChanged,
    SetAll(bool),
    SetShown(bool),
    Nothing,
}

#[derive(Debug, Clone)]
pub struct SubMenu {
    entries: Vec<SubMenuEntry>,
    list: ListView,
}

impl SubMenu {
    pub fn new(categories: &[String], settings: &ListSettings) -> Self {
        let mut entries: Vec<SubMenuEntry> = categories
            .iter()
            .cloned()
            .map(SubMenuEntry::Category)
            .collect();
        entries.extend([
            SubMenuEntry::Sort,
            SubMenuEntry::Descending,
            SubMenuEntry::EnableAll,
            SubMenuEntry::DisableAll,
            SubMenuEntry::EnableShown,
            SubMenuEntry::DisableShown,
        ]);

        let settings = ListSettings {
            page_size: None,
            ..settings.clone()
        };
        Self {
            entries,
            list: ListView::new(ContainerId::SubMenu, &settings),
        }
    }

    pub fn entries(&self) -> &[SubMenuEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&SubMenuEntry> {
        self.list.selected().and_then(|pos| self.entries.get(pos))
    }

    pub fn open(&mut self, filter: &FilterState, sink: &mut dyn ViewSink) {
        sink.apply(ViewEffect::SetVisible {
            container: ContainerId::SubMenu,
            visible: true,
        });
        let rows = self.entries.iter().map(|e| row_for(e, filter)).collect();
        self.list.set_rows(rows, sink);
    }

    pub fn close(&mut self, sink: &mut dyn ViewSink) {
        sink.apply(ViewEffect::SetVisible {
            container: ContainerId::SubMenu,
            visible: false,
        });
    }

    pub fn move_focus(&mut self, direction: NavDirection, sink: &mut dyn ViewSink) -> bool {
        self.list.move_focus(direction, sink)
    }

    /// Toggle or run the focused entry.
    pub fn activate(&mut self, filter: &mut FilterState, sink: &mut dyn ViewSink) -> SubMenuCommand {
        let Some(position) = self.list.selected() else {
            return SubMenuCommand::Nothing;
        };
        let Some(entry) = self.entries.get(position).cloned() else {
            return SubMenuCommand::Nothing;
        };
        debug!("Sub-menu entry activated: {:?}", entry);

        let command = match &entry {
            SubMenuEntry::Category(category) => {
                filter.toggle_category(category);
                SubMenuCommand::FilterChanged
            }
            SubMenuEntry::Sort => {
                filter.sort = filter.sort.cycled();
                SubMenuCommand::FilterChanged
            }
            SubMenuEntry::Descending => {
                filter.descending = !filter.descending;
                SubMenuCommand::FilterChanged
            }
            SubMenuEntry::EnableAll => SubMenuCommand::SetAll(true),
            SubMenuEntry::DisableAll => SubMenuCommand::SetAll(false),
            SubMenuEntry::EnableShown => SubMenuCommand::SetShown(true),
            SubMenuEntry::DisableShown => SubMenuCommand::SetShown(false),
        };

        if command == SubMenuCommand::FilterChanged {
            self.list.update_row(position, row_for(&entry, filter), sink);
        }
        command
    }
}

fn row_for(entry: &SubMenuEntry, filter: &FilterState) -> Row {
    match entry {
        SubMenuEntry::Category(category) => Row::new(category.clone(), filter.is_selected(category)),
        SubMenuEntry::Sort => Row::new(format!("Sort: {}", filter.sort), false),
        SubMenuEntry::Descending => Row::new("Descending", filter.descending),
        SubMenuEntry::EnableAll => Row::new("Enable all", false),
        SubMenuEntry::DisableAll => Row::new("Disable all", false),
        SubMenuEntry::EnableShown => Row::new("Enable shown", false),
        SubMenuEntry::DisableShown => Row::new("Disable shown", false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::filter::SortMode;

    fn sub_menu() -> SubMenu {
        let categories = vec!["Fighter".to_string(), "Stage".to_string()];
        SubMenu::new(&categories, &ListSettings::default())
    }

    #[test]
    fn opens_focused_on_first_category() {
        let mut menu = sub_menu();
        let mut sink: Vec<ViewEffect> = Vec::new();
        menu.open(&FilterState::default(), &mut sink);

        assert_eq!(
            sink[0],
            ViewEffect::SetVisible {
                container: ContainerId::SubMenu,
                visible: true
            }
        );
        assert_eq!(menu.selected(), Some(&SubMenuEntry::Category("Fighter".into())));
    }

    #[test]
    fn activating_category_toggles_checkbox() {
        let mut menu = sub_menu();
        let mut filter = FilterState::default();
        let mut sink: Vec<ViewEffect> = Vec::new();
        menu.open(&filter, &mut sink);

        assert_eq!(menu.activate(&mut filter, &mut sink), SubMenuCommand::FilterChanged);
        assert!(filter.is_selected("Fighter"));
        assert!(matches!(
            sink.last(),
            Some(ViewEffect::UpdateRow { index: 0, row, .. }) if row.checked
        ));
    }

    #[test]
    fn sort_and_bulk_entries() {
        let mut menu = sub_menu();
        let mut filter = FilterState::default();
        let mut sink: Vec<ViewEffect> = Vec::new();
        menu.open(&filter, &mut sink);

        menu.move_focus(NavDirection::Down, &mut sink);
        menu.move_focus(NavDirection::Down, &mut sink);
        assert_eq!(menu.selected(), Some(&SubMenuEntry::Sort));
        menu.activate(&mut filter, &mut sink);
        assert_eq!(filter.sort, SortMode::EnabledFirst);

        menu.move_focus(NavDirection::Down, &mut sink);
        menu.activate(&mut filter, &mut sink);
        assert!(filter.descending);

        menu.move_focus(NavDirection::Down, &mut sink);
        assert_eq!(menu.activate(&mut filter, &mut sink), SubMenuCommand::SetAll(true));
        menu.move_focus(NavDirection::Down, &mut sink);
        menu.move_focus(NavDirection::Down, &mut sink);
        assert_eq!(menu.activate(&mut filter, &mut sink), SubMenuCommand::SetShown(true));
    }

    #[test]
    fn navigation_wraps() {
        let mut menu = sub_menu();
        let mut sink: Vec<ViewEffect> = Vec::new();
        menu.open(&FilterState::default(), &mut sink);
        menu.move_focus(NavDirection::Up, &mut sink);
        assert_eq!(menu.selected(), Some(&SubMenuEntry::DisableShown));
    }
}

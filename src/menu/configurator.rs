//! Settings menu: a list of sections, each opening the values it offers.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::config::{ConfigSection, MenuConfig};
use crate::host::bridge::HostBridge;
use crate::host::message::{HostRequest, HostUpdate};
use crate::mapping::action::LogicalAction;
use crate::menu::error::MenuError;
use crate::menu::list_view::{ListSettings, ListView};
use crate::menu::view::{ContainerId, Row, ViewEffect, ViewSink};
use crate::menu::MenuController;

/// Category of the change sent when the configurator is left.
pub const EXIT_CATEGORY: &str = "exit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfiguratorView {
    Main,
    Options { category: String },
    Closed,
}

/// Row id of a value, as the host names it in `ToggleRow`.
pub fn value_id(category: &str, value: &str) -> String {
    format!("{}-{}", category, value)
}

pub struct ConfiguratorMenu<B, V> {
    sections: Vec<ConfigSection>,
    /// Last value picked per category during this session
    chosen: BTreeMap<String, String>,
    /// Row ids the host has hidden
    hidden: BTreeSet<String>,
    view: ConfiguratorView,
    main: ListView,
    options: ListView,
    bridge: B,
    sink: V,
}

impl<B: HostBridge, V: ViewSink> ConfiguratorMenu<B, V> {
    pub fn new(sections: Vec<ConfigSection>, config: &MenuConfig, bridge: B, sink: V) -> Self {
        let settings = ListSettings {
            page_size: None,
            ..config.list_settings()
        };
        let mut menu = Self {
            sections,
            chosen: BTreeMap::new(),
            hidden: BTreeSet::new(),
            view: ConfiguratorView::Main,
            main: ListView::new(ContainerId::ConfigSections, &settings),
            options: ListView::new(ContainerId::ConfigValues, &settings),
            bridge,
            sink,
        };
        info!("Configurator opened with {} sections", menu.sections.len());
        menu.show_main(0);
        menu
    }

    pub fn view(&self) -> &ConfiguratorView {
        &self.view
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn sink(&self) -> &V {
        &self.sink
    }

    pub fn chosen(&self, category: &str) -> Option<&str> {
        self.chosen.get(category).map(String::as_str)
    }

    pub fn focused_section(&self) -> Option<&ConfigSection> {
        self.main.selected().and_then(|pos| self.sections.get(pos))
    }

    pub fn focused_value(&self) -> Option<&str> {
        let ConfiguratorView::Options { category } = &self.view else {
            return None;
        };
        let section = self.section(category)?;
        self.options
            .selected()
            .and_then(|pos| section.values.get(pos))
            .map(String::as_str)
    }

    fn section(&self, category: &str) -> Option<&ConfigSection> {
        self.sections.iter().find(|s| s.category == category)
    }

    fn section_rows(&self) -> Vec<Row> {
        self.sections
            .iter()
            .map(|section| {
                let row = Row::new(section.label.clone(), false);
                if self.hidden.contains(&section.category) {
                    row.hidden()
                } else {
                    row
                }
            })
            .collect()
    }

    fn value_rows(&self, section: &ConfigSection) -> Vec<Row> {
        let chosen = self.chosen.get(&section.category);
        section
            .values
            .iter()
            .map(|value| {
                let row = Row::new(value.clone(), chosen == Some(value));
                if self.hidden.contains(&value_id(&section.category, value)) {
                    row.hidden()
                } else {
                    row
                }
            })
            .collect()
    }

    fn switch_to(&mut self, shown: ContainerId) {
        let hidden = match shown {
            ContainerId::ConfigSections => ContainerId::ConfigValues,
            _ => ContainerId::ConfigSections,
        };
        self.sink.apply(ViewEffect::SetVisible {
            container: hidden,
            visible: false,
        });
        self.sink.apply(ViewEffect::SetVisible {
            container: shown,
            visible: true,
        });
    }

    fn show_main(&mut self, focus: usize) {
        self.view = ConfiguratorView::Main;
        self.switch_to(ContainerId::ConfigSections);
        let rows = self.section_rows();
        self.main.set_rows(rows, &mut self.sink);
        if self.main.row(focus).is_some_and(|row| row.visible) {
            self.main.focus_position(focus, &mut self.sink);
        }
    }

    fn show_options(&mut self, section: ConfigSection) {
        debug!("Showing values of {}", section.category);
        self.switch_to(ContainerId::ConfigValues);
        self.sink.apply(ViewEffect::Status(section.label.clone()));
        let rows = self.value_rows(&section);
        self.options.set_rows(rows, &mut self.sink);
        self.view = ConfiguratorView::Options {
            category: section.category,
        };
    }

    fn back_to_main(&mut self, category: &str) {
        let focus = self
            .sections
            .iter()
            .position(|s| s.category == category)
            .unwrap_or(0);
        self.show_main(focus);
    }

    fn choose(&mut self, category: String, value: String) -> Result<(), MenuError> {
        info!("Setting {} to {}", category, value);
        self.bridge.send(HostRequest::ConfigChanged {
            category: category.clone(),
            value: value.clone(),
        })?;
        self.chosen.insert(category.clone(), value);

        if let Some(section) = self.section(&category).cloned() {
            for (pos, row) in self.value_rows(&section).into_iter().enumerate() {
                if self.options.row(pos).map(|r| r.checked) != Some(row.checked) {
                    self.options.update_row(pos, row, &mut self.sink);
                }
            }
        }
        Ok(())
    }

    fn handle_main(&mut self, action: LogicalAction) -> Result<(), MenuError> {
        match action {
            LogicalAction::ActivateSelected => {
                if let Some(section) = self.focused_section().cloned() {
                    self.show_options(section);
                }
            }
            LogicalAction::Cancel => {
                info!("Leaving configurator");
                self.view = ConfiguratorView::Closed;
                self.bridge.send(HostRequest::ConfigChanged {
                    category: EXIT_CATEGORY.to_string(),
                    value: "true".to_string(),
                })?;
            }
            other => match other.direction() {
                Some(direction) => {
                    self.main.move_focus(direction, &mut self.sink);
                }
                None => debug!("{} ignored in configurator", other),
            },
        }
        Ok(())
    }

    fn handle_options(&mut self, category: String, action: LogicalAction) -> Result<(), MenuError> {
        match action {
            LogicalAction::ActivateSelected => {
                if let Some(value) = self.focused_value().map(str::to_string) {
                    self.choose(category, value)?;
                }
            }
            LogicalAction::Cancel => self.back_to_main(&category),
            other => match other.direction() {
                Some(direction) => {
                    self.options.move_focus(direction, &mut self.sink);
                }
                None => debug!("{} ignored in {} values", other, category),
            },
        }
        Ok(())
    }

    fn toggle_row(&mut self, id: String) {
        let visible = self.hidden.contains(&id);
        if visible {
            self.hidden.remove(&id);
        } else {
            self.hidden.insert(id.clone());
        }

        if let Some(pos) = self.sections.iter().position(|s| s.category == id) {
            debug!("Section {} visible: {}", id, visible);
            if self.view == ConfiguratorView::Main {
                self.main.set_row_visible(pos, visible, &mut self.sink);
            }
            return;
        }

        if let ConfiguratorView::Options { category } = &self.view {
            let pos = self
                .section(category)
                .and_then(|s| s.values.iter().position(|v| value_id(category, v) == id));
            if let Some(pos) = pos {
                self.options.set_row_visible(pos, visible, &mut self.sink);
                return;
            }
        }

        let known = self
            .sections
            .iter()
            .any(|s| s.values.iter().any(|v| value_id(&s.category, v) == id));
        if !known {
            warn!("Host toggled unknown configurator row {}", id);
        }
    }
}

impl<B: HostBridge, V: ViewSink> MenuController for ConfiguratorMenu<B, V> {
    fn handle(&mut self, action: LogicalAction) -> Result<(), MenuError> {
        match self.view.clone() {
            ConfiguratorView::Main => self.handle_main(action),
            ConfiguratorView::Options { category } => self.handle_options(category, action),
            ConfiguratorView::Closed => {
                debug!("Configurator closed, dropping {}", action);
                Ok(())
            }
        }
    }

    fn apply_update(&mut self, update: HostUpdate) {
        match update {
            HostUpdate::ToggleRow { id } => self.toggle_row(id),
            other => debug!("Configurator ignores host update {:?}", other),
        }
    }

    fn is_closed(&self) -> bool {
        self.view == ConfiguratorView::Closed
    }
}

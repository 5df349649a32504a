use tracing::{debug, info};

use crate::config::MenuConfig;
use crate::host::bridge::HostBridge;
use crate::host::message::{HostRequest, HostUpdate};
use crate::mapping::action::LogicalAction;
use crate::menu::error::MenuError;
use crate::menu::filter::{CategoryCycler, CategoryFilter, EmptyFilterPolicy, FilterState};
use crate::menu::item::Item;
use crate::menu::list_view::ListView;
use crate::menu::scroll::DescriptionPane;
use crate::menu::sub_menu::{SubMenu, SubMenuCommand};
use crate::menu::view::{ContainerId, Row, ViewEffect, ViewSink};
use crate::menu::MenuController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModMenuState {
    ModMenu,
    SubMenu,
    Closed,
}

/// Mod list with its category sub-menu.
pub struct ModMenu<B, V> {
    items: Vec<Item>,
    /// Filtered and sorted positions into `items`
    order: Vec<usize>,
    filter: FilterState,
    policy: EmptyFilterPolicy,
    cycler: CategoryCycler,
    list: ListView,
    sub_menu: SubMenu,
    description: DescriptionPane,
    state: ModMenuState,
    enabled_size: Option<u64>,
    bridge: B,
    sink: V,
}

impl<B: HostBridge, V: ViewSink> ModMenu<B, V> {
    pub fn new(items: Vec<Item>, config: &MenuConfig, bridge: B, sink: V) -> Self {
        let settings = config.list_settings();
        let mut menu = Self {
            items,
            order: Vec::new(),
            filter: FilterState::default(),
            policy: EmptyFilterPolicy::FallbackToAll,
            cycler: CategoryCycler::new(&config.categories),
            list: ListView::new(ContainerId::Mods, &settings),
            sub_menu: SubMenu::new(&config.categories, &settings),
            description: DescriptionPane::new(config.description.clone()),
            state: ModMenuState::ModMenu,
            enabled_size: None,
            bridge,
            sink,
        };
        info!("Mod menu opened with {} mods", menu.items.len());
        menu.refresh();
        menu
    }

    pub fn state(&self) -> ModMenuState {
        self.state
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Mods in display order.
    pub fn shown(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().map(|i| &self.items[*i])
    }

    pub fn focused_item(&self) -> Option<&Item> {
        self.list
            .selected()
            .and_then(|pos| self.order.get(pos))
            .map(|i| &self.items[*i])
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn sub_menu(&self) -> &SubMenu {
        &self.sub_menu
    }

    pub fn description(&self) -> &DescriptionPane {
        &self.description
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn sink(&self) -> &V {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut V {
        &mut self.sink
    }

    /// Re-run the filter and re-render from the current page's first mod.
    fn refresh(&mut self) {
        let outcome = CategoryFilter::apply(&self.items, &self.filter, self.policy);
        self.order = outcome.order;
        if let Some(notice) = outcome.notice {
            self.sink.apply(ViewEffect::Notice(notice));
        }
        self.render_rows();
    }

    /// Re-render with the same order from page one, e.g. after a bulk state change.
    fn render_rows(&mut self) {
        let rows = self.order.iter().map(|i| mod_row(&self.items[*i])).collect();
        self.list.reset_rows(rows, &mut self.sink);
        self.show_details();
        self.show_status();
    }

    /// Details of the focused mod, or an empty pane when nothing is shown.
    fn show_details(&mut self) {
        let (title, body) = self
            .focused_item()
            .map(|item| (item.details_title(), item.description.clone()))
            .unwrap_or_default();

        self.sink.apply(ViewEffect::ShowDetails {
            title,
            body: body.clone(),
        });
        self.description.reset(&body, &mut self.sink);
    }

    fn show_status(&mut self) {
        let enabled = self.items.iter().filter(|i| i.enabled).count();
        let mut status = format!("{} of {} mods enabled", enabled, self.items.len());
        if let Some(bytes) = self.enabled_size {
            status.push_str(&format!(" ({})", format_size(bytes)));
        }
        self.sink.apply(ViewEffect::Status(status));
    }

    fn toggle_focused(&mut self) -> Result<(), MenuError> {
        let Some(position) = self.list.selected() else {
            debug!("Nothing focused, ignoring toggle");
            return Ok(());
        };
        let Some(&index) = self.order.get(position) else {
            return Ok(());
        };

        let item = &mut self.items[index];
        item.enabled = !item.enabled;
        let (id, state, row) = (item.id, item.enabled, mod_row(item));
        info!("Mod {} {}", item.name(), if state { "enabled" } else { "disabled" });

        self.list.update_row(position, row, &mut self.sink);
        self.show_status();
        self.bridge.send(HostRequest::ToggleModRequest { id, state })
    }

    fn set_all(&mut self, state: bool) -> Result<(), MenuError> {
        for item in &mut self.items {
            item.enabled = state;
        }
        self.render_rows();
        self.bridge.send(HostRequest::ChangeAllRequest { state })
    }

    fn set_shown(&mut self, state: bool) -> Result<(), MenuError> {
        let mut ids = Vec::with_capacity(self.order.len());
        for index in &self.order {
            let item = &mut self.items[*index];
            item.enabled = state;
            ids.push(item.id);
        }
        self.render_rows();
        self.bridge.send(HostRequest::ChangeIndexesRequest { state, ids })
    }

    fn open_sub_menu(&mut self) {
        debug!("Opening category sub-menu");
        self.state = ModMenuState::SubMenu;
        self.sub_menu.open(&self.filter, &mut self.sink);
    }

    fn close_sub_menu(&mut self) {
        debug!("Applying checkbox filter {:?}", self.filter.selected());
        self.sub_menu.close(&mut self.sink);
        self.state = ModMenuState::ModMenu;
        self.cycler.reset();
        self.policy = EmptyFilterPolicy::FallbackToAll;
        self.refresh();
    }

    fn cycle_category(&mut self, forward: bool) {
        let category = self.cycler.cycle(forward, &mut self.filter).to_string();
        info!("Showing category {}", category);
        self.policy = EmptyFilterPolicy::ExplicitNotice;
        self.refresh();
    }

    fn handle_mod_menu(&mut self, action: LogicalAction) -> Result<(), MenuError> {
        match action {
            LogicalAction::ActivateSelected => self.toggle_focused()?,
            LogicalAction::Cancel => {
                info!("Closing mod menu");
                self.state = ModMenuState::Closed;
                self.bridge.send(HostRequest::ClosureRequest)?;
            }
            LogicalAction::ToggleCategoryMenu => self.open_sub_menu(),
            LogicalAction::PrevPage => {
                if self.list.previous_page(&mut self.sink) {
                    self.show_details();
                }
            }
            LogicalAction::NextPage => {
                if self.list.next_page(&mut self.sink) {
                    self.show_details();
                }
            }
            LogicalAction::PrevCategory => self.cycle_category(false),
            LogicalAction::NextCategory => self.cycle_category(true),
            LogicalAction::ScrollDescription(delta) => {
                self.description.scroll(delta, &mut self.sink)
            }
            LogicalAction::MoveUp
            | LogicalAction::MoveDown
            | LogicalAction::MoveLeftBlock
            | LogicalAction::MoveRightBlock => {
                if let Some(direction) = action.direction() {
                    if self.list.move_focus(direction, &mut self.sink) {
                        self.show_details();
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_sub_menu(&mut self, action: LogicalAction) -> Result<(), MenuError> {
        match action {
            LogicalAction::Cancel | LogicalAction::ToggleCategoryMenu => self.close_sub_menu(),
            LogicalAction::ActivateSelected => {
                match self.sub_menu.activate(&mut self.filter, &mut self.sink) {
                    SubMenuCommand::SetAll(state) => self.set_all(state)?,
                    SubMenuCommand::SetShown(state) => self.set_shown(state)?,
                    SubMenuCommand::FilterChanged | SubMenuCommand::Nothing => {}
                }
            }
            other => match other.direction() {
                Some(direction) => {
                    self.sub_menu.move_focus(direction, &mut self.sink);
                }
                None => debug!("{} ignored in sub-menu", other),
            },
        }
        Ok(())
    }
}

impl<B: HostBridge, V: ViewSink> MenuController for ModMenu<B, V> {
    fn handle(&mut self, action: LogicalAction) -> Result<(), MenuError> {
        match self.state {
            ModMenuState::ModMenu => self.handle_mod_menu(action),
            ModMenuState::SubMenu => self.handle_sub_menu(action),
            ModMenuState::Closed => {
                debug!("Mod menu closed, dropping {}", action);
                Ok(())
            }
        }
    }

    fn apply_update(&mut self, update: HostUpdate) {
        match update {
            HostUpdate::EnabledSize { bytes } => {
                debug!("Enabled mods take {} bytes", bytes);
                self.enabled_size = Some(bytes);
                self.show_status();
            }
            other => debug!("Mod menu ignores host update {:?}", other),
        }
    }

    fn is_closed(&self) -> bool {
        self.state == ModMenuState::Closed
    }
}

fn mod_row(item: &Item) -> Row {
    Row::new(item.name(), item.enabled)
}

/// Human readable byte count, binary units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

//! Workspace list and per-workspace options.

use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::config::MenuConfig;
use crate::host::bridge::HostBridge;
use crate::host::message::{HostRequest, HostUpdate};
use crate::host::prompt::Prompt;
use crate::mapping::action::LogicalAction;
use crate::mapping::bindings::FooterButton;
use crate::menu::error::MenuError;
use crate::menu::item::WorkspaceListing;
use crate::menu::list_view::{ListSettings, ListView};
use crate::menu::view::{ContainerId, Row, ViewEffect, ViewSink};
use crate::menu::MenuController;

/// Cannot be renamed or removed.
pub const DEFAULT_WORKSPACE: &str = "Default";
pub const CREATE_ENTRY: &str = "Create Workspace";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceOption {
    SetActive,
    Rename,
    Duplicate,
    Remove,
    Edit,
}

impl WorkspaceOption {
    pub const ALL: [WorkspaceOption; 5] = [
        WorkspaceOption::SetActive,
        WorkspaceOption::Rename,
        WorkspaceOption::Duplicate,
        WorkspaceOption::Remove,
        WorkspaceOption::Edit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkspaceOption::SetActive => "Set Active",
            WorkspaceOption::Rename => "Rename",
            WorkspaceOption::Duplicate => "Duplicate",
            WorkspaceOption::Remove => "Remove",
            WorkspaceOption::Edit => "Edit",
        }
    }

    fn allowed_for(self, workspace: &str) -> bool {
        !(is_protected(workspace)
            && matches!(self, WorkspaceOption::Rename | WorkspaceOption::Remove))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceView {
    List,
    Options { selected: String },
    Closed,
}

pub fn is_protected(name: &str) -> bool {
    name == DEFAULT_WORKSPACE
}

/// Case-insensitive, ties broken by the exact name.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub struct WorkspaceMenu<B, V, P> {
    workspaces: Vec<String>,
    active: String,
    view: WorkspaceView,
    list: ListView,
    options: ListView,
    bridge: B,
    sink: V,
    prompt: P,
}

impl<B: HostBridge, V: ViewSink, P: Prompt> WorkspaceMenu<B, V, P> {
    pub fn new(listing: WorkspaceListing, config: &MenuConfig, bridge: B, sink: V, prompt: P) -> Self {
        let settings = ListSettings {
            page_size: None,
            ..config.list_settings()
        };
        let mut menu = Self {
            workspaces: listing.workspaces,
            active: listing.active_workspace,
            view: WorkspaceView::List,
            list: ListView::new(ContainerId::Workspaces, &settings),
            options: ListView::new(ContainerId::WorkspaceOptions, &settings),
            bridge,
            sink,
            prompt,
        };
        menu.sort();
        info!(
            "Workspace menu opened with {} workspaces, active: {}",
            menu.workspaces.len(),
            menu.active
        );
        menu.show_list(0);
        menu
    }

    pub fn workspaces(&self) -> &[String] {
        &self.workspaces
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn view(&self) -> &WorkspaceView {
        &self.view
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn sink(&self) -> &V {
        &self.sink
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Workspace under the cursor in the list view, `None` on "Create Workspace".
    pub fn focused_workspace(&self) -> Option<&str> {
        self.list
            .selected()
            .and_then(|pos| self.workspaces.get(pos))
            .map(String::as_str)
    }

    pub fn focused_option(&self) -> Option<WorkspaceOption> {
        self.options
            .selected()
            .and_then(|pos| WorkspaceOption::ALL.get(pos).copied())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.workspaces.iter().position(|w| w == name)
    }

    fn sort(&mut self) {
        self.workspaces.sort_by(|a, b| compare_names(a, b));
    }

    fn check_new_name(&self, name: &str) -> Result<(), MenuError> {
        if name.trim().is_empty() {
            return Err(MenuError::EmptyName);
        }
        if self.position(name).is_some() {
            return Err(MenuError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn check_existing(&self, name: &str) -> Result<(), MenuError> {
        match self.position(name) {
            Some(_) => Ok(()),
            None => Err(MenuError::UnknownWorkspace(name.to_string())),
        }
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), MenuError> {
        self.check_existing(name)?;
        info!("Activating workspace {}", name);
        self.active = name.to_string();
        self.bridge.send(HostRequest::SetActive {
            name: name.to_string(),
        })
    }

    pub fn create(&mut self, name: &str) -> Result<(), MenuError> {
        self.check_new_name(name)?;
        info!("Creating workspace {}", name);
        self.workspaces.push(name.to_string());
        self.sort();
        self.bridge.send(HostRequest::Create {
            name: name.to_string(),
        })
    }

    pub fn rename(&mut self, source: &str, target: &str) -> Result<(), MenuError> {
        if is_protected(source) {
            return Err(MenuError::ProtectedWorkspace(source.to_string()));
        }
        self.check_existing(source)?;
        self.check_new_name(target)?;

        info!("Renaming workspace {} to {}", source, target);
        if let Some(pos) = self.position(source) {
            self.workspaces[pos] = target.to_string();
        }
        self.sort();
        self.bridge.send(HostRequest::Rename {
            source_name: source.to_string(),
            target_name: target.to_string(),
        })?;

        if self.active == source {
            self.set_active(target)?;
        }
        Ok(())
    }

    pub fn duplicate(&mut self, source: &str, target: &str) -> Result<(), MenuError> {
        self.check_existing(source)?;
        self.check_new_name(target)?;

        info!("Duplicating workspace {} as {}", source, target);
        self.workspaces.push(target.to_string());
        self.sort();
        self.bridge.send(HostRequest::Duplicate {
            source_name: source.to_string(),
            target_name: target.to_string(),
        })
    }

    pub fn remove(&mut self, name: &str) -> Result<(), MenuError> {
        if is_protected(name) {
            return Err(MenuError::ProtectedWorkspace(name.to_string()));
        }
        self.check_existing(name)?;

        info!("Removing workspace {}", name);
        self.workspaces.retain(|w| w != name);
        self.bridge.send(HostRequest::Remove {
            name: name.to_string(),
        })
    }

    pub fn edit(&mut self, name: &str) -> Result<(), MenuError> {
        self.check_existing(name)?;
        info!("Editing workspace {}", name);
        self.bridge.send(HostRequest::Edit {
            name: name.to_string(),
        })?;
        self.view = WorkspaceView::Closed;
        Ok(())
    }

    /// User mistakes become an alert, host failures are passed on.
    fn report(&mut self, result: Result<(), MenuError>) -> Result<(), MenuError> {
        match result {
            Err(e) if e.is_user_facing() => {
                warn!("{}", e);
                self.prompt.alert(&e.to_string());
                Ok(())
            }
            other => other,
        }
    }

    fn list_rows(&self) -> Vec<Row> {
        self.workspaces
            .iter()
            .map(|w| Row::new(w.clone(), *w == self.active))
            .chain(std::iter::once(Row::new(CREATE_ENTRY, false)))
            .collect()
    }

    fn option_rows(&self, workspace: &str) -> Vec<Row> {
        WorkspaceOption::ALL
            .iter()
            .map(|option| {
                let row = Row::new(
                    option.label(),
                    *option == WorkspaceOption::SetActive && workspace == self.active,
                );
                if option.allowed_for(workspace) {
                    row
                } else {
                    row.hidden()
                }
            })
            .collect()
    }

    fn show_list(&mut self, focus: usize) {
        self.view = WorkspaceView::List;
        self.sink.apply(ViewEffect::SetVisible {
            container: ContainerId::WorkspaceOptions,
            visible: false,
        });
        self.sink.apply(ViewEffect::SetVisible {
            container: ContainerId::Workspaces,
            visible: true,
        });
        self.sink
            .apply(ViewEffect::Status(format!("Active workspace: {}", self.active)));

        let rows = self.list_rows();
        self.list.set_rows(rows, &mut self.sink);
        self.list.focus_position(focus, &mut self.sink);
    }

    fn show_options(&mut self, selected: String) {
        debug!("Showing options for {}", selected);
        self.sink.apply(ViewEffect::SetVisible {
            container: ContainerId::Workspaces,
            visible: false,
        });
        self.sink.apply(ViewEffect::SetVisible {
            container: ContainerId::WorkspaceOptions,
            visible: true,
        });
        self.sink
            .apply(ViewEffect::Status(format!("Workspace: {}", selected)));

        let rows = self.option_rows(&selected);
        self.options.set_rows(rows, &mut self.sink);
        self.view = WorkspaceView::Options { selected };
    }

    fn back_to_list(&mut self, selected: &str) {
        let focus = self.position(selected).unwrap_or(0);
        self.show_list(focus);
    }

    fn handle_list(&mut self, action: LogicalAction) -> Result<(), MenuError> {
        let focused = self.focused_workspace().map(str::to_string);
        match action {
            LogicalAction::ActivateSelected => match focused {
                Some(name) => {
                    let result = self.set_active(&name);
                    self.report(result)?;
                    // move the check mark from the previous holder
                    for (pos, row) in self.list_rows().into_iter().enumerate() {
                        if self.list.row(pos).map(|r| r.checked) != Some(row.checked) {
                            self.list.update_row(pos, row, &mut self.sink);
                        }
                    }
                }
                None => {
                    let Some(name) = self.prompt.prompt("Enter new workspace name", "") else {
                        return Ok(());
                    };
                    let result = self.create(&name);
                    if result.is_ok() {
                        self.back_to_list(&name);
                    }
                    self.report(result)?;
                }
            },
            LogicalAction::ToggleCategoryMenu => {
                if let Some(name) = focused {
                    self.show_options(name);
                }
            }
            LogicalAction::Cancel => {
                info!("Closing workspace menu");
                self.view = WorkspaceView::Closed;
                self.bridge.send(HostRequest::ClosureRequest)?;
            }
            other => match other.direction() {
                Some(direction) => {
                    self.list.move_focus(direction, &mut self.sink);
                }
                None => debug!("{} ignored in workspace list", other),
            },
        }
        Ok(())
    }

    fn handle_options(&mut self, selected: String, action: LogicalAction) -> Result<(), MenuError> {
        match action {
            LogicalAction::ActivateSelected => {
                if let Some(option) = self.focused_option() {
                    self.run_option(selected, option)?;
                }
            }
            LogicalAction::Cancel => self.back_to_list(&selected),
            other => match other.direction() {
                Some(direction) => {
                    self.options.move_focus(direction, &mut self.sink);
                }
                None => debug!("{} ignored in workspace options", other),
            },
        }
        Ok(())
    }

    /// Ask for a name and copy `selected` under it. Returns whether a copy was made.
    fn prompt_duplicate(&mut self, selected: &str) -> Result<bool, MenuError> {
        let Some(target) = self
            .prompt
            .prompt("Name for duplicated workspace", selected)
        else {
            return Ok(false);
        };
        let result = self.duplicate(selected, &target);
        let duplicated = result.is_ok();
        self.report(result)?;
        Ok(duplicated)
    }

    fn run_option(&mut self, selected: String, option: WorkspaceOption) -> Result<(), MenuError> {
        match option {
            WorkspaceOption::SetActive => {
                let result = self.set_active(&selected);
                if result.is_ok() {
                    let rows = self.option_rows(&selected);
                    self.options.update_row(0, rows[0].clone(), &mut self.sink);
                }
                self.report(result)
            }
            WorkspaceOption::Rename => {
                let Some(target) = self.prompt.prompt("Rename workspace", &selected) else {
                    return Ok(());
                };
                let result = self.rename(&selected, &target);
                if result.is_ok() {
                    self.show_options(target);
                }
                self.report(result)
            }
            WorkspaceOption::Duplicate => self.prompt_duplicate(&selected).map(|_| ()),
            WorkspaceOption::Remove => {
                let first = format!("Do you really want to delete workspace {}?", selected);
                let second = format!(
                    "Are you really sure you want to delete workspace {}?",
                    selected
                );
                if !self.prompt.confirm(&first) || !self.prompt.confirm(&second) {
                    debug!("Removal of {} cancelled", selected);
                    return Ok(());
                }
                let result = self.remove(&selected);
                if result.is_ok() {
                    self.show_list(0);
                }
                self.report(result)
            }
            WorkspaceOption::Edit => {
                let result = self.edit(&selected);
                self.report(result)
            }
        }
    }
}

impl<B: HostBridge, V: ViewSink, P: Prompt> MenuController for WorkspaceMenu<B, V, P> {
    fn handle(&mut self, action: LogicalAction) -> Result<(), MenuError> {
        match self.view.clone() {
            WorkspaceView::List => self.handle_list(action),
            WorkspaceView::Options { selected } => self.handle_options(selected, action),
            WorkspaceView::Closed => {
                debug!("Workspace menu closed, dropping {}", action);
                Ok(())
            }
        }
    }

    fn apply_update(&mut self, update: HostUpdate) {
        debug!("Workspace menu ignores host update {:?}", update);
    }

    /// X duplicates the focused workspace straight from the list.
    fn footer(&mut self, button: FooterButton) -> Result<bool, MenuError> {
        if button == FooterButton::X && self.view == WorkspaceView::List {
            let Some(selected) = self.focused_workspace().map(str::to_string) else {
                return Ok(false);
            };
            if self.prompt_duplicate(&selected)? {
                self.back_to_list(&selected);
            }
            return Ok(true);
        }
        match button.action() {
            Some(action) => self.handle(action).map(|_| true),
            None => Ok(false),
        }
    }

    fn is_closed(&self) -> bool {
        self.view == WorkspaceView::Closed
    }
}

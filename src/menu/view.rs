//! View side effects.
//!
//! Controllers never touch a rendering surface directly. They describe what
//! should change as a [`ViewEffect`] and hand it to a [`ViewSink`]; the shell
//! decides how that looks.

use tracing::debug;

/// Scrollable regions a menu can render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId {
    Mods,
    SubMenu,
    Workspaces,
    WorkspaceOptions,
    Description,
    ConfigSections,
    ConfigValues,
}

/// One rendered row of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: String,
    pub checked: bool,
    pub visible: bool,
}

impl Row {
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            checked,
            visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEffect {
    /// Replace the rows of a container, `label` is the page indicator if any
    RenderPage {
        container: ContainerId,
        rows: Vec<Row>,
        label: Option<String>,
    },
    /// Show or hide a whole container
    SetVisible { container: ContainerId, visible: bool },
    ClearFocus { container: ContainerId, index: usize },
    SetFocus { container: ContainerId, index: usize },
    /// Update a single row in place without re-rendering the page
    UpdateRow {
        container: ContainerId,
        index: usize,
        row: Row,
    },
    CancelScroll { container: ContainerId },
    /// Instant jump, no tween
    ScrollTo { container: ContainerId, offset: f32 },
    ShowDetails { title: String, body: String },
    Status(String),
    Notice(String),
}

pub trait ViewSink {
    fn apply(&mut self, effect: ViewEffect);
}

/// Records effects in order. Handy for tests and for replaying a session.
impl ViewSink for Vec<ViewEffect> {
    fn apply(&mut self, effect: ViewEffect) {
        self.push(effect);
    }
}

/// Logs every effect. Used when no rendering shell is attached.
#[derive(Debug, Default)]
pub struct TracingSink {
    applied: usize,
}

impl TracingSink {
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl ViewSink for TracingSink {
    fn apply(&mut self, effect: ViewEffect) {
        self.applied += 1;
        match &effect {
            ViewEffect::RenderPage {
                container,
                rows,
                label,
            } => debug!(
                "Render {:?}: {} rows{}",
                container,
                rows.len(),
                label.as_deref().map(|l| format!(" ({})", l)).unwrap_or_default()
            ),
            other => debug!("View effect: {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_keeps_order() {
        let mut sink: Vec<ViewEffect> = Vec::new();
        sink.apply(ViewEffect::ClearFocus {
            container: ContainerId::Mods,
            index: 0,
        });
        sink.apply(ViewEffect::SetFocus {
            container: ContainerId::Mods,
            index: 1,
        });
        assert!(matches!(sink[0], ViewEffect::ClearFocus { index: 0, .. }));
        assert!(matches!(sink[1], ViewEffect::SetFocus { index: 1, .. }));
    }

    #[test]
    fn tracing_sink_counts_effects() {
        let mut sink = TracingSink::default();
        sink.apply(ViewEffect::Status("1 of 1".into()));
        assert_eq!(sink.applied(), 1);
    }
}

//! Mod and workspace records as the menus see them, plus the listing formats
//! the host hands over at load time.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Misc";
pub const UNKNOWN_VERSION: &str = "???";

/// One installable mod.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: u32,
    pub folder_name: String,
    pub display_name: String,
    pub category: String,
    pub enabled: bool,
    pub authors: Vec<String>,
    pub version: String,
    pub description: String,
    pub size: u64,
}

impl Item {
    pub fn new(id: u32, display_name: impl Into<String>, category: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            id,
            folder_name: display_name.clone(),
            display_name,
            category: category.into(),
            enabled: false,
            authors: Vec::new(),
            version: UNKNOWN_VERSION.to_string(),
            description: String::new(),
            size: 0,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Name used for display and sorting.
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.folder_name
        } else {
            &self.display_name
        }
    }

    pub fn details_title(&self) -> String {
        let authors = self
            .authors
            .iter()
            .filter(|a| !a.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if authors.is_empty() {
            format!("{} v{}", self.name(), self.version)
        } else {
            format!("{} v{} by {}", self.name(), self.version, authors)
        }
    }
}

/// Mod entry as it arrives from the host. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModEntry {
    pub id: Option<u32>,
    pub folder_name: Option<String>,
    pub display_name: Option<String>,
    pub is_disabled: Option<bool>,
    pub authors: Option<Authors>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub size: Option<u64>,
}

/// Authors come either as a list or as a single string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    List(Vec<String>),
    Single(String),
}

impl ModEntry {
    /// `position` stands in for a missing id.
    pub fn into_item(self, position: usize) -> Item {
        let folder_name = self.folder_name.unwrap_or_default();
        Item {
            id: self.id.unwrap_or(position as u32),
            display_name: self.display_name.unwrap_or_else(|| folder_name.clone()),
            folder_name,
            category: self
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            enabled: !self.is_disabled.unwrap_or(false),
            authors: match self.authors {
                Some(Authors::List(list)) => list,
                Some(Authors::Single(one)) => vec![one],
                None => Vec::new(),
            },
            version: self
                .version
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            description: self.description.unwrap_or_default(),
            size: self.size.unwrap_or(0),
        }
    }
}

pub fn parse_mod_listing(json: &str) -> Result<Vec<Item>, serde_json::Error> {
    let entries: Vec<ModEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| entry.into_item(position))
        .collect())
}

/// Workspace listing as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WorkspaceListing {
    pub workspaces: Vec<String>,
    pub active_workspace: String,
}

impl WorkspaceListing {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_get_defaults() {
        let items = parse_mod_listing(r#"[{"folder_name": "Ultimate S"}]"#).unwrap();
        let item = &items[0];
        assert_eq!(item.id, 0);
        assert_eq!(item.display_name, "Ultimate S");
        assert_eq!(item.category, DEFAULT_CATEGORY);
        assert_eq!(item.version, UNKNOWN_VERSION);
        assert!(item.enabled);
    }

    #[test]
    fn full_entry_is_kept() {
        let json = r#"[{
            "id": 12, "folder_name": "ssbu-fox", "display_name": "Fox Rework",
            "is_disabled": true, "authors": ["a", "b"], "version": "1.2",
            "description": "faster", "category": "Fighter", "size": 2048
        }]"#;
        let item = parse_mod_listing(json).unwrap().remove(0);
        assert_eq!(item.id, 12);
        assert!(!item.enabled);
        assert_eq!(item.authors, vec!["a", "b"]);
        assert_eq!(item.size, 2048);
        assert_eq!(item.details_title(), "Fox Rework v1.2 by a, b");
    }

    #[test]
    fn single_author_string_is_accepted() {
        let item = parse_mod_listing(r#"[{"id": 3, "authors": "Coolsonickirby"}]"#)
            .unwrap()
            .remove(0);
        assert_eq!(item.authors, vec!["Coolsonickirby"]);
    }

    #[test]
    fn name_falls_back_to_folder() {
        let mut item = Item::new(1, "", "Stage");
        item.folder_name = "battlefield".into();
        assert_eq!(item.name(), "battlefield");
    }

    #[test]
    fn parses_workspace_listing() {
        let listing = WorkspaceListing::parse(
            r#"{"workspaces": ["Default", "Casual"], "active_workspace": "Casual"}"#,
        )
        .unwrap();
        assert_eq!(listing.workspaces.len(), 2);
        assert_eq!(listing.active_workspace, "Casual");
    }
}

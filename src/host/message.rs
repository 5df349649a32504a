//! Messages exchanged with the host shell, serialized as externally tagged JSON.

use serde::{Deserialize, Serialize};

use crate::mapping::bindings::FooterButton;

/// Fire-and-forget requests sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostRequest {
    ToggleModRequest { id: u32, state: bool },
    ChangeAllRequest { state: bool },
    ChangeIndexesRequest { state: bool, ids: Vec<u32> },
    ClosureRequest,
    SetActive { name: String },
    Rename { source_name: String, target_name: String },
    Duplicate { source_name: String, target_name: String },
    Remove { name: String },
    Create { name: String },
    Edit { name: String },
    /// A configurator choice, sent as a bare `{"category", "value"}` object
    #[serde(untagged)]
    ConfigChanged { category: String, value: String },
}

impl HostRequest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Informational updates the host may push at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostUpdate {
    EnabledSize { bytes: u64 },
    /// Flip the visibility of the configurator row with this id
    ToggleRow { id: String },
}

impl HostUpdate {
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Anything the host pushes into the poll loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Update(HostUpdate),
    /// A footer button callback fired
    Footer(FooterButton),
}

impl Inbound {
    /// Accepts a [`HostUpdate`] object or a bare footer button name such as `"A"`.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        match HostUpdate::from_json(line) {
            Ok(update) => Ok(Inbound::Update(update)),
            Err(_) => serde_json::from_str(line).map(Inbound::Footer),
        }
    }
}

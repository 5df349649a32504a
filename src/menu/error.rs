// Menu errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MenuError {
    #[error("Workspace with that name already exists!")]
    DuplicateName(String),

    #[error("Workspace {0} cannot be renamed or removed")]
    ProtectedWorkspace(String),

    #[error("Unknown workspace: {0}")]
    UnknownWorkspace(String),

    #[error("Workspace name cannot be empty")]
    EmptyName,

    #[error("Host channel failure: {0}")]
    HostChannel(String),
}

impl MenuError {
    /// Errors the user caused and can recover from; everything else stops the loop.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, MenuError::HostChannel(_))
    }
}

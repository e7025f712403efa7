use thiserror::Error;

use crate::tab::TabIdentifier;

/// Errors raised by the tab registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A join arrived for a tab that is already a member of the group.
    #[error("tab {0} is already in the group")]
    DuplicateTab(TabIdentifier),
}

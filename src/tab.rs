use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one window in a tab group. The (name, uuid) pair is assigned by
/// the layout service and never reused for a live tab.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabIdentifier {
    pub name: String,
    pub uuid: String,
}

impl TabIdentifier {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
        }
    }
}

impl fmt::Display for TabIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.uuid, self.name)
    }
}

/// Display metadata attached to a tab when it joins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabEntry {
    pub identifier: TabIdentifier,
    pub properties: TabProperties,
}

impl TabEntry {
    pub fn new(identifier: TabIdentifier, properties: TabProperties) -> Self {
        Self {
            identifier,
            properties,
        }
    }

    /// Label shown in the tab strip: the tab's title, falling back to its name.
    pub fn label(&self) -> &str {
        self.properties
            .title
            .as_deref()
            .unwrap_or(&self.identifier.name)
    }
}

use crate::error::RegistryError;
use crate::tab::{TabEntry, TabIdentifier, TabProperties};

/// Local mirror of the tab group this window belongs to.
///
/// The layout service owns the real membership; the registry only replays
/// its notifications. Leave and activate notifications are applied
/// tolerantly since the service may deliver them out of order.
#[derive(Debug, Default)]
pub struct TabRegistry {
    members: Vec<TabEntry>,
    active_tab: Option<TabIdentifier>,
    is_maximized: bool,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tab at `index`, appending when `index` is past the end.
    /// Returns the updated members.
    pub fn add_tab(
        &mut self,
        id: TabIdentifier,
        properties: TabProperties,
        index: usize,
    ) -> Result<&[TabEntry], RegistryError> {
        if self.position(&id).is_some() {
            return Err(RegistryError::DuplicateTab(id));
        }
        let index = index.min(self.members.len());
        self.members.insert(index, TabEntry::new(id, properties));
        Ok(self.members.as_slice())
    }

    /// Remove a tab. Returns `None` when the tab was not a member.
    /// Removing the active tab clears the selection without promoting another.
    pub fn remove_tab(&mut self, id: &TabIdentifier) -> Option<&[TabEntry]> {
        let idx = self.position(id)?;
        self.members.remove(idx);
        if self.active_tab.as_ref() == Some(id) {
            self.active_tab = None;
        }
        Some(self.members.as_slice())
    }

    /// Record `id` as active. The id is kept even if it has not joined yet;
    /// returns whether it is currently a member.
    pub fn set_active_tab(&mut self, id: TabIdentifier) -> bool {
        let known = self.contains(&id);
        self.active_tab = Some(id);
        known
    }

    pub fn tabs(&self) -> &[TabEntry] {
        &self.members
    }

    pub fn active_tab(&self) -> Option<&TabIdentifier> {
        self.active_tab.as_ref()
    }

    pub fn active_entry(&self) -> Option<&TabEntry> {
        let id = self.active_tab.as_ref()?;
        self.members.iter().find(|e| &e.identifier == id)
    }

    /// Handle used to address whole-group chrome commands.
    pub fn representative(&self) -> Option<&TabIdentifier> {
        self.members.first().map(|e| &e.identifier)
    }

    pub fn contains(&self, id: &TabIdentifier) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    pub(crate) fn set_maximized(&mut self, maximized: bool) {
        self.is_maximized = maximized;
    }

    fn position(&self, id: &TabIdentifier) -> Option<usize> {
        self.members.iter().position(|e| &e.identifier == id)
    }
}

/// Window title for a set of members: their names joined by `separator`.
pub fn title_for(members: &[TabEntry], separator: &str) -> String {
    members
        .iter()
        .map(|e| e.identifier.name.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

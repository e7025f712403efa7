use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::host::WindowHost;
use crate::protocol::GroupCommand;
use crate::registry::TabRegistry;
use crate::service::LayoutService;

/// The three window-chrome controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromeButton {
    Minimize,
    /// Doubles as restore while the group is maximized.
    Maximize,
    Close,
}

impl ChromeButton {
    pub fn name(&self) -> &'static str {
        match self {
            ChromeButton::Minimize => "minimize",
            ChromeButton::Maximize => "maximize",
            ChromeButton::Close => "close",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    Normal,
    Maximized,
}

impl FrameState {
    pub fn of(registry: &TabRegistry) -> Self {
        if registry.is_maximized() {
            FrameState::Maximized
        } else {
            FrameState::Normal
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChromeOutcome {
    Issued(GroupCommand),
    /// The group had no members, so there was nothing to address.
    Skipped,
}

/// Turns chrome clicks into group commands aimed at the representative tab.
#[derive(Clone, Debug)]
pub struct WindowChrome {
    restore_class: String,
}

impl Default for WindowChrome {
    fn default() -> Self {
        Self::new("restore")
    }
}

impl WindowChrome {
    pub fn new(restore_class: impl Into<String>) -> Self {
        Self {
            restore_class: restore_class.into(),
        }
    }

    pub fn restore_class(&self) -> &str {
        &self.restore_class
    }

    /// Handle one click. The frame state and the restore class only change
    /// after the service accepted the command.
    pub fn click(
        &self,
        button: ChromeButton,
        registry: &mut TabRegistry,
        service: &mut dyn LayoutService,
        host: &mut dyn WindowHost,
    ) -> Result<ChromeOutcome> {
        let Some(tab_id) = registry.representative().cloned() else {
            tracing::warn!(
                button = button.name(),
                "chrome command ignored: tab group has no members"
            );
            return Ok(ChromeOutcome::Skipped);
        };

        let state = FrameState::of(registry);
        let command = match (button, state) {
            (ChromeButton::Minimize, _) => GroupCommand::MinimizeGroup { tab_id },
            (ChromeButton::Close, _) => GroupCommand::CloseGroup { tab_id },
            (ChromeButton::Maximize, FrameState::Normal) => GroupCommand::MaximizeGroup { tab_id },
            (ChromeButton::Maximize, FrameState::Maximized) => GroupCommand::RestoreGroup { tab_id },
        };

        service.dispatch(command.clone())?;
        tracing::debug!(command = command.name(), tab = %command.tab_id(), "issued group command");

        match &command {
            GroupCommand::MaximizeGroup { .. } => {
                registry.set_maximized(true);
                host.set_control_class(ChromeButton::Maximize, &self.restore_class, true);
            }
            GroupCommand::RestoreGroup { .. } => {
                registry.set_maximized(false);
                host.set_control_class(ChromeButton::Maximize, &self.restore_class, false);
            }
            GroupCommand::MinimizeGroup { .. } | GroupCommand::CloseGroup { .. } => {}
        }

        Ok(ChromeOutcome::Issued(command))
    }
}

use anyhow::Result;

use crate::chrome::{ChromeButton, ChromeOutcome, WindowChrome};
use crate::config::{Config, TitleConfig};
use crate::host::WindowHost;
use crate::protocol::LayoutEvent;
use crate::registry::{title_for, TabRegistry};
use crate::service::LayoutService;
use crate::tab::TabEntry;

/// Owns the tab registry for one tab-group window and routes layout events
/// and chrome clicks into it. Every handler runs to completion before the
/// next one starts.
pub struct TabWindowController<S, H> {
    registry: TabRegistry,
    chrome: WindowChrome,
    title: TitleConfig,
    service: S,
    host: H,
}

impl<S: LayoutService, H: WindowHost> TabWindowController<S, H> {
    pub fn new(config: &Config, service: S, host: H) -> Self {
        let mut controller = Self {
            registry: TabRegistry::new(),
            chrome: WindowChrome::new(config.chrome.restore_class.clone()),
            title: config.title.clone(),
            service,
            host,
        };
        controller.refresh_title();
        controller
    }

    pub fn handle_event(&mut self, event: LayoutEvent) {
        tracing::debug!(group = %event.tab_group_id(), tab = %event.tab_id(), "layout event");
        match event {
            LayoutEvent::JoinTabGroup(join) => {
                match self.registry.add_tab(join.tab_id, join.tab_props, join.index) {
                    Ok(members) => {
                        let title = render_title(members, &self.title);
                        self.host.set_title(&title);
                    }
                    Err(e) => tracing::warn!("ignoring join: {}", e),
                }
            }
            LayoutEvent::LeaveTabGroup(leave) => match self.registry.remove_tab(&leave.tab_id) {
                Some(members) => {
                    let title = render_title(members, &self.title);
                    self.host.set_title(&title);
                }
                None => tracing::debug!(tab = %leave.tab_id, "leave for unknown tab ignored"),
            },
            LayoutEvent::TabActivated(activated) => {
                let tab = activated.tab_id;
                if self.registry.set_active_tab(tab.clone()) {
                    if let Some(entry) = self.registry.active_entry() {
                        tracing::debug!(label = entry.label(), "tab activated");
                    }
                } else {
                    tracing::debug!(%tab, "activated tab has not joined yet; recorded anyway");
                }
            }
        }
    }

    pub fn handle_click(&mut self, button: ChromeButton) -> Result<ChromeOutcome> {
        self.chrome
            .click(button, &mut self.registry, &mut self.service, &mut self.host)
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn current_title(&self) -> String {
        render_title(self.registry.tabs(), &self.title)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn refresh_title(&mut self) {
        let title = self.current_title();
        self.host.set_title(&title);
    }
}

fn render_title(members: &[TabEntry], config: &TitleConfig) -> String {
    if members.is_empty() {
        config.empty.clone()
    } else {
        title_for(members, &config.separator)
    }
}

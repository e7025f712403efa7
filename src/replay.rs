use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::chrome::{ChromeButton, ChromeOutcome};
use crate::config::Config;
use crate::controller::TabWindowController;
use crate::host::PrintHost;
use crate::protocol::LayoutEvent;
use crate::service::RecordingService;

/// One line of a replay log: either a layout event as the service would
/// send it, or `{"click": "maximize"}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReplayStep {
    Click { click: ChromeButton },
    Event(LayoutEvent),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub commands: usize,
    pub skipped: usize,
}

/// Feed a JSON-lines log through a controller, printing title changes,
/// class changes and issued commands to `out`. Blank lines and `#` comments
/// are ignored.
pub fn replay<R: BufRead, W: Write>(config: &Config, input: R, out: W) -> Result<ReplaySummary> {
    let mut controller =
        TabWindowController::new(config, RecordingService::default(), PrintHost::new(out));
    let mut summary = ReplaySummary::default();

    for (lineno, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step: ReplayStep = serde_json::from_str(trimmed)
            .with_context(|| format!("line {}: not a layout event or click", lineno + 1))?;
        summary.steps += 1;

        match step {
            ReplayStep::Event(event) => controller.handle_event(event),
            ReplayStep::Click { click } => match controller.handle_click(click)? {
                ChromeOutcome::Issued(command) => {
                    summary.commands += 1;
                    controller
                        .host_mut()
                        .note(&format!("command: {} {}", command.name(), command.tab_id()));
                }
                ChromeOutcome::Skipped => {
                    summary.skipped += 1;
                    controller
                        .host_mut()
                        .note(&format!("skipped: {} (empty group)", click.name()));
                }
            },
        }
    }

    Ok(summary)
}

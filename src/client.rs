use anyhow::Result;
use crossterm::terminal;
use tokio::net::UnixStream;
use tokio::sync::mpsc;

use crate::chrome::ChromeOutcome;
use crate::config::Config;
use crate::controller::TabWindowController;
use crate::event::{self, AppEvent};
use crate::host::{TerminalHost, WindowHost};
use crate::protocol::{ClientMessage, GroupCommand};
use crate::service::{self, ChannelService, LayoutService};

/// Keeps the terminal in raw mode so single key presses reach the
/// controller. Only constructed once raw mode is on.
struct RawMode;

impl RawMode {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Restore the terminal before printing a panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        original_hook(panic_info);
    }));
}

/// Connect to the layout service and run the controller until the service
/// goes away or the user quits.
pub async fn run(config: Config) -> Result<()> {
    let sock = &config.service.socket;
    if !sock.exists() {
        anyhow::bail!("no layout service listening at {}", sock.display());
    }

    let stream = UnixStream::connect(sock).await?;
    tracing::info!("connected to layout service at {}", sock.display());
    let (read_half, write_half) = stream.into_split();

    let (msg_tx, msg_rx) = mpsc::unbounded_channel::<ClientMessage>();
    let writer = service::spawn_writer(write_half, msg_rx);
    msg_tx
        .send(ClientMessage::Hello {
            window: config.service.window.clone(),
        })
        .map_err(|_| anyhow::anyhow!("layout service writer stopped"))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
    event::start_service_reader(read_half, event_tx.clone());

    install_panic_hook();
    let _raw = RawMode::enter()?;
    event::start_key_reader(config.chrome.clone(), event_tx);

    let mut controller =
        TabWindowController::new(&config, ChannelService::new(msg_tx.clone()), TerminalHost::new());

    while let Some(event) = event_rx.recv().await {
        if !dispatch(&mut controller, event) {
            break;
        }
    }

    let _ = msg_tx.send(ClientMessage::Goodbye);
    drop(controller);
    drop(msg_tx);
    let _ = writer.await;
    tracing::info!("disconnected from layout service");
    Ok(())
}

/// Apply one event to the controller. Returns false when the loop should stop.
pub fn dispatch<S, H>(controller: &mut TabWindowController<S, H>, event: AppEvent) -> bool
where
    S: LayoutService,
    H: WindowHost,
{
    match event {
        AppEvent::Layout(layout_event) => controller.handle_event(layout_event),
        AppEvent::Click(button) => match controller.handle_click(button) {
            Ok(ChromeOutcome::Issued(GroupCommand::CloseGroup { .. })) => {
                tracing::info!("close requested for tab group");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(button = button.name(), "chrome command failed: {}", e),
        },
        AppEvent::ServiceError(e) => tracing::warn!("layout service error: {}", e),
        AppEvent::Disconnected | AppEvent::Quit => return false,
    }
    true
}

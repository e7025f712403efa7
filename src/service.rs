use anyhow::{anyhow, Result};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::framing;
use crate::protocol::{ClientMessage, GroupCommand};

/// Command side of the layout service.
pub trait LayoutService {
    fn dispatch(&mut self, command: GroupCommand) -> Result<()>;
}

/// Queues commands for a writer task that owns the socket's write half.
pub struct ChannelService {
    tx: mpsc::UnboundedSender<ClientMessage>,
}

impl ChannelService {
    pub fn new(tx: mpsc::UnboundedSender<ClientMessage>) -> Self {
        Self { tx }
    }
}

impl LayoutService for ChannelService {
    fn dispatch(&mut self, command: GroupCommand) -> Result<()> {
        self.tx
            .send(ClientMessage::Command(command))
            .map_err(|_| anyhow!("layout service connection closed"))
    }
}

/// Drain queued messages into `writer` as frames until the channel closes
/// or a write fails.
pub fn spawn_writer<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<ClientMessage>) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = framing::send(&mut writer, &msg).await {
                tracing::warn!("failed to write to layout service: {}", e);
                break;
            }
        }
    })
}

/// Keeps every dispatched command in order. Used by replay and tests.
#[derive(Debug, Default)]
pub struct RecordingService {
    pub commands: Vec<GroupCommand>,
}

impl LayoutService for RecordingService {
    fn dispatch(&mut self, command: GroupCommand) -> Result<()> {
        self.commands.push(command);
        Ok(())
    }
}

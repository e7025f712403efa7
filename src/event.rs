use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;

use crate::chrome::ChromeButton;
use crate::config::ChromeConfig;
use crate::framing;
use crate::protocol::{LayoutEvent, ServiceMessage};

#[derive(Debug)]
pub enum AppEvent {
    Layout(LayoutEvent),
    Click(ChromeButton),
    ServiceError(String),
    Disconnected,
    Quit,
}

/// Maps a key press onto a chrome control or a quit request.
pub fn map_key(key: &KeyEvent, keys: &ChromeConfig) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(AppEvent::Quit),
        KeyCode::Char(c) if c == keys.minimize_key => Some(AppEvent::Click(ChromeButton::Minimize)),
        KeyCode::Char(c) if c == keys.maximize_key => Some(AppEvent::Click(ChromeButton::Maximize)),
        KeyCode::Char(c) if c == keys.close_key => Some(AppEvent::Click(ChromeButton::Close)),
        _ => None,
    }
}

pub fn map_service_message(msg: ServiceMessage) -> AppEvent {
    match msg {
        ServiceMessage::Event(event) => AppEvent::Layout(event),
        ServiceMessage::Error(e) => AppEvent::ServiceError(e),
        ServiceMessage::Shutdown => AppEvent::Disconnected,
    }
}

/// Forward terminal key presses as chrome clicks.
pub fn start_key_reader(keys: ChromeConfig, event_tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(result) = reader.next().await {
            let event = match result {
                Ok(Event::Key(key)) => match map_key(&key, &keys) {
                    Some(e) => e,
                    None => continue,
                },
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("terminal input error: {}", e);
                    break;
                }
            };
            if event_tx.send(event).is_err() {
                break;
            }
        }
    });
}

/// Forward frames from the layout service. Malformed frames are skipped;
/// EOF or a read error ends the stream with `Disconnected`.
pub fn start_service_reader<R>(mut reader: R, event_tx: mpsc::UnboundedSender<AppEvent>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let msg: ServiceMessage = match framing::recv(&mut reader).await {
                Ok(Some(m)) => m,
                Ok(None) => break,
                Err(e) if e.is::<serde_json::Error>() => {
                    tracing::warn!("skipping malformed layout service message: {}", e);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("layout service read error: {}", e);
                    break;
                }
            };
            if event_tx.send(map_service_message(msg)).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::Disconnected);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TabGroupEvent;
    use crate::tab::TabIdentifier;
    use crossterm::event::KeyEventState;
    use tokio::net::UnixStream;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_map_default_keys() {
        let keys = ChromeConfig::default();
        assert!(matches!(
            map_key(&key(KeyCode::Char('n'), KeyModifiers::NONE), &keys),
            Some(AppEvent::Click(ChromeButton::Minimize))
        ));
        assert!(matches!(
            map_key(&key(KeyCode::Char('m'), KeyModifiers::NONE), &keys),
            Some(AppEvent::Click(ChromeButton::Maximize))
        ));
        assert!(matches!(
            map_key(&key(KeyCode::Char('q'), KeyModifiers::NONE), &keys),
            Some(AppEvent::Click(ChromeButton::Close))
        ));
        assert!(map_key(&key(KeyCode::Char('z'), KeyModifiers::NONE), &keys).is_none());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let keys = ChromeConfig::default();
        assert!(matches!(
            map_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), &keys),
            Some(AppEvent::Quit)
        ));
    }

    #[test]
    fn test_key_release_ignored() {
        let keys = ChromeConfig::default();
        let mut release = key(KeyCode::Char('m'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(map_key(&release, &keys).is_none());
    }

    #[tokio::test]
    async fn test_service_reader_forwards_and_disconnects() {
        let (mut a, b) = UnixStream::pair().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        start_service_reader(b, tx);

        framing::write_frame(&mut a, b"garbage").await.unwrap();
        let msg = ServiceMessage::Event(LayoutEvent::TabActivated(TabGroupEvent {
            tab_group_id: "g".to_string(),
            tab_id: TabIdentifier::new("A", "1"),
        }));
        framing::send(&mut a, &msg).await.unwrap();
        drop(a);

        match rx.recv().await {
            Some(AppEvent::Layout(LayoutEvent::TabActivated(e))) => {
                assert_eq!(e.tab_id, TabIdentifier::new("A", "1"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(rx.recv().await, Some(AppEvent::Disconnected)));
    }
}

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum frame size: 16 MiB. Prevents memory exhaustion from bad data.
pub const MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Write a length-prefixed frame to the stream.
pub async fn write_frame<W>(stream: &mut W, data: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(data.len())
        .ok()
        .filter(|len| *len <= MAX_FRAME_SIZE)
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("frame too large: {} bytes", data.len()),
            )
        })?;
    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(data).await?;
    stream.flush().await?;
    Ok(())
}

/// Read a length-prefixed frame from the stream.
/// Returns `Ok(None)` on clean EOF.
pub async fn read_frame<R>(stream: &mut R) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match stream.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_SIZE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("frame too large: {} bytes", len),
        ));
    }
    let mut buf = vec![0u8; len as usize];
    stream.read_exact(&mut buf).await?;
    Ok(Some(buf))
}

/// Serialize a message as JSON and write it as a length-prefixed frame.
pub async fn send<W, T>(stream: &mut W, msg: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let json = serde_json::to_vec(msg)?;
    write_frame(stream, &json).await?;
    Ok(())
}

/// Read a length-prefixed frame and deserialize it from JSON.
/// Returns `Ok(None)` on clean EOF. A body that is not valid JSON for `T`
/// fails with a `serde_json::Error`; the frame is consumed either way.
pub async fn recv<R, T>(stream: &mut R) -> Result<Option<T>>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    match read_frame(stream).await? {
        Some(data) => {
            let msg = serde_json::from_slice(&data)?;
            Ok(Some(msg))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ClientMessage, GroupCommand, LayoutEvent, ServiceMessage, TabGroupEvent};
    use crate::tab::TabIdentifier;
    use tokio::net::UnixStream;

    #[tokio::test]
    async fn test_frame_roundtrip() {
        let (mut a, mut b) = UnixStream::pair().unwrap();
        write_frame(&mut a, b"hello world").await.unwrap();
        let received = read_frame(&mut b).await.unwrap().unwrap();
        assert_eq!(received, b"hello world");
    }

    #[tokio::test]
    async fn test_multiple_frames_keep_order() {
        let (mut a, mut b) = UnixStream::pair().unwrap();
        write_frame(&mut a, b"first").await.unwrap();
        write_frame(&mut a, b"second").await.unwrap();
        assert_eq!(read_frame(&mut b).await.unwrap().unwrap(), b"first");
        assert_eq!(read_frame(&mut b).await.unwrap().unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_eof_returns_none() {
        let (a, mut b) = UnixStream::pair().unwrap();
        drop(a);
        assert!(read_frame(&mut b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oversized_length_rejected() {
        let (mut a, mut b) = UnixStream::pair().unwrap();
        a.write_all(&(MAX_FRAME_SIZE + 1).to_be_bytes()).await.unwrap();
        let err = read_frame(&mut b).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_service_event_over_socket() {
        let (mut a, mut b) = UnixStream::pair().unwrap();
        let msg = ServiceMessage::Event(LayoutEvent::TabActivated(TabGroupEvent {
            tab_group_id: "g".to_string(),
            tab_id: TabIdentifier::new("A", "1"),
        }));
        send(&mut a, &msg).await.unwrap();
        let received: ServiceMessage = recv(&mut b).await.unwrap().unwrap();
        assert_eq!(received, msg);
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_eof() {
        let (a, mut b) = UnixStream::pair().unwrap();
        drop(a);
        let result: Option<ClientMessage> = recv(&mut b).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_recv_rejects_malformed_json() {
        let (mut a, mut b) = UnixStream::pair().unwrap();
        write_frame(&mut a, b"{not json").await.unwrap();
        let err = recv::<_, ClientMessage>(&mut b).await.unwrap_err();
        assert!(err.is::<serde_json::Error>());

        send(
            &mut a,
            &ClientMessage::Command(GroupCommand::CloseGroup {
                tab_id: TabIdentifier::new("A", "1"),
            }),
        )
        .await
        .unwrap();
        let next: Option<ClientMessage> = recv(&mut b).await.unwrap();
        assert!(matches!(next, Some(ClientMessage::Command(_))));
    }
}

use crate::error::ClientError;
use crate::transport::wire::{Wire, WireConn, WireEvent};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use peerlink_core::protocol::Hello;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

/// Production wire: one WebSocket to the relay endpoint. The relay's first
/// frame must be a [`Hello`] carrying the connection-scoped id.
pub struct WsWire {
    url: String,
}

impl WsWire {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Wire for WsWire {
    async fn connect(&self) -> Result<WireConn, ClientError> {
        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ClientError::Connect(e.to_string()))?;
        let (mut ws_tx, mut ws_rx) = stream.split();

        let hello: Hello = loop {
            match ws_rx.next().await {
                Some(Ok(Message::Text(text))) => break serde_json::from_str(&text)?,
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(ClientError::Connect(e.to_string())),
                None => return Err(ClientError::TransportClosed),
            }
        };
        debug!(sid = %hello.sid, "relay connection established");

        let (out_tx, mut out_rx) = mpsc::channel::<Bytes>(64);
        let (in_tx, in_rx) = mpsc::channel::<WireEvent>(64);

        tokio::spawn(async move {
            while let Some(frame) = out_rx.recv().await {
                let text = match String::from_utf8(frame.to_vec()) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("dropping non-utf8 outbound frame: {e}");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            let _ = ws_tx.close().await;
        });

        tokio::spawn(async move {
            while let Some(msg) = ws_rx.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if in_tx
                            .send(WireEvent::Frame(Bytes::from(text.into_bytes())))
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                    Ok(Message::Binary(data)) => {
                        if in_tx.send(WireEvent::Frame(Bytes::from(data))).await.is_err() {
                            return;
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
            let _ = in_tx.send(WireEvent::Closed).await;
        });

        Ok(WireConn {
            sid: hello.sid,
            tx: out_tx,
            rx: in_rx,
        })
    }
}

//! Socket transport underneath the live channel.
//!
//! The channel drives any [`Connector`]; [`WsConnector`] is the production
//! implementation on top of tokio-tungstenite.

use super::ChannelError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Close code sent on a deliberate disconnect
pub const NORMAL_CLOSURE: u16 = 1000;

/// Event read from an open socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// A complete text frame
    Text(String),
    /// The peer closed the socket
    Closed { code: Option<u16>, reason: String },
    /// Transport failure; the socket is unusable afterwards
    Error(String),
}

/// Opens sockets to a URL.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Socket>, ChannelError>;
}

/// An open duplex socket carrying text frames.
#[async_trait]
pub trait Socket: Send {
    /// Next event from the peer; `None` once the socket is finished.
    async fn recv(&mut self) -> Option<SocketEvent>;

    async fn send_text(&mut self, text: String) -> Result<(), ChannelError>;

    async fn close(&mut self, code: u16, reason: &str) -> Result<(), ChannelError>;
}

/// WebSocket connector over tokio-tungstenite.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Socket>, ChannelError> {
        let (stream, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        Ok(Box::new(WsSocket {
            stream,
            closed: false,
        }))
    }
}

struct WsSocket {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

#[async_trait]
impl Socket for WsSocket {
    async fn recv(&mut self) -> Option<SocketEvent> {
        if self.closed {
            return None;
        }
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(SocketEvent::Text(text)),
                Some(Ok(Message::Close(frame))) => {
                    self.closed = true;
                    let (code, reason) = match frame {
                        Some(frame) => (Some(u16::from(frame.code)), frame.reason.into_owned()),
                        None => (None, String::new()),
                    };
                    return Some(SocketEvent::Closed { code, reason });
                }
                // Control frames are answered by tungstenite itself
                Some(Ok(Message::Binary(_)))
                | Some(Ok(Message::Ping(_)))
                | Some(Ok(Message::Pong(_)))
                | Some(Ok(Message::Frame(_))) => continue,
                Some(Err(err)) => {
                    self.closed = true;
                    return Some(SocketEvent::Error(err.to_string()));
                }
                None => {
                    self.closed = true;
                    return None;
                }
            }
        }
    }

    async fn send_text(&mut self, text: String) -> Result<(), ChannelError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }

    async fn close(&mut self, code: u16, reason: &str) -> Result<(), ChannelError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_string().into(),
        };
        self.stream
            .close(Some(frame))
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }
}

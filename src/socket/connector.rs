//! Opening the underlying streams: websocket and HTTP polling.
//!
//! A [`Connector`] turns an [`Endpoint`] and a [`TransportKind`] into a
//! [`FrameStream`] of decoded [`WireMessage`]s. The stream ending means the
//! server closed the connection; an `Err` item means it failed. Dropping the
//! stream closes it.

use std::fmt;
use std::time::Duration;

use futures_util::future::{self, BoxFuture};
use futures_util::stream::{self, BoxStream};
use futures_util::{FutureExt, SinkExt, StreamExt};
use reqwest::Url;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::TransportOptions;
use super::messages::WireMessage;
use crate::domain::{Endpoint, TransportKind};
use crate::error::ManagerError;

/// Stream of inbound envelopes for one open transport.
pub type FrameStream = BoxStream<'static, Result<WireMessage, ManagerError>>;

/// Opens transports. The registry shares one connector across all of them.
pub trait Connector: Send + Sync + fmt::Debug {
    /// Opens `kind` against `endpoint`.
    ///
    /// The returned future resolves once the transport is usable; the
    /// caller bounds it with the connection timeout.
    fn open(
        &self,
        endpoint: &Endpoint,
        kind: TransportKind,
        options: &TransportOptions,
    ) -> BoxFuture<'static, Result<FrameStream, ManagerError>>;
}

/// Connector speaking websocket (`tokio-tungstenite`) and HTTP polling
/// (`reqwest`).
#[derive(Debug, Clone, Default)]
pub struct NetworkConnector {
    http: reqwest::Client,
}

impl NetworkConnector {
    /// Creates a connector that polls with the given HTTP client.
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Connector for NetworkConnector {
    fn open(
        &self,
        endpoint: &Endpoint,
        kind: TransportKind,
        options: &TransportOptions,
    ) -> BoxFuture<'static, Result<FrameStream, ManagerError>> {
        match kind {
            TransportKind::Websocket => match endpoint.websocket_url() {
                Ok(url) => open_websocket(url, options.timeout_duration()).boxed(),
                Err(e) => future::ready(Err(e)).boxed(),
            },
            TransportKind::Polling => match endpoint.polling_url() {
                Ok(url) => open_polling(
                    self.http.clone(),
                    url,
                    options.poll_interval_duration(),
                    options.timeout_duration(),
                )
                .boxed(),
                Err(e) => future::ready(Err(e)).boxed(),
            },
        }
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Read side of an open websocket plus its keepalive bookkeeping.
struct WsReader {
    socket: WsStream,
    idle_limit: Duration,
    last_seen: Instant,
    pinged: bool,
}

async fn open_websocket(url: Url, idle_limit: Duration) -> Result<FrameStream, ManagerError> {
    tracing::debug!(url = %url, "opening websocket");
    let (socket, response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| ManagerError::Transport(format!("websocket handshake failed: {e}")))?;
    tracing::debug!(status = %response.status(), "websocket open");

    let reader = WsReader {
        socket,
        idle_limit,
        last_seen: Instant::now(),
        pinged: false,
    };
    Ok(stream::unfold(Some(reader), read_websocket).boxed())
}

/// Yields the next envelope. After half the idle limit without traffic a
/// ping goes out; with no traffic at all for the full limit the stream
/// fails, so half-open connections are noticed.
async fn read_websocket(
    reader: Option<WsReader>,
) -> Option<(Result<WireMessage, ManagerError>, Option<WsReader>)> {
    let mut reader = reader?;
    loop {
        let ping_at = reader.last_seen + reader.idle_limit / 2;
        let dead_at = reader.last_seen + reader.idle_limit;
        tokio::select! {
            msg = reader.socket.next() => {
                let msg = msg?;
                reader.last_seen = Instant::now();
                reader.pinged = false;
                if let Some(item) = decode_frame(msg) {
                    let next = item.is_ok().then_some(reader);
                    return Some((item, next));
                }
            }
            () = tokio::time::sleep_until(ping_at), if !reader.pinged => {
                reader.pinged = true;
                tracing::trace!("websocket quiet, sending ping");
                if let Err(e) = reader.socket.send(Message::Ping(Default::default())).await {
                    return Some((Err(ManagerError::Transport(format!("ping failed: {e}"))), None));
                }
            }
            () = tokio::time::sleep_until(dead_at) => {
                let idle_ms = u64::try_from(reader.idle_limit.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(idle_ms, "websocket idle, closing");
                return Some((
                    Err(ManagerError::Transport(format!("no websocket traffic for {idle_ms} ms"))),
                    None,
                ));
            }
        }
    }
}

/// Maps one websocket message to an envelope. Control and binary frames
/// are skipped; undecodable text frames are logged and skipped.
fn decode_frame(
    msg: Result<Message, tokio_tungstenite::tungstenite::Error>,
) -> Option<Result<WireMessage, ManagerError>> {
    match msg {
        Ok(Message::Text(text)) => match WireMessage::parse(text.as_str()) {
            Ok(envelope) => Some(Ok(envelope)),
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed websocket frame");
                None
            }
        },
        Ok(_) => None,
        Err(e) => Some(Err(ManagerError::Transport(e.to_string()))),
    }
}

async fn open_polling(
    http: reqwest::Client,
    url: Url,
    interval: Duration,
    request_timeout: Duration,
) -> Result<FrameStream, ManagerError> {
    tracing::debug!(url = %url, "opening polling transport");
    let first = poll_once(&http, &url, request_timeout).await?;

    let rest = stream::unfold(Some((http, url)), move |state| async move {
        let (http, url) = state?;
        tokio::time::sleep(interval).await;
        match poll_once(&http, &url, request_timeout).await {
            Ok(batch) => {
                let items: Vec<Result<WireMessage, ManagerError>> =
                    batch.into_iter().map(Ok).collect();
                Some((items, Some((http, url))))
            }
            Err(e) => Some((vec![Err(e)], None)),
        }
    })
    .flat_map(stream::iter);

    Ok(stream::iter(first.into_iter().map(Ok)).chain(rest).boxed())
}

/// One poll request, bounded by `request_timeout` so a server that never
/// answers ends the stream.
async fn poll_once(
    http: &reqwest::Client,
    url: &Url,
    request_timeout: Duration,
) -> Result<Vec<WireMessage>, ManagerError> {
    let request = async {
        let response = http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::Transport(format!("poll returned {status}")));
        }
        let body = response.text().await?;
        WireMessage::parse_batch(&body)
    };
    match tokio::time::timeout(request_timeout, request).await {
        Ok(result) => result,
        Err(_) => {
            let timeout_ms = u64::try_from(request_timeout.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(url = %url, timeout_ms, "poll request timed out");
            Err(ManagerError::Transport(format!(
                "poll got no answer within {timeout_ms} ms"
            )))
        }
    }
}

//! One WebSocket watch session.

use std::io::Write;

use futures_util::StreamExt;
use sleeper_server::domain::SessionMessage;
use sleeper_shared::time::Clock;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use crate::{error::ClientError, formatter::FeedFormatter};

/// Connect to a session URL and write the event feed to `out` until the connection ends.
///
/// Returns `Ok` when the server closes the socket with a close frame. A 4xx answer to the
/// upgrade request is reported as [`ClientError::Rejected`], any other failure to connect as
/// [`ClientError::Unreachable`]. Once connected, transport failures and streams ending
/// without a close frame are reported as [`ClientError::ConnectionError`].
pub async fn run_watch_session<W: Write>(
    url: &str,
    clock: &dyn Clock,
    out: &mut W,
) -> Result<(), ClientError> {
    let (mut socket, _) = match connect_async(url).await {
        Ok(connected) => connected,
        Err(WsError::Http(response)) if response.status().is_client_error() => {
            return Err(ClientError::Rejected(response.status().as_u16()));
        }
        Err(e) => return Err(ClientError::Unreachable(e.to_string())),
    };
    tracing::info!("Connected to {}", url);

    // Pings are answered by tungstenite while the stream is polled.
    while let Some(frame) = socket.next().await {
        let line = match frame {
            Ok(Message::Text(text)) => match SessionMessage::decode(text.as_str()) {
                Ok(message) => FeedFormatter::format_message(&message, &clock.now()),
                Err(e) => {
                    tracing::debug!("Frame is not a session event: {}", e);
                    FeedFormatter::format_raw_message(text.as_str())
                }
            },
            Ok(Message::Binary(data)) => FeedFormatter::format_binary_message(data.len()),
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                return Ok(());
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                return Err(ClientError::ConnectionError(e.to_string()));
            }
        };
        out.write_all(line.as_bytes())?;
        out.flush()?;
    }

    Err(ClientError::ConnectionError("Connection lost".to_string()))
}

//! WebSocket session handler.
//!
//! Each connection joins the room of one campaign and receives that campaign's events.
//! Clients never send events over the socket; inbound frames only prove liveness.
//!
//! ## 接続の流れ
//!
//! 1. `GET /ws/campaigns/{campaign_id}?user_id=` を検証し、WebSocket にアップグレード
//! 2. ConnectionProxy を作成してハブに登録
//! 3. 受信ループ（生存確認）と送信ループ（キューの送出と ping）を並行実行
//! 4. どちらかが終了したら登録解除し、送信ループが close フレームを送るのを待つ

use std::{fmt::Display, sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::time::{Instant, interval_at, timeout};

use crate::{
    domain::{CampaignId, UserId},
    infrastructure::{
        dto::{conversion::parse_id, http::SessionQuery},
        hub::{ConnectionConfig, ConnectionProxy, OutboundQueue, SessionHub},
    },
    ui::{error::ApiError, state::AppState},
};

pub async fn session_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, ApiError> {
    let campaign_id: CampaignId = parse_id(&campaign_id)?;
    let user_id: UserId = parse_id(query.user_id.as_deref().unwrap_or_default())?;

    let hub = state.hub.clone();
    let config = state.connection_config;
    Ok(ws
        .max_message_size(config.max_message_size)
        .on_upgrade(move |socket| run_session(socket, hub, config, campaign_id, user_id)))
}

async fn run_session(
    socket: WebSocket,
    hub: SessionHub,
    config: ConnectionConfig,
    campaign_id: CampaignId,
    user_id: UserId,
) {
    let (proxy, queue) = ConnectionProxy::new(campaign_id, user_id, config.outbound_capacity);
    let connection_id = proxy.id();
    if let Err(e) = hub.register(proxy) {
        tracing::warn!("Rejecting connection of user {}: {}", user_id, e);
        return;
    }
    tracing::info!(
        "Connection {} (user {}) joined campaign {}",
        connection_id,
        user_id,
        campaign_id
    );

    let (sink, stream) = socket.split();
    let mut writer = tokio::spawn(outbound_loop(sink, queue, config));
    let mut reader = tokio::spawn(inbound_loop(stream, config.pong_wait));

    let writer_finished = tokio::select! {
        end = &mut reader => {
            if let Ok(end) = end {
                tracing::debug!("Connection {} inbound ended: {:?}", connection_id, end);
            }
            false
        }
        _ = &mut writer => {
            reader.abort();
            true
        }
    };

    hub.unregister(campaign_id, connection_id);

    // Unregistering closes the queue; give the writer one write to send the close frame.
    if !writer_finished && timeout(config.write_wait, &mut writer).await.is_err() {
        writer.abort();
    }

    tracing::info!(
        "Connection {} (user {}) left campaign {}",
        connection_id,
        user_id,
        campaign_id
    );
}

/// Why the inbound loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundEnd {
    /// The peer sent a close frame.
    Closed,
    /// The stream ended without a close frame.
    Ended,
    /// No frame arrived within the pong wait.
    TimedOut,
    /// Transport error.
    Failed,
}

/// Read frames until the peer goes away. Any frame, pongs included, resets the deadline.
async fn inbound_loop<S, E>(mut stream: S, pong_wait: Duration) -> InboundEnd
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    loop {
        match timeout(pong_wait, stream.next()).await {
            Err(_) => return InboundEnd::TimedOut,
            Ok(None) => return InboundEnd::Ended,
            Ok(Some(Err(e))) => {
                tracing::debug!("WebSocket read error: {}", e);
                return InboundEnd::Failed;
            }
            Ok(Some(Ok(Message::Close(_)))) => return InboundEnd::Closed,
            Ok(Some(Ok(Message::Pong(_)))) => tracing::trace!("Received pong"),
            Ok(Some(Ok(_))) => tracing::trace!("Ignoring inbound frame"),
        }
    }
}

/// Write queued events and periodic pings until the queue closes or a write fails.
async fn outbound_loop<S>(mut sink: S, mut queue: OutboundQueue, config: ConnectionConfig)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let mut ping = interval_at(Instant::now() + config.ping_period, config.ping_period);

    loop {
        tokio::select! {
            next = queue.recv() => match next {
                Some(text) => {
                    if !write(&mut sink, Message::Text(text.into()), config.write_wait).await {
                        return;
                    }
                }
                None => {
                    // Unregistered, evicted, or the hub stopped.
                    write(&mut sink, Message::Close(None), config.write_wait).await;
                    return;
                }
            },
            _ = ping.tick() => {
                if !write(&mut sink, Message::Ping(Default::default()), config.write_wait).await {
                    return;
                }
            }
        }
    }
}

async fn write<S>(sink: &mut S, message: Message, write_wait: Duration) -> bool
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match timeout(write_wait, sink.send(message)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::debug!("WebSocket write failed: {}", e);
            false
        }
        Err(_) => {
            tracing::debug!("WebSocket write timed out after {:?}", write_wait);
            false
        }
    }
}

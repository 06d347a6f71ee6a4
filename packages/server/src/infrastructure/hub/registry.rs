//! Room registry owned by the hub coordinator.
//!
//! Plain synchronous state: every call is made from the coordinator task, one command at a
//! time, so no locking is needed here.

use std::collections::HashMap;

use crate::domain::{CampaignId, ConnectionId, SessionMessage};

use super::client::{ConnectionProxy, EnqueueError};

/// Result of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Connections removed because their queue was full or closed.
    pub evicted: Vec<ConnectionId>,
}

/// Campaign rooms and their member connections.
///
/// Invariant: a room present in the map has at least one member.
#[derive(Debug, Default)]
pub struct Registry {
    rooms: HashMap<CampaignId, HashMap<ConnectionId, ConnectionProxy>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a proxy to its campaign room, creating the room on first use.
    ///
    /// Returns `false` if a proxy with the same id is already registered.
    pub fn register(&mut self, proxy: ConnectionProxy) -> bool {
        let campaign_id = proxy.campaign_id();
        let room = self.rooms.entry(campaign_id).or_default();
        if room.contains_key(&proxy.id()) {
            return false;
        }
        tracing::info!(
            "Connection {} (user {}) registered for campaign {} (total: {})",
            proxy.id(),
            proxy.user_id(),
            campaign_id,
            room.len() + 1
        );
        room.insert(proxy.id(), proxy);
        true
    }

    /// Remove a proxy, closing its outbound queue, and prune the room if it is now empty.
    ///
    /// Returns `false` if the proxy was not registered.
    pub fn unregister(&mut self, campaign_id: CampaignId, connection_id: ConnectionId) -> bool {
        let Some(room) = self.rooms.get_mut(&campaign_id) else {
            return false;
        };
        let Some(proxy) = room.remove(&connection_id) else {
            return false;
        };
        drop(proxy);
        let remaining = room.len();
        if remaining == 0 {
            self.rooms.remove(&campaign_id);
        }
        tracing::info!(
            "Connection {} unregistered from campaign {} (remaining: {})",
            connection_id,
            campaign_id,
            remaining
        );
        true
    }

    /// Encode the message once and enqueue it for every member of the room.
    ///
    /// Members whose queue is full or closed are evicted before this returns. A missing
    /// room or an encoding failure delivers to nobody.
    pub fn broadcast(&mut self, message: &SessionMessage) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let Some(room) = self.rooms.get(&message.campaign_id) else {
            tracing::debug!(
                "No connections for campaign {}, dropping {} event",
                message.campaign_id,
                message.message_type().as_str()
            );
            return report;
        };

        let encoded = match message.encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(
                    "Failed to encode {} event for campaign {}: {}",
                    message.message_type().as_str(),
                    message.campaign_id,
                    e
                );
                return report;
            }
        };

        for (connection_id, proxy) in room {
            match proxy.try_enqueue(encoded.clone()) {
                Ok(()) => report.delivered += 1,
                Err(EnqueueError::Full) => {
                    tracing::warn!(
                        "Outbound queue full for connection {}, evicting slow consumer",
                        connection_id
                    );
                    report.evicted.push(*connection_id);
                }
                Err(EnqueueError::Closed) => {
                    tracing::debug!("Connection {} already closed, evicting", connection_id);
                    report.evicted.push(*connection_id);
                }
            }
        }

        for connection_id in &report.evicted {
            self.unregister(message.campaign_id, *connection_id);
        }

        tracing::debug!(
            "Broadcasted {} event to campaign {} (delivered: {}, evicted: {})",
            message.message_type().as_str(),
            message.campaign_id,
            report.delivered,
            report.evicted.len()
        );
        report
    }

    pub fn count_in_room(&self, campaign_id: CampaignId) -> usize {
        self.rooms.get(&campaign_id).map_or(0, HashMap::len)
    }

    #[cfg(test)]
    pub fn has_room(&self, campaign_id: CampaignId) -> bool {
        self.rooms.contains_key(&campaign_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Drop every room, closing all outbound queues.
    pub fn clear(&mut self) {
        let connections: usize = self.rooms.values().map(HashMap::len).sum();
        let rooms = self.room_count();
        self.rooms.clear();
        tracing::info!(
            "Closed {} session connections in {} rooms",
            connections,
            rooms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DayIncrementedPayload, SessionEvent, UserId},
        infrastructure::hub::client::OutboundQueue,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ルームの作成・削除（空のルームが残らないこと）
    // - ブロードキャストの配信と、遅い購読者の追い出し
    //
    // 【なぜこのテストが必要か】
    // - Registry はハブのコーディネータが唯一所有する共有状態
    // - 追い出しとルーム削除の不変条件はここで保証される
    // ========================================

    fn campaign(id: i64) -> CampaignId {
        CampaignId::new(id).unwrap()
    }

    fn proxy(campaign_id: i64, capacity: usize) -> (ConnectionProxy, OutboundQueue) {
        ConnectionProxy::new(campaign(campaign_id), UserId::new(1).unwrap(), capacity)
    }

    fn day_message(campaign_id: i64, day: u32) -> SessionMessage {
        SessionMessage::new(
            campaign(campaign_id),
            SessionEvent::DayIncremented(DayIncrementedPayload {
                campaign_id: campaign(campaign_id),
                current_day: day,
            }),
        )
    }

    #[test]
    fn test_register_then_unregister_prunes_room() {
        // テスト項目: 登録して解除するとルームごと消える
        // given (前提条件):
        let mut registry = Registry::new();
        let (proxy, _queue) = proxy(1, 4);
        let id = proxy.id();

        // when (操作):
        assert!(registry.register(proxy));
        assert_eq!(registry.count_in_room(campaign(1)), 1);
        let removed = registry.unregister(campaign(1), id);

        // then (期待する結果):
        assert!(removed);
        assert_eq!(registry.count_in_room(campaign(1)), 0);
        assert!(!registry.has_room(campaign(1)));
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn test_unregister_twice_is_noop() {
        // テスト項目: 二重解除や未登録の解除は何もしない
        let mut registry = Registry::new();
        let (first, _q1) = proxy(1, 4);
        let (second, _q2) = proxy(1, 4);
        let first_id = first.id();
        registry.register(first);
        registry.register(second);

        assert!(registry.unregister(campaign(1), first_id));
        assert!(!registry.unregister(campaign(1), first_id));
        assert!(!registry.unregister(campaign(2), first_id));
        assert_eq!(registry.count_in_room(campaign(1)), 1);
    }

    #[tokio::test]
    async fn test_unregister_closes_queue() {
        // テスト項目: 解除するとアウトバウンドキューが閉じる
        let mut registry = Registry::new();
        let (proxy, mut queue) = proxy(1, 4);
        let id = proxy.id();
        registry.register(proxy);

        registry.unregister(campaign(1), id);

        assert_eq!(queue.recv().await, None);
    }

    #[test]
    fn test_rooms_are_separated_by_campaign() {
        // テスト項目: キャンペーンごとにルームが分かれる
        let mut registry = Registry::new();
        let (a, _qa) = proxy(1, 4);
        let (b, _qb) = proxy(1, 4);
        let (c, _qc) = proxy(2, 4);
        registry.register(a);
        registry.register(b);
        registry.register(c);

        assert_eq!(registry.count_in_room(campaign(1)), 2);
        assert_eq!(registry.count_in_room(campaign(2)), 1);
        assert_eq!(registry.count_in_room(campaign(3)), 0);
        assert_eq!(registry.room_count(), 2);
    }

    #[test]
    fn test_broadcast_to_missing_room_delivers_to_nobody() {
        // テスト項目: メンバーのいないキャンペーンへの配信は何もせず成功する
        let mut registry = Registry::new();

        let report = registry.broadcast(&day_message(9, 2));

        assert_eq!(report, BroadcastReport::default());
        assert_eq!(registry.room_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_target_room() {
        // テスト項目: 配信は対象キャンペーンのメンバーだけに届く
        // given (前提条件):
        let mut registry = Registry::new();
        let (a, mut qa) = proxy(1, 4);
        let (b, mut qb) = proxy(2, 4);
        registry.register(a);
        registry.register(b);

        // when (操作):
        let report = registry.broadcast(&day_message(1, 4));

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        let received = qa.recv().await.unwrap();
        assert_eq!(
            SessionMessage::decode(&received).unwrap(),
            day_message(1, 4)
        );
        assert!(qb.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_saturated_consumer_is_evicted() {
        // テスト項目: キューが満杯の接続は配信中に追い出され、以後の配信対象にならない
        // given (前提条件):
        let mut registry = Registry::new();
        let (slow, mut slow_queue) = proxy(1, 1);
        let (healthy, mut healthy_queue) = proxy(1, 8);
        let slow_id = slow.id();
        registry.register(slow);
        registry.register(healthy);
        registry.broadcast(&day_message(1, 2));

        // when (操作): slow のキューは既に満杯
        let report = registry.broadcast(&day_message(1, 3));

        // then (期待する結果):
        assert_eq!(report.evicted, vec![slow_id]);
        assert_eq!(report.delivered, 1);
        assert_eq!(registry.count_in_room(campaign(1)), 1);

        let next = registry.broadcast(&day_message(1, 4));
        assert_eq!(next.delivered, 1);
        assert!(next.evicted.is_empty());

        // slow は 1 件だけ受け取ってキューが閉じる
        assert!(slow_queue.recv().await.is_some());
        assert_eq!(slow_queue.recv().await, None);
        // healthy は順番通りに 3 件受け取る
        for day in [2, 3, 4] {
            let text = healthy_queue.recv().await.unwrap();
            assert_eq!(SessionMessage::decode(&text).unwrap(), day_message(1, day));
        }
    }

    #[test]
    fn test_closed_consumer_is_evicted_and_room_pruned() {
        // テスト項目: 受信側が閉じた接続は追い出され、空になったルームは削除される
        let mut registry = Registry::new();
        let (gone, queue) = proxy(1, 4);
        registry.register(gone);
        drop(queue);

        let report = registry.broadcast(&day_message(1, 2));

        assert_eq!(report.delivered, 0);
        assert_eq!(report.evicted.len(), 1);
        assert!(!registry.has_room(campaign(1)));
    }

    #[tokio::test]
    async fn test_clear_closes_every_queue() {
        // テスト項目: clear で全ルームが削除され、全キューが閉じる
        let mut registry = Registry::new();
        let (a, mut qa) = proxy(1, 4);
        let (b, mut qb) = proxy(2, 4);
        registry.register(a);
        registry.register(b);

        registry.clear();

        assert_eq!(registry.room_count(), 0);
        assert_eq!(qa.recv().await, None);
        assert_eq!(qb.recv().await, None);
    }
}

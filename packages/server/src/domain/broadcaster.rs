//! Broadcaster trait 定義
//!
//! ユースケース層がイベントをキャンペーンのルームへ配信するためのインターフェース。
//! 具体的な実装（セッションハブ）は Infrastructure 層が提供します。

use super::event::SessionMessage;

/// Fan-out of session events to a campaign room.
///
/// Broadcasting is fire-and-forget: a room without members, or a hub that has stopped,
/// is not an error for the caller.
#[cfg_attr(test, mockall::automock)]
pub trait SessionBroadcaster: Send + Sync {
    fn broadcast(&self, message: SessionMessage);
}

// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin push mode: the admin's messages are relayed to a target user.

use std::sync::Arc;

use tracing::{info, warn};

use wanglai_config::model::AdminConfig;
use wanglai_core::{ChatTransport, KeyValueStore, ReplySegment};

pub const ENABLE_COMMAND: &str = "開啟Push模式";
pub const DISABLE_COMMAND: &str = "關閉Push模式";
pub const STATUS_COMMAND: &str = "Push狀態";

pub const ENABLED_REPLY: &str = "已開啟 Push 模式。您發送的所有消息將被轉發給目標用戶。";
pub const DISABLED_REPLY: &str = "已關閉 Push 模式。";
pub const STATUS_ON_REPLY: &str = "Push 模式目前已開啟";
pub const STATUS_OFF_REPLY: &str = "Push 模式目前已關閉";
pub const FORWARDED_REPLY: &str = "已成功轉發消息給目標用戶。";
pub const FORWARD_FAILED_REPLY: &str = "消息轉發失敗，請稍後再試。";

const PUSH_MODE_KEY: &str = "admin:push_mode";

pub struct AdminCommands {
    admin_user_id: Option<String>,
    target_user_id: Option<String>,
    state: Arc<dyn KeyValueStore>,
    transport: Arc<dyn ChatTransport>,
}

impl AdminCommands {
    pub fn new(
        config: &AdminConfig,
        state: Arc<dyn KeyValueStore>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            admin_user_id: config.admin_user_id.clone().filter(|id| !id.is_empty()),
            target_user_id: config.target_user_id.clone().filter(|id| !id.is_empty()),
            state,
            transport,
        }
    }

    async fn push_mode(&self) -> bool {
        match self.state.get(PUSH_MODE_KEY).await {
            Ok(value) => value.as_deref() == Some("on"),
            Err(e) => {
                warn!(error = %e, "push mode lookup failed");
                false
            }
        }
    }

    async fn set_push_mode(&self, enabled: bool) {
        let result = if enabled {
            self.state.set(PUSH_MODE_KEY, "on".to_string(), None).await
        } else {
            self.state.delete(PUSH_MODE_KEY).await.map(|_| ())
        };
        match result {
            Ok(()) => info!(enabled, "admin push mode toggled"),
            Err(e) => warn!(error = %e, enabled, "failed to persist push mode"),
        }
    }

    async fn forward(&self, text: &str) -> &'static str {
        let Some(target) = self.target_user_id.as_deref() else {
            warn!("push mode is on but no target user is configured");
            return FORWARD_FAILED_REPLY;
        };
        let message = ReplySegment::text(format!("管理員消息: {text}"));
        match self.transport.push(target, &[message]).await {
            Ok(()) => FORWARDED_REPLY,
            Err(e) => {
                warn!(error = %e, target, "admin forward failed");
                FORWARD_FAILED_REPLY
            }
        }
    }

    /// Reply text when `text` from `user_id` is an admin action, `None` when
    /// the message should go to the backend as usual.
    pub async fn handle(&self, user_id: &str, text: &str) -> Option<&'static str> {
        if self.admin_user_id.as_deref() != Some(user_id) {
            return None;
        }
        match text {
            ENABLE_COMMAND => {
                self.set_push_mode(true).await;
                Some(ENABLED_REPLY)
            }
            DISABLE_COMMAND => {
                self.set_push_mode(false).await;
                Some(DISABLED_REPLY)
            }
            STATUS_COMMAND => Some(if self.push_mode().await {
                STATUS_ON_REPLY
            } else {
                STATUS_OFF_REPLY
            }),
            _ if self.push_mode().await => Some(self.forward(text).await),
            _ => None,
        }
    }
}

// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery of assembled segments within the platform's per-call limit.

use tracing::{debug, error, warn};

use wanglai_core::{ChatTransport, MAX_SEGMENTS_PER_CALL, ReplySegment};

/// Sends `segments` in chunks of at most five.
///
/// The first chunk uses the one-shot reply token; if that fails, or for every
/// later chunk, the segments are pushed to the user instead.
pub async fn transmit(
    transport: &dyn ChatTransport,
    reply_token: Option<&str>,
    user_id: &str,
    segments: &[ReplySegment],
) {
    for (index, chunk) in segments.chunks(MAX_SEGMENTS_PER_CALL).enumerate() {
        if index == 0 {
            if let Some(token) = reply_token {
                match transport.reply(token, chunk).await {
                    Ok(()) => {
                        debug!(user_id, count = chunk.len(), "replied");
                        continue;
                    }
                    Err(e) => warn!(error = %e, user_id, "reply failed; falling back to push"),
                }
            }
        }
        if let Err(e) = transport.push(user_id, chunk).await {
            error!(error = %e, user_id, chunk = index, "push failed");
        }
    }
}

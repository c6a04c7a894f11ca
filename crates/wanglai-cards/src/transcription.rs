// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde_json::Value;

use crate::flex::{Bubble, FlexBox, Text};

pub const TRANSCRIPTION_ALT_TEXT: &str = "語音訊息內容";

/// Echoes a voice message's transcript back to the sender.
pub fn render_transcription(transcript: &str) -> Result<Value, serde_json::Error> {
    let body = FlexBox::vertical()
        .background("#1DB446")
        .padding_all("12px")
        .corner_radius("8px")
        .push(
            Text::new(format!("：{transcript}"))
                .size("sm")
                .color("#FFFFFF")
                .wrap(),
        );
    Bubble::new(body).size("kilo").to_value()
}

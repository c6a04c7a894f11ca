// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Card Renderer for the Wanglai bot.
//!
//! Cards are assembled with the typed builder in [`flex`] and serialized to
//! JSON trees, so every card is structurally valid by construction. Record
//! rendering never fails; the other renderers return serialization errors
//! for the caller to turn into an apology.

pub mod category;
pub mod flex;
pub mod record;
pub mod summary;
pub mod transcription;
pub mod tutorial;

use serde_json::Value;

pub use category::{CATEGORY_ALT_TEXT, render_category_list};
pub use record::{Variant, record_label, render_record, variant};
pub use summary::{NO_ANALYSIS_CAPTION, PALETTE, ZERO_AMOUNT, render_balance_summary, render_summary};
pub use transcription::{TRANSCRIPTION_ALT_TEXT, render_transcription};
pub use tutorial::{TUTORIAL_ALT_TEXTS, tutorial_cards};

/// Checks that a card payload is a bubble with a body box, or a non-empty
/// carousel of such bubbles.
pub fn is_well_formed(contents: &Value) -> bool {
    fn bubble(value: &Value) -> bool {
        value["type"] == "bubble" && value["body"]["type"] == "box"
    }
    match contents["type"].as_str() {
        Some("bubble") => bubble(contents),
        Some("carousel") => contents["contents"]
            .as_array()
            .is_some_and(|items| !items.is_empty() && items.iter().all(bubble)),
        _ => false,
    }
}

// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Currency strings.

const GLYPHS: [char; 3] = ['$', '¥', '￥'];

/// `$ 1,234` with no decimals; negatives render as `$ -1,234`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("$ {sign}{grouped}")
}

/// Reads a figure such as `$ 1,200.50` or `￥300` back into a number.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !GLYPHS.contains(c) && *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Prefixes `$ ` unless the figure already starts with a currency glyph.
pub fn with_glyph(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with(GLYPHS) {
        raw.to_string()
    } else {
        format!("$ {raw}")
    }
}

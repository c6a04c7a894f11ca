// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two-part beginner tutorial.

use serde_json::Value;

use crate::flex::{Bubble, FlexBox, Separator, Text};

pub const TUTORIAL_ALT_TEXTS: [&str; 2] = ["🍍旺來新手教學 (上)", "🍍旺來新手教學 (下)"];

const ACCENT: &str = "#1DB446";

const RECORDING: &[(&str, &str)] = &[
    ("文字記帳", "直接輸入消費內容，例如「午餐 120」或「薪水 30000」。"),
    ("語音記帳", "傳送語音訊息，例如「晚餐吃拉麵一百八」，旺來會幫你轉成文字並記帳。"),
    ("拍照記帳", "拍下發票或收據傳給旺來，自動辨識金額與分類。"),
    ("修改紀錄", "點擊紀錄卡片下方的「編輯紀錄」即可修改或刪除。"),
];

const QUERYING: &[(&str, &str)] = &[
    ("收支總結", "輸入「日支出總結」「週收入總結」「月支出總結」等查看分析。"),
    ("餘額", "輸入「餘額」或「月結餘」查看本月收入、支出與結餘。"),
    ("分類", "輸入「分類」查看所有可用的收支分類。"),
    ("快速選單", "點擊下方的「明細」「分析」「我的」開啟對應頁面。"),
    ("重新開始", "輸入「delete」重置對話。"),
];

/// Builds both tutorial bubbles, paired with their alt-texts.
pub fn tutorial_cards() -> Result<Vec<(&'static str, Value)>, serde_json::Error> {
    let parts = [
        ("🍍 旺來怎麼記帳", RECORDING),
        ("🍍 旺來怎麼查詢", QUERYING),
    ];
    parts
        .iter()
        .zip(TUTORIAL_ALT_TEXTS)
        .map(|((title, steps), alt)| Ok((alt, tutorial_bubble(title, steps).to_value()?)))
        .collect()
}

fn tutorial_bubble(title: &str, steps: &[(&str, &str)]) -> Bubble {
    let header = FlexBox::vertical()
        .background(ACCENT)
        .padding_all("16px")
        .push(Text::new(title).size("lg").bold().color("#FFFFFF"));

    let mut body = FlexBox::vertical().spacing("md").padding_all("16px");
    for (i, (heading, detail)) in steps.iter().enumerate() {
        if i > 0 {
            body = body.push(Separator::new());
        }
        body = body.push(
            FlexBox::vertical()
                .spacing("xs")
                .push(Text::new(*heading).size("md").bold().color(ACCENT))
                .push(Text::new(*detail).size("sm").color("#555555").wrap()),
        );
    }
    Bubble::new(body).header(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_two_parts_in_order() {
        let cards = tutorial_cards().unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].0, "🍍旺來新手教學 (上)");
        assert_eq!(cards[1].0, "🍍旺來新手教學 (下)");
        assert_eq!(cards[0].1["type"], "bubble");
        assert_eq!(cards[1].1["header"]["contents"][0]["text"], "🍍 旺來怎麼查詢");
    }

    #[test]
    fn steps_are_separated() {
        let cards = tutorial_cards().unwrap();
        let body = cards[0].1["body"]["contents"].as_array().unwrap();
        assert_eq!(body.len(), RECORDING.len() * 2 - 1);
        assert_eq!(body[1]["type"], "separator");
    }
}

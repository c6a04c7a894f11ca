// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar boundaries in the bot's fixed timezone.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Offset, Utc};
use wanglai_core::DateRange;

use crate::keyword::Period;

/// Fixed offset for `hours` east of UTC, falling back to UTC when out of range.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

pub fn local_date(offset: FixedOffset, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Inclusive range covered by `period`, ending today. Weeks start on Monday.
pub fn resolve(period: Period, today: NaiveDate) -> DateRange {
    let start = match period {
        Period::Day => today,
        Period::Week => today
            .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_monday())))
            .unwrap_or(today),
        Period::Month => today.with_day(1).unwrap_or(today),
        Period::AllTime => NaiveDate::MIN,
    };
    DateRange::new(start, today)
}

/// `以下是本週 2024/01/01 - 2024/01/03的分析`; `None` for all-time requests.
pub fn caption(period: Period, range: DateRange) -> Option<String> {
    let fmt = "%Y/%m/%d";
    let span = match period {
        Period::AllTime => return None,
        Period::Day => range.end.format(fmt).to_string(),
        Period::Week | Period::Month => format!(
            "{} - {}",
            range.start.format(fmt),
            range.end.format(fmt)
        ),
    };
    Some(format!("以下是本{} {span}的分析", period.glyph()))
}

//! Synthetic activity-log fixtures.
//!
//! Produces a rolling window of daily log entries (3–7 per day, between
//! 09:00 and 23:59) and writes them as a three-column CSV:
//!
//! ```text
//! 日付,内容,記録日時
//! 2026/09/18,筋トレを実施。次のステップへ。,2026/09/18 09:41
//! ```
//!
//! Unrelated to the validator; used only to seed import tests.

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rand::Rng;
use serde::Serialize;

/// Default window length in days (the end day is included, so 31 dates).
pub const DEFAULT_DAYS: u32 = 30;

/// Date column format.
pub const DATE_FORMAT: &str = "%Y/%m/%d";
/// Timestamp column format.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Category headings and the activities drawn under each.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "【仕事・企画】",
        &["プロジェクト計画作成", "チーム定例MTG", "資料作成", "クライアント提案", "メール返信"],
    ),
    (
        "【技術・開発】",
        &["リファクタリング", "バグ修正", "新機能実装", "コードレビュー", "ドキュメント更新"],
    ),
    (
        "【学び・勉強】",
        &["技術書読書", "オンライン講座", "Qiita記事執筆", "ニュースチェック"],
    ),
    (
        "【健康・身体】",
        &["筋トレ", "ジョギング", "昼寝", "サプリ摂取", "ストレッチ"],
    ),
    (
        "【家族・子ども】",
        &["子供と遊ぶ", "買い物", "料理", "掃除", "家族会議"],
    ),
    (
        "【趣味・遊び】",
        &["ゲーム", "映画鑑賞", "漫画", "散歩", "カフェ"],
    ),
];

/// One generated log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    /// Free-form entry text.
    pub text: String,
    /// When the entry was recorded (minute precision).
    pub recorded_at: NaiveDateTime,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "日付")]
    date: String,
    #[serde(rename = "内容")]
    text: &'a str,
    #[serde(rename = "記録日時")]
    recorded_at: String,
}

/// Generates entries for every day in `end - days ..= end`, sorted by timestamp.
///
/// Fails when the window would start before the earliest date chrono can
/// represent.
pub fn generate_entries<R: Rng>(
    rng: &mut R,
    end: NaiveDateTime,
    days: u32,
) -> Result<Vec<ActivityEntry>> {
    let mut entries = Vec::new();
    let mut current = end
        .checked_sub_signed(Duration::days(i64::from(days)))
        .with_context(|| format!("A {days}-day window ending {end} is out of range"))?;

    while current <= end {
        let daily_count = rng.gen_range(3..=7);
        for _ in 0..daily_count {
            let (_, activities) = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            let activity = activities[rng.gen_range(0..activities.len())];

            let hour = rng.gen_range(9..=23);
            let minute = rng.gen_range(0..=59);
            let time = NaiveTime::from_hms_opt(hour, minute, 0)
                .with_context(|| format!("Invalid time {hour}:{minute}"))?;

            entries.push(ActivityEntry {
                text: format!("{activity}を実施。次のステップへ。"),
                recorded_at: current.date().and_time(time),
            });
        }
        current += Duration::days(1);
    }

    entries.sort_by_key(|e| e.recorded_at);
    Ok(entries)
}

/// Writes the header and one row per entry, CRLF-terminated.
pub fn write_csv<W: Write>(writer: W, entries: &[ActivityEntry]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    for entry in entries {
        csv_writer
            .serialize(CsvRow {
                date: entry.recorded_at.format(DATE_FORMAT).to_string(),
                text: &entry.text,
                recorded_at: entry.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            })
            .context("CSV write error")?;
    }
    if entries.is_empty() {
        csv_writer
            .write_record(["日付", "内容", "記録日時"])
            .context("CSV write error")?;
    }
    csv_writer.flush().context("CSV flush error")?;
    Ok(())
}

/// Writes entries to `path`, creating or truncating it.
pub fn write_csv_file(path: &Path, entries: &[ActivityEntry]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    write_csv(file, entries)
}

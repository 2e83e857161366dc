use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ippo_fixtures::{generate_entries, write_csv, CATEGORIES, DEFAULT_DAYS};

fn end() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|d| d.and_hms_opt(21, 5, 30))
        .expect("valid date")
}

#[test]
fn month_window_has_31_days_of_3_to_7_entries() {
    let mut rng = StdRng::seed_from_u64(42);
    let entries = generate_entries(&mut rng, end(), DEFAULT_DAYS).expect("generate");

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for e in &entries {
        *per_day.entry(e.recorded_at.date()).or_default() += 1;
    }

    assert_eq!(per_day.len(), 31);
    assert_eq!(per_day.keys().next().copied(), NaiveDate::from_ymd_opt(2026, 9, 18));
    assert_eq!(per_day.keys().last().copied(), NaiveDate::from_ymd_opt(2026, 10, 18));
    assert!(per_day.values().all(|n| (3..=7).contains(n)));
}

#[test]
fn timestamps_are_in_window_and_sorted() {
    let mut rng = StdRng::seed_from_u64(7);
    let entries = generate_entries(&mut rng, end(), DEFAULT_DAYS).expect("generate");

    assert!(entries.iter().all(|e| (9..=23).contains(&e.recorded_at.hour())));
    assert!(entries.iter().all(|e| e.recorded_at.second() == 0));
    assert!(entries
        .windows(2)
        .all(|w| w[0].recorded_at <= w[1].recorded_at));
}

#[test]
fn text_names_a_known_activity() {
    let mut rng = StdRng::seed_from_u64(3);
    let entries = generate_entries(&mut rng, end(), 5).expect("generate");

    for e in &entries {
        let activity = e
            .text
            .strip_suffix("を実施。次のステップへ。")
            .expect("suffix");
        assert!(CATEGORIES
            .iter()
            .any(|(_, acts)| acts.contains(&activity)));
    }
}

#[test]
fn same_seed_same_output() {
    let a = generate_entries(&mut StdRng::seed_from_u64(9), end(), DEFAULT_DAYS).expect("generate");
    let b = generate_entries(&mut StdRng::seed_from_u64(9), end(), DEFAULT_DAYS).expect("generate");
    assert_eq!(a, b);
}

#[test]
fn csv_has_header_and_formatted_rows() {
    let mut rng = StdRng::seed_from_u64(11);
    let entries = generate_entries(&mut rng, end(), 2).expect("generate");

    let mut buf = Vec::new();
    write_csv(&mut buf, &entries).expect("write");
    let text = String::from_utf8(buf).expect("utf8");

    let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines[0], "日付,内容,記録日時");
    assert_eq!(lines.len(), entries.len() + 1);

    let first = &entries[0];
    let expected = format!(
        "{},{},{}",
        first.recorded_at.format("%Y/%m/%d"),
        first.text,
        first.recorded_at.format("%Y/%m/%d %H:%M")
    );
    assert_eq!(lines[1], expected);
}

//! Read-only views over session memory for history listings

use super::{alignment::round3, Record};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Records whose thought, response or tag contains `term`, case-insensitively
///
/// An empty term matches everything. Input order is kept.
pub fn search<'a>(records: &'a [Record], term: &str) -> Vec<&'a Record> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|r| {
            r.thought.to_lowercase().contains(&needle)
                || r.response.to_lowercase().contains(&needle)
                || r
                    .tag
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
        })
        .collect()
}

/// The last `limit` records, newest first
pub fn recent<'a, R>(records: &'a [R], limit: usize) -> Vec<&'a R> {
    records.iter().rev().take(limit).collect()
}

/// Average length-balance per calendar day
///
/// Each record scores `1 - |len(thought) - len(response)| / max(len)` in
/// characters, rounded to 3 places; the day's value is the mean of its
/// records. Records without a readable date, or with both texts empty, are
/// skipped.
pub fn daily_trend(records: &[Record]) -> BTreeMap<NaiveDate, f32> {
    let mut days: BTreeMap<NaiveDate, (f32, usize)> = BTreeMap::new();

    for record in records {
        let Some(date) = record_date(&record.timestamp) else {
            log::debug!("skipping record with timestamp {:?}", record.timestamp);
            continue;
        };
        let Some(balance) = length_balance(&record.thought, &record.response) else {
            continue;
        };

        let day = days.entry(date).or_insert((0.0, 0));
        day.0 += balance;
        day.1 += 1;
    }

    days.into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f32))
        .collect()
}

fn length_balance(thought: &str, response: &str) -> Option<f32> {
    let a = thought.chars().count();
    let b = response.chars().count();
    let longest = a.max(b);
    if longest == 0 {
        return None;
    }
    Some(round3(1.0 - a.abs_diff(b) as f32 / longest as f32))
}

/// Calendar date of a stored timestamp; only the leading `YYYY-MM-DD` is read
fn record_date(timestamp: &str) -> Option<NaiveDate> {
    let day = timestamp.trim_start().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn journal() -> Vec<Record> {
        vec![
            Record::new("t1", "Anxious before the review", "What are you bracing for?"),
            Record::new("t2", "Slept well", "Notice what helped.").with_tag("#Rest"),
            Record::new("t3", "Another loop with mom", "Which part repeats?").with_tag("#loop"),
        ]
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let records = journal();

        let hits = search(&records, "ANXIOUS");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].timestamp, "t1");

        let hits = search(&records, "helped");
        assert_eq!(hits[0].timestamp, "t2");

        let hits = search(&records, "#rest");
        assert_eq!(hits.len(), 1);

        let hits = search(&records, "loop");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].timestamp, "t3");
    }

    #[test]
    fn test_empty_term_matches_all() {
        let records = journal();
        assert_eq!(search(&records, "").len(), 3);
    }

    #[test]
    fn test_no_match() {
        assert!(search(&journal(), "zebra").is_empty());
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let records = journal();
        let latest: Vec<&str> = recent(&records, 2)
            .iter()
            .map(|r| r.timestamp.as_str())
            .collect();
        assert_eq!(latest, vec!["t3", "t2"]);

        assert_eq!(recent(&records, 10).len(), 3);
        assert!(recent(&records, 0).is_empty());
    }

    fn on(timestamp: &str, thought: &str, response: &str) -> Record {
        Record::new(timestamp, thought, response)
    }

    #[test]
    fn test_daily_trend_averages_per_day() {
        let records = vec![
            on("2024-05-01 08:00:00", "abcd", "abcd"),
            on("2024-05-01 21:30:00", "ab", "abcd"),
            on("2024-05-02 09:00:00", "abc", "abcdef"),
        ];
        let trend = daily_trend(&records);

        let first = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let second = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(trend.keys().copied().collect::<Vec<_>>(), vec![first, second]);
        assert_relative_eq!(trend[&first], 0.75, epsilon = 1e-6);
        assert_relative_eq!(trend[&second], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_daily_trend_rounds_each_record() {
        // 1 - 1/3 = 0.667 after rounding
        let trend = daily_trend(&[on("2024-05-03 10:00:00", "ab", "abc")]);
        let day = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        assert_relative_eq!(trend[&day], 0.667, epsilon = 1e-6);
    }

    #[test]
    fn test_daily_trend_counts_characters() {
        let trend = daily_trend(&[on("2024-05-04 10:00:00", "café", "cafe")]);
        let day = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        assert_relative_eq!(trend[&day], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_daily_trend_skips_unusable_records() {
        let records = vec![
            on("2024-05-05 10:00:00", "", ""),
            on("yesterday", "abc", "abc"),
            on("", "abc", "abc"),
            on("t1", "abc", "abc"),
            on("2024-13-40 10:00:00", "abc", "abc"),
            on("2024-05-06 10:00:00", "", "abc"),
        ];
        let trend = daily_trend(&records);

        assert_eq!(trend.len(), 1);
        let day = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        assert_eq!(trend[&day], 0.0);
    }

    #[test]
    fn test_daily_trend_empty() {
        assert!(daily_trend(&[]).is_empty());
    }
}

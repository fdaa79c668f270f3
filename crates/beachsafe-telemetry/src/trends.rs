//! Daily safety label counts over a trailing window

use crate::history::PredictionRecord;
use beachsafe_core::SafetyLabel;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label counts for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

impl DailyTrend {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            green: 0,
            yellow: 0,
            red: 0,
        }
    }

    /// Count for one label
    pub fn count(&self, label: SafetyLabel) -> usize {
        match label {
            SafetyLabel::Green => self.green,
            SafetyLabel::Yellow => self.yellow,
            SafetyLabel::Red => self.red,
        }
    }

    pub fn total(&self) -> usize {
        self.green + self.yellow + self.red
    }

    fn record(&mut self, label: SafetyLabel) {
        match label {
            SafetyLabel::Green => self.green += 1,
            SafetyLabel::Yellow => self.yellow += 1,
            SafetyLabel::Red => self.red += 1,
        }
    }
}

/// Per-day label counts for records dated within `window_days` of `today`
/// (inclusive of both ends), sorted by date.
///
/// Only days with at least one record appear; every label count is present,
/// zero when unseen. A window reaching past the earliest representable date
/// covers all records up to `today`.
pub fn summarize_trends(
    records: &[PredictionRecord],
    today: NaiveDate,
    window_days: u32,
) -> Vec<DailyTrend> {
    let start = today
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(NaiveDate::MIN);

    let mut days: BTreeMap<NaiveDate, DailyTrend> = BTreeMap::new();
    for record in records {
        let date = record.timestamp.date();
        if date < start || date > today {
            continue;
        }
        days.entry(date)
            .or_insert_with(|| DailyTrend::new(date))
            .record(record.safety);
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, safety: SafetyLabel) -> PredictionRecord {
        PredictionRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 12, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            beach: "Colva".into(),
            weather: "Sunny".into(),
            crowd: "Low".into(),
            tide: "Low".into(),
            hazard: "None".into(),
            safety,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, day).unwrap()
    }

    #[test]
    fn test_counts_per_day() {
        let records = vec![
            at(10, SafetyLabel::Red),
            at(10, SafetyLabel::Red),
            at(10, SafetyLabel::Green),
            at(12, SafetyLabel::Yellow),
        ];

        let trends = summarize_trends(&records, date(12), 7);
        assert_eq!(trends.len(), 2);
        assert_eq!(
            trends[0],
            DailyTrend {
                date: date(10),
                green: 1,
                yellow: 0,
                red: 2
            }
        );
        assert_eq!(trends[1].count(SafetyLabel::Yellow), 1);
        assert_eq!(trends[1].count(SafetyLabel::Red), 0);
        assert_eq!(trends[0].total(), 3);
    }

    #[test]
    fn test_window_excludes_old_and_future_records() {
        let records = vec![
            at(1, SafetyLabel::Red),
            at(5, SafetyLabel::Green),
            at(12, SafetyLabel::Yellow),
            at(13, SafetyLabel::Yellow),
        ];

        let trends = summarize_trends(&records, date(12), 7);
        let dates: Vec<NaiveDate> = trends.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(5), date(12)]);
    }

    #[test]
    fn test_sorted_by_date() {
        let records = vec![
            at(11, SafetyLabel::Green),
            at(9, SafetyLabel::Green),
            at(10, SafetyLabel::Green),
        ];
        let trends = summarize_trends(&records, date(12), 7);
        assert!(trends.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_empty_history() {
        assert!(summarize_trends(&[], date(12), 7).is_empty());
    }

    #[test]
    fn test_oversized_window_covers_all_history() {
        let ancient = PredictionRecord {
            timestamp: NaiveDate::from_ymd_opt(1900, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            ..at(1, SafetyLabel::Red)
        };
        let records = vec![ancient, at(12, SafetyLabel::Green)];

        let trends = summarize_trends(&records, date(12), u32::MAX);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].red, 1);
        assert_eq!(trends[1].green, 1);
    }
}

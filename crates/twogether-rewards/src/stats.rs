use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Days, NaiveDate};

use twogether_types::models::{ActivityType, IntimacyStats, IntimateRecord, MonthlyCount};

use crate::badges::{WEEKLY_WINDOW_DAYS, count_in_window, window_start};
use crate::coins::leading_int;

const MONTH_WINDOW_DAYS: u64 = 30;
const AVERAGE_WINDOW_WEEKS: u64 = 12;
const MONTHLY_HISTORY_DAYS: u64 = 365;

/// Ledger figures that are not derivable from the records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Sum of redemptions, as a positive number.
    pub spent: i64,
    pub balance: i64,
}

pub fn compute_stats(
    records: &[IntimateRecord],
    ledger: LedgerTotals,
    today: NaiveDate,
) -> IntimacyStats {
    let days: BTreeSet<NaiveDate> = records
        .iter()
        .map(|r| r.date)
        .filter(|d| *d <= today)
        .collect();
    let months: BTreeSet<String> = records.iter().map(|r| month_of(r.date)).collect();

    let recent = count_in_window(records, today, AVERAGE_WINDOW_WEEKS * 7);

    let minutes: Vec<i64> = records
        .iter()
        .filter_map(|r| r.duration.as_deref().and_then(leading_int))
        .filter(|m| *m > 0)
        .collect();
    let total_minutes: i64 = minutes.iter().sum();
    let average_duration_minutes = if minutes.is_empty() {
        0.0
    } else {
        total_minutes as f64 / minutes.len() as f64
    };

    IntimacyStats {
        total_moments: u32::try_from(records.len()).unwrap_or(u32::MAX),
        this_week: count_in_window(records, today, WEEKLY_WINDOW_DAYS),
        this_month: count_in_window(records, today, MONTH_WINDOW_DAYS),
        current_streak: current_streak(&days, today),
        longest_streak: longest_streak(&days),
        weekly_average: f64::from(recent) / AVERAGE_WINDOW_WEEKS as f64,
        monthly_data: monthly_counts(records, today),
        total_days: u32::try_from(days.len()).unwrap_or(u32::MAX),
        total_months: u32::try_from(months.len()).unwrap_or(u32::MAX),
        favorite_activity: favorite_activity(records),
        most_active_month: most_active_month(records),
        first_record_date: records.iter().map(|r| r.date).min(),
        last_record_date: records.iter().map(|r| r.date).max(),
        total_duration_hours: total_minutes as f64 / 60.0,
        average_duration_minutes,
        total_coins_earned: records.iter().filter_map(|r| r.coins_earned).sum(),
        total_coins_spent: ledger.spent,
        current_balance: ledger.balance,
    }
}

fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Most frequent activity. Ties go to the one listed first in `ActivityType::ALL`.
fn favorite_activity(records: &[IntimateRecord]) -> Option<ActivityType> {
    let mut counts: HashMap<ActivityType, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.activity_type).or_default() += 1;
    }

    let mut best: Option<(ActivityType, usize)> = None;
    for activity in ActivityType::ALL {
        let n = counts.get(&activity).copied().unwrap_or(0);
        if n > 0 && best.is_none_or(|(_, m)| n > m) {
            best = Some((activity, n));
        }
    }
    best.map(|(a, _)| a)
}

fn most_active_month(records: &[IntimateRecord]) -> Option<String> {
    let mut buckets: BTreeMap<String, u32> = BTreeMap::new();
    for r in records {
        *buckets.entry(month_of(r.date)).or_default() += 1;
    }

    let mut best: Option<(String, u32)> = None;
    for (month, n) in buckets {
        if best.as_ref().is_none_or(|(_, m)| n > *m) {
            best = Some((month, n));
        }
    }
    best.map(|(m, _)| m)
}

/// Consecutive days with at least one record, ending today or yesterday.
fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(&latest) = days.last() else {
        return 0;
    };
    if latest < window_start(today, 1) {
        return 0;
    }

    let mut streak = 0;
    let mut cursor = Some(latest);
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}

fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &day in days {
        run = match prev.and_then(|p| p.succ_opt()) {
            Some(next) if next == day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

fn monthly_counts(records: &[IntimateRecord], today: NaiveDate) -> Vec<MonthlyCount> {
    let start = window_start(today, MONTHLY_HISTORY_DAYS);
    let mut buckets: BTreeMap<String, u32> = BTreeMap::new();

    for r in records.iter().filter(|r| r.date >= start && r.date <= today) {
        *buckets.entry(month_of(r.date)).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record_on;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_history() {
        let stats = compute_stats(&[], LedgerTotals::default(), d("2024-06-01"));
        assert_eq!(stats.total_moments, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.weekly_average, 0.0);
        assert!(stats.monthly_data.is_empty());
        assert_eq!(stats.favorite_activity, None);
        assert_eq!(stats.most_active_month, None);
        assert_eq!(stats.total_days, 0);
    }

    #[test]
    fn streaks_count_distinct_days() {
        let records = vec![
            record_on(1, "2024-05-01"),
            record_on(2, "2024-05-02"),
            record_on(3, "2024-05-03"),
            record_on(4, "2024-05-03"),
            record_on(5, "2024-05-10"),
            record_on(6, "2024-05-30"),
            record_on(7, "2024-05-31"),
        ];
        let stats = compute_stats(&records, LedgerTotals::default(), d("2024-05-31"));
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn current_streak_may_end_yesterday() {
        let records = vec![record_on(1, "2024-05-29"), record_on(2, "2024-05-30")];
        assert_eq!(compute_stats(&records, LedgerTotals::default(), d("2024-05-31")).current_streak, 2);
        assert_eq!(compute_stats(&records, LedgerTotals::default(), d("2024-06-01")).current_streak, 0);
    }

    #[test]
    fn activity_duration_and_calendar_summaries() {
        let mut records = vec![
            record_on(1, "2024-03-02"),
            record_on(2, "2024-05-01"),
            record_on(3, "2024-05-01"),
            record_on(4, "2024-05-07"),
            record_on(5, "2024-04-11"),
        ];
        records[0].activity_type = ActivityType::Roleplay;
        records[1].activity_type = ActivityType::LongSession;
        records[2].activity_type = ActivityType::LongSession;
        records[1].duration = Some("90 minutes".into());
        records[2].duration = Some("30".into());
        records[3].duration = Some("soon".into());

        let ledger = LedgerTotals { spent: 800, balance: 1200 };
        let stats = compute_stats(&records, ledger, d("2024-05-31"));

        assert_eq!(stats.total_days, 4);
        assert_eq!(stats.total_months, 3);
        assert_eq!(stats.favorite_activity, Some(ActivityType::LongSession));
        assert_eq!(stats.most_active_month.as_deref(), Some("2024-05"));
        assert_eq!(stats.first_record_date, Some(d("2024-03-02")));
        assert_eq!(stats.last_record_date, Some(d("2024-05-07")));
        assert_eq!(stats.total_duration_hours, 2.0);
        assert_eq!(stats.average_duration_minutes, 60.0);
        assert_eq!(stats.total_coins_spent, 800);
        assert_eq!(stats.current_balance, 1200);
    }

    #[test]
    fn ties_break_toward_earlier_entries() {
        let mut records = vec![record_on(1, "2024-02-10"), record_on(2, "2024-01-05")];
        records[0].activity_type = ActivityType::Foreplay;
        records[1].activity_type = ActivityType::Roleplay;

        let stats = compute_stats(&records, LedgerTotals::default(), d("2024-05-31"));
        assert_eq!(stats.favorite_activity, Some(ActivityType::Roleplay));
        assert_eq!(stats.most_active_month.as_deref(), Some("2024-01"));
        assert_eq!(stats.average_duration_minutes, 0.0);
    }

    #[test]
    fn windows_and_monthly_buckets() {
        let mut records = vec![
            record_on(1, "2023-05-01"), // outside the yearly history
            record_on(2, "2024-04-15"),
            record_on(3, "2024-05-20"),
            record_on(4, "2024-05-28"),
        ];
        records[3].coins_earned = Some(500);
        let stats = compute_stats(&records, LedgerTotals::default(), d("2024-05-31"));

        assert_eq!(stats.total_moments, 4);
        assert_eq!(stats.this_week, 1);
        assert_eq!(stats.this_month, 2);
        assert_eq!(stats.weekly_average, 3.0 / 12.0);
        assert_eq!(stats.total_coins_earned, 100 * 3 + 500);
        assert_eq!(
            stats.monthly_data,
            vec![
                MonthlyCount { month: "2024-04".into(), count: 1 },
                MonthlyCount { month: "2024-05".into(), count: 2 },
            ]
        );
    }
}

use chrono::{Days, NaiveDate};

use twogether_types::models::{BadgeId, BadgeProgress, IntimateRecord};

/// Trailing window, in days, for the weekly badges. Both ends inclusive.
pub const WEEKLY_WINDOW_DAYS: u64 = 7;

/// Weekly badge ladder, lowest goal first.
const WEEKLY_LADDER: [(u32, BadgeId); 3] = [
    (1, BadgeId::WeeklyLovers),
    (3, BadgeId::PassionateCouple),
    (5, BadgeId::SweetInvincible),
];

const TOTAL_GOAL: u32 = 10;

/// Next unearned badge and how far away it is. First match wins.
pub fn evaluate_badge_progress(weekly_count: u32, total_count: u32) -> BadgeProgress {
    if let Some((goal, badge)) = WEEKLY_LADDER.iter().find(|(goal, _)| weekly_count < *goal) {
        return BadgeProgress {
            message: format!(
                "{} more this week to earn the {} badge",
                goal - weekly_count,
                badge.display_name()
            ),
            next_badge: Some(*badge),
        };
    }

    if total_count < TOTAL_GOAL {
        return BadgeProgress {
            message: format!(
                "{} more to reach your {}th moment milestone",
                TOTAL_GOAL - total_count,
                TOTAL_GOAL
            ),
            next_badge: Some(BadgeId::Milestone10),
        };
    }

    BadgeProgress {
        message: String::new(),
        next_badge: None,
    }
}

/// Records dated within the last 7 days, today and the 7th day back included.
pub fn weekly_count(records: &[IntimateRecord], today: NaiveDate) -> u32 {
    count_in_window(records, today, WEEKLY_WINDOW_DAYS)
}

/// Records dated in `[today - days, today]`.
pub(crate) fn count_in_window(records: &[IntimateRecord], today: NaiveDate, days: u64) -> u32 {
    let start = window_start(today, days);
    let count = records
        .iter()
        .filter(|r| r.date >= start && r.date <= today)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

pub(crate) fn window_start(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

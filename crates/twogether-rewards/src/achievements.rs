//! Achievement catalog derived from statistics. Nothing here is stored:
//! progress is recomputed from the current [`IntimacyStats`] on each call.

use twogether_types::models::{AchievementProgress, IntimacyStats};

#[derive(Debug, Clone, Copy)]
enum Measure {
    Moments,
    Days,
    Months,
    CoinsEarned,
}

impl Measure {
    fn read(self, stats: &IntimacyStats) -> i64 {
        match self {
            Self::Moments => i64::from(stats.total_moments),
            Self::Days => i64::from(stats.total_days),
            Self::Months => i64::from(stats.total_months),
            Self::CoinsEarned => stats.total_coins_earned,
        }
    }
}

struct Goal {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    measure: Measure,
    target: i64,
}

const CATALOG: [Goal; 8] = [
    Goal {
        id: "first_moment",
        title: "First record",
        description: "Record your first moment together",
        measure: Measure::Moments,
        target: 1,
    },
    Goal {
        id: "sweet_times",
        title: "Sweet times",
        description: "Record 10 moments",
        measure: Measure::Moments,
        target: 10,
    },
    Goal {
        id: "romantic_couple",
        title: "Romantic couple",
        description: "Record 50 moments",
        measure: Measure::Moments,
        target: 50,
    },
    Goal {
        id: "love_expert",
        title: "Love expert",
        description: "Record 100 moments",
        measure: Measure::Moments,
        target: 100,
    },
    Goal {
        id: "daily_couple",
        title: "Daily couple",
        description: "Record moments on 7 different days",
        measure: Measure::Days,
        target: 7,
    },
    Goal {
        id: "monthly_couple",
        title: "Monthly couple",
        description: "Record moments in 3 different months",
        measure: Measure::Months,
        target: 3,
    },
    Goal {
        id: "coin_collector",
        title: "Coin collector",
        description: "Earn 1000 coins from moments",
        measure: Measure::CoinsEarned,
        target: 1000,
    },
    Goal {
        id: "coin_master",
        title: "Coin master",
        description: "Earn 5000 coins from moments",
        measure: Measure::CoinsEarned,
        target: 5000,
    },
];

/// Every catalog entry with its progress. `progress` is the raw measure and
/// may exceed `max_progress`.
pub fn achievement_progress(stats: &IntimacyStats) -> Vec<AchievementProgress> {
    CATALOG
        .iter()
        .map(|goal| {
            let progress = goal.measure.read(stats);
            AchievementProgress {
                id: goal.id.to_string(),
                title: goal.title.to_string(),
                description: goal.description.to_string(),
                progress,
                max_progress: goal.target,
                is_unlocked: progress >= goal.target,
            }
        })
        .collect()
}

//! Reward rules for the couple's journal: coin awards, badge progress,
//! count milestones, activity statistics, the achievement catalog and the
//! gift catalog, plus the [`journal::Journal`] controller that applies them
//! to persisted state.
//!
//! Everything outside `journal` is pure and never fails. Invalid input
//! degrades to a default (unknown activity, unparseable duration, missing
//! threshold record) instead of returning an error.

pub mod achievements;
pub mod badges;
pub mod coins;
pub mod error;
pub mod gifts;
pub mod journal;
pub mod milestones;
pub mod stats;

pub use achievements::achievement_progress;
pub use badges::{evaluate_badge_progress, weekly_count};
pub use coins::{compute_coins, rule_table};
pub use error::JournalError;
pub use journal::{Changeset, CoinEntry, Journal, JournalState, JournalStore};
pub use milestones::{apply_milestones, synthesize_milestones};
pub use stats::{LedgerTotals, compute_stats};

#[cfg(test)]
pub(crate) mod testing {
    use anyhow::{Result, bail};
    use chrono::{Days, NaiveDate, Utc};
    use uuid::Uuid;

    use twogether_types::models::{ActivityType, IntimateRecord, NewRecord};

    use crate::journal::{Changeset, CoinEntry, JournalState, JournalStore};

    pub fn record_on(seq: u32, date: &str) -> IntimateRecord {
        IntimateRecord {
            id: i64::from(seq),
            seq,
            date: date.parse().unwrap(),
            time: "21:00".into(),
            mood: "❤️".into(),
            notes: None,
            description: None,
            duration: None,
            location: None,
            roleplay_script: None,
            activity_type: ActivityType::Regular,
            coins_earned: Some(100),
            recorded_by: Uuid::nil(),
            created_at: Utc::now(),
        }
    }

    /// `n` records on consecutive days starting at `start`.
    pub fn daily_records(n: u32, start: &str) -> Vec<IntimateRecord> {
        let start: NaiveDate = start.parse().unwrap();
        (1..=n)
            .map(|seq| {
                let date = start + Days::new(u64::from(seq - 1));
                record_on(seq, &date.to_string())
            })
            .collect()
    }

    #[derive(Default)]
    pub struct MemoryStore {
        pub state: JournalState,
        pub ledger: Vec<CoinEntry>,
        pub fail_saves: bool,
    }

    impl JournalStore for MemoryStore {
        fn load(&self) -> Result<JournalState> {
            Ok(self.state.clone())
        }

        fn append_record(&mut self, draft: &NewRecord, coins_earned: i64) -> Result<IntimateRecord> {
            let seq = self.state.records.len() as u32 + 1;
            let record = IntimateRecord {
                date: draft.date,
                time: draft.time.clone(),
                mood: draft.mood.clone(),
                duration: draft.duration.clone(),
                roleplay_script: draft.roleplay_script.clone(),
                activity_type: draft.activity_type,
                coins_earned: Some(coins_earned),
                ..record_on(seq, "2000-01-01")
            };
            self.state.records.push(record.clone());
            Ok(record)
        }

        fn save(&mut self, changes: &Changeset) -> Result<()> {
            if self.fail_saves {
                bail!("store offline");
            }
            self.ledger.extend(changes.coins.iter().cloned());
            self.state.balance += changes.coins.iter().map(|c| c.amount).sum::<i64>();
            self.state.spent += changes
                .coins
                .iter()
                .filter(|c| c.amount < 0)
                .map(|c| -c.amount)
                .sum::<i64>();
            self.state.milestones.extend(changes.milestones.iter().cloned());
            self.state.milestones.sort_by_key(|m| m.date);
            self.state.badges.extend(changes.badges.iter().cloned());
            Ok(())
        }
    }
}

//! Journal controller: the single owner of a couple's reward state.
//!
//! State is loaded once from an injected [`JournalStore`], updated by the
//! pure functions in this crate, and written back as a [`Changeset`].

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::info;

use twogether_types::api::{AchievementAward, MomentOutcome};
use twogether_types::models::{
    AchievementProgress, BadgeId, BadgeProgress, EarnedBadge, Gift, IntimacyStats,
    IntimateRecord, JourneyMilestone, MilestoneType, NewRecord, TransactionType,
};

use crate::badges::{evaluate_badge_progress, weekly_count};
use crate::coins::{BEGINNER_COUPLE_BONUS, compute_coins};
use crate::error::JournalError;
use crate::milestones::{apply_milestones, is_duplicate, relationship_milestone, synthesize_milestones};
use crate::achievements::achievement_progress;
use crate::stats::{LedgerTotals, compute_stats};

/// Ledger entry not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinEntry {
    /// Signed: positive for earn, negative for spend.
    pub amount: i64,
    pub transaction_type: TransactionType,
    pub source: String,
    pub description: String,
}

impl CoinEntry {
    pub fn earn(amount: i64, source: &str, description: &str) -> Self {
        Self {
            amount,
            transaction_type: TransactionType::Earn,
            source: source.to_string(),
            description: description.to_string(),
        }
    }

    pub fn spend(amount: i64, spent_on: &str, description: &str) -> Self {
        Self {
            amount: -amount,
            transaction_type: TransactionType::Spend,
            source: spent_on.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JournalState {
    /// In sequence order.
    pub records: Vec<IntimateRecord>,
    /// Sorted by date.
    pub milestones: Vec<JourneyMilestone>,
    pub balance: i64,
    /// Total redeemed so far, as a positive number.
    pub spent: i64,
    pub badges: Vec<EarnedBadge>,
}

impl JournalState {
    pub fn has_badge(&self, badge: BadgeId) -> bool {
        self.badges.iter().any(|b| b.badge == badge)
    }
}

/// Additions produced by one journal operation.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    pub coins: Vec<CoinEntry>,
    pub milestones: Vec<JourneyMilestone>,
    pub badges: Vec<EarnedBadge>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty() && self.milestones.is_empty() && self.badges.is_empty()
    }

    fn coin_total(&self) -> i64 {
        self.coins.iter().map(|c| c.amount).sum()
    }

    fn spent_total(&self) -> i64 {
        self.coins
            .iter()
            .filter(|c| c.transaction_type == TransactionType::Spend)
            .map(|c| -c.amount)
            .sum()
    }
}

/// Persistence for one couple's journal.
pub trait JournalStore {
    fn load(&self) -> Result<JournalState>;

    /// Persist a record, assigning its `id`, next `seq` and `created_at`.
    fn append_record(&mut self, draft: &NewRecord, coins_earned: i64) -> Result<IntimateRecord>;

    fn save(&mut self, changes: &Changeset) -> Result<()>;
}

pub struct Journal<S> {
    store: S,
    state: JournalState,
}

impl<S: JournalStore> Journal<S> {
    pub fn open(store: S) -> Result<Self, JournalError> {
        let state = store.load()?;
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &JournalState {
        &self.state
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn record_moment(
        &mut self,
        draft: NewRecord,
        today: NaiveDate,
    ) -> Result<MomentOutcome, JournalError> {
        let is_new_script = self.is_new_script(draft.roleplay_script.as_deref());
        let coins_earned =
            compute_coins(draft.activity_type, draft.duration.as_deref(), is_new_script);

        let record = self.store.append_record(&draft, coins_earned)?;

        let mut changes = Changeset::default();
        changes
            .coins
            .push(CoinEntry::earn(coins_earned, "love_moment", "Recorded a love moment"));

        let mut achievements = Vec::new();
        if self.state.records.is_empty() && !self.state.has_badge(BadgeId::BeginnerCouple) {
            changes.badges.push(EarnedBadge {
                badge: BadgeId::BeginnerCouple,
                earned_at: Utc::now(),
                milestone_value: Some(1),
            });
            changes.coins.push(CoinEntry::earn(
                BEGINNER_COUPLE_BONUS,
                "achievement",
                "Earned the Beginner Couple badge",
            ));
            achievements.push(AchievementAward {
                badge: BadgeId::BeginnerCouple,
                bonus_coins: BEGINNER_COUPLE_BONUS,
            });
        }

        let mut records = self.state.records.clone();
        records.push(record.clone());
        let mut milestones = self.state.milestones.clone();
        let new = synthesize_milestones(&records, &milestones, today);
        changes.milestones = apply_milestones(&mut milestones, new);

        self.store.save(&changes)?;

        self.state.records = records;
        self.state.milestones = milestones;
        self.state.balance += changes.coin_total();
        self.state.badges.extend(changes.badges);

        info!(
            "Recorded moment #{} ({}): +{} coins, {} new milestone(s)",
            record.seq,
            record.activity_type.as_str(),
            coins_earned,
            changes.milestones.len()
        );

        Ok(MomentOutcome {
            record,
            coins_earned,
            achievements,
            new_milestones: changes.milestones,
            badge_progress: self.badge_progress(today),
            balance: self.state.balance,
        })
    }

    /// Materialize any count milestone the history has crossed but the
    /// collection lacks. A no-op when the record count is unchanged.
    pub fn refresh_milestones(
        &mut self,
        today: NaiveDate,
    ) -> Result<Vec<JourneyMilestone>, JournalError> {
        let new = synthesize_milestones(&self.state.records, &self.state.milestones, today);
        if new.is_empty() {
            return Ok(new);
        }

        let mut milestones = self.state.milestones.clone();
        let changes = Changeset {
            milestones: apply_milestones(&mut milestones, new),
            ..Default::default()
        };
        self.store.save(&changes)?;
        self.state.milestones = milestones;

        info!("Backfilled {} milestone(s)", changes.milestones.len());
        Ok(changes.milestones)
    }

    pub fn add_milestone(
        &mut self,
        kind: MilestoneType,
        date: NaiveDate,
        title: &str,
        description: &str,
    ) -> Result<JourneyMilestone, JournalError> {
        if kind == MilestoneType::IntimacyMilestone {
            return Err(JournalError::ReservedMilestone(kind.as_str()));
        }

        let milestone = relationship_milestone(kind, date, title, description);
        if is_duplicate(&self.state.milestones, &milestone) {
            return Err(JournalError::DuplicateMilestone(milestone.id));
        }

        let mut milestones = self.state.milestones.clone();
        let changes = Changeset {
            milestones: apply_milestones(&mut milestones, vec![milestone.clone()]),
            ..Default::default()
        };
        self.store.save(&changes)?;
        self.state.milestones = milestones;

        Ok(milestone)
    }

    /// Credit coins outside of recording a moment. Returns the new balance.
    pub fn credit(
        &mut self,
        amount: i64,
        source: &str,
        description: &str,
    ) -> Result<i64, JournalError> {
        if amount <= 0 {
            return Err(JournalError::InvalidAmount(amount));
        }
        self.apply_entry(CoinEntry::earn(amount, source, description))
    }

    /// Redeem coins. Returns the new balance.
    pub fn spend(
        &mut self,
        amount: i64,
        spent_on: &str,
        description: &str,
    ) -> Result<i64, JournalError> {
        if amount <= 0 {
            return Err(JournalError::InvalidAmount(amount));
        }
        if amount > self.state.balance {
            return Err(JournalError::InsufficientCoins {
                balance: self.state.balance,
                cost: amount,
            });
        }
        self.apply_entry(CoinEntry::spend(amount, spent_on, description))
    }

    pub fn badge_progress(&self, today: NaiveDate) -> BadgeProgress {
        let total = u32::try_from(self.state.records.len()).unwrap_or(u32::MAX);
        evaluate_badge_progress(weekly_count(&self.state.records, today), total)
    }

    /// Redeem a gift at its catalog price. Returns the new balance.
    pub fn redeem(&mut self, gift: &Gift) -> Result<i64, JournalError> {
        let balance = self.spend(gift.cost, &gift.id, &format!("Redeemed {}", gift.title))?;
        info!("Redeemed gift '{}' for {} coins", gift.id, gift.cost);
        Ok(balance)
    }

    pub fn stats(&self, today: NaiveDate) -> IntimacyStats {
        let ledger = LedgerTotals {
            spent: self.state.spent,
            balance: self.state.balance,
        };
        compute_stats(&self.state.records, ledger, today)
    }

    pub fn achievements(&self, today: NaiveDate) -> Vec<AchievementProgress> {
        achievement_progress(&self.stats(today))
    }

    fn is_new_script(&self, script: Option<&str>) -> bool {
        match script {
            Some(title) if !title.trim().is_empty() => !self
                .state
                .records
                .iter()
                .any(|r| r.roleplay_script.as_deref() == Some(title)),
            _ => false,
        }
    }

    fn apply_entry(&mut self, entry: CoinEntry) -> Result<i64, JournalError> {
        let changes = Changeset {
            coins: vec![entry],
            ..Default::default()
        };
        self.store.save(&changes)?;
        self.state.balance += changes.coin_total();
        self.state.spent += changes.spent_total();
        Ok(self.state.balance)
    }
}

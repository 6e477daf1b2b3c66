//! Coin award rules.
//!
//! One static rule per activity: a base amount plus independent, additive
//! bonuses. Lookups never fail; anything unrecognized is priced as
//! `regular`.

use twogether_types::models::{ActivityType, BonusInfo, CoinRuleInfo};

/// Coins credited for uploading a roleplay script.
pub const SCRIPT_UPLOAD_REWARD: i64 = 200;

/// Bonus credited alongside the `beginner_couple` badge on the first record.
pub const BEGINNER_COUPLE_BONUS: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusCondition {
    /// The roleplay script has not been used on any earlier record.
    NewScript,
    /// First time trying something. Evaluated with the same novelty flag as
    /// `NewScript`; there is no separate input for it.
    FirstAttempt,
    /// Leading integer of the duration (minutes) strictly exceeds the limit.
    DurationOver(i64),
    /// Outdoor location. No input carries this, so it never fires.
    Outdoor,
}

impl BonusCondition {
    fn holds(&self, duration_minutes: Option<i64>, is_new_script: bool) -> bool {
        match *self {
            Self::NewScript | Self::FirstAttempt => is_new_script,
            Self::DurationOver(limit) => duration_minutes.is_some_and(|m| m > limit),
            Self::Outdoor => false,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Outdoor)
    }

    pub fn label(&self) -> String {
        match self {
            Self::NewScript => "used a new script".to_string(),
            Self::FirstAttempt => "first attempt".to_string(),
            Self::DurationOver(60) => "over one hour".to_string(),
            Self::DurationOver(limit) => format!("over {} minutes", limit),
            Self::Outdoor => "outdoors".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Bonus {
    pub condition: BonusCondition,
    pub coins: i64,
}

#[derive(Debug)]
pub struct CoinRule {
    pub activity: ActivityType,
    pub base_coins: i64,
    pub bonuses: &'static [Bonus],
}

static ROLEPLAY: CoinRule = CoinRule {
    activity: ActivityType::Roleplay,
    base_coins: 500,
    bonuses: &[
        Bonus { condition: BonusCondition::NewScript, coins: 200 },
        Bonus { condition: BonusCondition::DurationOver(30), coins: 300 },
    ],
};

static NEW_POSITION: CoinRule = CoinRule {
    activity: ActivityType::NewPosition,
    base_coins: 200,
    bonuses: &[Bonus { condition: BonusCondition::FirstAttempt, coins: 300 }],
};

static LONG_SESSION: CoinRule = CoinRule {
    activity: ActivityType::LongSession,
    base_coins: 1000,
    bonuses: &[Bonus { condition: BonusCondition::DurationOver(60), coins: 500 }],
};

static NEW_LOCATION: CoinRule = CoinRule {
    activity: ActivityType::NewLocation,
    base_coins: 300,
    bonuses: &[Bonus { condition: BonusCondition::Outdoor, coins: 400 }],
};

static FOREPLAY: CoinRule = CoinRule {
    activity: ActivityType::Foreplay,
    base_coins: 150,
    bonuses: &[],
};

static REGULAR: CoinRule = CoinRule {
    activity: ActivityType::Regular,
    base_coins: 100,
    bonuses: &[],
};

pub fn rule_for(activity: ActivityType) -> &'static CoinRule {
    match activity {
        ActivityType::Roleplay => &ROLEPLAY,
        ActivityType::NewPosition => &NEW_POSITION,
        ActivityType::LongSession => &LONG_SESSION,
        ActivityType::NewLocation => &NEW_LOCATION,
        ActivityType::Foreplay => &FOREPLAY,
        ActivityType::Regular => &REGULAR,
    }
}

impl CoinRule {
    pub fn info(&self) -> CoinRuleInfo {
        CoinRuleInfo {
            activity: self.activity,
            base_coins: self.base_coins,
            bonuses: self
                .bonuses
                .iter()
                .map(|b| BonusInfo {
                    label: b.condition.label(),
                    coins: b.coins,
                    supported: b.condition.is_supported(),
                })
                .collect(),
        }
    }
}

/// The whole rule table, one entry per activity.
pub fn rule_table() -> Vec<CoinRuleInfo> {
    ActivityType::ALL.into_iter().map(|a| rule_for(a).info()).collect()
}

/// Coins for one moment: base amount plus every bonus whose condition holds.
pub fn compute_coins(activity: ActivityType, duration: Option<&str>, is_new_script: bool) -> i64 {
    let rule = rule_for(activity);
    let minutes = duration.and_then(leading_int);

    rule.bonuses
        .iter()
        .filter(|b| b.condition.holds(minutes, is_new_script))
        .fold(rule.base_coins, |total, b| total + b.coins)
}

/// Leading integer of a free-text value: `"45"`, `" 45 minutes"` and
/// `"45min"` all give 45. Text without leading digits gives `None`.
pub fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: Vec<i64> = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }

    let value = digits
        .into_iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d));
    Some(if negative { -value } else { value })
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Activities --

/// Kind of logged moment. Drives the coin rule lookup.
///
/// Deserialization never fails: unknown or legacy tags coming back from
/// storage or from older clients collapse to `Regular`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ActivityType {
    Roleplay,
    NewPosition,
    LongSession,
    NewLocation,
    Foreplay,
    #[default]
    Regular,
}

impl ActivityType {
    pub const ALL: [ActivityType; 6] = [
        Self::Roleplay,
        Self::NewPosition,
        Self::LongSession,
        Self::NewLocation,
        Self::Foreplay,
        Self::Regular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roleplay => "roleplay",
            Self::NewPosition => "new_position",
            Self::LongSession => "long_session",
            Self::NewLocation => "new_location",
            Self::Foreplay => "foreplay",
            Self::Regular => "regular",
        }
    }

    /// Lenient parse, falling back to `Regular`.
    pub fn parse_lossy(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == tag.trim())
            .unwrap_or_default()
    }
}

impl From<&str> for ActivityType {
    fn from(tag: &str) -> Self {
        Self::parse_lossy(tag)
    }
}

impl From<String> for ActivityType {
    fn from(tag: String) -> Self {
        Self::parse_lossy(&tag)
    }
}

// -- Records --

/// One logged moment. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntimateRecord {
    pub id: i64,
    /// 1-based position in the couple's journal, assigned by the store.
    pub seq: u32,
    pub date: NaiveDate,
    pub time: String,
    pub mood: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roleplay_script: Option<String>,
    #[serde(default)]
    pub activity_type: ActivityType,
    pub coins_earned: Option<i64>,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new record. The store assigns the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub date: NaiveDate,
    pub time: String,
    pub mood: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub roleplay_script: Option<String>,
    #[serde(default)]
    pub activity_type: ActivityType,
}

// -- Milestones --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MilestoneType {
    Meeting,
    FirstDate,
    FirstKiss,
    FirstSex,
    Marriage,
    ChildBorn,
    IntimacyMilestone,
    Custom,
}

impl MilestoneType {
    pub const ALL: [MilestoneType; 8] = [
        Self::Meeting,
        Self::FirstDate,
        Self::FirstKiss,
        Self::FirstSex,
        Self::Marriage,
        Self::ChildBorn,
        Self::IntimacyMilestone,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::FirstDate => "first_date",
            Self::FirstKiss => "first_kiss",
            Self::FirstSex => "first_sex",
            Self::Marriage => "marriage",
            Self::ChildBorn => "child_born",
            Self::IntimacyMilestone => "intimacy_milestone",
            Self::Custom => "custom",
        }
    }

    /// Lenient parse, falling back to `Custom`.
    pub fn parse_lossy(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == tag.trim())
            .unwrap_or(Self::Custom)
    }

    /// Fixed relationship events: at most one of each, id equals the tag.
    pub fn is_predefined(&self) -> bool {
        !matches!(self, Self::IntimacyMilestone | Self::Custom)
    }
}

impl From<String> for MilestoneType {
    fn from(tag: String) -> Self {
        Self::parse_lossy(&tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyMilestone {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MilestoneType,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    /// Threshold crossed; only set on `IntimacyMilestone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
}

// -- Badges --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    BeginnerCouple,
    WeeklyLovers,
    PassionateCouple,
    SweetInvincible,
    #[serde(rename = "milestone_10")]
    Milestone10,
}

impl BadgeId {
    pub const ALL: [BadgeId; 5] = [
        Self::BeginnerCouple,
        Self::WeeklyLovers,
        Self::PassionateCouple,
        Self::SweetInvincible,
        Self::Milestone10,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeginnerCouple => "beginner_couple",
            Self::WeeklyLovers => "weekly_lovers",
            Self::PassionateCouple => "passionate_couple",
            Self::SweetInvincible => "sweet_invincible",
            Self::Milestone10 => "milestone_10",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == tag)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BeginnerCouple => "Beginner Couple",
            Self::WeeklyLovers => "Weekly Lovers",
            Self::PassionateCouple => "Passionate Couple",
            Self::SweetInvincible => "Sweet & Invincible",
            Self::Milestone10 => "10th Moment",
        }
    }
}

/// Distance to the next unearned badge. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgress {
    pub message: String,
    pub next_badge: Option<BadgeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    pub badge: BadgeId,
    pub earned_at: DateTime<Utc>,
    pub milestone_value: Option<u32>,
}

// -- Coins --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Earn,
    Spend,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earn => "earn",
            Self::Spend => "spend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinTransaction {
    pub id: Uuid,
    /// Signed: positive for earn, negative for spend.
    pub amount: i64,
    pub transaction_type: TransactionType,
    pub source: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// -- Users --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// -- Couples --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Couple {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub couple_name: Option<String>,
    pub anniversary_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// -- Scripts --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptCategory {
    Romantic,
    Adventurous,
}

impl ScriptCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Romantic => "romantic",
            Self::Adventurous => "adventurous",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "romantic" => Some(Self::Romantic),
            "adventurous" => Some(Self::Adventurous),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleplayScript {
    pub id: Uuid,
    pub title: String,
    pub category: ScriptCategory,
    pub scenario: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// -- Stats --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntimacyStats {
    pub total_moments: u32,
    pub this_week: u32,
    pub this_month: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_average: f64,
    pub monthly_data: Vec<MonthlyCount>,
    /// Distinct calendar days with at least one record.
    pub total_days: u32,
    /// Distinct calendar months with at least one record.
    pub total_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_activity: Option<ActivityType>,
    /// `YYYY-MM` with the most records, earliest on a tie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_active_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_record_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_record_date: Option<NaiveDate>,
    pub total_duration_hours: f64,
    /// Mean over records whose duration parses.
    pub average_duration_minutes: f64,
    /// Sum of `coins_earned` on records.
    pub total_coins_earned: i64,
    pub total_coins_spent: i64,
    pub current_balance: i64,
}

/// Unlock state of one entry in the achievement catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub id: String,
    pub title: String,
    pub description: String,
    pub progress: i64,
    pub max_progress: i64,
    pub is_unlocked: bool,
}

// -- Coin rules --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusInfo {
    pub label: String,
    pub coins: i64,
    /// Unsupported bonuses are listed for completeness but never awarded.
    pub supported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinRuleInfo {
    pub activity: ActivityType,
    pub base_coins: i64,
    pub bonuses: Vec<BonusInfo>,
}

// -- Gifts --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftCategory {
    Service,
    Experience,
    Intimate,
    Physical,
}

impl GiftCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Experience => "experience",
            Self::Intimate => "intimate",
            Self::Physical => "physical",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "service" => Some(Self::Service),
            "experience" => Some(Self::Experience),
            "intimate" => Some(Self::Intimate),
            "physical" => Some(Self::Physical),
            _ => None,
        }
    }
}

/// Something the couple can redeem coins for. Built-in gifts have fixed
/// ids; custom gifts get a UUID and record who added them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cost: i64,
    pub category: GiftCategory,
    pub icon: String,
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    AchievementProgress, BadgeId, BadgeProgress, EarnedBadge, Gift, GiftCategory, IntimateRecord,
    JourneyMilestone, MilestoneType, RoleplayScript, ScriptCategory,
};

// -- JWT Claims --

/// JWT claims issued by `/auth/*` and checked by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Couples --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PairRequest {
    pub partner_username: String,
    #[serde(default)]
    pub couple_name: Option<String>,
    #[serde(default)]
    pub anniversary_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerInfo {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoupleResponse {
    pub id: Uuid,
    pub couple_name: Option<String>,
    pub anniversary_date: Option<NaiveDate>,
    pub partner: PartnerInfo,
    pub created_at: DateTime<Utc>,
}

// -- Records --

/// Achievement unlocked as a side effect of recording a moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementAward {
    pub badge: BadgeId,
    pub bonus_coins: i64,
}

/// Everything the client needs to show after a moment is recorded.
/// Display formatting is left to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentOutcome {
    pub record: IntimateRecord,
    pub coins_earned: i64,
    pub achievements: Vec<AchievementAward>,
    pub new_milestones: Vec<JourneyMilestone>,
    pub badge_progress: BadgeProgress,
    pub balance: i64,
}

// -- Coins --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance: i64,
}

// -- Gifts --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateGiftRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub cost: i64,
    pub category: GiftCategory,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub gift: Gift,
    pub balance: i64,
}

// -- Achievements --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementsResponse {
    /// Badges awarded when moments were recorded.
    pub earned: Vec<EarnedBadge>,
    /// Catalog entries derived from the current statistics.
    pub catalog: Vec<AchievementProgress>,
    pub unlocked: u32,
    pub total: u32,
    pub completion_percentage: f64,
}

// -- Milestones --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMilestoneRequest {
    #[serde(rename = "type")]
    pub kind: MilestoneType,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

// -- Scripts --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateScriptRequest {
    pub title: String,
    pub category: ScriptCategory,
    #[serde(default)]
    pub scenario: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScriptResponse {
    pub script: RoleplayScript,
    pub coins_earned: i64,
    pub balance: i64,
}

//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the twogether-types API models; conversion is lenient and
//! logs corrupt values instead of failing the whole query.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use twogether_types::models::{
    ActivityType, BadgeId, CoinTransaction, Couple, EarnedBadge, Gift, GiftCategory,
    IntimateRecord, JourneyMilestone, MilestoneType, RoleplayScript, ScriptCategory,
    TransactionType, User,
};

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

impl UserRow {
    pub fn into_model(self) -> User {
        User {
            id: parse_uuid(&self.id, "user id", &self.id),
            created_at: parse_timestamp(&self.created_at, "created_at", &self.id),
            username: self.username,
        }
    }
}

pub struct CoupleRow {
    pub id: String,
    pub user1_id: String,
    pub user2_id: String,
    pub couple_name: Option<String>,
    pub anniversary_date: Option<String>,
    pub created_at: String,
}

impl CoupleRow {
    /// The member of the pair who is not `user_id`.
    pub fn partner_of(&self, user_id: &str) -> &str {
        if self.user1_id == user_id {
            &self.user2_id
        } else {
            &self.user1_id
        }
    }

    pub fn into_model(self) -> Couple {
        Couple {
            id: parse_uuid(&self.id, "couple id", &self.id),
            user1_id: parse_uuid(&self.user1_id, "user1_id", &self.id),
            user2_id: parse_uuid(&self.user2_id, "user2_id", &self.id),
            anniversary_date: self
                .anniversary_date
                .as_deref()
                .map(|d| parse_date(d, "anniversary_date", &self.id)),
            created_at: parse_timestamp(&self.created_at, "created_at", &self.id),
            couple_name: self.couple_name,
        }
    }
}

pub struct RecordRow {
    pub id: i64,
    pub seq: i64,
    pub recorded_by: String,
    pub date: String,
    pub time: String,
    pub mood: String,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub location: Option<String>,
    pub roleplay_script: Option<String>,
    pub activity_type: String,
    pub coins_earned: Option<i64>,
    pub created_at: String,
}

impl RecordRow {
    pub fn into_model(self) -> IntimateRecord {
        let key = self.id.to_string();
        IntimateRecord {
            id: self.id,
            seq: u32::try_from(self.seq).unwrap_or_else(|_| {
                warn!("Corrupt seq {} on record {}", self.seq, key);
                0
            }),
            date: parse_date(&self.date, "date", &key),
            recorded_by: parse_uuid(&self.recorded_by, "recorded_by", &key),
            created_at: parse_timestamp(&self.created_at, "created_at", &key),
            activity_type: ActivityType::parse_lossy(&self.activity_type),
            time: self.time,
            mood: self.mood,
            notes: self.notes,
            description: self.description,
            duration: self.duration,
            location: self.location,
            roleplay_script: self.roleplay_script,
            coins_earned: self.coins_earned,
        }
    }
}

pub struct MilestoneRow {
    pub id: String,
    pub kind: String,
    pub date: String,
    pub title: String,
    pub description: String,
    pub count: Option<i64>,
    pub record_id: Option<i64>,
}

impl MilestoneRow {
    pub fn into_model(self) -> JourneyMilestone {
        JourneyMilestone {
            date: parse_date(&self.date, "date", &self.id),
            kind: MilestoneType::parse_lossy(&self.kind),
            count: self.count.and_then(|c| u32::try_from(c).ok()),
            id: self.id,
            title: self.title,
            description: self.description,
            record_id: self.record_id,
        }
    }
}

pub struct CoinRow {
    pub id: String,
    pub amount: i64,
    pub transaction_type: String,
    pub source: String,
    pub description: String,
    pub created_at: String,
}

impl CoinRow {
    pub fn into_model(self) -> CoinTransaction {
        let transaction_type = match self.transaction_type.as_str() {
            "spend" => TransactionType::Spend,
            "earn" => TransactionType::Earn,
            other => {
                warn!("Corrupt transaction_type '{}' on transaction '{}'", other, self.id);
                if self.amount < 0 {
                    TransactionType::Spend
                } else {
                    TransactionType::Earn
                }
            }
        };

        CoinTransaction {
            id: parse_uuid(&self.id, "transaction id", &self.id),
            created_at: parse_timestamp(&self.created_at, "created_at", &self.id),
            amount: self.amount,
            transaction_type,
            source: self.source,
            description: self.description,
        }
    }
}

pub struct AchievementRow {
    pub badge: String,
    pub earned_at: String,
    pub milestone_value: Option<i64>,
}

impl AchievementRow {
    /// `None` for badge tags this build does not know about.
    pub fn into_model(self) -> Option<EarnedBadge> {
        let Some(badge) = BadgeId::from_tag(&self.badge) else {
            warn!("Skipping unknown badge '{}'", self.badge);
            return None;
        };
        Some(EarnedBadge {
            badge,
            earned_at: parse_timestamp(&self.earned_at, "earned_at", &self.badge),
            milestone_value: self.milestone_value.and_then(|v| u32::try_from(v).ok()),
        })
    }
}

pub struct ScriptRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub scenario: String,
    pub content: String,
    pub tags: String,
    pub created_by: String,
    pub created_at: String,
}

impl ScriptRow {
    pub fn into_model(self) -> RoleplayScript {
        let category = ScriptCategory::from_tag(&self.category).unwrap_or_else(|| {
            warn!("Corrupt category '{}' on script '{}'", self.category, self.id);
            ScriptCategory::Romantic
        });
        let tags = serde_json::from_str(&self.tags).unwrap_or_else(|e| {
            warn!("Corrupt tags on script '{}': {}", self.id, e);
            Vec::new()
        });

        RoleplayScript {
            id: parse_uuid(&self.id, "script id", &self.id),
            created_by: parse_uuid(&self.created_by, "created_by", &self.id),
            created_at: parse_timestamp(&self.created_at, "created_at", &self.id),
            category,
            tags,
            title: self.title,
            scenario: self.scenario,
            content: self.content,
        }
    }
}

pub struct GiftRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cost: i64,
    pub category: String,
    pub icon: String,
    pub created_by: String,
}

impl GiftRow {
    pub fn into_model(self) -> Gift {
        let category = GiftCategory::from_tag(&self.category).unwrap_or_else(|| {
            warn!("Corrupt category '{}' on gift '{}'", self.category, self.id);
            GiftCategory::Service
        });

        Gift {
            created_by: Some(parse_uuid(&self.created_by, "created_by", &self.id)),
            category,
            id: self.id,
            title: self.title,
            description: self.description,
            cost: self.cost,
            icon: self.icon,
            is_custom: true,
        }
    }
}

fn parse_uuid(raw: &str, field: &str, owner: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}' on '{}': {}", field, raw, owner, e);
        Uuid::default()
    })
}

fn parse_date(raw: &str, field: &str, owner: &str) -> NaiveDate {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}' on '{}': {}", field, raw, owner, e);
        NaiveDate::default()
    })
}

fn parse_timestamp(raw: &str, field: &str, owner: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's datetime('now') has no timezone: "YYYY-MM-DD HH:MM:SS" in UTC.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt {} '{}' on '{}': {}", field, raw, owner, e);
            DateTime::default()
        })
}

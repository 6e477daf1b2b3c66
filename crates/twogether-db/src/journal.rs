use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use twogether_rewards::{Changeset, JournalState, JournalStore};
use twogether_types::models::{IntimateRecord, NewRecord};

use crate::queries::{query_achievements, query_balance, query_milestones, query_records, query_spent};

/// [`JournalStore`] over one couple's rows. Borrows a connection, normally
/// the transaction opened by [`crate::Database::with_journal`].
pub struct SqliteJournal<'c> {
    conn: &'c Connection,
    couple_id: &'c str,
    user_id: &'c str,
}

impl<'c> SqliteJournal<'c> {
    pub fn new(conn: &'c Connection, couple_id: &'c str, user_id: &'c str) -> Self {
        Self {
            conn,
            couple_id,
            user_id,
        }
    }
}

impl JournalStore for SqliteJournal<'_> {
    fn load(&self) -> Result<JournalState> {
        let records = query_records(self.conn, self.couple_id)?
            .into_iter()
            .map(|r| r.into_model())
            .collect();
        let milestones = query_milestones(self.conn, self.couple_id)?
            .into_iter()
            .map(|m| m.into_model())
            .collect();
        let badges = query_achievements(self.conn, self.couple_id)?
            .into_iter()
            .filter_map(|a| a.into_model())
            .collect();

        Ok(JournalState {
            records,
            milestones,
            balance: query_balance(self.conn, self.couple_id)?,
            spent: query_spent(self.conn, self.couple_id)?,
            badges,
        })
    }

    fn append_record(&mut self, draft: &NewRecord, coins_earned: i64) -> Result<IntimateRecord> {
        let seq: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM records WHERE couple_id = ?1",
            [self.couple_id],
            |row| row.get(0),
        )?;
        let created_at = Utc::now();

        self.conn.execute(
            "INSERT INTO records (couple_id, seq, recorded_by, date, time, mood, notes, description,
                                  duration, location, roleplay_script, activity_type, coins_earned, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            rusqlite::params![
                self.couple_id,
                seq,
                self.user_id,
                draft.date.to_string(),
                draft.time,
                draft.mood,
                draft.notes,
                draft.description,
                draft.duration,
                draft.location,
                draft.roleplay_script,
                draft.activity_type.as_str(),
                coins_earned,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(IntimateRecord {
            id: self.conn.last_insert_rowid(),
            seq: u32::try_from(seq)?,
            date: draft.date,
            time: draft.time.clone(),
            mood: draft.mood.clone(),
            notes: draft.notes.clone(),
            description: draft.description.clone(),
            duration: draft.duration.clone(),
            location: draft.location.clone(),
            roleplay_script: draft.roleplay_script.clone(),
            activity_type: draft.activity_type,
            coins_earned: Some(coins_earned),
            recorded_by: self.user_id.parse()?,
            created_at,
        })
    }

    fn save(&mut self, changes: &Changeset) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let now = Utc::now().to_rfc3339();

        for entry in &changes.coins {
            self.conn.execute(
                "INSERT INTO coin_transactions (id, couple_id, amount, transaction_type, source, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    Uuid::new_v4().to_string(),
                    self.couple_id,
                    entry.amount,
                    entry.transaction_type.as_str(),
                    entry.source,
                    entry.description,
                    now,
                ],
            )?;
        }

        for m in &changes.milestones {
            self.conn.execute(
                "INSERT OR IGNORE INTO milestones (couple_id, id, kind, date, title, description, count, record_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    self.couple_id,
                    m.id,
                    m.kind.as_str(),
                    m.date.to_string(),
                    m.title,
                    m.description,
                    m.count,
                    m.record_id,
                ],
            )?;
        }

        for b in &changes.badges {
            self.conn.execute(
                "INSERT OR IGNORE INTO achievements (couple_id, badge, earned_at, milestone_value)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    self.couple_id,
                    b.badge.as_str(),
                    b.earned_at.to_rfc3339(),
                    b.milestone_value,
                ],
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use twogether_rewards::JournalError;
    use twogether_types::models::{ActivityType, BadgeId, MilestoneType};

    use super::*;
    use crate::Database;

    const ALICE: &str = "00000000-0000-0000-0000-00000000000a";
    const BOB: &str = "00000000-0000-0000-0000-00000000000b";
    const COUPLE: &str = "00000000-0000-0000-0000-0000000000cc";

    fn paired_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_user(ALICE, "alice", "hash").unwrap();
        db.create_user(BOB, "bob", "hash").unwrap();
        db.pair_users(COUPLE, ALICE, BOB, Some("A & B"), None).unwrap().unwrap();
        db
    }

    fn draft(date: &str) -> NewRecord {
        NewRecord {
            date: date.parse().unwrap(),
            time: "23:15".into(),
            mood: "😊".into(),
            duration: Some("40 minutes".into()),
            activity_type: ActivityType::LongSession,
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn records_persist_with_sequence_numbers() {
        let db = paired_db();
        for day in ["2024-06-01", "2024-06-02"] {
            db.with_journal(COUPLE, ALICE, |j| j.record_moment(draft(day), today()))
                .unwrap();
        }
        let outcome = db
            .with_journal(COUPLE, BOB, |j| j.record_moment(draft("2024-06-03"), today()))
            .unwrap();
        assert_eq!(outcome.record.seq, 3);
        assert_eq!(outcome.record.recorded_by.to_string(), BOB);

        let rows: Vec<IntimateRecord> = db
            .list_records(COUPLE)
            .unwrap()
            .into_iter()
            .map(|r| r.into_model())
            .collect();
        assert_eq!(rows.iter().map(|r| r.seq).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows[0].coins_earned, Some(1000));
        assert_eq!(rows[0].duration.as_deref(), Some("40 minutes"));

        let fetched = db.get_record(COUPLE, outcome.record.id).unwrap().unwrap().into_model();
        assert_eq!(fetched, outcome.record);
    }

    #[test]
    fn balance_and_achievements_survive_reload() {
        let db = paired_db();
        db.with_journal(COUPLE, ALICE, |j| j.record_moment(draft("2024-06-01"), today()))
            .unwrap();

        // 1000 for the session + 1000 beginner bonus
        assert_eq!(db.get_balance(COUPLE).unwrap(), 2000);
        let badges: Vec<_> = db
            .list_achievements(COUPLE)
            .unwrap()
            .into_iter()
            .filter_map(|a| a.into_model())
            .collect();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].badge, BadgeId::BeginnerCouple);

        let second = db
            .with_journal(COUPLE, BOB, |j| j.record_moment(draft("2024-06-02"), today()))
            .unwrap();
        assert!(second.achievements.is_empty());
        assert_eq!(second.balance, 3000);
    }

    #[test]
    fn milestones_written_once_and_sorted() {
        let db = paired_db();
        db.with_journal(COUPLE, ALICE, |j| {
            j.add_milestone(MilestoneType::Meeting, "2024-06-05".parse().unwrap(), "", "")
        })
        .unwrap();

        for day in 1..=10 {
            let date = format!("2024-05-{:02}", day);
            db.with_journal(COUPLE, ALICE, |j| j.record_moment(draft(&date), today()))
                .unwrap();
        }
        let again = db
            .with_journal(COUPLE, ALICE, |j| j.refresh_milestones(today()))
            .unwrap();
        assert!(again.is_empty());

        let milestones: Vec<_> = db
            .list_milestones(COUPLE)
            .unwrap()
            .into_iter()
            .map(|m| m.into_model())
            .collect();
        let ids: Vec<&str> = milestones.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["intimacy_10", "meeting"]);
        assert_eq!(milestones[0].date, "2024-05-10".parse::<NaiveDate>().unwrap());
        assert!(milestones[0].record_id.is_some());
    }

    #[test]
    fn failed_operation_rolls_back() {
        let db = paired_db();
        let err = db
            .with_journal(COUPLE, ALICE, |j| {
                j.credit(500, "script_upload", "Uploaded a script")?;
                j.spend(600, "gift", "Massage")
            })
            .unwrap_err();
        assert!(matches!(err, JournalError::InsufficientCoins { balance: 500, cost: 600 }));
        assert_eq!(db.get_balance(COUPLE).unwrap(), 0);
    }

    #[test]
    fn spend_recorded_in_ledger() {
        let db = paired_db();
        let balance = db
            .with_journal(COUPLE, ALICE, |j| {
                j.credit(500, "script_upload", "Uploaded a script")?;
                j.spend(200, "gift", "Massage")
            })
            .unwrap();
        assert_eq!(balance, 300);

        let ledger: Vec<_> = db
            .list_transactions(COUPLE, 50)
            .unwrap()
            .into_iter()
            .map(|r| r.into_model())
            .collect();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.iter().map(|t| t.amount).sum::<i64>(), 300);
        assert!(ledger.iter().any(|t| t.amount == -200 && t.source == "gift"));
    }

    #[test]
    fn script_upload_credits_reward() {
        let db = paired_db();
        let row = crate::models::ScriptRow {
            id: "00000000-0000-0000-0000-0000000000e1".into(),
            title: "Coffee shop strangers".into(),
            category: "romantic".into(),
            scenario: "Two strangers meet".into(),
            content: "[partner1]: Is this seat taken?".into(),
            tags: r#"["cafe","first meeting"]"#.into(),
            created_by: ALICE.into(),
            created_at: Utc::now().to_rfc3339(),
        };
        let balance = db.upload_script(COUPLE, &row, 200).unwrap();
        assert_eq!(balance, 200);

        let scripts: Vec<_> = db
            .list_scripts(COUPLE)
            .unwrap()
            .into_iter()
            .map(|s| s.into_model())
            .collect();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].tags, vec!["cafe", "first meeting"]);
        assert_eq!(db.get_balance(COUPLE).unwrap(), 200);
    }

    #[test]
    fn duplicate_username_is_not_inserted() {
        let db = paired_db();
        let again = db
            .create_user("00000000-0000-0000-0000-0000000000a2", "alice", "other")
            .unwrap();
        assert!(!again);

        let alice = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(alice.id, ALICE);
        assert_eq!(alice.into_model().username, "alice");
    }

    #[test]
    fn custom_gifts_redeem_and_count_as_spent() {
        let db = paired_db();
        let row = crate::models::GiftRow {
            id: "00000000-0000-0000-0000-0000000000f1".into(),
            title: "Breakfast in bed".into(),
            description: "Pancakes".into(),
            cost: 300,
            category: "service".into(),
            icon: "🥞".into(),
            created_by: BOB.into(),
        };
        db.insert_gift(COUPLE, &row).unwrap();

        let gifts: Vec<_> = db
            .list_gifts(COUPLE)
            .unwrap()
            .into_iter()
            .map(|g| g.into_model())
            .collect();
        assert_eq!(gifts.len(), 1);
        assert_eq!(gifts[0].cost, 300);

        db.with_journal(COUPLE, ALICE, |j| j.record_moment(draft("2024-06-01"), today()))
            .unwrap();
        let balance = db
            .with_journal(COUPLE, ALICE, |j| j.redeem(&gifts[0]))
            .unwrap();
        assert_eq!(balance, 1700);

        let stats = db
            .with_journal(COUPLE, ALICE, |j| Ok::<_, JournalError>(j.stats(today())))
            .unwrap();
        assert_eq!(stats.total_coins_spent, 300);
        assert_eq!(stats.current_balance, 1700);
        assert_eq!(stats.total_coins_earned, 1000);
    }

    #[test]
    fn pairing_is_exclusive() {
        let db = paired_db();
        let carol = "00000000-0000-0000-0000-0000000000c0";
        db.create_user(carol, "carol", "hash").unwrap();
        let again = db
            .pair_users("00000000-0000-0000-0000-0000000000dd", carol, BOB, None, None)
            .unwrap();
        assert!(again.is_none());

        let couple = db.get_couple_for_user(BOB).unwrap().unwrap();
        assert_eq!(couple.id, COUPLE);
        assert_eq!(couple.partner_of(BOB), ALICE);
        assert!(db.get_couple_for_user(carol).unwrap().is_none());
    }
}

use crate::Database;
use crate::models::{
    AchievementRow, CoinRow, CoupleRow, GiftRow, MilestoneRow, RecordRow, ScriptRow, UserRow,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::info;

use twogether_rewards::{Journal, JournalError};

use crate::SqliteJournal;

const RECORD_COLUMNS: &str = "id, seq, recorded_by, date, time, mood, notes, description, duration, \
     location, roleplay_script, activity_type, coins_earned, created_at";

impl Database {
    // -- Users --

    /// Insert a user. Returns `false` if the username is already taken.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)
                 ON CONFLICT(username) DO NOTHING",
                (id, username, password_hash),
            )?;
            Ok(inserted == 1)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Couples --

    /// Pair two users. Returns `None` if either of them already has a partner.
    pub fn pair_users(
        &self,
        id: &str,
        user1_id: &str,
        user2_id: &str,
        couple_name: Option<&str>,
        anniversary_date: Option<&str>,
    ) -> Result<Option<CoupleRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if query_couple_for_user(&tx, user1_id)?.is_some()
                || query_couple_for_user(&tx, user2_id)?.is_some()
            {
                return Ok(None);
            }

            tx.execute(
                "INSERT INTO couples (id, user1_id, user2_id, couple_name, anniversary_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, user1_id, user2_id, couple_name, anniversary_date],
            )?;
            let couple = query_couple_for_user(&tx, user1_id)?;
            tx.commit()?;

            info!("Paired users {} and {} as couple {}", user1_id, user2_id, id);
            Ok(couple)
        })
    }

    pub fn get_couple_for_user(&self, user_id: &str) -> Result<Option<CoupleRow>> {
        self.with_conn(|conn| query_couple_for_user(conn, user_id))
    }

    // -- Records --

    pub fn list_records(&self, couple_id: &str) -> Result<Vec<RecordRow>> {
        self.with_conn(|conn| query_records(conn, couple_id))
    }

    pub fn get_record(&self, couple_id: &str, record_id: i64) -> Result<Option<RecordRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM records WHERE couple_id = ?1 AND id = ?2",
                RECORD_COLUMNS
            );
            conn.query_row(&sql, rusqlite::params![couple_id, record_id], map_record)
                .optional()
        })
    }

    // -- Coins --

    pub fn get_balance(&self, couple_id: &str) -> Result<i64> {
        self.with_conn(|conn| query_balance(conn, couple_id))
    }

    /// Ledger, newest first.
    pub fn list_transactions(&self, couple_id: &str, limit: u32) -> Result<Vec<CoinRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, amount, transaction_type, source, description, created_at
                 FROM coin_transactions
                 WHERE couple_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
            )?;

            let rows = stmt
                .query_map(rusqlite::params![couple_id, limit], |row| {
                    Ok(CoinRow {
                        id: row.get(0)?,
                        amount: row.get(1)?,
                        transaction_type: row.get(2)?,
                        source: row.get(3)?,
                        description: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Gifts --

    pub fn insert_gift(&self, couple_id: &str, row: &GiftRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO gifts (id, couple_id, title, description, cost, category, icon, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    row.id,
                    couple_id,
                    row.title,
                    row.description,
                    row.cost,
                    row.category,
                    row.icon,
                    row.created_by
                ],
            )?;
            Ok(())
        })
    }

    /// The couple's own gifts, oldest first.
    pub fn list_gifts(&self, couple_id: &str) -> Result<Vec<GiftRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, cost, category, icon, created_by
                 FROM gifts
                 WHERE couple_id = ?1
                 ORDER BY created_at, rowid",
            )?;

            let rows = stmt
                .query_map([couple_id], |row| {
                    Ok(GiftRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                        cost: row.get(3)?,
                        category: row.get(4)?,
                        icon: row.get(5)?,
                        created_by: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Milestones and achievements --

    pub fn list_milestones(&self, couple_id: &str) -> Result<Vec<MilestoneRow>> {
        self.with_conn(|conn| query_milestones(conn, couple_id))
    }

    pub fn list_achievements(&self, couple_id: &str) -> Result<Vec<AchievementRow>> {
        self.with_conn(|conn| query_achievements(conn, couple_id))
    }

    // -- Scripts --

    /// Store a script and credit the upload reward in one transaction.
    /// Returns the new balance.
    pub fn upload_script(
        &self,
        couple_id: &str,
        row: &ScriptRow,
        reward: i64,
    ) -> Result<i64, JournalError> {
        let mut conn = self.conn.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        let tx = conn.transaction().map_err(anyhow::Error::from)?;

        tx.execute(
            "INSERT INTO scripts (id, couple_id, title, category, scenario, content, tags, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                row.id,
                couple_id,
                row.title,
                row.category,
                row.scenario,
                row.content,
                row.tags,
                row.created_by,
                row.created_at
            ],
        )
        .map_err(anyhow::Error::from)?;

        let balance = {
            let mut journal = Journal::open(SqliteJournal::new(&tx, couple_id, &row.created_by))?;
            journal.credit(reward, "script_upload", &format!("Uploaded script '{}'", row.title))?
        };

        tx.commit().map_err(anyhow::Error::from)?;
        info!("Stored script {} for couple {}", row.id, couple_id);
        Ok(balance)
    }

    pub fn list_scripts(&self, couple_id: &str) -> Result<Vec<ScriptRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, category, scenario, content, tags, created_by, created_at
                 FROM scripts
                 WHERE couple_id = ?1
                 ORDER BY created_at, rowid",
            )?;

            let rows = stmt
                .query_map([couple_id], |row| {
                    Ok(ScriptRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        category: row.get(2)?,
                        scenario: row.get(3)?,
                        content: row.get(4)?,
                        tags: row.get(5)?,
                        created_by: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, password, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    stmt.query_row([value], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            created_at: row.get(3)?,
        })
    })
    .optional()
}

fn query_couple_for_user(conn: &Connection, user_id: &str) -> Result<Option<CoupleRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user1_id, user2_id, couple_name, anniversary_date, created_at
         FROM couples WHERE user1_id = ?1 OR user2_id = ?1",
    )?;

    stmt.query_row([user_id], |row| {
        Ok(CoupleRow {
            id: row.get(0)?,
            user1_id: row.get(1)?,
            user2_id: row.get(2)?,
            couple_name: row.get(3)?,
            anniversary_date: row.get(4)?,
            created_at: row.get(5)?,
        })
    })
    .optional()
}

pub(crate) fn query_records(conn: &Connection, couple_id: &str) -> Result<Vec<RecordRow>> {
    let sql = format!(
        "SELECT {} FROM records WHERE couple_id = ?1 ORDER BY seq",
        RECORD_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([couple_id], map_record)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        id: row.get(0)?,
        seq: row.get(1)?,
        recorded_by: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        mood: row.get(5)?,
        notes: row.get(6)?,
        description: row.get(7)?,
        duration: row.get(8)?,
        location: row.get(9)?,
        roleplay_script: row.get(10)?,
        activity_type: row.get(11)?,
        coins_earned: row.get(12)?,
        created_at: row.get(13)?,
    })
}

pub(crate) fn query_balance(conn: &Connection, couple_id: &str) -> Result<i64> {
    let balance = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM coin_transactions WHERE couple_id = ?1",
        [couple_id],
        |row| row.get(0),
    )?;
    Ok(balance)
}

/// Total redeemed, as a positive number.
pub(crate) fn query_spent(conn: &Connection, couple_id: &str) -> Result<i64> {
    let spent = conn.query_row(
        "SELECT COALESCE(-SUM(amount), 0) FROM coin_transactions
         WHERE couple_id = ?1 AND transaction_type = 'spend'",
        [couple_id],
        |row| row.get(0),
    )?;
    Ok(spent)
}

/// Sorted by date; equal dates keep insertion order.
pub(crate) fn query_milestones(conn: &Connection, couple_id: &str) -> Result<Vec<MilestoneRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, date, title, description, count, record_id
         FROM milestones
         WHERE couple_id = ?1
         ORDER BY date, rowid",
    )?;

    let rows = stmt
        .query_map([couple_id], |row| {
            Ok(MilestoneRow {
                id: row.get(0)?,
                kind: row.get(1)?,
                date: row.get(2)?,
                title: row.get(3)?,
                description: row.get(4)?,
                count: row.get(5)?,
                record_id: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

pub(crate) fn query_achievements(conn: &Connection, couple_id: &str) -> Result<Vec<AchievementRow>> {
    let mut stmt = conn.prepare(
        "SELECT badge, earned_at, milestone_value
         FROM achievements
         WHERE couple_id = ?1
         ORDER BY earned_at, rowid",
    )?;

    let rows = stmt
        .query_map([couple_id], |row| {
            Ok(AchievementRow {
                badge: row.get(0)?,
                earned_at: row.get(1)?,
                milestone_value: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

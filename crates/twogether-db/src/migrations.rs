use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE couples (
                id                TEXT PRIMARY KEY,
                user1_id          TEXT NOT NULL UNIQUE REFERENCES users(id),
                user2_id          TEXT NOT NULL UNIQUE REFERENCES users(id),
                couple_name       TEXT,
                anniversary_date  TEXT,
                created_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE records (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                couple_id        TEXT NOT NULL REFERENCES couples(id),
                seq              INTEGER NOT NULL,
                recorded_by      TEXT NOT NULL REFERENCES users(id),
                date             TEXT NOT NULL,
                time             TEXT NOT NULL,
                mood             TEXT NOT NULL,
                notes            TEXT,
                description      TEXT,
                duration         TEXT,
                location         TEXT,
                roleplay_script  TEXT,
                activity_type    TEXT NOT NULL DEFAULT 'regular',
                coins_earned     INTEGER,
                created_at       TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(couple_id, seq)
            );

            CREATE TABLE coin_transactions (
                id                TEXT PRIMARY KEY,
                couple_id         TEXT NOT NULL REFERENCES couples(id),
                amount            INTEGER NOT NULL,
                transaction_type  TEXT NOT NULL CHECK (transaction_type IN ('earn', 'spend')),
                source            TEXT NOT NULL,
                description       TEXT NOT NULL,
                created_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_coin_transactions_couple
                ON coin_transactions(couple_id, created_at);

            CREATE TABLE milestones (
                couple_id    TEXT NOT NULL REFERENCES couples(id),
                id           TEXT NOT NULL,
                kind         TEXT NOT NULL,
                date         TEXT NOT NULL,
                title        TEXT NOT NULL,
                description  TEXT NOT NULL,
                count        INTEGER,
                record_id    INTEGER REFERENCES records(id),
                PRIMARY KEY (couple_id, id)
            );

            CREATE TABLE achievements (
                couple_id        TEXT NOT NULL REFERENCES couples(id),
                badge            TEXT NOT NULL,
                earned_at        TEXT NOT NULL,
                milestone_value  INTEGER,
                PRIMARY KEY (couple_id, badge)
            );

            CREATE TABLE scripts (
                id          TEXT PRIMARY KEY,
                couple_id   TEXT NOT NULL REFERENCES couples(id),
                title       TEXT NOT NULL,
                category    TEXT NOT NULL,
                scenario    TEXT NOT NULL,
                content     TEXT NOT NULL,
                tags        TEXT NOT NULL DEFAULT '[]',
                created_by  TEXT NOT NULL REFERENCES users(id),
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (custom gifts)");
        conn.execute_batch(
            "
            CREATE TABLE gifts (
                id           TEXT PRIMARY KEY,
                couple_id    TEXT NOT NULL REFERENCES couples(id),
                title        TEXT NOT NULL,
                description  TEXT NOT NULL DEFAULT '',
                cost         INTEGER NOT NULL CHECK (cost > 0),
                category     TEXT NOT NULL,
                icon         TEXT NOT NULL DEFAULT '',
                created_by   TEXT NOT NULL REFERENCES users(id),
                created_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_gifts_couple ON gifts(couple_id);

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

//! SQLite-based storage for goals, daily records, and timer records.
//!
//! Provides persistent storage for:
//! - Categories and the big/small goal hierarchy
//! - Daily check-in records with their progress entries
//! - Completed timer sessions
//! - Key-value store for application state (e.g. the persisted engine)

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::DatabaseError;
use crate::goal::{BigGoal, Category, GoalStatus, SmallGoal};
use crate::record::{DailyRecord, Energy, GoalProgressEntry, Mood};
use crate::timer::{SessionKind, TimerRecord};

// === Helper Functions ===

/// Parse goal status from database string
fn parse_goal_status(status_str: &str) -> GoalStatus {
    match status_str {
        "completed" => GoalStatus::Completed,
        "on_hold" => GoalStatus::OnHold,
        _ => GoalStatus::Active,
    }
}

/// Format goal status for database storage
fn format_goal_status(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Active => "active",
        GoalStatus::Completed => "completed",
        GoalStatus::OnHold => "on_hold",
    }
}

/// Parse session kind from database string
fn parse_session_kind(kind_str: &str) -> SessionKind {
    match kind_str {
        "pomodoro" => SessionKind::Pomodoro,
        "stopwatch" => SessionKind::Stopwatch,
        _ => SessionKind::Custom,
    }
}

/// Format session kind for database storage
fn format_session_kind(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Pomodoro => "pomodoro",
        SessionKind::Custom => "custom",
        SessionKind::Stopwatch => "stopwatch",
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse an optional RFC3339 column
fn parse_optional_datetime(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str.map(|s| parse_datetime_fallback(&s))
}

/// Parse a `YYYY-MM-DD` date column
fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().date_naive())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Build a Category from a database row
fn row_to_category(row: &rusqlite::Row) -> Result<Category, rusqlite::Error> {
    let created_at: String = row.get(2)?;
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Build a BigGoal from a database row
fn row_to_big_goal(row: &rusqlite::Row) -> Result<BigGoal, rusqlite::Error> {
    let status: String = row.get(6)?;
    let deadline: Option<String> = row.get(4)?;
    let completed_at: Option<String> = row.get(8)?;
    let created_at: String = row.get(9)?;
    Ok(BigGoal {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category_id: row.get(3)?,
        deadline: deadline.map(|d| parse_date(&d)),
        image: row.get(5)?,
        status: parse_goal_status(&status),
        archived: row.get(7)?,
        completed_at: parse_optional_datetime(completed_at),
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Build a SmallGoal from a database row
fn row_to_small_goal(row: &rusqlite::Row) -> Result<SmallGoal, rusqlite::Error> {
    let deadline: Option<String> = row.get(7)?;
    let completed_at: Option<String> = row.get(10)?;
    let created_at: String = row.get(11)?;
    Ok(SmallGoal {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        big_goal_id: row.get(3)?,
        target_value: row.get(4)?,
        current_value: row.get(5)?,
        unit: row.get(6)?,
        deadline: deadline.map(|d| parse_date(&d)),
        completed: row.get(8)?,
        archived: row.get(9)?,
        completed_at: parse_optional_datetime(completed_at),
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Build a TimerRecord from a database row
fn row_to_timer_record(row: &rusqlite::Row) -> Result<TimerRecord, rusqlite::Error> {
    let kind: String = row.get(1)?;
    let started_at: String = row.get(5)?;
    let ended_at: String = row.get(6)?;
    Ok(TimerRecord {
        id: row.get(0)?,
        kind: parse_session_kind(&kind),
        is_break: row.get(2)?,
        duration_secs: row.get(3)?,
        small_goal_id: row.get(4)?,
        started_at: parse_datetime_fallback(&started_at),
        ended_at: parse_datetime_fallback(&ended_at),
        comment: row.get(7)?,
    })
}

/// Build a DailyRecord (without entries) from a database row
fn row_to_record(row: &rusqlite::Row) -> Result<DailyRecord, rusqlite::Error> {
    let date: String = row.get(1)?;
    let mood: Option<u8> = row.get(2)?;
    let energy: Option<u8> = row.get(3)?;
    let created_at: String = row.get(5)?;
    Ok(DailyRecord {
        id: row.get(0)?,
        date: parse_date(&date),
        mood: mood.and_then(Mood::from_score),
        energy: energy.and_then(Energy::from_score),
        comment: row.get(4)?,
        entries: Vec::new(),
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// SQLite database for goaltrack data.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/goaltrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .join("goaltrack.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS categories (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS big_goals (
                id           TEXT PRIMARY KEY,
                title        TEXT NOT NULL,
                description  TEXT NOT NULL DEFAULT '',
                category_id  TEXT,
                deadline     TEXT,
                image        TEXT,
                status       TEXT NOT NULL DEFAULT 'active',
                archived     INTEGER NOT NULL DEFAULT 0,
                completed_at TEXT,
                created_at   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS small_goals (
                id            TEXT PRIMARY KEY,
                title         TEXT NOT NULL,
                description   TEXT NOT NULL DEFAULT '',
                big_goal_id   TEXT,
                target_value  REAL NOT NULL,
                current_value REAL NOT NULL DEFAULT 0,
                unit          TEXT NOT NULL DEFAULT '',
                deadline      TEXT,
                completed     INTEGER NOT NULL DEFAULT 0,
                archived      INTEGER NOT NULL DEFAULT 0,
                completed_at  TEXT,
                created_at    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS daily_records (
                id         TEXT PRIMARY KEY,
                date       TEXT NOT NULL,
                mood       INTEGER,
                energy     INTEGER,
                comment    TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS record_entries (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                record_id     TEXT NOT NULL,
                small_goal_id TEXT,
                label         TEXT,
                value         REAL NOT NULL,
                unit          TEXT NOT NULL DEFAULT '',
                comment       TEXT,
                order_index   INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS timer_records (
                id            TEXT PRIMARY KEY,
                kind          TEXT NOT NULL,
                is_break      INTEGER NOT NULL DEFAULT 0,
                duration_secs INTEGER NOT NULL,
                small_goal_id TEXT,
                started_at    TEXT NOT NULL,
                ended_at      TEXT NOT NULL,
                comment       TEXT
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- One check-in per calendar day.
            CREATE UNIQUE INDEX IF NOT EXISTS idx_daily_records_date ON daily_records(date);
            CREATE INDEX IF NOT EXISTS idx_record_entries_record ON record_entries(record_id);
            CREATE INDEX IF NOT EXISTS idx_small_goals_big_goal ON small_goals(big_goal_id);
            CREATE INDEX IF NOT EXISTS idx_timer_records_started_at ON timer_records(started_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // ── Categories ───────────────────────────────────────────────────

    pub fn insert_category(&self, category: &Category) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![
                category.id,
                category.name,
                category.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM categories ORDER BY created_at ASC")?;
        let rows = stmt.query_map([], row_to_category)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn rename_category(&self, id: &str, name: &str) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute("UPDATE categories SET name = ?2 WHERE id = ?1", params![id, name])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "category",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Hard-delete a category. Goals referencing it become uncategorized.
    pub fn delete_category(&self, id: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE big_goals SET category_id = NULL WHERE category_id = ?1",
            params![id],
        )?;
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "category",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ── Big goals ────────────────────────────────────────────────────

    pub fn insert_big_goal(&self, goal: &BigGoal) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO big_goals (id, title, description, category_id, deadline, image,
                                    status, archived, completed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                goal.id,
                goal.title,
                goal.description,
                goal.category_id,
                goal.deadline.map(format_date),
                goal.image,
                format_goal_status(goal.status),
                goal.archived,
                goal.completed_at.map(|t| t.to_rfc3339()),
                goal.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn big_goals(&self, include_archived: bool) -> Result<Vec<BigGoal>, DatabaseError> {
        let sql = if include_archived {
            "SELECT id, title, description, category_id, deadline, image, status, archived,
                    completed_at, created_at
             FROM big_goals ORDER BY created_at DESC"
        } else {
            "SELECT id, title, description, category_id, deadline, image, status, archived,
                    completed_at, created_at
             FROM big_goals WHERE archived = 0 ORDER BY created_at DESC"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], row_to_big_goal)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_big_goal(&self, id: &str) -> Result<BigGoal, DatabaseError> {
        self.conn
            .query_row(
                "SELECT id, title, description, category_id, deadline, image, status, archived,
                        completed_at, created_at
                 FROM big_goals WHERE id = ?1",
                params![id],
                row_to_big_goal,
            )
            .optional()?
            .ok_or(DatabaseError::NotFound {
                entity: "big goal",
                id: id.to_string(),
            })
    }

    pub fn update_big_goal(&self, goal: &BigGoal) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE big_goals
             SET title = ?2, description = ?3, category_id = ?4, deadline = ?5, image = ?6,
                 status = ?7, archived = ?8, completed_at = ?9
             WHERE id = ?1",
            params![
                goal.id,
                goal.title,
                goal.description,
                goal.category_id,
                goal.deadline.map(format_date),
                goal.image,
                format_goal_status(goal.status),
                goal.archived,
                goal.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "big goal",
                id: goal.id.clone(),
            });
        }
        Ok(())
    }

    pub fn set_big_goal_archived(&self, id: &str, archived: bool) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE big_goals SET archived = ?2 WHERE id = ?1",
            params![id, archived],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "big goal",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Hard-delete a big goal. Cascades to its small goals.
    pub fn delete_big_goal(&self, id: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "DELETE FROM small_goals WHERE big_goal_id = ?1",
            params![id],
        )?;
        let changed = self
            .conn
            .execute("DELETE FROM big_goals WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "big goal",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ── Small goals ──────────────────────────────────────────────────

    pub fn insert_small_goal(&self, goal: &SmallGoal) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO small_goals (id, title, description, big_goal_id, target_value,
                                      current_value, unit, deadline, completed, archived,
                                      completed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                goal.id,
                goal.title,
                goal.description,
                goal.big_goal_id,
                goal.target_value,
                goal.current_value,
                goal.unit,
                goal.deadline.map(format_date),
                goal.completed,
                goal.archived,
                goal.completed_at.map(|t| t.to_rfc3339()),
                goal.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn small_goals(&self, include_archived: bool) -> Result<Vec<SmallGoal>, DatabaseError> {
        let sql = if include_archived {
            "SELECT id, title, description, big_goal_id, target_value, current_value, unit,
                    deadline, completed, archived, completed_at, created_at
             FROM small_goals ORDER BY created_at DESC"
        } else {
            "SELECT id, title, description, big_goal_id, target_value, current_value, unit,
                    deadline, completed, archived, completed_at, created_at
             FROM small_goals WHERE archived = 0 ORDER BY created_at DESC"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], row_to_small_goal)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_small_goal(&self, id: &str) -> Result<SmallGoal, DatabaseError> {
        self.conn
            .query_row(
                "SELECT id, title, description, big_goal_id, target_value, current_value, unit,
                        deadline, completed, archived, completed_at, created_at
                 FROM small_goals WHERE id = ?1",
                params![id],
                row_to_small_goal,
            )
            .optional()?
            .ok_or(DatabaseError::NotFound {
                entity: "small goal",
                id: id.to_string(),
            })
    }

    pub fn update_small_goal(&self, goal: &SmallGoal) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE small_goals
             SET title = ?2, description = ?3, big_goal_id = ?4, target_value = ?5,
                 current_value = ?6, unit = ?7, deadline = ?8, completed = ?9, archived = ?10,
                 completed_at = ?11
             WHERE id = ?1",
            params![
                goal.id,
                goal.title,
                goal.description,
                goal.big_goal_id,
                goal.target_value,
                goal.current_value,
                goal.unit,
                goal.deadline.map(format_date),
                goal.completed,
                goal.archived,
                goal.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "small goal",
                id: goal.id.clone(),
            });
        }
        Ok(())
    }

    pub fn set_small_goal_archived(&self, id: &str, archived: bool) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE small_goals SET archived = ?2 WHERE id = ?1",
            params![id, archived],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "small goal",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Add progress to a small goal and persist the derived completion
    /// state. This is the only write path for the completed flag.
    pub fn record_goal_progress(&self, id: &str, value: f64) -> Result<SmallGoal, DatabaseError> {
        let mut goal = self.get_small_goal(id)?;
        goal.record_progress(value);
        self.update_small_goal(&goal)?;
        Ok(goal)
    }

    // ── Daily records ────────────────────────────────────────────────

    pub fn insert_record(&self, record: &DailyRecord) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO daily_records (id, date, mood, energy, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                format_date(record.date),
                record.mood.map(Mood::score),
                record.energy.map(Energy::score),
                record.comment,
                record.created_at.to_rfc3339(),
            ],
        )?;
        self.set_record_entries(&record.id, &record.entries)?;
        Ok(())
    }

    pub fn update_record(&self, record: &DailyRecord) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE daily_records SET date = ?2, mood = ?3, energy = ?4, comment = ?5
             WHERE id = ?1",
            params![
                record.id,
                format_date(record.date),
                record.mood.map(Mood::score),
                record.energy.map(Energy::score),
                record.comment,
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "daily record",
                id: record.id.clone(),
            });
        }
        self.set_record_entries(&record.id, &record.entries)?;
        Ok(())
    }

    pub fn delete_record(&self, id: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM record_entries WHERE record_id = ?1", params![id])?;
        let changed = self
            .conn
            .execute("DELETE FROM daily_records WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "daily record",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn record_by_date(&self, date: NaiveDate) -> Result<Option<DailyRecord>, DatabaseError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, date, mood, energy, comment, created_at
                 FROM daily_records WHERE date = ?1",
                params![format_date(date)],
                row_to_record,
            )
            .optional()?;
        match record {
            Some(mut record) => {
                record.entries = self.load_record_entries(&record.id)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Records for a 1-indexed month, entries included.
    pub fn records_by_month(&self, year: i32, month: u32) -> Result<Vec<DailyRecord>, DatabaseError> {
        let prefix = format!("{year:04}-{month:02}-%");
        let mut stmt = self.conn.prepare(
            "SELECT id, date, mood, energy, comment, created_at
             FROM daily_records WHERE date LIKE ?1 ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(params![prefix], row_to_record)?;
        let mut records = rows.collect::<Result<Vec<_>, _>>()?;
        for record in &mut records {
            record.entries = self.load_record_entries(&record.id)?;
        }
        Ok(records)
    }

    pub fn all_records(&self) -> Result<Vec<DailyRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, mood, energy, comment, created_at
             FROM daily_records ORDER BY date ASC",
        )?;
        let rows = stmt.query_map([], row_to_record)?;
        let mut records = rows.collect::<Result<Vec<_>, _>>()?;
        for record in &mut records {
            record.entries = self.load_record_entries(&record.id)?;
        }
        Ok(records)
    }

    /// Append one progress entry to an existing record.
    pub fn append_record_entry(
        &self,
        record_id: &str,
        entry: &GoalProgressEntry,
    ) -> Result<(), DatabaseError> {
        let next_index: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(order_index) + 1, 0) FROM record_entries WHERE record_id = ?1",
            params![record_id],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT INTO record_entries (record_id, small_goal_id, label, value, unit, comment,
                                         order_index)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record_id,
                entry.small_goal_id,
                entry.label,
                entry.value,
                entry.unit,
                entry.comment,
                next_index,
            ],
        )?;
        Ok(())
    }

    fn set_record_entries(
        &self,
        record_id: &str,
        entries: &[GoalProgressEntry],
    ) -> Result<(), DatabaseError> {
        self.conn.execute(
            "DELETE FROM record_entries WHERE record_id = ?1",
            params![record_id],
        )?;
        for (index, entry) in entries.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO record_entries (record_id, small_goal_id, label, value, unit,
                                             comment, order_index)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record_id,
                    entry.small_goal_id,
                    entry.label,
                    entry.value,
                    entry.unit,
                    entry.comment,
                    index as i64,
                ],
            )?;
        }
        Ok(())
    }

    fn load_record_entries(&self, record_id: &str) -> Result<Vec<GoalProgressEntry>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT small_goal_id, label, value, unit, comment
             FROM record_entries WHERE record_id = ?1 ORDER BY order_index ASC",
        )?;
        let rows = stmt.query_map(params![record_id], |row| {
            Ok(GoalProgressEntry {
                small_goal_id: row.get(0)?,
                label: row.get(1)?,
                value: row.get(2)?,
                unit: row.get(3)?,
                comment: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ── Timer records ────────────────────────────────────────────────

    pub fn insert_timer_record(&self, record: &TimerRecord) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO timer_records (id, kind, is_break, duration_secs, small_goal_id,
                                        started_at, ended_at, comment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                format_session_kind(record.kind),
                record.is_break,
                record.duration_secs,
                record.small_goal_id,
                record.started_at.to_rfc3339(),
                record.ended_at.to_rfc3339(),
                record.comment,
            ],
        )?;
        Ok(())
    }

    pub fn all_timer_records(&self) -> Result<Vec<TimerRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, is_break, duration_secs, small_goal_id, started_at, ended_at,
                    comment
             FROM timer_records ORDER BY started_at ASC",
        )?;
        let rows = stmt.query_map([], row_to_timer_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Timer records whose start falls in a 1-indexed month.
    pub fn timer_records_by_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<TimerRecord>, DatabaseError> {
        let prefix = format!("{year:04}-{month:02}-%");
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, is_break, duration_secs, small_goal_id, started_at, ended_at,
                    comment
             FROM timer_records WHERE started_at LIKE ?1 ORDER BY started_at ASC",
        )?;
        let rows = stmt.query_map(params![prefix], row_to_timer_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Timer records started on a calendar day.
    pub fn timer_records_by_date(&self, date: NaiveDate) -> Result<Vec<TimerRecord>, DatabaseError> {
        let prefix = format!("{}%", format_date(date));
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, is_break, duration_secs, small_goal_id, started_at, ended_at,
                    comment
             FROM timer_records WHERE started_at LIKE ?1 ORDER BY started_at ASC",
        )?;
        let rows = stmt.query_map(params![prefix], row_to_timer_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ── Key-value store ──────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_memory().unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn category_crud() {
        let db = db();
        let category = Category::new("fitness");
        db.insert_category(&category).unwrap();

        let all = db.categories().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "fitness");

        db.rename_category(&category.id, "health").unwrap();
        assert_eq!(db.categories().unwrap()[0].name, "health");

        db.delete_category(&category.id).unwrap();
        assert!(db.categories().unwrap().is_empty());
        assert!(db.delete_category(&category.id).is_err());
    }

    #[test]
    fn deleting_category_uncategorizes_goals() {
        let db = db();
        let category = Category::new("career");
        db.insert_category(&category).unwrap();
        let mut goal = BigGoal::new("Promotion");
        goal.category_id = Some(category.id.clone());
        db.insert_big_goal(&goal).unwrap();

        db.delete_category(&category.id).unwrap();
        let loaded = db.get_big_goal(&goal.id).unwrap();
        assert!(loaded.category_id.is_none());
    }

    #[test]
    fn big_goal_round_trip() {
        let db = db();
        let mut goal = BigGoal::new("Marathon");
        goal.description = "Finish a full marathon".into();
        goal.deadline = Some(date(2024, 12, 31));
        db.insert_big_goal(&goal).unwrap();

        let loaded = db.get_big_goal(&goal.id).unwrap();
        assert_eq!(loaded.title, "Marathon");
        assert_eq!(loaded.deadline, Some(date(2024, 12, 31)));
        assert_eq!(loaded.status, GoalStatus::Active);
    }

    #[test]
    fn archive_hides_big_goal_from_default_listing() {
        let db = db();
        let goal = BigGoal::new("Marathon");
        db.insert_big_goal(&goal).unwrap();

        db.set_big_goal_archived(&goal.id, true).unwrap();
        assert!(db.big_goals(false).unwrap().is_empty());
        assert_eq!(db.big_goals(true).unwrap().len(), 1);

        db.set_big_goal_archived(&goal.id, false).unwrap();
        assert_eq!(db.big_goals(false).unwrap().len(), 1);
    }

    #[test]
    fn deleting_big_goal_cascades_to_small_goals() {
        let db = db();
        let big = BigGoal::new("Learn Rust");
        db.insert_big_goal(&big).unwrap();
        let mut small = SmallGoal::new("Read the book", 1.0, "books");
        small.big_goal_id = Some(big.id.clone());
        db.insert_small_goal(&small).unwrap();

        db.delete_big_goal(&big.id).unwrap();
        assert!(db.small_goals(true).unwrap().is_empty());
    }

    #[test]
    fn record_goal_progress_derives_completion() {
        let db = db();
        let goal = SmallGoal::new("Run", 30.0, "km");
        db.insert_small_goal(&goal).unwrap();

        let updated = db.record_goal_progress(&goal.id, 20.0).unwrap();
        assert_eq!(updated.current_value, 20.0);
        assert!(!updated.completed);

        let updated = db.record_goal_progress(&goal.id, 15.0).unwrap();
        assert_eq!(updated.current_value, 35.0);
        assert!(updated.completed);
        assert!(updated.completed_at.is_some());

        let loaded = db.get_small_goal(&goal.id).unwrap();
        assert!(loaded.completed);
    }

    #[test]
    fn one_record_per_date() {
        let db = db();
        let record = DailyRecord::new(date(2024, 3, 5));
        db.insert_record(&record).unwrap();

        let duplicate = DailyRecord::new(date(2024, 3, 5));
        assert!(db.insert_record(&duplicate).is_err());
    }

    #[test]
    fn records_by_month_filters_and_loads_entries() {
        let db = db();
        let mut march = DailyRecord::new(date(2024, 3, 5));
        march.mood = Some(Mood::Good);
        march.entries.push(GoalProgressEntry {
            small_goal_id: None,
            label: Some("reading".into()),
            value: 30.0,
            unit: "min".into(),
            comment: None,
        });
        db.insert_record(&march).unwrap();
        db.insert_record(&DailyRecord::new(date(2024, 4, 1))).unwrap();

        let records = db.records_by_month(2024, 3).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mood, Some(Mood::Good));
        assert_eq!(records[0].entries.len(), 1);
        assert_eq!(records[0].entries[0].value, 30.0);
    }

    #[test]
    fn append_entry_preserves_order() {
        let db = db();
        let record = DailyRecord::new(date(2024, 3, 5));
        db.insert_record(&record).unwrap();

        for value in [10.0, 20.0, 30.0] {
            db.append_record_entry(
                &record.id,
                &GoalProgressEntry {
                    small_goal_id: None,
                    label: None,
                    value,
                    unit: String::new(),
                    comment: None,
                },
            )
            .unwrap();
        }

        let loaded = db.record_by_date(date(2024, 3, 5)).unwrap().unwrap();
        let values: Vec<f64> = loaded.entries.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn timer_records_filter_by_month_and_date() {
        let db = db();
        let mut record = TimerRecord::finalize(
            SessionKind::Custom,
            false,
            1500,
            None,
            "2024-03-05T09:00:00+00:00".parse().unwrap(),
        );
        record.ended_at = "2024-03-05T09:25:00+00:00".parse().unwrap();
        db.insert_timer_record(&record).unwrap();

        assert_eq!(db.timer_records_by_month(2024, 3).unwrap().len(), 1);
        assert!(db.timer_records_by_month(2024, 4).unwrap().is_empty());
        assert_eq!(db.timer_records_by_date(date(2024, 3, 5)).unwrap().len(), 1);
        assert!(db.timer_records_by_date(date(2024, 3, 6)).unwrap().is_empty());
    }

    #[test]
    fn kv_round_trip() {
        let db = db();
        assert!(db.kv_get("engine").unwrap().is_none());
        db.kv_set("engine", "{}").unwrap();
        db.kv_set("engine", "{\"state\":\"idle\"}").unwrap();
        assert_eq!(
            db.kv_get("engine").unwrap().as_deref(),
            Some("{\"state\":\"idle\"}")
        );
    }
}

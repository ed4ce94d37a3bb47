//! SQLite-based habit storage.
//!
//! Provides persistent storage for:
//! - Habit records (id, name, description, timestamps)
//! - Completion days, one row per `(habit, day)`

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use super::{data_dir, migrations, Config, HabitStore};
use crate::error::{DatabaseError, HabitError, Result};
use crate::habit::{CompletionDate, CompletionSet, Habit, HabitId, Toggled};

const HABIT_SELECT_SQL: &str = "SELECT id, name, description, created_at, updated_at FROM habits";

/// Format a timestamp at full precision, fixed width so text order matches time order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(id: &str, column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(id, format!("bad {column} '{value}': {e}")))
}

fn corrupt(id: &str, message: String) -> crate::error::CoreError {
    DatabaseError::Corrupt {
        id: id.to_string(),
        message,
    }
    .into()
}

fn not_found(id: &HabitId) -> crate::error::CoreError {
    HabitError::NotFound { id: id.to_string() }.into()
}

/// Raw `habits` row before validation.
struct HabitRow {
    id: String,
    name: String,
    description: String,
    created_at: String,
    updated_at: String,
}

impl HabitRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    /// Rebuild the habit, rejecting rows that break its invariants.
    fn into_habit(self, days: &[String]) -> Result<Habit> {
        let completions =
            CompletionSet::parse(days).map_err(|e| corrupt(&self.id, e.to_string()))?;
        let habit = Habit {
            created_at: parse_timestamp(&self.id, "created_at", &self.created_at)?,
            updated_at: parse_timestamp(&self.id, "updated_at", &self.updated_at)?,
            id: HabitId::from(self.id),
            name: self.name,
            description: self.description,
            completions,
        };
        habit
            .validate()
            .map_err(|e| corrupt(habit.id.as_str(), e.to_string()))?;
        Ok(habit)
    }
}

fn load_days(conn: &Connection, id: &str) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT day FROM habit_completions WHERE habit_id = ?1 ORDER BY day")?;
    let days = stmt
        .query_map(params![id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(days)
}

fn load_habit(conn: &Connection, id: &HabitId) -> Result<Habit> {
    let row = conn
        .query_row(
            &format!("{HABIT_SELECT_SQL} WHERE id = ?1"),
            params![id.as_str()],
            HabitRow::from_row,
        )
        .optional()?
        .ok_or_else(|| not_found(id))?;
    let days = load_days(conn, &row.id)?;
    row.into_habit(&days)
}

fn write_completions(conn: &Connection, habit: &Habit) -> Result<()> {
    conn.execute(
        "DELETE FROM habit_completions WHERE habit_id = ?1",
        params![habit.id.as_str()],
    )?;
    let mut stmt =
        conn.prepare("INSERT INTO habit_completions (habit_id, day) VALUES (?1, ?2)")?;
    for day in &habit.completions {
        stmt.execute(params![habit.id.as_str(), day.to_string()])?;
    }
    Ok(())
}

/// SQLite database for habit storage.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database configured in `config` inside [`data_dir`].
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(config: &Config) -> Result<Self> {
        let path = data_dir()?.join(&config.storage.database_file);
        Self::open_at(path)
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened habit database");
        Self::init(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Number of stored habits.
    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

impl HabitStore for HabitDb {
    fn insert(&self, habit: &Habit) -> Result<()> {
        habit.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO habits (id, name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit.id.as_str(),
                habit.name,
                habit.description,
                format_timestamp(&habit.created_at),
                format_timestamp(&habit.updated_at),
            ],
        )?;
        write_completions(&tx, habit)?;
        tx.commit()?;
        Ok(())
    }

    fn load(&self, id: &HabitId) -> Result<Habit> {
        load_habit(&self.conn, id)
    }

    fn list(&self) -> Result<Vec<Habit>> {
        let mut days: HashMap<String, Vec<String>> = HashMap::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT habit_id, day FROM habit_completions ORDER BY habit_id, day")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (habit_id, day) = row?;
                days.entry(habit_id).or_default().push(day);
            }
        }

        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} ORDER BY created_at DESC, id DESC"))?;
        let rows = stmt
            .query_map([], HabitRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|row| {
                let habit_days = days.remove(&row.id).unwrap_or_default();
                row.into_habit(&habit_days)
            })
            .collect()
    }

    fn save(&self, habit: &Habit) -> Result<()> {
        habit.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE habits SET name = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                habit.id.as_str(),
                habit.name,
                habit.description,
                format_timestamp(&habit.updated_at),
            ],
        )?;
        if changed == 0 {
            return Err(not_found(&habit.id));
        }
        write_completions(&tx, habit)?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, id: &HabitId) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id.as_str()])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    fn toggle_completion(&self, id: &HabitId, day: CompletionDate) -> Result<Habit> {
        // Take the write lock before reading so concurrent toggles serialize.
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let mut habit = load_habit(&tx, id)?;

        match habit.toggle(day) {
            Toggled::Added(day) => {
                tx.execute(
                    "INSERT INTO habit_completions (habit_id, day) VALUES (?1, ?2)",
                    params![id.as_str(), day.to_string()],
                )?;
            }
            Toggled::Removed(day) => {
                tx.execute(
                    "DELETE FROM habit_completions WHERE habit_id = ?1 AND day = ?2",
                    params![id.as_str(), day.to_string()],
                )?;
            }
        }
        tx.execute(
            "UPDATE habits SET updated_at = ?2 WHERE id = ?1",
            params![id.as_str(), format_timestamp(&habit.updated_at)],
        )?;
        tx.commit()?;
        Ok(habit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn d(s: &str) -> CompletionDate {
        CompletionDate::parse(s).unwrap()
    }

    #[test]
    fn insert_and_load() {
        let db = HabitDb::open_memory().unwrap();
        let mut habit = Habit::new("Read", Some("ten pages")).unwrap();
        habit.toggle(d("2024-01-02"));
        db.insert(&habit).unwrap();

        let loaded = db.load(&habit.id).unwrap();
        assert_eq!(loaded.name, "Read");
        assert_eq!(loaded.description, "ten pages");
        assert_eq!(loaded.completions, habit.completions);
        assert_eq!(loaded, habit);
    }

    #[test]
    fn sub_microsecond_timestamps_survive_storage() {
        let db = HabitDb::open_memory().unwrap();
        let at = DateTime::parse_from_rfc3339("2024-05-06T07:08:09.123456789Z")
            .unwrap()
            .with_timezone(&Utc);
        let habit = Habit::new_at("Read", None, at).unwrap();
        db.insert(&habit).unwrap();
        assert_eq!(db.load(&habit.id).unwrap(), habit);

        let toggled = db.toggle_completion(&habit.id, d("2024-05-06")).unwrap();
        assert_eq!(db.load(&habit.id).unwrap(), toggled);
        assert_eq!(db.list().unwrap(), vec![toggled]);
    }

    #[test]
    fn load_missing_is_not_found() {
        let db = HabitDb::open_memory().unwrap();
        let err = db.load(&HabitId::from("nope")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn toggle_round_trips_through_storage() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Run", None).unwrap();
        db.insert(&habit).unwrap();

        let on = db.toggle_completion(&habit.id, d("2024-01-01")).unwrap();
        assert!(on.is_completed_on(d("2024-01-01")));
        assert!(db.load(&habit.id).unwrap().is_completed_on(d("2024-01-01")));

        let off = db.toggle_completion(&habit.id, d("2024-01-01")).unwrap();
        assert!(off.completions.is_empty());
        assert!(db.load(&habit.id).unwrap().completions.is_empty());
    }

    #[test]
    fn toggle_missing_habit_is_not_found() {
        let db = HabitDb::open_memory().unwrap();
        let err = db
            .toggle_completion(&HabitId::from("gone"), d("2024-01-01"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_cascades_completions() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Run", None).unwrap();
        db.insert(&habit).unwrap();
        db.toggle_completion(&habit.id, d("2024-01-01")).unwrap();

        db.delete(&habit.id).unwrap();
        let left: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM habit_completions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(left, 0);
        assert!(db.delete(&habit.id).unwrap_err().is_not_found());
    }

    #[test]
    fn save_missing_is_not_found() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Run", None).unwrap();
        assert!(db.save(&habit).unwrap_err().is_not_found());
    }

    #[test]
    fn insert_rejects_invalid_fields() {
        let db = HabitDb::open_memory().unwrap();
        let mut habit = Habit::new("Run", None).unwrap();
        habit.name = "   ".into();
        let err = db.insert(&habit).unwrap_err();
        assert!(matches!(err, CoreError::Habit(HabitError::Validation(_))));
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn corrupt_day_is_reported() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Run", None).unwrap();
        db.insert(&habit).unwrap();
        db.conn()
            .execute(
                "INSERT INTO habit_completions (habit_id, day) VALUES (?1, '2024-13-01')",
                params![habit.id.as_str()],
            )
            .unwrap();

        let err = db.load(&habit.id).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::Corrupt { .. })
        ));
    }

    #[test]
    fn timestamps_sort_as_text() {
        let a = DateTime::parse_from_rfc3339("2024-01-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let b = DateTime::parse_from_rfc3339("2024-01-01T10:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        let c = DateTime::parse_from_rfc3339("2024-01-01T10:00:00.500000001Z")
            .unwrap()
            .with_timezone(&Utc);
        assert!(format_timestamp(&a) < format_timestamp(&b));
        assert!(format_timestamp(&b) < format_timestamp(&c));
        assert_eq!(format_timestamp(&c), "2024-01-01T10:00:00.500000001Z");
        assert_eq!(parse_timestamp("x", "created_at", &format_timestamp(&c)).unwrap(), c);
    }
}

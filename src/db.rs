//src/db.rs
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DB_FILE_NAME: &str = "lifts.sqlite";
const APP_DATA_DIR: &str = "lift-tracker"; // Same dir name as config
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct Lift {
    pub name: String,
    /// One-rep max in pounds.
    pub max_weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingLift {
    /// `None` until the record has been persisted.
    pub id: Option<i64>,
    pub lift: Lift,
    /// Date the record was created. Weight edits do not touch it.
    pub date: NaiveDate,
}

// Custom Error type for DB operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Lift not found: ID {0}")]
    LiftNotFound(i64),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database update failed: {0}")]
    UpdateFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(rusqlite::Error),
}

/// Keyed storage of tracked lifts.
///
/// Implementations never retry; failures are handed back to the caller.
pub trait LiftStore {
    /// Persists a new lift and returns the id assigned to it.
    fn create(&mut self, name: &str, max_weight: f64, date: NaiveDate) -> Result<i64, Error>;
    /// All lifts, ordered by id.
    fn list_all(&self) -> Result<Vec<TrackingLift>, Error>;
    /// Returns `false` when no lift has this id.
    fn update_max_weight(&mut self, id: i64, new_max_weight: f64) -> Result<bool, Error>;
    /// Returns `false` when no lift has this id.
    fn delete_by_id(&mut self, id: i64) -> Result<bool, Error>;

    fn find_by_id(&self, id: i64) -> Result<Option<TrackingLift>, Error> {
        Ok(self.list_all()?.into_iter().find(|l| l.id == Some(id)))
    }
}

/// Gets the path to the SQLite database file within the app's data directory.
/// Creates the directory if it doesn't exist.
pub fn get_db_path() -> Result<PathBuf, Error> {
    let data_dir = dirs::data_dir().ok_or(Error::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let conn = Connection::open(path).map_err(Error::Connection)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().map_err(Error::Connection)?;
        Self::from_connection(conn)
    }

    /// Wraps an existing connection, creating the schema if needed.
    pub fn from_connection(conn: Connection) -> Result<Self, Error> {
        init_db(&conn)?;
        Ok(Self { conn })
    }
}

/// Initializes the database tables if they don't exist.
pub fn init_db(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS lifts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            max_weight REAL NOT NULL CHECK(max_weight > 0), -- Always pounds
            date TEXT NOT NULL                               -- YYYY-MM-DD
        )",
        [],
    )
    .map_err(Error::Connection)?;
    Ok(())
}

fn map_row_to_lift(row: &Row) -> Result<TrackingLift, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let max_weight: f64 = row.get(2)?;
    let date_str: String = row.get(3)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(TrackingLift {
        id: Some(id),
        lift: Lift { name, max_weight },
        date,
    })
}

impl LiftStore for SqliteStore {
    fn create(&mut self, name: &str, max_weight: f64, date: NaiveDate) -> Result<i64, Error> {
        self.conn
            .execute(
                "INSERT INTO lifts (name, max_weight, date) VALUES (?1, ?2, ?3)",
                params![name, max_weight, date.format(DATE_FORMAT).to_string()],
            )
            .map_err(Error::InsertFailed)?;
        let id = self.conn.last_insert_rowid();
        log::debug!("Inserted lift '{name}' with id {id}");
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<TrackingLift>, Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, max_weight, date FROM lifts ORDER BY id ASC")
            .map_err(Error::QueryFailed)?;
        let lift_iter = stmt
            .query_map([], map_row_to_lift)
            .map_err(Error::QueryFailed)?;
        lift_iter
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::QueryFailed)
    }

    fn update_max_weight(&mut self, id: i64, new_max_weight: f64) -> Result<bool, Error> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE lifts SET max_weight = ?1 WHERE id = ?2",
                params![new_max_weight, id],
            )
            .map_err(Error::UpdateFailed)?;
        log::debug!("Updated max weight for lift {id} ({rows_affected} row(s))");
        Ok(rows_affected > 0)
    }

    fn delete_by_id(&mut self, id: i64) -> Result<bool, Error> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM lifts WHERE id = ?1", params![id])
            .map_err(Error::DeleteFailed)?;
        log::debug!("Deleted lift {id} ({rows_affected} row(s))");
        Ok(rows_affected > 0)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<TrackingLift>, Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, max_weight, date FROM lifts WHERE id = ?1")
            .map_err(Error::QueryFailed)?;
        let mut rows = stmt
            .query_map(params![id], map_row_to_lift)
            .map_err(Error::QueryFailed)?;
        rows.next().transpose().map_err(Error::QueryFailed)
    }
}

/// Non-persistent store backed by a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lifts: Vec<TrackingLift>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LiftStore for MemoryStore {
    fn create(&mut self, name: &str, max_weight: f64, date: NaiveDate) -> Result<i64, Error> {
        self.next_id += 1;
        let id = self.next_id;
        self.lifts.push(TrackingLift {
            id: Some(id),
            lift: Lift {
                name: name.to_string(),
                max_weight,
            },
            date,
        });
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<TrackingLift>, Error> {
        Ok(self.lifts.clone())
    }

    fn update_max_weight(&mut self, id: i64, new_max_weight: f64) -> Result<bool, Error> {
        match self.lifts.iter_mut().find(|l| l.id == Some(id)) {
            Some(tracked) => {
                tracked.lift.max_weight = new_max_weight;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_by_id(&mut self, id: i64) -> Result<bool, Error> {
        let before = self.lifts.len();
        self.lifts.retain(|l| l.id != Some(id));
        Ok(self.lifts.len() < before)
    }
}

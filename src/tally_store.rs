//! Durable cross-session label tallies.

use std::{collections::BTreeMap, path::Path, sync::Mutex};

use rusqlite::{Connection, params};
use tracing::debug;

use crate::{
    error::{Error, Result},
    summary::SessionSummary,
};

/// Write target reached once per finished session.
///
/// `increment_or_insert` must be atomic per label so concurrent sessions
/// never lose updates.
pub trait TallyStore {
    fn increment_or_insert(&self, label: &str, delta: u64) -> Result<()>;

    /// Commits a whole session summary. The default commits label by label;
    /// stores that can should commit all-or-nothing.
    fn commit_summary(&self, summary: &SessionSummary) -> Result<()> {
        for (label, count) in summary.iter() {
            self.increment_or_insert(label, count)?;
        }
        Ok(())
    }

    fn count(&self, label: &str) -> Result<u64>;
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS label_tallies (
    label TEXT PRIMARY KEY NOT NULL,
    count INTEGER NOT NULL DEFAULT 0
)";

const UPSERT: &str = "INSERT INTO label_tallies (label, count) VALUES (?1, ?2)
    ON CONFLICT(label) DO UPDATE SET count = count + excluded.count";

/// SQLite-backed [`TallyStore`].
pub struct SqliteTallyStore {
    conn: Mutex<Connection>,
}

impl SqliteTallyStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::Storage {
            message: "tally store connection poisoned".to_string(),
        })
    }

    /// Every label and its running total.
    pub fn counts(&self) -> Result<BTreeMap<String, u64>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached("SELECT label, count FROM label_tallies")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (label, count) = row?;
            counts.insert(label, count.max(0) as u64);
        }
        Ok(counts)
    }
}

fn to_sql_count(delta: u64) -> Result<i64> {
    i64::try_from(delta).map_err(|_| Error::Storage {
        message: format!("tally delta {delta} does not fit in an INTEGER column"),
    })
}

impl TallyStore for SqliteTallyStore {
    fn increment_or_insert(&self, label: &str, delta: u64) -> Result<()> {
        let conn = self.lock()?;
        conn.prepare_cached(UPSERT)?
            .execute(params![label, to_sql_count(delta)?])?;
        Ok(())
    }

    fn commit_summary(&self, summary: &SessionSummary) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT)?;
            for (label, count) in summary.iter() {
                stmt.execute(params![label, to_sql_count(count)?])?;
            }
        }
        tx.commit()?;
        debug!(labels = summary.counts().len(), "session tallies committed");
        Ok(())
    }

    fn count(&self, label: &str) -> Result<u64> {
        let conn = self.lock()?;
        let count: Option<i64> = conn
            .query_row(
                "SELECT count FROM label_tallies WHERE label = ?1",
                params![label],
                |row| row.get(0),
            )
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                e => Err(e),
            })?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }
}

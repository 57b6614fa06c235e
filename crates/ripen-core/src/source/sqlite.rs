//! Read-only adapter over an Anki-style collection database.
//!
//! Only three tables are touched:
//!
//! - `revlog(id, cid, type, ivl)`: one row per review, `id` in milliseconds.
//! - `cards(id, did, queue)`: current card table, `queue = -1` when suspended.
//! - `decks(id, name)`: optional; child names extend the parent name with
//!   `\x1f`.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, Row, params_from_iter};
use tracing::{debug, warn};

use super::{DeckScope, EventFilter, ReviewLog, SourceError};
use crate::event::{ReviewEvent, ReviewKind};

/// How long a read waits on a collection locked by the host.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const REQUIRED_TABLES: [&str; 2] = ["revlog", "cards"];

/// A review log backed by a `SQLite` collection.
#[derive(Debug)]
pub struct SqliteLog {
    conn: Connection,
}

impl SqliteLog {
    /// Open the collection at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] if the file is missing or cannot be
    /// opened, and [`SourceError::MissingTable`] if `revlog` or `cards` is
    /// absent.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::Unavailable(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| SourceError::Unavailable(format!("{}: {err}", path.display())))?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;

        debug!(path = %path.display(), "opened collection");
        Self::from_connection(conn)
    }

    /// Wrap an existing connection.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingTable`] if `revlog` or `cards` is absent.
    pub fn from_connection(conn: Connection) -> Result<Self, SourceError> {
        for table in REQUIRED_TABLES {
            if !table_exists(&conn, table)? {
                return Err(SourceError::MissingTable(table.to_string()));
            }
        }
        Ok(Self { conn })
    }

    /// Ids of every deck inside `scope`.
    ///
    /// Without a `decks` table, a scope whose name is a numeric deck id
    /// resolves to that single deck and anything else matches nothing.
    fn deck_ids(&self, scope: &DeckScope) -> Result<Vec<i64>, SourceError> {
        if !table_exists(&self.conn, "decks")? {
            warn!(
                deck = scope.name(),
                "collection has no decks table; deck children cannot be resolved"
            );
            return Ok(scope.name().parse::<i64>().map(|id| vec![id]).unwrap_or_default());
        }

        let mut stmt = self.conn.prepare("SELECT id, name FROM decks ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut ids = Vec::new();
        for row in rows {
            let (id, name) = row?;
            if scope.contains(&name) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

impl ReviewLog for SqliteLog {
    fn review_events(&self, filter: &EventFilter) -> Result<Vec<ReviewEvent>, SourceError> {
        let mut conditions = vec!["id < ?".to_string()];
        let mut param_values: Vec<i64> = vec![filter.before_ms];

        if let Some(scope) = &filter.deck {
            let deck_ids = self.deck_ids(scope)?;
            if deck_ids.is_empty() {
                debug!(deck = scope.name(), "deck scope matched no decks");
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; deck_ids.len()].join(", ");
            conditions.push(format!(
                "cid IN (SELECT id FROM cards WHERE did IN ({placeholders}))"
            ));
            param_values.extend(deck_ids);
        }
        if filter.exclude_deleted {
            conditions.push("cid IN (SELECT id FROM cards)".to_string());
        }
        if filter.exclude_suspended {
            conditions.push("cid IN (SELECT id FROM cards WHERE queue != -1)".to_string());
        }

        let sql = format!(
            "SELECT id, cid, type, ivl FROM revlog WHERE {} ORDER BY id",
            conditions.join(" AND ")
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(param_values.iter()), row_to_event)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }

        debug!(events = events.len(), before_ms = filter.before_ms, "read revlog");
        Ok(events)
    }
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<ReviewEvent> {
    Ok(ReviewEvent {
        event_id: row.get(0)?,
        card_id: row.get(1)?,
        kind: ReviewKind::from_code(row.get(2)?),
        interval_days: row.get(3)?,
    })
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, SourceError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists)
}

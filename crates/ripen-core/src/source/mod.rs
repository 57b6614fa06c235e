//! Where review events come from.
//!
//! The replay pipeline only needs an ordered slice of [`ReviewEvent`]s. A
//! [`ReviewLog`] hands that slice over after applying an [`EventFilter`]:
//! the day cutoff, an optional deck scope, and the deleted/suspended card
//! exclusions from the chart configuration.
//!
//! Two adapters ship with the crate:
//!
//! - [`MemoryLog`] keeps everything in memory. Tests and embedding hosts use it.
//! - [`SqliteLog`] reads an Anki-style collection database read-only.

pub mod memory;
pub mod sqlite;

pub use memory::{CardRecord, MemoryLog};
pub use sqlite::SqliteLog;

use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;
use crate::event::ReviewEvent;

/// Separator between a parent deck name and a child deck name.
pub const DECK_SEPARATOR: char = '\x1f';

/// Errors raised while reading review events.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("review log unavailable: {0}")]
    Unavailable(String),

    #[error("review log is missing the '{0}' table")]
    MissingTable(String),

    #[error("review log query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// A root deck and every deck nested below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckScope {
    name: String,
}

impl DeckScope {
    /// Scope rooted at the deck with this stored name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Scope from a user-facing path such as `Languages::French`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        Self::new(path.replace("::", &DECK_SEPARATOR.to_string()))
    }

    /// Stored name of the root deck.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix shared by the stored names of every descendant deck.
    #[must_use]
    pub fn child_prefix(&self) -> String {
        format!("{}{DECK_SEPARATOR}", self.name)
    }

    /// Whether a deck with stored name `deck_name` falls inside the scope.
    #[must_use]
    pub fn contains(&self, deck_name: &str) -> bool {
        deck_name == self.name
            || deck_name
                .strip_prefix(self.name.as_str())
                .is_some_and(|rest| rest.starts_with(DECK_SEPARATOR))
    }
}

/// Which events a [`ReviewLog`] should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// Exclusive upper bound on `event_id`, in milliseconds.
    pub before_ms: i64,
    pub deck: Option<DeckScope>,
    /// Drop events whose card no longer exists.
    pub exclude_deleted: bool,
    /// Drop events whose card is currently suspended.
    pub exclude_suspended: bool,
}

impl EventFilter {
    /// Everything before `before_ms`, no exclusions.
    #[must_use]
    pub const fn before(before_ms: i64) -> Self {
        Self {
            before_ms,
            deck: None,
            exclude_deleted: false,
            exclude_suspended: false,
        }
    }

    /// Filter honouring the card exclusions in `config`.
    #[must_use]
    pub fn from_config(before_ms: i64, deck: Option<DeckScope>, config: &ChartConfig) -> Self {
        Self {
            before_ms,
            deck,
            exclude_deleted: config.exclude_deleted_cards,
            exclude_suspended: config.exclude_suspended_cards,
        }
    }
}

/// A source of review events.
pub trait ReviewLog {
    /// Events matching `filter`, ascending by `event_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the underlying store cannot be read.
    fn review_events(&self, filter: &EventFilter) -> Result<Vec<ReviewEvent>, SourceError>;
}

impl<T: ReviewLog + ?Sized> ReviewLog for &T {
    fn review_events(&self, filter: &EventFilter) -> Result<Vec<ReviewEvent>, SourceError> {
        (**self).review_events(filter)
    }
}

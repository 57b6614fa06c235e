use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{DeckScope, EventFilter, ReviewLog, SourceError};
use crate::event::ReviewEvent;

/// Current state of a card as the host sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub deck_id: i64,
    pub suspended: bool,
}

impl CardRecord {
    #[must_use]
    pub const fn active(deck_id: i64) -> Self {
        Self {
            deck_id,
            suspended: false,
        }
    }

    #[must_use]
    pub const fn suspended(deck_id: i64) -> Self {
        Self {
            deck_id,
            suspended: true,
        }
    }
}

/// An in-memory review log with its card table and deck names.
///
/// A card missing from the card table counts as deleted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLog {
    events: Vec<ReviewEvent>,
    cards: BTreeMap<i64, CardRecord>,
    decks: BTreeMap<i64, String>,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deck by stored name (children use `\x1f` separators).
    pub fn add_deck(&mut self, deck_id: i64, name: impl Into<String>) -> &mut Self {
        self.decks.insert(deck_id, name.into());
        self
    }

    pub fn add_card(&mut self, card_id: i64, card: CardRecord) -> &mut Self {
        self.cards.insert(card_id, card);
        self
    }

    /// Delete a card. Its review history stays in the log.
    pub fn remove_card(&mut self, card_id: i64) -> Option<CardRecord> {
        self.cards.remove(&card_id)
    }

    pub fn push(&mut self, event: ReviewEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn deck_ids(&self, scope: &DeckScope) -> BTreeSet<i64> {
        self.decks
            .iter()
            .filter(|(_, name)| scope.contains(name))
            .map(|(&id, _)| id)
            .collect()
    }

    fn keeps(&self, event: &ReviewEvent, filter: &EventFilter, decks: Option<&BTreeSet<i64>>) -> bool {
        if event.event_id >= filter.before_ms {
            return false;
        }

        let card = self.cards.get(&event.card_id);
        if filter.exclude_deleted && card.is_none() {
            return false;
        }
        if filter.exclude_suspended && card.is_some_and(|card| card.suspended) {
            return false;
        }
        match decks {
            Some(decks) => card.is_some_and(|card| decks.contains(&card.deck_id)),
            None => true,
        }
    }
}

impl Extend<ReviewEvent> for MemoryLog {
    fn extend<I: IntoIterator<Item = ReviewEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

impl FromIterator<ReviewEvent> for MemoryLog {
    fn from_iter<I: IntoIterator<Item = ReviewEvent>>(iter: I) -> Self {
        let mut log = Self::new();
        log.extend(iter);
        log
    }
}

impl ReviewLog for MemoryLog {
    fn review_events(&self, filter: &EventFilter) -> Result<Vec<ReviewEvent>, SourceError> {
        let decks = filter.deck.as_ref().map(|scope| self.deck_ids(scope));

        let mut events: Vec<ReviewEvent> = self
            .events
            .iter()
            .filter(|event| self.keeps(event, filter, decks.as_ref()))
            .copied()
            .collect();
        events.sort_by_key(|event| event.event_id);
        Ok(events)
    }
}

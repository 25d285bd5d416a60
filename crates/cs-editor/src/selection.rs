//! Multi-card selection.

use cs_core::CardId;
use smallvec::SmallVec;

/// An ordered, duplicate-free set of selected card ids.
///
/// Empty means "no multi-selection": movement and stacking then target the
/// card being dragged instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cards: SmallVec<[CardId; 8]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a card. Returns false if it was already selected.
    pub fn add(&mut self, card_id: CardId) -> bool {
        if self.cards.contains(&card_id) {
            return false;
        }
        self.cards.push(card_id);
        true
    }

    /// Returns false if the card was not selected.
    pub fn remove(&mut self, card_id: CardId) -> bool {
        match self.cards.iter().position(|id| *id == card_id) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Shift-click behavior: add if absent, remove if present.
    pub fn toggle(&mut self, card_id: CardId) {
        if !self.remove(card_id) {
            self.cards.push(card_id);
        }
    }

    /// Replace the whole selection, dropping repeated ids.
    pub fn set(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.cards.clear();
        for id in cards {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }
}

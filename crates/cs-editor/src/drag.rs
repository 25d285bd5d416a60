//! Drag controller: turns a cursor delta into card moves.
//!
//! The regime is picked solely by whether the selection is empty. A stale
//! drag target left over while a selection is active is ignored.

use crate::selection::Selection;
use cs_core::{CardId, Point, Space, Vec2};

/// Which cards a movement or stacking command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRegime<'a> {
    /// No selection: only the dragged card.
    Single(CardId),
    /// Every selected card, each translated by the same vector.
    Multi(&'a [CardId]),
    /// No selection and nothing being dragged.
    Idle,
}

impl<'a> DragRegime<'a> {
    pub fn resolve(selection: &'a Selection, dragging: Option<CardId>) -> Self {
        if !selection.is_empty() {
            DragRegime::Multi(selection.as_slice())
        } else if let Some(id) = dragging {
            DragRegime::Single(id)
        } else {
            DragRegime::Idle
        }
    }

    pub fn cards(&self) -> &[CardId] {
        match self {
            DragRegime::Single(id) => std::slice::from_ref(id),
            DragRegime::Multi(ids) => ids,
            DragRegime::Idle => &[],
        }
    }
}

/// Move the affected cards by `delta`, or by `end_cursor - prev_cursor`
/// when no delta is given. Returns the delta that was applied.
pub fn drag_cards(
    space: &mut Space,
    selection: &Selection,
    dragging: Option<CardId>,
    end_cursor: Point,
    prev_cursor: Point,
    delta: Option<Vec2>,
) -> Vec2 {
    let delta = delta.unwrap_or(end_cursor - prev_cursor);
    for &card_id in DragRegime::resolve(selection, dragging).cards() {
        space.move_card(card_id, delta);
    }
    delta
}

/// Bring the affected cards to the front, one after another.
///
/// Each bump renumbers every card, so when several cards are selected only
/// the last one in selection order ends up strictly on top.
pub fn increment_selected_cards_z(space: &mut Space, selection: &Selection, dragging: Option<CardId>) {
    for &card_id in DragRegime::resolve(selection, dragging).cards() {
        space.increment_card_z(card_id);
    }
}

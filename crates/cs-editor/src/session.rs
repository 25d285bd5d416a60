//! Editing session: routes user gestures into the space.
//!
//! A gesture is first checked against the interaction state, then resolved
//! to the affected cards via the selection/drag controller, then applied
//! through the `Space` methods. The session is the space's only writer;
//! `Session::apply` accepts typed mutations from the host and keeps the
//! selection in step. The renderer re-reads the session after each call.
//!
//! Gestures that are not legal right now (e.g. starting a drag while a
//! connection is being drawn) are ignored and report `false`.

use crate::drag::{self, DragRegime};
use crate::interaction::{ConnectionDraft, InteractionState, PageMeasure};
use crate::selection::Selection;
use cs_core::{
    CardContents, CardId, CardMeasure, ConnectionId, MutationOutcome, NewConnection, Point,
    Position, Rect, Result, Space, SpaceMutation, User,
};

/// One user's editing session over a space.
pub struct Session {
    space: Space,
    selection: Selection,
    interaction: InteractionState,
    user: User,
}

impl Session {
    pub fn new(space: Space, user: User) -> Self {
        Self {
            space,
            selection: Selection::new(),
            interaction: InteractionState::new(),
            user,
        }
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn viewport_is_locked(&self) -> bool {
        self.interaction.viewport_is_locked()
    }

    /// Apply a mutation, keeping selection and drag state free of removed cards.
    pub fn apply(&mut self, mutation: SpaceMutation) -> Result<MutationOutcome> {
        let removed = match &mutation {
            SpaceMutation::RemoveCard { card_id } => Some(*card_id),
            _ => None,
        };
        let outcome = self.space.apply(mutation)?;
        if let Some(card_id) = removed {
            self.forget_card(card_id);
        }
        Ok(outcome)
    }

    fn forget_card(&mut self, card_id: CardId) {
        self.selection.remove(card_id);
        if self.interaction.dragging_card_id == Some(card_id) {
            self.interaction.reset_drag();
        }
        if self.interaction.current_connection.start_card_id == Some(card_id) {
            self.interaction.reset_connection();
        }
    }

    // ─── Cards ───────────────────────────────────────────────────────────

    pub fn add_card(&mut self, position: Position, contents: Option<CardContents>) -> Result<CardId> {
        self.space.add_card(position, contents)
    }

    /// Open a card's details, unless the click is the tail end of a drag.
    pub fn open_card_details(&mut self, card_id: CardId) -> bool {
        if self.interaction.take_prevent_details() {
            log::debug!("details for {card_id} suppressed after drag");
            return false;
        }
        self.close_all_dialogs();
        self.space.show_card_details(card_id);
        true
    }

    /// Remove every selected card (or the dragged card when nothing is selected).
    pub fn remove_selected_cards(&mut self) {
        let targets: Vec<CardId> =
            DragRegime::resolve(&self.selection, self.interaction.dragging_card_id)
                .cards()
                .to_vec();
        for card_id in targets {
            self.space.remove_card(card_id);
            self.forget_card(card_id);
        }
        self.selection.clear();
        self.interaction.multiple_card_actions = None;
    }

    pub fn close_all_dialogs(&mut self) {
        self.space.close_all_details();
        self.interaction.close_dialogs();
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn add_to_selection(&mut self, card_id: CardId) {
        if self.space.card(card_id).is_some() {
            self.selection.add(card_id);
        }
    }

    pub fn toggle_selection(&mut self, card_id: CardId) {
        if self.space.card(card_id).is_some() {
            self.selection.toggle(card_id);
        }
    }

    pub fn set_selection(&mut self, cards: impl IntoIterator<Item = CardId>) {
        let space = &self.space;
        self.selection
            .set(cards.into_iter().filter(|id| space.card(*id).is_some()));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.interaction.multiple_card_actions = None;
    }

    /// Bring the selected cards (or the dragged card) to the front.
    pub fn bring_selection_to_front(&mut self) {
        drag::increment_selected_cards_z(
            &mut self.space,
            &self.selection,
            self.interaction.dragging_card_id,
        );
    }

    // ─── Dragging ────────────────────────────────────────────────────────

    /// Pointer down on a card. Rejected while drawing a connection or while
    /// painting is locked.
    pub fn start_card_drag(&mut self, card_id: CardId) -> bool {
        if self.interaction.is_drawing_connection || self.interaction.is_painting_locked {
            log::debug!("start_card_drag({card_id}) rejected: viewport locked");
            return false;
        }
        if self.space.card(card_id).is_none() {
            return false;
        }
        self.interaction.begin_drag(card_id);
        self.bring_selection_to_front();
        true
    }

    /// Pointer moved during a drag.
    pub fn drag_to(&mut self, end_cursor: Point, prev_cursor: Point) -> bool {
        if !self.interaction.is_dragging_card {
            return false;
        }
        let delta = drag::drag_cards(
            &mut self.space,
            &self.selection,
            self.interaction.dragging_card_id,
            end_cursor,
            prev_cursor,
            None,
        );
        if delta.x != 0.0 || delta.y != 0.0 {
            self.interaction.prevent_dragged_card_from_showing_details = true;
        }
        true
    }

    pub fn end_card_drag(&mut self) {
        self.interaction.reset_drag();
    }

    // ─── Connecting ──────────────────────────────────────────────────────

    /// Pointer down on a card's connector.
    pub fn start_connection(&mut self, card_id: CardId, cursor: Point) -> bool {
        if self.interaction.is_dragging_card || self.interaction.is_painting {
            log::debug!("start_connection({card_id}) rejected: another gesture is active");
            return false;
        }
        if self.space.card(card_id).is_none() {
            return false;
        }
        self.interaction.begin_connection(card_id, cursor);
        true
    }

    pub fn update_connection(&mut self, update: ConnectionDraft) {
        if self.interaction.is_drawing_connection {
            self.interaction.update_connection(update);
        }
    }

    /// Record the card under the cursor as the would-be end of the connection.
    pub fn hover_connection_target(&mut self, card_id: Option<CardId>) {
        if !self.interaction.is_drawing_connection {
            return;
        }
        let start = self.interaction.current_connection.start_card_id;
        self.interaction.current_connection_success = card_id.filter(|id| Some(*id) != start);
    }

    /// Pointer up while drawing. Links the start card to `end_card_id` (or
    /// the hovered target), reusing the last connection type or creating
    /// one. Self-links and exact duplicates are refused. Drawing state is
    /// reset in every case.
    pub fn finish_connection(&mut self, end_card_id: Option<CardId>) -> Result<Option<ConnectionId>> {
        if !self.interaction.is_drawing_connection {
            return Ok(None);
        }
        let start = self.interaction.current_connection.start_card_id;
        let end = end_card_id.or(self.interaction.current_connection_success);
        self.interaction.reset_connection();

        let (Some(start), Some(end)) = (start, end) else {
            return Ok(None);
        };
        if start == end || self.space.connection_already_exists(start, end) {
            log::debug!("finish_connection: {start} -> {end} refused");
            return Ok(None);
        }
        if self.space.card(start).is_none() || self.space.card(end).is_none() {
            return Ok(None);
        }

        let connection_type_id = match self.space.last_connection_type() {
            Some(t) => t.id,
            None => self.space.add_connection_type(None, None, None).id,
        };
        let id = self
            .space
            .add_connection(NewConnection::between(start, end), connection_type_id)?;
        Ok(Some(id))
    }

    pub fn cancel_connection(&mut self) {
        self.interaction.reset_connection();
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Pointer down on empty canvas. Starts a fresh rectangle selection.
    pub fn start_painting(&mut self) -> bool {
        if self.viewport_is_locked() {
            log::debug!("start_painting rejected: viewport locked");
            return false;
        }
        self.clear_selection();
        self.interaction.begin_painting();
        true
    }

    /// Add every card the spatial map finds inside `rect` to the selection.
    pub fn paint_select(&mut self, rect: Rect) {
        if !self.interaction.is_painting {
            return;
        }
        for card_id in self.space.spatial_map().cards_in_rect(rect) {
            if self.space.card(card_id).is_some() {
                self.selection.add(card_id);
            }
        }
    }

    pub fn set_painting_locked(&mut self, locked: bool) {
        self.interaction.is_painting_locked = locked;
    }

    /// Pointer up after painting. Opens the multiple-card actions menu at
    /// `end_point` when anything was selected.
    pub fn end_painting(&mut self, end_point: Point) {
        if !self.interaction.is_painting {
            return;
        }
        self.interaction.reset_painting();
        if !self.selection.is_empty() {
            self.interaction.multiple_card_actions = Some(end_point);
        }
    }

    // ─── Collaborators ───────────────────────────────────────────────────

    pub fn refresh_spatial_map(&mut self, measure: &dyn CardMeasure) {
        self.space.generate_spatial_map(measure);
    }

    pub fn update_page_size(&mut self, measure: &dyn PageMeasure) {
        self.interaction.update_page_size(measure);
    }
}

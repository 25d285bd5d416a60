//! Interaction mode state.
//!
//! Flat, advisory flags describing the gesture in progress. Nothing here
//! enforces a transition table; the session consults these flags to decide
//! whether a new gesture is legal, and the renderer reads them to pick
//! cursors and overlays. Every gesture's flags stay set until the caller
//! explicitly resets them.

use cs_core::{CardId, Point, Rect, Size};

/// Scratch record for the connection currently being drawn.
///
/// Updates are shallow overlays: only the fields an update supplies change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionDraft {
    pub start_card_id: Option<CardId>,
    /// Rendered rect of the connector the gesture started on.
    pub start_connector_rect: Option<Rect>,
    /// Latest cursor position, for the live preview.
    pub end_point: Option<Point>,
    /// Preview path data, if the renderer wants it cached here.
    pub path: Option<String>,
}

impl ConnectionDraft {
    pub fn merge(&mut self, update: ConnectionDraft) {
        if update.start_card_id.is_some() {
            self.start_card_id = update.start_card_id;
        }
        if update.start_connector_rect.is_some() {
            self.start_connector_rect = update.start_connector_rect;
        }
        if update.end_point.is_some() {
            self.end_point = update.end_point;
        }
        if update.path.is_some() {
            self.path = update.path;
        }
    }
}

/// Page and viewport dimensions as last reported by the page collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageSize {
    pub page_width: f64,
    pub page_height: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

/// Page/viewport measurement, on demand.
pub trait PageMeasure {
    /// Full scrollable page size.
    fn page(&self) -> Size;
    /// Visible viewport size.
    fn viewport(&self) -> Size;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    // connecting
    pub is_drawing_connection: bool,
    pub current_connection: ConnectionDraft,
    /// Card under the cursor that would complete the connection.
    pub current_connection_success: Option<CardId>,
    pub current_connection_cursor_start: Option<Point>,
    /// Connection details popover, open at this position.
    pub connection_details: Option<Point>,

    // painting
    pub is_painting: bool,
    pub is_painting_locked: bool,

    // dragging
    pub is_dragging_card: bool,
    pub dragging_card_id: Option<CardId>,
    /// Swallow the click-to-open-details that fires when a drag ends on a card.
    pub prevent_dragged_card_from_showing_details: bool,

    // multiple cards
    /// Multiple-card actions menu, open at this position.
    pub multiple_card_actions: Option<Point>,

    pub should_add_new_card: bool,
    pub page: PageSize,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an exclusive gesture owns the pointer.
    pub fn viewport_is_locked(&self) -> bool {
        self.is_painting_locked || self.is_drawing_connection || self.is_dragging_card
    }

    // ─── Connecting ──────────────────────────────────────────────────────

    pub fn begin_connection(&mut self, start_card_id: CardId, cursor: Point) {
        self.is_drawing_connection = true;
        self.current_connection = ConnectionDraft {
            start_card_id: Some(start_card_id),
            ..Default::default()
        };
        self.current_connection_success = None;
        self.current_connection_cursor_start = Some(cursor);
    }

    pub fn update_connection(&mut self, update: ConnectionDraft) {
        self.current_connection.merge(update);
    }

    /// Back to defaults after the gesture succeeds or is cancelled.
    pub fn reset_connection(&mut self) {
        self.is_drawing_connection = false;
        self.current_connection = ConnectionDraft::default();
        self.current_connection_success = None;
        self.current_connection_cursor_start = None;
    }

    // ─── Painting ────────────────────────────────────────────────────────

    pub fn begin_painting(&mut self) {
        self.is_painting = true;
    }

    pub fn reset_painting(&mut self) {
        self.is_painting = false;
        self.is_painting_locked = false;
    }

    // ─── Dragging ────────────────────────────────────────────────────────

    pub fn begin_drag(&mut self, card_id: CardId) {
        self.is_dragging_card = true;
        self.dragging_card_id = Some(card_id);
        self.prevent_dragged_card_from_showing_details = false;
    }

    /// Ends the drag. The prevent-details flag survives until consumed.
    pub fn reset_drag(&mut self) {
        self.is_dragging_card = false;
        self.dragging_card_id = None;
    }

    /// Read and clear the prevent-details flag.
    pub fn take_prevent_details(&mut self) -> bool {
        std::mem::take(&mut self.prevent_dragged_card_from_showing_details)
    }

    // ─── Dialogs ─────────────────────────────────────────────────────────

    pub fn close_dialogs(&mut self) {
        self.connection_details = None;
        self.multiple_card_actions = None;
    }

    // ─── Page size ───────────────────────────────────────────────────────

    pub fn update_page_size(&mut self, measure: &dyn PageMeasure) {
        let page = measure.page();
        let viewport = measure.viewport();
        self.page = PageSize {
            page_width: page.width,
            page_height: page.height,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
        };
    }

    pub fn set_page_width(&mut self, width: f64) {
        self.page.page_width = width;
    }

    pub fn set_page_height(&mut self, height: f64) {
        self.page.page_height = height;
    }
}

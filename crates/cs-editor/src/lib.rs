//! Editor-side state for a cardspace canvas: selection, drag regimes,
//! interaction modes, and the session that routes gestures into a `Space`.

pub mod drag;
pub mod interaction;
pub mod selection;
pub mod session;

pub use drag::{DragRegime, drag_cards, increment_selected_cards_z};
pub use interaction::{ConnectionDraft, InteractionState, PageMeasure, PageSize};
pub use selection::Selection;
pub use session::Session;

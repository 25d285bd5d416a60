//! Typed mutation stream.
//!
//! Every write to a `Space` can be expressed as a `SpaceMutation` and fed
//! through `Space::apply`, one at a time, in dispatch order. Hosts that
//! replay or relay edits use this; the direct `Space` methods remain the
//! in-process API.

use crate::error::Result;
use crate::id::{CardId, ConnectionId, ConnectionTypeId};
use crate::model::{CardContents, NewConnection, Position};
use crate::space::Space;
use kurbo::Vec2;
use serde_json::Value;

/// A single write to the space.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceMutation {
    AddCard {
        position: Position,
        contents: Option<CardContents>,
    },
    UpdateCardField {
        card_id: CardId,
        field: String,
        value: Value,
    },
    RemoveCard {
        card_id: CardId,
    },
    MoveCard {
        card_id: CardId,
        delta: Vec2,
    },
    IncrementCardZ {
        card_id: CardId,
    },
    ShowCardDetails {
        card_id: CardId,
    },
    HideCardDetails {
        card_id: CardId,
    },
    CloseAllDetails,
    AddConnection {
        connection: NewConnection,
        connection_type_id: ConnectionTypeId,
    },
    RemoveConnection {
        connection_id: ConnectionId,
    },
    ShowConnectionDetails {
        connection_id: ConnectionId,
    },
    ChangeConnectionType {
        connection_id: ConnectionId,
        connection_type_id: ConnectionTypeId,
    },
    AddConnectionType {
        id: Option<ConnectionTypeId>,
        name: Option<String>,
        color: Option<String>,
    },
    UpdateConnectionTypeName {
        connection_type_id: ConnectionTypeId,
        name: String,
    },
    UpdateConnectionTypeColor {
        connection_type_id: ConnectionTypeId,
        color: String,
    },
    RemoveUnusedConnectionTypes,
}

/// What a mutation created, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    None,
    CardAdded(CardId),
    ConnectionAdded(ConnectionId),
    ConnectionTypeAdded(ConnectionTypeId),
}

impl Space {
    /// Apply one mutation. Errors only for malformed input; stale ids are no-ops.
    pub fn apply(&mut self, mutation: SpaceMutation) -> Result<MutationOutcome> {
        log::trace!("apply {mutation:?}");
        let outcome = match mutation {
            SpaceMutation::AddCard { position, contents } => {
                MutationOutcome::CardAdded(self.add_card(position, contents)?)
            }
            SpaceMutation::UpdateCardField {
                card_id,
                field,
                value,
            } => {
                self.update_card_field(card_id, &field, value)?;
                MutationOutcome::None
            }
            SpaceMutation::RemoveCard { card_id } => {
                self.remove_card(card_id);
                MutationOutcome::None
            }
            SpaceMutation::MoveCard { card_id, delta } => {
                self.move_card(card_id, delta);
                MutationOutcome::None
            }
            SpaceMutation::IncrementCardZ { card_id } => {
                self.increment_card_z(card_id);
                MutationOutcome::None
            }
            SpaceMutation::ShowCardDetails { card_id } => {
                self.show_card_details(card_id);
                MutationOutcome::None
            }
            SpaceMutation::HideCardDetails { card_id } => {
                self.hide_card_details(card_id);
                MutationOutcome::None
            }
            SpaceMutation::CloseAllDetails => {
                self.close_all_details();
                MutationOutcome::None
            }
            SpaceMutation::AddConnection {
                connection,
                connection_type_id,
            } => MutationOutcome::ConnectionAdded(
                self.add_connection(connection, connection_type_id)?,
            ),
            SpaceMutation::RemoveConnection { connection_id } => {
                self.remove_connection(connection_id);
                MutationOutcome::None
            }
            SpaceMutation::ShowConnectionDetails { connection_id } => {
                self.show_connection_details(connection_id);
                MutationOutcome::None
            }
            SpaceMutation::ChangeConnectionType {
                connection_id,
                connection_type_id,
            } => {
                self.change_connection_type(connection_id, connection_type_id);
                MutationOutcome::None
            }
            SpaceMutation::AddConnectionType { id, name, color } => {
                MutationOutcome::ConnectionTypeAdded(self.add_connection_type(id, name, color).id)
            }
            SpaceMutation::UpdateConnectionTypeName {
                connection_type_id,
                name,
            } => {
                self.update_connection_type_name(connection_type_id, name);
                MutationOutcome::None
            }
            SpaceMutation::UpdateConnectionTypeColor {
                connection_type_id,
                color,
            } => {
                self.update_connection_type_color(connection_type_id, color);
                MutationOutcome::None
            }
            SpaceMutation::RemoveUnusedConnectionTypes => {
                self.remove_unused_connection_types();
                MutationOutcome::None
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn apply_reports_created_ids() {
        let mut space = Space::new();
        let MutationOutcome::CardAdded(a) = space
            .apply(SpaceMutation::AddCard {
                position: Position::new(0.0, 0.0),
                contents: None,
            })
            .unwrap()
        else {
            panic!("expected CardAdded");
        };
        let MutationOutcome::CardAdded(b) = space
            .apply(SpaceMutation::AddCard {
                position: Position::new(50.0, 0.0),
                contents: None,
            })
            .unwrap()
        else {
            panic!("expected CardAdded");
        };
        let MutationOutcome::ConnectionTypeAdded(t) = space
            .apply(SpaceMutation::AddConnectionType {
                id: None,
                name: Some("relates".into()),
                color: None,
            })
            .unwrap()
        else {
            panic!("expected ConnectionTypeAdded");
        };
        let outcome = space
            .apply(SpaceMutation::AddConnection {
                connection: NewConnection::between(a, b),
                connection_type_id: t,
            })
            .unwrap();
        assert!(matches!(outcome, MutationOutcome::ConnectionAdded(_)));
        assert_eq!(space.card_connections(a).len(), 1);
    }

    #[test]
    fn apply_propagates_malformed_input() {
        let mut space = Space::new();
        let a = space.add_card(Position::new(0.0, 0.0), None).unwrap();
        let err = space
            .apply(SpaceMutation::UpdateCardField {
                card_id: a,
                field: "name".into(),
                value: json!(false),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }

    #[test]
    fn apply_stale_ids_are_noops() {
        let mut space = Space::new();
        let ghost = CardId::intern("apply_ghost");
        for mutation in [
            SpaceMutation::RemoveCard { card_id: ghost },
            SpaceMutation::MoveCard {
                card_id: ghost,
                delta: Vec2::new(1.0, 1.0),
            },
            SpaceMutation::IncrementCardZ { card_id: ghost },
            SpaceMutation::ShowCardDetails { card_id: ghost },
        ] {
            assert_eq!(space.apply(mutation).unwrap(), MutationOutcome::None);
        }
    }
}

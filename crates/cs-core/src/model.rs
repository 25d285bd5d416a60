//! Card/connection data model.
//!
//! Cards are positioned nodes on an unbounded plane (clamped at the origin).
//! Connections are typed links between two cards and cache the serialized
//! path drawn between them. Connection types are shared labels/styles.

use crate::error::{Result, StoreError, ValueKind};
use crate::id::{CardId, ConnectionId, ConnectionTypeId, UserId};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Position ────────────────────────────────────────────────────────────

/// A point on the canvas plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reject positions that cannot be placed on the canvas (NaN / infinite).
    pub fn validate(self) -> Result<Self> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(self)
        } else {
            Err(StoreError::InvalidArgument(format!(
                "position must be finite, got ({}, {})",
                self.x, self.y
            )))
        }
    }

    /// Read `{ "x": number, "y": number }` from a loose payload.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(StoreError::InvalidArgument(format!(
                "position must be an object, found {}",
                ValueKind::of(value)
            )));
        };
        let axis = |name: &str| -> Result<f64> {
            map.get(name).and_then(Value::as_f64).ok_or_else(|| {
                StoreError::InvalidArgument(format!("position.{name} must be a number"))
            })
        };
        Self::new(axis("x")?, axis("y")?).validate()
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Position::new(p.x, p.y)
    }
}

/// Read a movement delta. Missing axes default to 0; present axes must be numbers.
pub fn delta_from_value(value: &Value) -> Result<Vec2> {
    let Value::Object(map) = value else {
        return Err(StoreError::InvalidArgument(format!(
            "delta must be an object, found {}",
            ValueKind::of(value)
        )));
    };
    let axis = |name: &str| -> Result<f64> {
        match map.get(name) {
            None | Some(Value::Null) => Ok(0.0),
            Some(v) => v.as_f64().ok_or_else(|| StoreError::TypeMismatch {
                field: format!("delta.{name}"),
                expected: ValueKind::Number,
                found: ValueKind::of(v),
            }),
        }
    };
    Ok(Vec2::new(axis("x")?, axis("y")?))
}

// ─── Cards ───────────────────────────────────────────────────────────────

/// A positioned, nameable node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub x: f64,
    pub y: f64,
    /// Stacking rank; the highest value renders on top.
    pub z: u32,
    pub name: String,
    pub details_visible: bool,
    pub archived: bool,
}

impl Card {
    /// A blank card at `position`: empty name, details hidden, not archived.
    pub fn new(id: CardId, position: Position) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            z: 0,
            name: String::new(),
            details_visible: false,
            archived: false,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Overlay the fields `contents` supplies.
    pub fn apply_contents(&mut self, contents: &CardContents) {
        if let Some(name) = &contents.name {
            self.name = name.clone();
        }
        if let Some(visible) = contents.details_visible {
            self.details_visible = visible;
        }
        if let Some(archived) = contents.archived {
            self.archived = archived;
        }
    }
}

/// Optional initial content for a new card. Supplied fields overlay the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContents {
    pub name: Option<String>,
    pub details_visible: Option<bool>,
    pub archived: Option<bool>,
}

impl CardContents {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.details_visible.is_none() && self.archived.is_none()
    }

    /// Read contents from a loose payload, type-checking each known field.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(StoreError::InvalidArgument(format!(
                "contents must be an object, found {}",
                ValueKind::of(value)
            )));
        };
        let mut contents = CardContents::default();
        for (key, v) in map {
            let field = CardField::parse(key)?;
            field.check(v)?;
            match field {
                CardField::Name => contents.name = v.as_str().map(str::to_owned),
                CardField::DetailsVisible => contents.details_visible = v.as_bool(),
                CardField::Archived => contents.archived = v.as_bool(),
            }
        }
        Ok(contents)
    }
}

/// Card fields writable through the generic field setter.
///
/// `id` is immutable, `z` is owned by the stacking engine and `x`/`y`
/// only change through moves so connection paths stay fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Name,
    DetailsVisible,
    Archived,
}

impl CardField {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "name" => Ok(CardField::Name),
            "detailsVisible" => Ok(CardField::DetailsVisible),
            "archived" => Ok(CardField::Archived),
            "id" | "z" | "x" | "y" => Err(StoreError::InvalidArgument(format!(
                "card field `{name}` is not directly writable"
            ))),
            _ => Err(StoreError::InvalidArgument(format!(
                "unknown card field `{name}`"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardField::Name => "name",
            CardField::DetailsVisible => "detailsVisible",
            CardField::Archived => "archived",
        }
    }

    pub fn expected(self) -> ValueKind {
        match self {
            CardField::Name => ValueKind::String,
            CardField::DetailsVisible | CardField::Archived => ValueKind::Bool,
        }
    }

    /// Fail with `TypeMismatch` if `value` is not of this field's kind.
    pub fn check(self, value: &Value) -> Result<()> {
        let found = ValueKind::of(value);
        if found == self.expected() {
            Ok(())
        } else {
            Err(StoreError::TypeMismatch {
                field: self.as_str().to_owned(),
                expected: self.expected(),
                found,
            })
        }
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A typed link between two cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub connection_type_id: ConnectionTypeId,
    pub start_card_id: CardId,
    pub end_card_id: CardId,
    /// SVG path data between the two connector anchors. Derived; never stale.
    pub path: String,
    pub details_visible: bool,
}

impl Connection {
    pub fn touches(&self, card_id: CardId) -> bool {
        self.start_card_id == card_id || self.end_card_id == card_id
    }
}

/// The caller-supplied part of a connection; the store fills in the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewConnection {
    pub start_card_id: CardId,
    pub end_card_id: CardId,
}

impl NewConnection {
    pub fn between(start_card_id: CardId, end_card_id: CardId) -> Self {
        Self {
            start_card_id,
            end_card_id,
        }
    }
}

/// A label/style shared by zero or more connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionType {
    pub id: ConnectionTypeId,
    pub name: String,
    pub color: String,
}

// ─── Users ───────────────────────────────────────────────────────────────

/// A user as supplied by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn position_from_value() {
        let p = Position::from_value(&json!({ "x": 10, "y": 20.5 })).unwrap();
        assert_eq!(p, Position::new(10.0, 20.5));

        assert!(matches!(
            Position::from_value(&json!({ "x": 10 })),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            Position::from_value(&json!({ "x": "10", "y": 0 })),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            Position::from_value(&json!(null)),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        assert!(Position::new(f64::NAN, 0.0).validate().is_err());
        assert!(Position::new(0.0, f64::INFINITY).validate().is_err());
        assert!(Position::new(-5.0, 3.0).validate().is_ok());
    }

    #[test]
    fn delta_missing_axes_are_zero() {
        let d = delta_from_value(&json!({ "x": -4 })).unwrap();
        assert_eq!(d, Vec2::new(-4.0, 0.0));

        let err = delta_from_value(&json!({ "y": true })).unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }

    #[test]
    fn contents_from_value_type_checks() {
        let c = CardContents::from_value(&json!({ "name": "hello", "archived": true })).unwrap();
        assert_eq!(c.name.as_deref(), Some("hello"));
        assert_eq!(c.archived, Some(true));
        assert_eq!(c.details_visible, None);

        let err = CardContents::from_value(&json!({ "name": 3 })).unwrap_err();
        assert_eq!(
            err,
            StoreError::TypeMismatch {
                field: "name".into(),
                expected: ValueKind::String,
                found: ValueKind::Number,
            }
        );

        assert!(matches!(
            CardContents::from_value(&json!({ "id": "x" })),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(CardContents::from_value(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn card_serializes_camel_case() {
        let card = Card::new(CardId::intern("c1"), Position::new(1.0, 2.0));
        let v = serde_json::to_value(&card).unwrap();
        assert_eq!(v["detailsVisible"], json!(false));
        assert_eq!(v["id"], json!("c1"));
    }
}

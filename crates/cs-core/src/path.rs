//! Connection path geometry.
//!
//! A connection is drawn as a single quadratic curve from the start card's
//! connector to the end card's connector, serialized as SVG path data.

use crate::config::SpaceConfig;
use crate::model::Card;
use kurbo::{BezPath, Point, Vec2};

/// Absolute position of a card's connector.
pub fn connector_anchor(card: &Card, config: &SpaceConfig) -> Point {
    card.position() + Vec2::from(config.connector_offset)
}

/// SVG path data for a curve from `start` to `end`, bending through
/// `start + control`.
pub fn curve_between(start: Point, end: Point, control: Vec2) -> String {
    let mut path = BezPath::new();
    path.move_to(start);
    path.quad_to(start + control, end);
    path.to_svg()
}

/// Path between two cards' connectors.
pub fn connection_path(start: &Card, end: &Card, config: &SpaceConfig) -> String {
    curve_between(
        connector_anchor(start, config),
        connector_anchor(end, config),
        Vec2::from(config.curve_control),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::CardId;
    use crate::model::Position;

    #[test]
    fn curve_starts_at_start_and_ends_at_end() {
        let svg = curve_between(Point::new(0.0, 0.0), Point::new(100.0, 50.0), Vec2::new(90.0, 40.0));
        assert!(svg.starts_with("M0,0"), "{svg}");
        assert!(svg.contains('Q'), "{svg}");
        assert!(svg.ends_with("100,50"), "{svg}");
    }

    #[test]
    fn path_follows_card_positions() {
        let config = SpaceConfig::default();
        let a = Card::new(CardId::intern("path_a"), Position::new(0.0, 0.0));
        let mut b = Card::new(CardId::intern("path_b"), Position::new(100.0, 100.0));
        let before = connection_path(&a, &b, &config);
        b.x += 10.0;
        assert_ne!(before, connection_path(&a, &b, &config));
    }
}

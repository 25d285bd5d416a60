//! Spatial engine: card movement, stacking order, and the spatial map.
//!
//! Every move recomputes the path of each connection touching the moved
//! card, so a connection's `path` always matches current positions.

use crate::error::Result;
use crate::id::CardId;
use crate::model::delta_from_value;
use crate::path::connection_path;
use crate::space::Space;
use kurbo::{Point, Rect, Size, Vec2};
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde_json::Value;
use smallvec::SmallVec;

/// Geometry lookup for rendered cards (the rendering collaborator).
pub trait CardMeasure {
    /// Rendered size of a card, or `None` if it is not on screen.
    fn measure(&self, card_id: CardId) -> Option<Size>;
}

impl<F> CardMeasure for F
where
    F: Fn(CardId) -> Option<Size>,
{
    fn measure(&self, card_id: CardId) -> Option<Size> {
        self(card_id)
    }
}

/// One card's rendered box at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRegion {
    pub card_id: CardId,
    pub bounds: Rect,
    pub z: u32,
}

/// Flat snapshot of rendered card geometry, in card order.
///
/// Pull-based: it is only as fresh as the last `generate_spatial_map` call.
#[derive(Debug, Clone, Default)]
pub struct SpatialMap {
    regions: Vec<CardRegion>,
}

impl SpatialMap {
    pub fn regions(&self) -> &[CardRegion] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region(&self, card_id: CardId) -> Option<&CardRegion> {
        self.regions.iter().find(|r| r.card_id == card_id)
    }

    /// The topmost card containing `point`. Ties go to the later card.
    pub fn card_at(&self, point: Point) -> Option<CardId> {
        self.regions
            .iter()
            .filter(|r| r.bounds.contains(point))
            .max_by_key(|r| r.z)
            .map(|r| r.card_id)
    }

    /// Every card whose box overlaps `rect` (any corner order).
    pub fn cards_in_rect(&self, rect: Rect) -> Vec<CardId> {
        let rect = rect.abs();
        self.regions
            .iter()
            .filter(|r| {
                let b = r.bounds;
                b.x0 < rect.x1 && b.x1 > rect.x0 && b.y0 < rect.y1 && b.y1 > rect.y0
            })
            .map(|r| r.card_id)
            .collect()
    }
}

impl Space {
    /// Translate a card by `delta`, clamp it to the canvas origin, then
    /// refresh the paths of its connections.
    pub fn move_card(&mut self, card_id: CardId, delta: Vec2) {
        let Some(idx) = self.card_index.get(&card_id).copied() else {
            log::debug!("move_card: no card {card_id}");
            return;
        };
        let min = self.config.min_offset;
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        let card = &mut self.graph[idx];
        card.x = (card.x + finite(delta.x)).max(min);
        card.y = (card.y + finite(delta.y)).max(min);
        self.recompute_paths(idx);
    }

    /// `move_card` from a loose `{x?, y?}` payload. Missing axes are 0.
    pub fn move_card_from_value(&mut self, card_id: CardId, delta: &Value) -> Result<()> {
        let delta = delta_from_value(delta)?;
        self.move_card(card_id, delta);
        Ok(())
    }

    fn recompute_paths(&mut self, idx: NodeIndex) {
        let edges: SmallVec<[EdgeIndex; 8]> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        for edge in edges {
            let Some((start, end)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            let path = connection_path(&self.graph[start], &self.graph[end], &self.config);
            log::trace!("path {} -> {path}", self.graph[edge].id);
            self.graph[edge].path = path;
        }
    }

    /// Bring a card to the front.
    ///
    /// Renumbers every card's `z` to its index in card order, then gives the
    /// target `n + 1`. O(n), run once per explicit bring-to-front.
    pub fn increment_card_z(&mut self, card_id: CardId) {
        if !self.card_index.contains_key(&card_id) {
            log::debug!("increment_card_z: no card {card_id}");
            return;
        }
        let top = self.card_order.len() as u32 + 1;
        for (index, id) in self.card_order.iter().enumerate() {
            if let Some(&idx) = self.card_index.get(id) {
                self.graph[idx].z = if *id == card_id { top } else { index as u32 };
            }
        }
    }

    /// Snapshot the rendered geometry of every card. Cards the renderer
    /// cannot measure are left out.
    pub fn generate_spatial_map(&mut self, measure: &dyn CardMeasure) -> &SpatialMap {
        let regions = self
            .cards()
            .filter_map(|card| {
                let size = measure.measure(card.id)?;
                Some(CardRegion {
                    card_id: card.id,
                    bounds: Rect::from_origin_size(card.position(), size),
                    z: card.z,
                })
            })
            .collect();
        self.spatial_map = SpatialMap { regions };
        &self.spatial_map
    }

    pub fn spatial_map(&self) -> &SpatialMap {
        &self.spatial_map
    }
}

//! The graph store: cards, connections and connection types.
//!
//! Cards are graph nodes and connections are graph edges, so removing a
//! card drops its incident connections with it. Id indexes give O(1)
//! lookup; explicit order vectors keep the insertion order the stacking
//! engine and the renderer rely on.
//!
//! Lookups by id never fail loudly: a stale id (e.g. a drag ending after
//! its card was removed) is a silent no-op. Malformed input is an error.

use crate::color::{ColorSource, LightPalette};
use crate::config::SpaceConfig;
use crate::error::{Result, StoreError};
use crate::id::{CardId, ConnectionId, ConnectionTypeId, IdSource, SequentialIds};
use crate::model::*;
use crate::path::connection_path;
use crate::spatial::SpatialMap;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// A single canvas: the exclusive owner of its cards, connections and types.
pub struct Space {
    /// Cards as nodes, connections as edges (start → end).
    pub(crate) graph: StableDiGraph<Card, Connection>,
    pub(crate) card_index: HashMap<CardId, NodeIndex>,
    /// Stable card order (insertion order). Drives z renumbering.
    pub(crate) card_order: Vec<CardId>,
    pub(crate) connection_index: HashMap<ConnectionId, EdgeIndex>,
    pub(crate) connection_order: Vec<ConnectionId>,
    pub(crate) connection_types: Vec<ConnectionType>,
    /// Last geometry snapshot; refreshed only on request.
    pub(crate) spatial_map: SpatialMap,
    pub(crate) config: SpaceConfig,
    ids: Box<dyn IdSource>,
    colors: Box<dyn ColorSource>,
}

impl Space {
    /// An empty space with default config and the default id/color sources.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SpaceConfig::default())
    }

    #[must_use]
    pub fn with_config(config: SpaceConfig) -> Self {
        Self::with_sources(
            config,
            Box::new(SequentialIds),
            Box::new(LightPalette::default()),
        )
    }

    /// An empty space wired to external id and color collaborators.
    #[must_use]
    pub fn with_sources(
        config: SpaceConfig,
        ids: Box<dyn IdSource>,
        colors: Box<dyn ColorSource>,
    ) -> Self {
        let config = config.sanitized();
        Self {
            graph: StableDiGraph::new(),
            card_index: HashMap::new(),
            card_order: Vec::new(),
            connection_index: HashMap::new(),
            connection_order: Vec::new(),
            connection_types: Vec::new(),
            spatial_map: SpatialMap::default(),
            config,
            ids,
            colors,
        }
    }

    /// Seed a space with existing cards, keeping their ids and `z` values.
    /// Cards whose id is already present, or whose position is not finite,
    /// are skipped. Negative coordinates are clamped to the origin.
    #[must_use]
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        for card in cards {
            if self.card_index.contains_key(&card.id) {
                log::debug!("with_cards: duplicate card {} skipped", card.id);
                continue;
            }
            if !(card.x.is_finite() && card.y.is_finite()) {
                log::warn!("with_cards: card {} at ({}, {}) skipped", card.id, card.x, card.y);
                continue;
            }
            self.insert_card(card);
        }
        self
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    fn insert_card(&mut self, mut card: Card) {
        let min = self.config.min_offset;
        card.x = card.x.max(min);
        card.y = card.y.max(min);
        let id = card.id;
        let idx = self.graph.add_node(card);
        self.card_index.insert(id, idx);
        self.card_order.push(id);
    }

    // ─── Cards ───────────────────────────────────────────────────────────

    /// Create a card at `position`. Supplied contents overlay a blank card;
    /// without contents the details panel opens so the card can be named.
    /// The new card is brought to the front.
    pub fn add_card(&mut self, position: Position, contents: Option<CardContents>) -> Result<CardId> {
        let position = position.validate()?;
        let id = CardId::intern(&self.ids.new_id("card"));
        let mut card = Card::new(id, position);
        match contents {
            Some(contents) if !contents.is_empty() => card.apply_contents(&contents),
            _ => card.details_visible = true,
        }
        log::trace!("add card {id} at ({}, {})", card.x, card.y);
        self.insert_card(card);
        self.increment_card_z(id);
        Ok(id)
    }

    /// `add_card` from loose payloads (`{x, y}` and an optional contents object).
    pub fn add_card_from_value(&mut self, position: &Value, contents: Option<&Value>) -> Result<CardId> {
        let position = Position::from_value(position)?;
        let contents = contents.map(CardContents::from_value).transpose()?;
        self.add_card(position, contents)
    }

    /// Set one card field from a loose value. The field name and value kind
    /// are checked first; an unknown card is then a silent no-op.
    pub fn update_card_field(&mut self, card_id: CardId, field: &str, value: Value) -> Result<()> {
        let field = CardField::parse(field)?;
        field.check(&value)?;
        let Some(card) = self.card_mut(card_id) else {
            log::debug!("update_card_field: no card {card_id}");
            return Ok(());
        };
        match (field, value) {
            (CardField::Name, Value::String(name)) => card.name = name,
            (CardField::DetailsVisible, Value::Bool(v)) => card.details_visible = v,
            (CardField::Archived, Value::Bool(v)) => card.archived = v,
            // `check` already guaranteed the kind
            _ => {}
        }
        Ok(())
    }

    pub fn show_card_details(&mut self, card_id: CardId) {
        if let Some(card) = self.card_mut(card_id) {
            card.details_visible = true;
        }
    }

    pub fn hide_card_details(&mut self, card_id: CardId) {
        if let Some(card) = self.card_mut(card_id) {
            card.details_visible = false;
        }
    }

    /// Hide every card and connection details panel.
    pub fn close_all_details(&mut self) {
        for card in self.graph.node_weights_mut() {
            card.details_visible = false;
        }
        for connection in self.graph.edge_weights_mut() {
            connection.details_visible = false;
        }
    }

    /// Remove a card and every connection that starts or ends at it.
    pub fn remove_card(&mut self, card_id: CardId) {
        let Some(idx) = self.card_index.remove(&card_id) else {
            return;
        };
        let incident: HashSet<ConnectionId> = self
            .graph
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, petgraph::Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        // Removing the node drops its edges
        self.graph.remove_node(idx);
        self.card_order.retain(|id| *id != card_id);
        if !incident.is_empty() {
            for id in &incident {
                self.connection_index.remove(id);
            }
            self.connection_order.retain(|id| !incident.contains(id));
        }
        log::trace!("remove card {card_id} ({} connections)", incident.len());
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Link two live cards with an existing connection type. Details start
    /// hidden and the path is computed immediately.
    ///
    /// Duplicate start/end pairs are not rejected here; check
    /// `connection_already_exists` first if they are unwanted.
    pub fn add_connection(
        &mut self,
        connection: NewConnection,
        connection_type_id: ConnectionTypeId,
    ) -> Result<ConnectionId> {
        let (Some(start), Some(end)) = (
            self.card_index.get(&connection.start_card_id).copied(),
            self.card_index.get(&connection.end_card_id).copied(),
        ) else {
            return Err(StoreError::InvalidArgument(format!(
                "connection endpoints must be live cards: {} -> {}",
                connection.start_card_id, connection.end_card_id
            )));
        };
        if self.connection_type_by_id(connection_type_id).is_none() {
            return Err(StoreError::InvalidArgument(format!(
                "unknown connection type {connection_type_id}"
            )));
        }
        let id = ConnectionId::intern(&self.ids.new_id("connection"));
        let path = connection_path(&self.graph[start], &self.graph[end], &self.config);
        let edge = self.graph.add_edge(
            start,
            end,
            Connection {
                id,
                connection_type_id,
                start_card_id: connection.start_card_id,
                end_card_id: connection.end_card_id,
                path,
                details_visible: false,
            },
        );
        self.connection_index.insert(id, edge);
        self.connection_order.push(id);
        log::trace!(
            "add connection {id}: {} -> {}",
            connection.start_card_id,
            connection.end_card_id
        );
        Ok(id)
    }

    pub fn remove_connection(&mut self, connection_id: ConnectionId) {
        if let Some(edge) = self.connection_index.remove(&connection_id) {
            self.graph.remove_edge(edge);
            self.connection_order.retain(|id| *id != connection_id);
            log::trace!("remove connection {connection_id}");
        }
    }

    pub fn show_connection_details(&mut self, connection_id: ConnectionId) {
        if let Some(connection) = self.connection_mut(connection_id) {
            connection.details_visible = true;
        }
    }

    /// Point a connection at a different (existing) type.
    pub fn change_connection_type(&mut self, connection_id: ConnectionId, type_id: ConnectionTypeId) {
        if self.connection_type_by_id(type_id).is_none() {
            log::debug!("change_connection_type: no type {type_id}");
            return;
        }
        if let Some(connection) = self.connection_mut(connection_id) {
            connection.connection_type_id = type_id;
        }
    }

    // ─── Connection types ────────────────────────────────────────────────

    /// Create a connection type. Omitted fields get a fresh id, the name
    /// `"{prefix} {count + 1}"` and a fresh light color. An id that already
    /// exists returns the existing type unchanged.
    pub fn add_connection_type(
        &mut self,
        id: Option<ConnectionTypeId>,
        name: Option<String>,
        color: Option<String>,
    ) -> &ConnectionType {
        if let Some(pos) = id.and_then(|id| self.connection_types.iter().position(|t| t.id == id)) {
            log::debug!("add_connection_type: {} already exists", self.connection_types[pos].id);
            return &self.connection_types[pos];
        }
        let id = id.unwrap_or_else(|| ConnectionTypeId::intern(&self.ids.new_id("connection_type")));
        let name = name.unwrap_or_else(|| {
            format!(
                "{} {}",
                self.config.connection_type_prefix,
                self.connection_types.len() + 1
            )
        });
        let color = color.unwrap_or_else(|| self.colors.new_light_color());
        self.connection_types.push(ConnectionType { id, name, color });
        &self.connection_types[self.connection_types.len() - 1]
    }

    pub fn update_connection_type_name(&mut self, type_id: ConnectionTypeId, name: impl Into<String>) {
        if let Some(t) = self.connection_types.iter_mut().find(|t| t.id == type_id) {
            t.name = name.into();
        }
    }

    pub fn update_connection_type_color(&mut self, type_id: ConnectionTypeId, color: impl Into<String>) {
        if let Some(t) = self.connection_types.iter_mut().find(|t| t.id == type_id) {
            t.color = color.into();
        }
    }

    /// Drop every type no connection references. Never runs implicitly.
    pub fn remove_unused_connection_types(&mut self) {
        let used: HashSet<ConnectionTypeId> = self
            .graph
            .edge_weights()
            .map(|c| c.connection_type_id)
            .collect();
        let before = self.connection_types.len();
        self.connection_types.retain(|t| used.contains(&t.id));
        log::trace!(
            "pruned {} unused connection types",
            before - self.connection_types.len()
        );
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.card_index.get(&card_id).map(|idx| &self.graph[*idx])
    }

    pub(crate) fn card_mut(&mut self, card_id: CardId) -> Option<&mut Card> {
        self.card_index
            .get(&card_id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Cards in stable (insertion) order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.card_order
            .iter()
            .filter_map(|id| self.card_index.get(id))
            .map(|idx| &self.graph[*idx])
    }

    pub fn card_count(&self) -> usize {
        self.card_order.len()
    }

    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connection_index
            .get(&connection_id)
            .map(|edge| &self.graph[*edge])
    }

    fn connection_mut(&mut self, connection_id: ConnectionId) -> Option<&mut Connection> {
        self.connection_index
            .get(&connection_id)
            .copied()
            .map(|edge| &mut self.graph[edge])
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connection_order
            .iter()
            .filter_map(|id| self.connection_index.get(id))
            .map(|edge| &self.graph[*edge])
    }

    pub fn connection_types(&self) -> &[ConnectionType] {
        &self.connection_types
    }

    pub fn connection_type_by_id(&self, type_id: ConnectionTypeId) -> Option<&ConnectionType> {
        self.connection_types.iter().find(|t| t.id == type_id)
    }

    /// The most recently added connection type.
    pub fn last_connection_type(&self) -> Option<&ConnectionType> {
        self.connection_types.last()
    }

    /// Whether a connection with exactly this start → end pair exists.
    /// The reverse pair does not count.
    pub fn connection_already_exists(&self, start_card_id: CardId, end_card_id: CardId) -> bool {
        let (Some(start), Some(end)) = (
            self.card_index.get(&start_card_id),
            self.card_index.get(&end_card_id),
        ) else {
            return false;
        };
        self.graph.find_edge(*start, *end).is_some()
    }

    /// Connections where the card is either endpoint, in insertion order.
    pub fn card_connections(&self, card_id: CardId) -> Vec<&Connection> {
        self.connections().filter(|c| c.touches(card_id)).collect()
    }

    /// Distinct types used by the card's connections, in type-list order.
    pub fn card_connection_types(&self, card_id: CardId) -> SmallVec<[&ConnectionType; 4]> {
        let used: HashSet<ConnectionTypeId> = self
            .card_connections(card_id)
            .iter()
            .map(|c| c.connection_type_id)
            .collect();
        self.connection_types
            .iter()
            .filter(|t| used.contains(&t.id))
            .collect()
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

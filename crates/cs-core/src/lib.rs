pub mod color;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod mutation;
pub mod path;
pub mod space;
pub mod spatial;

pub use color::{Color, ColorSource, LightPalette};
pub use config::SpaceConfig;
pub use error::{Result, StoreError, ValueKind};
pub use id::{CardId, ConnectionId, ConnectionTypeId, IdSource, SequentialIds, UserId};
pub use model::*;
pub use mutation::{MutationOutcome, SpaceMutation};
pub use space::Space;
pub use spatial::{CardMeasure, CardRegion, SpatialMap};

// Re-export kurbo geometry so downstream crates share one version
pub use kurbo::{Point, Rect, Size, Vec2};

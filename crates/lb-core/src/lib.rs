pub mod config;
pub mod consciousness;
pub mod curve;
pub mod geometry;
pub mod graph;
pub mod id;
pub mod model;
pub mod seed;
pub mod view;

pub use config::{CanvasConfig, Viewport};
pub use geometry::{Bounds, Point, Size};
pub use graph::BoardGraph;
pub use id::{ConnectionId, NodeId, PortId};
pub use model::*;
pub use seed::{BoardSeed, default_seed};
pub use view::{ViewTransform, ZoomDirection};

pub mod bake;
pub mod collections;
pub mod config;
pub mod error;
pub mod link;
pub mod math;
pub mod mesh;
pub mod world;

pub use bake::{BakeSummary, LinkBaker, PrepareSummary, PreparedSurface};
pub use config::BakeConfig;
pub use error::{LinkBakeError, Result};
pub use link::{LinkCandidate, LinkSpan, PlacementFrame};
pub use mesh::NavTriangulation;
pub use world::{LinkSink, SpatialQuery};

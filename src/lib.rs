//! Bounded planar Voronoi diagrams via Fortune's sweepline
//!
//! Builds the Voronoi diagram of a set of 2D sites, together with its dual
//! Delaunay bisector graph, clips every edge to a rectangle and stitches
//! each site's region into a closed counter-clockwise polygon.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_fortune_voronoi::*;
//!
//! // Build a diagram from 500 seeded random sites
//! let config = DiagramConfigBuilder::new()
//!     .seed(42)
//!     .site_count(500)
//!     .extents(800.0, 600.0).unwrap()
//!     .build().unwrap();
//!
//! let diagram = VoronoiDiagram::generate(config).unwrap();
//!
//! // Regions tile the bounds
//! let total: f64 = diagram.regions().iter().map(|r| Polygon::new(r).area()).sum();
//! assert!((total - diagram.bounds().area()).abs() < 1e-6 * diagram.bounds().area());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) nearest-site lookups using a KD-tree
//! - `serde`: Enables serialization support for configuration and geometry values
//! - `parallel`: Builds independent diagrams concurrently with rayon

// Modules
pub mod error;
pub mod config;
pub mod geom;
pub mod generation;
pub mod sweep;
pub mod region;
pub mod diagram;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{DiagramConfig, DiagramConfigBuilder, DiagramOptions, CornerRule};
pub use geom::{Point, Rectangle, LineSegment, Circle, Polygon, Winding, compare_by_y_then_x};
pub use sweep::{Side, SiteId, EdgeId, VertexId};
pub use sweep::site::Site;
pub use sweep::edge::{Edge, LineEquation};
pub use sweep::vertex::Vertex;
pub use region::{EdgeChain, ReorderCriterion, reorder_edges};
pub use diagram::VoronoiDiagram;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;

//! # vorosweep
//!
//! `vorosweep` computes 2D Voronoi diagrams with Fortune's sweep, clipped to a rectangle,
//! for use in Rust as well as compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Sweep-line construction**: one ordered pass over site and circle events,
//!   `O(n log n)` queue operations.
//! - **Closed cells**: every edge is clipped to the bounding box and the box sides are
//!   split into border edges, so each site's edges form a closed polygon.
//! - **Degenerate inputs**: coincident sites, collinear sites, cocircular sites and sites
//!   on the border or at a corner go through the same code path.
//! - **WASM-first**: built with `wasm-bindgen`, with parallel batch computation and Lloyd
//!   relaxation through `rayon`.
//!
//! ## Example
//!
//! ```
//! use vorosweep::{BoundingBox, VoronoiConfig, compute};
//!
//! let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
//! let diagram = compute(&[[500.0, 700.0], [500.0, 300.0]], bounds, &VoronoiConfig::default()).unwrap();
//! assert_eq!(diagram.count_edges(), 7);
//! ```
//!
//! See the `demos/` directory for SVG plotting.
//!
//! ## Main Interface
//!
//! [`compute`] is the stateless entry point returning a [`Diagram`]. The [`Voronoi`]
//! struct keeps sites and the last diagram around for interactive use.

mod beachline;
mod bounds;
mod cell;
mod clip;
mod config;
mod diagram;
mod edge;
mod error;
mod event;
mod geometry;
mod site;
mod sweep;
mod wasm;

pub use bounds::BoundingBox;
pub use bounds::BOX_ID_BOTTOM;
pub use bounds::BOX_ID_LEFT;
pub use bounds::BOX_ID_RIGHT;
pub use bounds::BOX_ID_TOP;
pub use bounds::box_side;
pub use cell::Cell;
pub use config::VoronoiConfig;
pub use diagram::Diagram;
pub use diagram::Voronoi;
pub use edge::Edge;
pub use error::Result;
pub use error::VoronoiError;
pub use geometry::Point;
pub use geometry::bisector_direction;
pub use geometry::breakpoint_x;
pub use geometry::circumcircle;
pub use site::Site;
pub use site::points_from_flat;
pub use sweep::SweepStats;
pub use sweep::compute;
pub use sweep::compute_batch;

//! Raster-to-vector boundary tracing.
//!
//! Turns the regions of a grid that hold a chosen value into closed rings:
//! - **Neighbor codes**: 4-bit marching-squares codes of 2x2 windows
//! - **Tracer**: table-driven walk along a boundary, with saddle tie-breaks
//! - **Scan**: column-major sweep that starts one trace per unvisited region
//! - **Batch**: independent scans for several values in parallel
//!
//! Reading a cell while evaluating a code marks it visited, and marked cells
//! never start a new trace. A single scan is therefore order-sensitive and
//! runs sequentially.

pub mod batch;
pub mod mapper;
pub mod neighbor;
pub mod ring;
pub mod scan;
pub mod tracer;
pub mod visited;

pub use batch::{distinct_values, extract_all_polygons, extract_polygons_by_value, ValuePolygons};
pub use mapper::{to_world, WorldPoint};
pub use neighbor::{neighbor_code, NeighborCode};
pub use ring::{Bounds, Ring};
pub use scan::{extract_polygons, extract_polygons_with_tracker, Polygon, PolygonSet};
pub use tracer::{next_direction, BoundaryTracer, Direction};
pub use visited::VisitedTracker;

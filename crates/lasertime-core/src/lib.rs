//! # LaserTime Core
//!
//! Core types and utilities shared by every LaserTime crate.
//! Provides the point/movement data model consumed by the estimator,
//! movement-sequence transforms used by both the importers and the path
//! optimizer, and feed-rate unit helpers.

pub mod error;
pub mod geometry;
pub mod sequence;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use geometry::{BoundingBox, Movement, Point, ADJACENCY_EPSILON};
pub use sequence::{bounding_box, connect_gaps, normalize_to_origin};
pub use units::FeedRateUnits;

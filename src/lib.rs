// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Turn costs for routing over [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Edges of a [Graph] carry packed, fixed-width attributes ([encoded values](crate::ev)),
//! among them the [orientation](Orientation) of both directions of travel.
//! Turns between edges are classified by the change of heading at the common node
//! ([turn_cost::DefaultTurnCostProvider]), and junctions of busy or wide roads get
//! additional penalties precomputed during [import](crate::osm).
//!
//! # Example
//!
//! ```no_run
//! use turncost::turn_cost::{CombinedTurnCostProvider, TurnCostConfig, TurnCostProvider};
//!
//! let osm_options = turncost::osm::Options::default();
//! let g = turncost::osm::graph_from_file(&osm_options, "path/to/monaco.osm.gz")
//!     .expect("failed to load monaco.osm.gz");
//!
//! let provider = CombinedTurnCostProvider::new(&g, TurnCostConfig::DEFAULT)
//!     .expect("invalid turn cost config");
//!
//! for (key, _) in g.turn_costs().iter() {
//!     println!(
//!         "{key:?}: {} ms",
//!         provider.turn_millis(key.from_edge, key.via_node, key.to_edge),
//!     );
//! }
//! ```

mod elevation;
mod encoding;
pub mod ev;
mod geo;
mod graph;
mod orientation;
pub mod osm;
pub mod turn_cost;

pub use elevation::{add_elevation, ElevationProvider, NoElevation, Slope};
pub use encoding::{Encoding, TURN_COST_BITS};
pub use geo::{azimuth, earth_distance, normalize_angle};
pub use graph::{Edge, Graph, Node};
pub use orientation::{Orientation, ORIENTATION_BITS};

/// Index of a [Node] in a [Graph].
pub type NodeId = u32;

/// Index of an [Edge] in a [Graph].
pub type EdgeId = u32;

/// Marks an absent edge, e.g. the incoming edge at the start of a route.
pub const NO_EDGE: EdgeId = EdgeId::MAX;

/// Position on the Earth, with an optional elevation (in meters).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
}

impl Point {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
        }
    }

    pub const fn with_ele(mut self, ele: f64) -> Self {
        self.ele = Some(ele);
        self
    }

    /// Returns true if both points have the same latitude and longitude, ignoring elevation.
    pub fn same_position(&self, other: &Self) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Import of [OpenStreetMap](https://www.openstreetmap.org/) data into a [Graph](crate::Graph),
//! including turn restrictions and junction turn costs.

use crate::ev::{ConfigError, OutOfRangeError};

mod junction;
mod profile;
mod reader;

pub use junction::{
    directional_lanes, CrossingRule, ExternalIdMap, Junction, JunctionCostBuilder,
    JunctionCostConfig, JunctionPart,
};
pub use profile::{Profile, TurnRestriction, BUS_PROFILE, CAR_PROFILE};
pub use reader::{graph_from_buffer, graph_from_file, graph_from_io, FileFormat, Options, Way};

/// Errors which can occur when importing OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unrecognized input file format")]
    UnsupportedFormat,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),
}

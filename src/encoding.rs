// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::ev::{
    BooleanEncodedValue, ConfigError, DecimalEncodedValue, DecimalSpec, EdgeFlags,
    EnumEncodedValue, FlagsLayout, IntEncodedValue, IntSpec, RoadClass,
};
use crate::{Orientation, Slope};

/// Width of the per-turn cost field. With a factor of 1 and the top value
/// reserved for forbidden turns, costs up to 1022 seconds are representable.
pub const TURN_COST_BITS: u32 = 10;

/// Set of fields stored for every edge and every turn of a [Graph](crate::Graph).
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    pub orientation: Orientation,
    pub road_class: EnumEncodedValue<RoadClass>,

    /// Amount of lanes in each direction, 0 if unknown.
    pub lanes: IntEncodedValue,

    /// Whether the edge may be traversed in the given direction.
    pub access: BooleanEncodedValue,

    pub slope: Slope,

    /// Per-turn cost in seconds, stored in the [TurnCostStorage](crate::turn_cost::TurnCostStorage).
    pub turn_cost: DecimalEncodedValue,

    edge_words: usize,
    turn_words: usize,
}

impl Encoding {
    pub const ROAD_CLASS_KEY: &'static str = "road_class";
    pub const LANES_KEY: &'static str = "lanes";
    pub const ACCESS_KEY: &'static str = "access";
    pub const TURN_COST_KEY: &'static str = "junction_turn_cost";

    pub fn new() -> Result<Self, ConfigError> {
        let mut edge = FlagsLayout::default();
        let orientation = Orientation::register(&mut edge)?;
        let road_class = edge.enumeration(Self::ROAD_CLASS_KEY, false)?;
        let lanes = edge.int(IntSpec::new(Self::LANES_KEY, 3).with_two_directions())?;
        let access = edge.boolean(Self::ACCESS_KEY, true)?;
        let slope = Slope::register(&mut edge)?;

        let mut turn = FlagsLayout::default();
        let turn_cost = turn
            .decimal(DecimalSpec::new(Self::TURN_COST_KEY, TURN_COST_BITS, 1.0).with_infinity())?;

        log::debug!(
            "edge records use {} bit(s) in {} word(s), turn records {} bit(s)",
            edge.used_bits(),
            edge.words(),
            turn.used_bits(),
        );

        Ok(Self {
            orientation,
            road_class,
            lanes,
            access,
            slope,
            turn_cost,
            edge_words: edge.words(),
            turn_words: turn.words(),
        })
    }

    pub fn create_edge_flags(&self) -> EdgeFlags {
        EdgeFlags::new(self.edge_words)
    }

    pub fn turn_words(&self) -> usize {
        self.turn_words
    }
}

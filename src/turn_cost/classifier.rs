// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::TurnCostConfig;
use crate::ev::ConfigError;
use crate::{normalize_angle, EdgeId, Graph, NodeId, NO_EDGE};

/// Geometric kind of a turn, see [TurnCostConfig] for the exact thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnClass {
    Straight,
    Right,
    SharpRight,
    Left,
    SharpLeft,
    UTurn,
}

impl TurnClass {
    pub fn cost(self, config: &TurnCostConfig) -> f64 {
        match self {
            Self::Straight => config.straight_cost,
            Self::Right => config.right_cost,
            Self::SharpRight => config.sharp_right_cost,
            Self::Left => config.left_cost,
            Self::SharpLeft => config.sharp_left_cost,
            Self::UTurn => config.u_turn_cost,
        }
    }

    /// Returns true if the turn has to cross the opposing traffic lanes.
    pub fn crosses_traffic(self, side: DrivingSide) -> bool {
        match (self, side) {
            (Self::UTurn, _) => true,
            (Self::Left | Self::SharpLeft, DrivingSide::Right) => true,
            (Self::Right | Self::SharpRight, DrivingSide::Left) => true,
            _ => false,
        }
    }
}

/// Side of the road on which traffic keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrivingSide {
    #[default]
    Right,
    Left,
}

/// Classifies a change of heading (in degrees, `(-180, 180]`, positive for right turns).
///
/// Non-finite angles can't be classified and are treated as [TurnClass::Straight].
pub fn classify(angle: f64, config: &TurnCostConfig) -> TurnClass {
    if !angle.is_finite() || angle.abs() < config.min_angle {
        TurnClass::Straight
    } else if angle > 0.0 {
        if angle < config.min_sharp_angle {
            TurnClass::Right
        } else if angle <= config.min_u_turn_angle {
            TurnClass::SharpRight
        } else {
            TurnClass::UTurn
        }
    } else if angle > -config.min_sharp_angle {
        TurnClass::Left
    } else if angle >= -config.min_u_turn_angle {
        TurnClass::SharpLeft
    } else {
        TurnClass::UTurn
    }
}

/// Converts a cost in seconds to whole milliseconds,
/// mapping infinity to [u64::MAX].
pub fn to_millis(seconds: f64) -> u64 {
    if seconds.is_finite() {
        (seconds * 1000.0).round().max(0.0) as u64
    } else {
        u64::MAX
    }
}

/// Source of turn costs consumed by path search weighting.
///
/// Implementations must never fail: whenever a turn can't be evaluated,
/// its cost is zero.
pub trait TurnCostProvider {
    /// Cost (in seconds, possibly infinite) of entering `out_edge` from `in_edge` at `via_node`.
    fn turn_cost(&self, in_edge: EdgeId, via_node: NodeId, out_edge: EdgeId) -> f64;

    /// Same as [TurnCostProvider::turn_cost], in milliseconds.
    fn turn_millis(&self, in_edge: EdgeId, via_node: NodeId, out_edge: EdgeId) -> u64 {
        to_millis(self.turn_cost(in_edge, via_node, out_edge))
    }
}

/// [TurnCostProvider] classifying turns by the stored [orientation](crate::Orientation)
/// of the edges.
#[derive(Debug, Clone, Copy)]
pub struct DefaultTurnCostProvider<'a> {
    graph: &'a Graph,
    config: TurnCostConfig,
}

impl<'a> DefaultTurnCostProvider<'a> {
    pub fn new(graph: &'a Graph, config: TurnCostConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { graph, config })
    }

    pub fn config(&self) -> &TurnCostConfig {
        &self.config
    }

    /// Returns the signed change of heading (degrees, `(-180, 180]`) when turning from
    /// `in_edge` onto `out_edge` at `via_node`, or `None` if either edge doesn't exist,
    /// isn't incident to `via_node` or has no known orientation.
    pub fn change_angle(&self, in_edge: EdgeId, via_node: NodeId, out_edge: EdgeId) -> Option<f64> {
        let orientation = &self.graph.encoding().orientation;
        let in_e = self.graph.get_edge(in_edge)?;
        let out_e = self.graph.get_edge(out_edge)?;

        if !in_e.is_incident_to(via_node) || !out_e.is_incident_to(via_node) {
            return None;
        }

        // Heading with which in_edge arrives at via_node
        let arrival = orientation.get(in_e.adj != via_node, &in_e.flags)?;

        // Heading with which out_edge leaves via_node - the opposite direction
        // (arriving at via_node) turned around.
        let departure = orientation.get(out_e.base == via_node, &out_e.flags)? + 180.0;

        Some(normalize_angle(departure - arrival))
    }
}

impl TurnCostProvider for DefaultTurnCostProvider<'_> {
    fn turn_cost(&self, in_edge: EdgeId, via_node: NodeId, out_edge: EdgeId) -> f64 {
        if in_edge == NO_EDGE || out_edge == NO_EDGE {
            return 0.0;
        }

        // Repeating the same edge always means turning around,
        // regardless of anything else known about the turn.
        if in_edge == out_edge {
            return self.config.u_turn_cost;
        }

        match self.change_angle(in_edge, via_node, out_edge) {
            Some(angle) => classify(angle, &self.config).cost(&self.config),
            None => 0.0,
        }
    }
}

/// [TurnCostProvider] returning the costs computed during import and stored
/// in the graph's [TurnCostStorage](super::TurnCostStorage).
#[derive(Debug, Clone, Copy)]
pub struct StoredTurnCostProvider<'a> {
    graph: &'a Graph,
}

impl<'a> StoredTurnCostProvider<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }
}

impl TurnCostProvider for StoredTurnCostProvider<'_> {
    fn turn_cost(&self, in_edge: EdgeId, via_node: NodeId, out_edge: EdgeId) -> f64 {
        if in_edge == NO_EDGE || out_edge == NO_EDGE {
            return 0.0;
        }

        self.graph.turn_costs().get(
            &self.graph.encoding().turn_cost,
            in_edge,
            via_node,
            out_edge,
        )
    }
}

/// [TurnCostProvider] adding the stored, import-time penalties to the
/// geometric classification. Same-edge U-turns get only the configured U-turn cost.
#[derive(Debug, Clone, Copy)]
pub struct CombinedTurnCostProvider<'a> {
    geometric: DefaultTurnCostProvider<'a>,
    stored: StoredTurnCostProvider<'a>,
}

impl<'a> CombinedTurnCostProvider<'a> {
    pub fn new(graph: &'a Graph, config: TurnCostConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            geometric: DefaultTurnCostProvider::new(graph, config)?,
            stored: StoredTurnCostProvider::new(graph),
        })
    }
}

impl TurnCostProvider for CombinedTurnCostProvider<'_> {
    fn turn_cost(&self, in_edge: EdgeId, via_node: NodeId, out_edge: EdgeId) -> f64 {
        let geometric = self.geometric.turn_cost(in_edge, via_node, out_edge);
        if in_edge == out_edge || geometric.is_infinite() {
            return geometric;
        }
        geometric + self.stored.turn_cost(in_edge, via_node, out_edge)
    }
}

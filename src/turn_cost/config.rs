// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::ev::ConfigError;

/// Describes how the geometric change of heading between two edges
/// is converted into a turn cost.
///
/// Angles are in degrees, positive for right (clockwise) turns and negative
/// for left turns, in the `(-180, 180]` range. For a turn angle `a`:
/// - `|a| < min_angle` → [straight_cost](Self::straight_cost);
/// - `min_angle <= a < min_sharp_angle` → [right_cost](Self::right_cost);
/// - `min_sharp_angle <= a <= min_u_turn_angle` → [sharp_right_cost](Self::sharp_right_cost);
/// - `a > min_u_turn_angle` → [u_turn_cost](Self::u_turn_cost);
/// - and the mirror image for left turns.
///
/// Note that a turn of exactly `min_u_turn_angle` is still a sharp turn, so with
/// `min_u_turn_angle == 180` geometry alone never produces a U-turn - only
/// repeating the same edge does.
///
/// Costs are in seconds. [f64::INFINITY] forbids a class of turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnCostConfig {
    pub min_angle: f64,
    pub min_sharp_angle: f64,
    pub min_u_turn_angle: f64,

    pub straight_cost: f64,
    pub right_cost: f64,
    pub sharp_right_cost: f64,
    pub left_cost: f64,
    pub sharp_left_cost: f64,

    /// Cost of reversing the direction of travel, also applied when the
    /// incoming and outgoing edges are the same.
    pub u_turn_cost: f64,
}

impl TurnCostConfig {
    /// Mild penalties for a motor vehicle in right-hand traffic.
    pub const DEFAULT: Self = Self {
        min_angle: 25.0,
        min_sharp_angle: 100.0,
        min_u_turn_angle: 180.0,
        straight_cost: 0.0,
        right_cost: 5.0,
        sharp_right_cost: 10.0,
        left_cost: 8.0,
        sharp_left_cost: 15.0,
        u_turn_cost: 40.0,
    };

    /// Strong penalties, preferring long straight stretches over frequent turning.
    pub const AVOID_TURNS: Self = Self {
        min_angle: 25.0,
        min_sharp_angle: 80.0,
        min_u_turn_angle: 170.0,
        straight_cost: 0.0,
        right_cost: 30.0,
        sharp_right_cost: 40.0,
        left_cost: 45.0,
        sharp_left_cost: 60.0,
        u_turn_cost: 120.0,
    };

    /// Ensures thresholds are ordered within `(0, 180]` and costs are non-negative numbers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let angles = [self.min_angle, self.min_sharp_angle, self.min_u_turn_angle];
        if angles.iter().any(|a| !a.is_finite()) {
            return Err(ConfigError::TurnCosts("angles must be finite"));
        }
        if !(self.min_angle > 0.0
            && self.min_angle <= self.min_sharp_angle
            && self.min_sharp_angle <= self.min_u_turn_angle
            && self.min_u_turn_angle <= 180.0)
        {
            return Err(ConfigError::TurnCosts(
                "expected 0 < min_angle <= min_sharp_angle <= min_u_turn_angle <= 180",
            ));
        }

        let costs = [
            self.straight_cost,
            self.right_cost,
            self.sharp_right_cost,
            self.left_cost,
            self.sharp_left_cost,
            self.u_turn_cost,
        ];
        if costs.iter().any(|c| c.is_nan() || *c < 0.0) {
            return Err(ConfigError::TurnCosts("costs must be non-negative"));
        }

        Ok(())
    }
}

impl Default for TurnCostConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

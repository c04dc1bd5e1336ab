// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Import-time turn penalties derived from the topology and tags of the ways
//! meeting at a junction.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use super::Way;
use crate::ev::{ConfigError, DecimalEncodedValue, OutOfRangeError, RoadClass};
use crate::turn_cost::{
    classify, DrivingSide, TurnClass, TurnCostConfig, TurnCostEntry, TurnCostStorage, TurnKey,
};
use crate::{azimuth, normalize_angle, EdgeId, NodeId, Point};

/// Read-only view of the imported OSM data, mapping external (OSM) node ids
/// to graph nodes and to their original attributes.
pub trait ExternalIdMap {
    fn internal_node_id(&self, osm_id: i64) -> Option<NodeId>;
    fn node_tags(&self, osm_id: i64) -> Option<&HashMap<String, String>>;
    fn node_point(&self, osm_id: i64) -> Option<Point>;
}

/// One edge meeting at a [Junction], described from the junction outwards.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionPart {
    pub way: Arc<Way>,
    pub edge: EdgeId,

    /// OSM nodes of the edge, starting at the junction node.
    pub nodes: Vec<i64>,

    /// Geometry of the edge, starting at the junction node.
    pub geometry: Vec<Point>,

    /// True if leaving the junction along this part follows the order of the way's nodes.
    pub along_way: bool,

    /// Whether the part may be travelled towards the junction.
    pub can_enter: bool,

    /// Whether the part may be travelled away from the junction.
    pub can_leave: bool,
}

impl JunctionPart {
    /// Lanes available when travelling towards the junction.
    pub fn incoming_lanes(&self) -> Option<u32> {
        directional_lanes(&self.way.tags, !self.along_way)
    }
}

/// Node where at least two ways meet, with all edges touching it.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// OSM id of the junction node.
    pub via: i64,
    pub parts: Vec<JunctionPart>,
}

/// Decides when a turn has to cross opposing lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingRule {
    /// Turns against the traffic (left turns when driving on the right) cross the lanes.
    TurnDirection,

    /// Every turn from a way with more than the given amount of lanes crosses them.
    LaneThreshold(u32),
}

/// Describes the penalties added by the [JunctionCostBuilder]. Costs are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionCostConfig<'a> {
    /// Node tags (key, value) marking a junction as controlled by signs or signals.
    pub controlling_tags: &'a [(&'a str, &'a str)],

    /// Penalty for entering a way of the given class from an uncontrolled junction.
    /// Link roads use the penalty of their main class.
    pub class_penalties: &'a [(RoadClass, f64)],

    /// Values of the `motor_vehicle` tag which exclude a way from class penalties.
    pub closed_motor_vehicle: &'a [&'a str],

    /// Penalty for every lane crossed when turning.
    pub lane_penalty: f64,

    pub crossing_rule: CrossingRule,
    pub driving_side: DrivingSide,

    /// Thresholds used to tell the direction of a turn; costs are unused.
    pub turn_angles: TurnCostConfig,
}

impl JunctionCostConfig<'static> {
    pub const DEFAULT: Self = Self {
        controlling_tags: &[("highway", "traffic_signals"), ("highway", "stop")],
        class_penalties: &[
            (RoadClass::Secondary, 60.0),
            (RoadClass::Primary, 120.0),
            (RoadClass::Trunk, 240.0),
            (RoadClass::Motorway, 480.0),
        ],
        closed_motor_vehicle: &[
            "agricultural",
            "forestry",
            "no",
            "restricted",
            "delivery",
            "military",
            "emergency",
            "private",
            "destination",
        ],
        lane_penalty: 3.0,
        crossing_rule: CrossingRule::TurnDirection,
        driving_side: DrivingSide::Right,
        turn_angles: TurnCostConfig::DEFAULT,
    };
}

impl<'a> JunctionCostConfig<'a> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |x: f64| x.is_finite() && x >= 0.0;
        if !self.class_penalties.iter().all(|&(_, p)| valid(p)) {
            return Err(ConfigError::JunctionCosts(
                "class penalties must be finite and non-negative",
            ));
        }
        if !valid(self.lane_penalty) {
            return Err(ConfigError::JunctionCosts(
                "lane penalty must be finite and non-negative",
            ));
        }
        self.turn_angles.validate()
    }

    /// Returns true if any of the tags marks the node as controlled.
    pub fn is_controlled(&self, tags: &HashMap<String, String>) -> bool {
        self.controlling_tags
            .iter()
            .any(|&(k, v)| tags.get(k).map(|s| s.as_str()) == Some(v))
    }

    /// Returns the penalty for entering a way with the given tags from an uncontrolled junction.
    pub fn class_penalty(&self, tags: &HashMap<String, String>) -> f64 {
        if tags
            .get("motor_vehicle")
            .is_some_and(|v| self.closed_motor_vehicle.contains(&v.as_str()))
        {
            return 0.0;
        }

        let class = RoadClass::from_tag(tags.get("highway").map_or("", |v| v.as_str()));
        if !class.is_high_traffic() {
            return 0.0;
        }

        let main = class.without_link();
        self.class_penalties
            .iter()
            .find_map(|&(c, p)| if c == main { Some(p) } else { None })
            .unwrap_or(0.0)
    }
}

impl Default for JunctionCostConfig<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Returns the amount of lanes in one direction of a way: `lanes:forward` or `lanes:backward`,
/// falling back to `lanes`. Missing and unparsable values result in `None`.
pub fn directional_lanes(tags: &HashMap<String, String>, forward: bool) -> Option<u32> {
    let key = if forward {
        "lanes:forward"
    } else {
        "lanes:backward"
    };
    let raw = tags.get(key).or_else(|| tags.get("lanes"))?;

    match raw.trim().parse::<u32>() {
        Ok(lanes) if lanes > 0 => Some(lanes),
        _ => {
            log::debug!("unparsable lane count: {raw:?}");
            None
        }
    }
}

/// Computes the import-time turn costs of [Junctions](Junction).
#[derive(Debug, Clone)]
pub struct JunctionCostBuilder<'a> {
    config: JunctionCostConfig<'a>,
    field: DecimalEncodedValue,
}

impl<'a> JunctionCostBuilder<'a> {
    /// Creates a builder writing into the given turn cost field.
    pub fn new(
        config: JunctionCostConfig<'a>,
        field: DecimalEncodedValue,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, field })
    }

    pub fn config(&self) -> &JunctionCostConfig<'a> {
        &self.config
    }

    /// Computes the costs of all turns through a junction. Only non-zero costs
    /// are returned, already clamped to the turn cost field.
    pub fn junction_costs<M: ExternalIdMap + ?Sized>(
        &self,
        junction: &Junction,
        map: &M,
    ) -> Vec<TurnCostEntry> {
        let Some(via) = map.internal_node_id(junction.via) else {
            log::debug!("junction node {} is not part of the graph", junction.via);
            return Vec::default();
        };

        let controlled = match map.node_tags(junction.via) {
            Some(tags) => self.config.is_controlled(tags),
            None => {
                log::debug!("no tags for junction node {}, assuming uncontrolled", junction.via);
                false
            }
        };

        let parts: Vec<(&JunctionPart, Option<Bearings>)> = junction
            .parts
            .iter()
            .filter(|p| {
                let starts_at_via = p.nodes.first() == Some(&junction.via);
                if !starts_at_via {
                    log::debug!(
                        "edge {} doesn't start at junction node {}",
                        p.edge,
                        junction.via,
                    );
                }
                starts_at_via
            })
            .map(|p| (p, Bearings::of(p, map)))
            .collect();

        let mut entries = Vec::default();
        for &(from, from_bearings) in &parts {
            if !from.can_enter {
                continue;
            }

            for &(to, to_bearings) in &parts {
                if from.edge == to.edge || !to.can_leave {
                    continue;
                }

                let turn = match (from_bearings, to_bearings) {
                    (Some(f), Some(t)) => Some(classify(
                        normalize_angle(t.departure - f.arrival),
                        &self.config.turn_angles,
                    )),
                    _ => None,
                };

                let cost = self.turn_cost(controlled, from, to, turn);
                if cost > 0.0 {
                    entries.push(TurnCostEntry {
                        key: TurnKey::new(from.edge, via, to.edge),
                        cost,
                    });
                }
            }
        }

        entries
    }

    fn turn_cost(
        &self,
        controlled: bool,
        from: &JunctionPart,
        to: &JunctionPart,
        turn: Option<TurnClass>,
    ) -> f64 {
        let mut cost = 0.0;

        if !controlled && !continues_road(from, to, turn) {
            cost += self.config.class_penalty(&to.way.tags);
        }

        if let Some(lanes) = from.incoming_lanes() {
            let crosses = match self.config.crossing_rule {
                CrossingRule::TurnDirection => {
                    turn.is_some_and(|t| t.crosses_traffic(self.config.driving_side))
                }
                CrossingRule::LaneThreshold(threshold) => lanes > threshold,
            };

            if crosses {
                cost += lanes as f64 * self.config.lane_penalty;
            }
        }

        self.field.clamp(cost)
    }

    /// Evaluates all junctions in parallel and adds the costs to the storage
    /// from the calling thread. Returns the amount of written entries.
    pub fn build<M: ExternalIdMap + Sync + ?Sized>(
        &self,
        junctions: &[Junction],
        map: &M,
        storage: &mut TurnCostStorage,
    ) -> Result<usize, OutOfRangeError> {
        let entries: Vec<TurnCostEntry> = junctions
            .par_iter()
            .flat_map_iter(|j| self.junction_costs(j, map))
            .collect();

        for entry in &entries {
            let k = entry.key;
            storage.add(&self.field, k.from_edge, k.via_node, k.to_edge, entry.cost)?;
        }

        log::info!(
            "{} junction(s) produced {} turn cost entries",
            junctions.len(),
            entries.len(),
        );
        Ok(entries.len())
    }
}

/// Returns true if a turn stays on the same road: either on the same way,
/// or straight on onto a way of the same class.
fn continues_road(from: &JunctionPart, to: &JunctionPart, turn: Option<TurnClass>) -> bool {
    if from.way.id == to.way.id {
        return true;
    }

    let class = |p: &JunctionPart| {
        RoadClass::from_tag(p.way.tags.get("highway").map_or("", |v| v.as_str())).without_link()
    };
    turn == Some(TurnClass::Straight) && class(from) == class(to)
}

/// Headings (in degrees) of a [JunctionPart] next to the junction node.
#[derive(Debug, Clone, Copy)]
struct Bearings {
    /// Heading when arriving at the junction along the part.
    arrival: f64,

    /// Heading when leaving the junction along the part.
    departure: f64,
}

impl Bearings {
    fn of<M: ExternalIdMap + ?Sized>(part: &JunctionPart, map: &M) -> Option<Self> {
        let segment = first_segment(&part.geometry).or_else(|| {
            let points: Vec<Point> = part.nodes.iter().filter_map(|&n| map.node_point(n)).collect();
            first_segment(&points)
        });

        match segment {
            Some((via, next)) => Some(Self {
                arrival: azimuth(next.lat, next.lon, via.lat, via.lon),
                departure: azimuth(via.lat, via.lon, next.lat, next.lon),
            }),
            None => {
                log::debug!("edge {} has no length, turn direction unknown", part.edge);
                None
            }
        }
    }
}

/// Returns the first point and the first point at a different position.
fn first_segment(points: &[Point]) -> Option<(Point, Point)> {
    let start = *points.first()?;
    points
        .iter()
        .find(|p| !p.same_position(&start))
        .map(|&p| (start, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn_cost::TurnCostStorage;
    use crate::Encoding;

    macro_rules! tags {
        {} => { HashMap::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    /// Plus-shaped crossing of a north-south and an east-west way at node -1.
    #[derive(Default)]
    struct TestMap {
        nodes: HashMap<i64, (NodeId, Point, HashMap<String, String>)>,
    }

    impl TestMap {
        fn new(via_tags: HashMap<String, String>) -> Self {
            let mut m = Self::default();
            m.nodes.insert(-1, (0, Point::new(0.0, 0.0), via_tags));
            m.nodes.insert(-2, (1, Point::new(0.001, 0.0), tags! {}));
            m.nodes.insert(-3, (2, Point::new(0.0, 0.001), tags! {}));
            m.nodes.insert(-4, (3, Point::new(-0.001, 0.0), tags! {}));
            m.nodes.insert(-5, (4, Point::new(0.0, -0.001), tags! {}));
            m
        }
    }

    impl ExternalIdMap for TestMap {
        fn internal_node_id(&self, osm_id: i64) -> Option<NodeId> {
            self.nodes.get(&osm_id).map(|n| n.0)
        }

        fn node_tags(&self, osm_id: i64) -> Option<&HashMap<String, String>> {
            self.nodes.get(&osm_id).map(|n| &n.2)
        }

        fn node_point(&self, osm_id: i64) -> Option<Point> {
            self.nodes.get(&osm_id).map(|n| n.1)
        }
    }

    fn way(id: i64, nodes: Vec<i64>, tags: HashMap<String, String>) -> Arc<Way> {
        Arc::new(Way { id, nodes, tags })
    }

    /// Creates a two-way part from -1 to `other`, without geometry.
    fn part(way: &Arc<Way>, edge: EdgeId, other: i64, along_way: bool) -> JunctionPart {
        JunctionPart {
            way: Arc::clone(way),
            edge,
            nodes: vec![-1, other],
            geometry: vec![],
            along_way,
            can_enter: true,
            can_leave: true,
        }
    }

    fn crossing(main: HashMap<String, String>, side: HashMap<String, String>) -> Junction {
        let main = way(10, vec![-4, -1, -2], main);
        let side = way(20, vec![-5, -1, -3], side);
        Junction {
            via: -1,
            parts: vec![
                part(&main, 0, -2, true),  // north
                part(&side, 1, -3, true),  // east
                part(&main, 2, -4, false), // south
                part(&side, 3, -5, false), // west
            ],
        }
    }

    fn builder(config: JunctionCostConfig<'static>) -> JunctionCostBuilder<'static> {
        let field = Encoding::new().unwrap().turn_cost;
        JunctionCostBuilder::new(config, field).unwrap()
    }

    fn cost_of(entries: &[TurnCostEntry], from: EdgeId, to: EdgeId) -> f64 {
        entries
            .iter()
            .find(|e| e.key.from_edge == from && e.key.to_edge == to)
            .map_or(0.0, |e| e.cost)
    }

    #[test]
    fn uncontrolled_motorway_crossing() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let j = crossing(
            tags! {"highway": "motorway", "oneway": "no"},
            tags! {"highway": "residential"},
        );
        let map = TestMap::new(tags! {});
        let entries = b.junction_costs(&j, &map);

        // Entering the motorway from the side road
        assert_eq!(cost_of(&entries, 1, 0), 480.0);
        assert_eq!(cost_of(&entries, 3, 0), 480.0);
        assert_eq!(cost_of(&entries, 1, 2), 480.0);
        assert_eq!(cost_of(&entries, 3, 2), 480.0);

        // Staying on the motorway is free
        assert_eq!(cost_of(&entries, 2, 0), 0.0);
        assert_eq!(cost_of(&entries, 0, 2), 0.0);

        // Entering the residential road is free
        assert_eq!(cost_of(&entries, 0, 1), 0.0);
        assert_eq!(cost_of(&entries, 3, 1), 0.0);
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.key.via_node == 0));
    }

    #[test]
    fn continuing_along_a_busy_road() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let map = TestMap::new(tags! {});

        // Primary road split into two ways at the junction, residential side roads
        let north = way(10, vec![-1, -2], tags! {"highway": "primary"});
        let south = way(11, vec![-4, -1], tags! {"highway": "primary_link"});
        let side = way(20, vec![-5, -1, -3], tags! {"highway": "residential"});
        let j = Junction {
            via: -1,
            parts: vec![
                part(&north, 0, -2, true),
                part(&side, 1, -3, true),
                part(&south, 2, -4, false),
                part(&side, 3, -5, false),
            ],
        };
        let entries = b.junction_costs(&j, &map);

        assert_eq!(cost_of(&entries, 2, 0), 0.0);
        assert_eq!(cost_of(&entries, 0, 2), 0.0);
        assert_eq!(cost_of(&entries, 1, 0), 120.0);
        assert_eq!(cost_of(&entries, 3, 2), 120.0);
        assert_eq!(entries.len(), 4);

        // Turning between ways of the same class still enters the busy road
        let east = way(30, vec![-1, -3], tags! {"highway": "primary"});
        let j = Junction {
            via: -1,
            parts: vec![part(&north, 0, -2, true), part(&east, 1, -3, true)],
        };
        let entries = b.junction_costs(&j, &map);
        assert_eq!(cost_of(&entries, 1, 0), 120.0);
        assert_eq!(cost_of(&entries, 0, 1), 120.0);
    }

    #[test]
    fn controlled_motorway_crossing() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let j = crossing(
            tags! {"highway": "motorway", "oneway": "no"},
            tags! {"highway": "residential"},
        );

        for via_tags in [
            tags! {"highway": "traffic_signals"},
            tags! {"highway": "stop"},
        ] {
            let map = TestMap::new(via_tags);
            assert_eq!(b.junction_costs(&j, &map), vec![]);
        }
    }

    #[test]
    fn link_roads_and_closed_roads() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let map = TestMap::new(tags! {});

        let j = crossing(
            tags! {"highway": "secondary_link"},
            tags! {"highway": "tertiary"},
        );
        assert_eq!(cost_of(&b.junction_costs(&j, &map), 1, 0), 60.0);

        let j = crossing(
            tags! {"highway": "primary", "motor_vehicle": "destination"},
            tags! {"highway": "tertiary"},
        );
        assert_eq!(b.junction_costs(&j, &map), vec![]);
    }

    #[test]
    fn lanes_crossed_by_left_turns() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let map = TestMap::new(tags! {"highway": "traffic_signals"});
        let j = crossing(
            tags! {"highway": "residential", "lanes": "2", "lanes:backward": "3"},
            tags! {"highway": "residential"},
        );
        let entries = b.junction_costs(&j, &map);

        // South part arrives heading north along the way: 2 lanes, left turn → west
        assert_eq!(cost_of(&entries, 2, 3), 6.0);
        assert_eq!(cost_of(&entries, 2, 1), 0.0);

        // North part arrives heading south against the way: 3 lanes, left turn → east
        assert_eq!(cost_of(&entries, 0, 1), 9.0);
        assert_eq!(cost_of(&entries, 0, 3), 0.0);

        // Side road has no lanes tag
        assert_eq!(cost_of(&entries, 1, 0), 0.0);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn lanes_on_left_hand_traffic() {
        let b = builder(JunctionCostConfig {
            driving_side: DrivingSide::Left,
            ..JunctionCostConfig::DEFAULT
        });
        let map = TestMap::new(tags! {"highway": "stop"});
        let j = crossing(
            tags! {"highway": "residential", "lanes": "2"},
            tags! {"highway": "residential"},
        );
        let entries = b.junction_costs(&j, &map);
        assert_eq!(cost_of(&entries, 2, 3), 0.0);
        assert_eq!(cost_of(&entries, 2, 1), 6.0);
    }

    #[test]
    fn lane_threshold() {
        let b = builder(JunctionCostConfig {
            crossing_rule: CrossingRule::LaneThreshold(2),
            ..JunctionCostConfig::DEFAULT
        });
        let map = TestMap::new(tags! {"highway": "traffic_signals"});

        let j = crossing(
            tags! {"highway": "residential", "lanes": "3"},
            tags! {"highway": "residential", "lanes": "2"},
        );
        let entries = b.junction_costs(&j, &map);
        assert_eq!(cost_of(&entries, 2, 3), 9.0);
        assert_eq!(cost_of(&entries, 2, 1), 9.0);
        assert_eq!(cost_of(&entries, 2, 0), 9.0);
        assert_eq!(cost_of(&entries, 1, 0), 0.0);
        assert_eq!(entries.len(), 6);
    }

    #[test]
    fn unparsable_lanes_are_ignored() {
        assert_eq!(directional_lanes(&tags! {"lanes": "2;3"}, true), None);
        assert_eq!(directional_lanes(&tags! {"lanes": "0"}, true), None);
        assert_eq!(directional_lanes(&tags! {"lanes": " 4 "}, true), Some(4));
        assert_eq!(
            directional_lanes(&tags! {"lanes": "4", "lanes:forward": "1"}, true),
            Some(1),
        );
        assert_eq!(
            directional_lanes(&tags! {"lanes": "4", "lanes:forward": "1"}, false),
            Some(4),
        );
        assert_eq!(directional_lanes(&tags! {}, false), None);
    }

    #[test]
    fn impossible_turns_are_skipped() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let map = TestMap::new(tags! {});
        let mut j = crossing(tags! {"highway": "trunk"}, tags! {"highway": "residential"});

        // north part only allows travel away from the junction,
        // east part only towards it
        j.parts[0].can_enter = false;
        j.parts[1].can_leave = false;

        let entries = b.junction_costs(&j, &map);
        assert_eq!(cost_of(&entries, 1, 0), 240.0);
        assert_eq!(cost_of(&entries, 1, 2), 240.0);
        assert_eq!(cost_of(&entries, 3, 2), 240.0);
        assert!(entries.iter().all(|e| e.key.from_edge != 0));
        assert!(entries.iter().all(|e| e.key.to_edge != 1));
    }

    #[test]
    fn costs_are_clamped() {
        let b = builder(JunctionCostConfig {
            class_penalties: &[(RoadClass::Motorway, 5000.0)],
            ..JunctionCostConfig::DEFAULT
        });
        let map = TestMap::new(tags! {});
        let j = crossing(tags! {"highway": "motorway"}, tags! {"highway": "residential"});
        assert_eq!(cost_of(&b.junction_costs(&j, &map), 1, 0), 1022.0);
    }

    #[test]
    fn unknown_junction_node() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let map = TestMap::new(tags! {});
        let mut j = crossing(tags! {"highway": "motorway"}, tags! {"highway": "residential"});
        j.via = -42;
        assert_eq!(b.junction_costs(&j, &map), vec![]);
    }

    #[test]
    fn geometry_takes_precedence() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let map = TestMap::new(tags! {"highway": "traffic_signals"});
        let mut j = crossing(
            tags! {"highway": "residential", "lanes": "2"},
            tags! {"highway": "residential"},
        );

        // The west part bends north right after the junction,
        // so turning there from the south is a right turn
        j.parts[3].geometry = vec![Point::new(0.0, 0.0), Point::new(0.001, 0.0001)];
        let entries = b.junction_costs(&j, &map);
        assert_eq!(cost_of(&entries, 2, 3), 0.0);
    }

    #[test]
    fn build_is_deterministic() {
        let b = builder(JunctionCostConfig::DEFAULT);
        let map = TestMap::new(tags! {});
        let junctions: Vec<Junction> = (0..4)
            .map(|_| {
                crossing(
                    tags! {"highway": "primary", "lanes": "2"},
                    tags! {"highway": "secondary"},
                )
            })
            .collect();

        let words = Encoding::new().unwrap().turn_words();
        let mut first = TurnCostStorage::new(words);
        let mut second = TurnCostStorage::new(words);
        assert_eq!(b.build(&junctions[..1], &map, &mut first).unwrap(), 8);
        b.build(&junctions[..1], &map, &mut second).unwrap();

        let mut a = Vec::new();
        let mut c = Vec::new();
        first.write_to(&mut a).unwrap();
        second.write_to(&mut c).unwrap();
        assert_eq!(a, c);

        // All copies of the junction share the via node and edges - costs add up
        let mut summed = TurnCostStorage::new(words);
        assert_eq!(b.build(&junctions, &map, &mut summed).unwrap(), 4 * 8);
        assert_eq!(summed.len(), 8);
        let field = Encoding::new().unwrap().turn_cost;
        assert_eq!(summed.get(&field, 1, 0, 0), 4.0 * 120.0);
    }

    #[test]
    fn invalid_config() {
        let field = Encoding::new().unwrap().turn_cost;
        for config in [
            JunctionCostConfig {
                lane_penalty: -1.0,
                ..JunctionCostConfig::DEFAULT
            },
            JunctionCostConfig {
                class_penalties: &[(RoadClass::Primary, f64::INFINITY)],
                ..JunctionCostConfig::DEFAULT
            },
            JunctionCostConfig {
                turn_angles: TurnCostConfig {
                    min_angle: 200.0,
                    ..TurnCostConfig::DEFAULT
                },
                ..JunctionCostConfig::DEFAULT
            },
        ] {
            assert!(JunctionCostBuilder::new(config, field.clone()).is_err());
        }
    }
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::ev::{EdgeFlags, OutOfRangeError, RoadClass};
use crate::osm::junction::{
    directional_lanes, ExternalIdMap, Junction, JunctionCostBuilder, JunctionPart,
};
use crate::osm::profile::TurnRestriction;
use crate::osm::Error;
use crate::{add_elevation, EdgeId, Encoding, Graph, Node, NodeId, Point};

use super::{
    model::{self, FeatureType, Way},
    FeatureReader, Options,
};

/// Helper object used for storing state related to converting [OSM features](super::model::Feature)
/// into a [Graph].
pub(super) struct GraphBuilder<'a> {
    options: &'a Options<'a>,
    ignore_bbox: bool,
    nodes: HashMap<i64, model::Node>,
    ways: Vec<Arc<Way>>,
    restrictions: Vec<(model::Relation, TurnRestriction)>,
}

impl<'a> GraphBuilder<'a> {
    /// Create a new, empty graph builder.
    pub(super) fn new(options: &'a Options<'a>) -> Self {
        let ignore_bbox =
            options.bbox.iter().all(|&x| x == 0.0) || options.bbox.iter().any(|x| !x.is_finite());

        Self {
            options,
            ignore_bbox,
            nodes: HashMap::default(),
            ways: Vec::default(),
            restrictions: Vec::default(),
        }
    }

    /// Consumes all features from the provided [FeatureReader] and converts them into a [Graph].
    pub(super) fn build<F: FeatureReader>(mut self, mut features: F) -> Result<Graph, Error>
    where
        Error: From<F::Error>,
    {
        while let Some(f) = features.next()? {
            self.add_feature(f);
        }
        self.finish()
    }

    fn add_feature(&mut self, f: model::Feature) {
        match f {
            model::Feature::Node(n) => self.add_node(n),
            model::Feature::Way(w) => self.add_way(w),
            model::Feature::Relation(r) => self.add_relation(r),
        }
    }

    fn add_node(&mut self, n: model::Node) {
        if n.id != 0 && self.is_in_bbox(n.lat, n.lon) {
            self.nodes.insert(n.id, n);
        }
    }

    fn is_in_bbox(&self, lat: f64, lon: f64) -> bool {
        if self.ignore_bbox {
            return true;
        }
        let [min_lon, min_lat, max_lon, max_lat] = self.options.bbox;
        lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon
    }

    fn add_way(&mut self, mut w: model::Way) {
        if !self.options.profile.is_routable(&w.tags) {
            return;
        }

        let unknown = w.nodes.iter().filter(|id| !self.nodes.contains_key(id)).count();
        if unknown > 0 {
            log::warn!("way {} references {} unknown node(s)", w.id, unknown);
            w.nodes.retain(|id| self.nodes.contains_key(id));
        }
        w.nodes.dedup();

        if w.nodes.len() < 2 {
            log::debug!("way {} is too short - skipping", w.id);
            return;
        }

        self.ways.push(Arc::new(w));
    }

    fn add_relation(&mut self, r: model::Relation) {
        let kind = self.options.profile.restriction_kind(&r.tags);
        if kind != TurnRestriction::Inapplicable {
            self.restrictions.push((r, kind));
        }
    }

    /// Nodes at which ways are split into edges: ends of ways and nodes shared by many ways.
    fn tower_nodes(&self) -> HashSet<i64> {
        let mut uses: HashMap<i64, u32> = HashMap::default();
        let mut towers: HashSet<i64> = HashSet::default();

        for w in &self.ways {
            towers.extend(w.nodes.first());
            towers.extend(w.nodes.last());
            for &id in &w.nodes {
                *uses.entry(id).or_default() += 1;
            }
        }

        towers.extend(uses.into_iter().filter(|&(_, n)| n >= 2).map(|(id, _)| id));
        towers
    }

    fn finish(self) -> Result<Graph, Error> {
        let encoding = Encoding::new()?;
        let junction_builder =
            JunctionCostBuilder::new(self.options.junction_costs, encoding.turn_cost.clone())?;
        let mut g = Graph::new(encoding);

        let towers = self.tower_nodes();
        let mut index = NodeIndex {
            ids: HashMap::default(),
            nodes: &self.nodes,
        };

        // Number tower nodes in the order of their first appearance
        for w in &self.ways {
            for id in w.nodes.iter().filter(|id| towers.contains(id)) {
                if !index.ids.contains_key(id) {
                    let n = &self.nodes[id];
                    let node_id = g.add_node(Node {
                        osm_id: n.id,
                        lat: n.lat,
                        lon: n.lon,
                    });
                    index.ids.insert(*id, node_id);
                }
            }
        }

        let mut parts: Vec<Vec<JunctionPart>> = vec![Vec::default(); g.node_count()];
        let mut way_edges: HashMap<i64, Vec<WayEdge>> = HashMap::default();
        for w in &self.ways {
            let mut start = 0;
            for end in 1..w.nodes.len() {
                if towers.contains(&w.nodes[end]) {
                    let segment = &w.nodes[start..=end];
                    let (edge, forward, backward, geometry) =
                        self.add_edge(&mut g, &index, w, segment)?;

                    let base = index.ids[&segment[0]];
                    let adj = index.ids[&segment[segment.len() - 1]];

                    let mut reversed_geometry = geometry.clone();
                    reversed_geometry.reverse();

                    parts[base as usize].push(JunctionPart {
                        way: Arc::clone(w),
                        edge,
                        nodes: segment.to_vec(),
                        geometry,
                        along_way: true,
                        can_enter: backward,
                        can_leave: forward,
                    });
                    parts[adj as usize].push(JunctionPart {
                        way: Arc::clone(w),
                        edge,
                        nodes: segment.iter().rev().copied().collect(),
                        geometry: reversed_geometry,
                        along_way: false,
                        can_enter: forward,
                        can_leave: backward,
                    });

                    way_edges.entry(w.id).or_default().push(WayEdge {
                        edge,
                        first: segment[0],
                        last: segment[segment.len() - 1],
                    });
                    start = end;
                }
            }
        }

        let junctions: Vec<Junction> = parts
            .into_iter()
            .enumerate()
            .filter(|(_, parts)| {
                let ways: BTreeSet<i64> = parts.iter().map(|p| p.way.id).collect();
                ways.len() >= 2
            })
            .filter_map(|(id, parts)| {
                let via = g.get_node(id as NodeId)?.osm_id;
                Some(Junction { via, parts })
            })
            .collect();

        junction_builder.build(&junctions, &index, g.turn_costs_mut())?;

        let mut applied_restrictions = 0;
        for (r, kind) in &self.restrictions {
            match restriction_turn(&index, &way_edges, r) {
                Ok(turn) => {
                    store_restriction(&mut g, turn, *kind)?;
                    applied_restrictions += 1;
                }
                Err(e) => log::debug!("skipping turn restriction {}: {}", r.id, e),
            }
        }

        log::info!(
            "imported {} node(s), {} edge(s), {} junction(s) and {} turn restriction(s) - {} turn cost entries",
            g.node_count(),
            g.edge_count(),
            junctions.len(),
            applied_restrictions,
            g.turn_costs().len(),
        );

        Ok(g)
    }

    /// Adds the edge between the first and last node of a way segment.
    /// Returns its id, whether it's traversable forward and backward, and its geometry.
    fn add_edge(
        &self,
        g: &mut Graph,
        index: &NodeIndex<'_>,
        w: &Way,
        segment: &[i64],
    ) -> Result<(EdgeId, bool, bool, Vec<Point>), OutOfRangeError> {
        let mut geometry: Vec<Point> = segment
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|n| Point::new(n.lat, n.lon))
            .collect();
        add_elevation(self.options.elevation, &mut geometry);

        let (forward, backward) = self.options.profile.way_direction(&w.tags);
        let flags = Self::encode_edge(g.encoding(), w, &geometry, forward, backward)?;

        let base = index.ids[&segment[0]];
        let adj = index.ids[&segment[segment.len() - 1]];
        let edge = g.add_edge(base, adj, w.id, flags, geometry.clone());
        Ok((edge, forward, backward, geometry))
    }

    fn encode_edge(
        encoding: &Encoding,
        w: &Way,
        geometry: &[Point],
        forward: bool,
        backward: bool,
    ) -> Result<EdgeFlags, OutOfRangeError> {
        let mut flags = encoding.create_edge_flags();

        encoding.orientation.encode(geometry, &mut flags)?;

        let highway = w.tags.get("highway").map_or("", |v| v.as_str());
        encoding
            .road_class
            .set_enum(false, &mut flags, RoadClass::from_tag(highway))?;

        for reverse in [false, true] {
            let lanes = directional_lanes(&w.tags, !reverse).unwrap_or(0);
            let max = encoding.lanes.max_int() as u32;
            if lanes > max {
                log::warn!("way {} has {} lanes, storing {}", w.id, lanes, max);
            }
            encoding
                .lanes
                .set_int(reverse, &mut flags, lanes.min(max) as i32)?;
        }

        encoding.access.set_bool(false, &mut flags, forward);
        encoding.access.set_bool(true, &mut flags, backward);

        encoding.slope.encode(geometry, &mut flags)?;
        Ok(flags)
    }
}

/// Maps OSM node ids of the imported nodes onto graph nodes.
struct NodeIndex<'n> {
    ids: HashMap<i64, NodeId>,
    nodes: &'n HashMap<i64, model::Node>,
}

impl ExternalIdMap for NodeIndex<'_> {
    fn internal_node_id(&self, osm_id: i64) -> Option<NodeId> {
        self.ids.get(&osm_id).copied()
    }

    fn node_tags(&self, osm_id: i64) -> Option<&HashMap<String, String>> {
        self.nodes.get(&osm_id).map(|n| &n.tags)
    }

    fn node_point(&self, osm_id: i64) -> Option<Point> {
        self.nodes.get(&osm_id).map(|n| Point::new(n.lat, n.lon))
    }
}

/// Edge created from a part of an OSM way, with the OSM ids of its end nodes.
#[derive(Debug, Clone, Copy)]
struct WayEdge {
    edge: EdgeId,
    first: i64,
    last: i64,
}

/// Resolves a turn restriction into a (from edge, via node, to edge) turn.
/// Only restrictions with a single via node are supported.
fn restriction_turn(
    index: &NodeIndex<'_>,
    way_edges: &HashMap<i64, Vec<WayEdge>>,
    r: &model::Relation,
) -> Result<(EdgeId, NodeId, EdgeId), InvalidRestriction> {
    let (from, via, to) = get_restriction_members(r)?;

    if via.type_ != FeatureType::Node {
        return Err(InvalidRestriction::UnsupportedVia(via.type_));
    }
    let via_node = index
        .internal_node_id(via.ref_)
        .ok_or(InvalidRestriction::ReferenceToUnknownNode(via.ref_))?;

    let from_edge = edge_at(way_edges, from, via.ref_)?;
    let to_edge = edge_at(way_edges, to, via.ref_)?;
    Ok((from_edge, via_node, to_edge))
}

type RestrictionMembers<'r> = (
    &'r model::RelationMember,
    &'r model::RelationMember,
    &'r model::RelationMember,
);

/// Returns the `from`, `via` and `to` members of a turn restriction,
/// ensuring each of them appears exactly once.
fn get_restriction_members(
    r: &model::Relation,
) -> Result<RestrictionMembers<'_>, InvalidRestriction> {
    let mut from: Option<&model::RelationMember> = None;
    let mut via: Option<&model::RelationMember> = None;
    let mut to: Option<&model::RelationMember> = None;

    for m in &r.members {
        let slot = match m.role.as_str() {
            "from" => &mut from,
            "via" => &mut via,
            "to" => &mut to,
            _ => continue,
        };

        if slot.is_some() {
            return Err(InvalidRestriction::MultipleMembers(m.role.clone()));
        }
        *slot = Some(m);
    }

    match (from, via, to) {
        (Some(from), Some(via), Some(to)) => Ok((from, via, to)),
        (None, _, _) => Err(InvalidRestriction::MissingMember("from")),
        (_, None, _) => Err(InvalidRestriction::MissingMember("via")),
        (_, _, None) => Err(InvalidRestriction::MissingMember("to")),
    }
}

/// Finds the single edge of a restriction's way member which touches the via node.
fn edge_at(
    way_edges: &HashMap<i64, Vec<WayEdge>>,
    m: &model::RelationMember,
    via: i64,
) -> Result<EdgeId, InvalidRestriction> {
    if m.type_ != FeatureType::Way {
        return Err(InvalidRestriction::InvalidMemberType(m.role.clone(), m.type_));
    }

    let edges = way_edges
        .get(&m.ref_)
        .ok_or(InvalidRestriction::ReferenceToUnknownWay(m.ref_))?;

    let mut touching = edges.iter().filter(|e| e.first == via || e.last == via);
    match (touching.next(), touching.next()) {
        (Some(e), None) => Ok(e.edge),
        (None, _) => Err(InvalidRestriction::Disjoint),
        (Some(_), Some(_)) => Err(InvalidRestriction::Ambiguous(m.ref_)),
    }
}

/// Writes a resolved restriction as forbidden turns.
fn store_restriction(
    g: &mut Graph,
    (from, via, to): (EdgeId, NodeId, EdgeId),
    kind: TurnRestriction,
) -> Result<(), OutOfRangeError> {
    let field = g.encoding().turn_cost.clone();

    match kind {
        TurnRestriction::Prohibitory => {
            g.turn_costs_mut().set(&field, from, via, to, f64::INFINITY)?;
        }

        TurnRestriction::Mandatory => {
            // Turning back onto `from` stays a regular U-turn
            let others: Vec<EdgeId> = g
                .get_edges(via)
                .iter()
                .copied()
                .filter(|&e| e != to && e != from)
                .collect();
            for other in others {
                g.turn_costs_mut().set(&field, from, via, other, f64::INFINITY)?;
            }
        }

        TurnRestriction::Inapplicable => {}
    }

    Ok(())
}

#[derive(Debug)]
enum InvalidRestriction {
    Disjoint,
    Ambiguous(i64),
    MultipleMembers(String),
    MissingMember(&'static str),
    UnsupportedVia(FeatureType),
    ReferenceToUnknownNode(i64),
    ReferenceToUnknownWay(i64),
    InvalidMemberType(String, FeatureType),
}

impl std::fmt::Display for InvalidRestriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disjoint => write!(f, "member doesn't touch the via node"),
            Self::Ambiguous(way_id) => {
                write!(f, "way {way_id} touches the via node more than once")
            }
            Self::MultipleMembers(role) => write!(f, "multiple '{role}' members"),
            Self::MissingMember(role) => write!(f, "missing '{role}' member"),
            Self::UnsupportedVia(type_) => write!(f, "unsupported 'via' member of type {type_}"),
            Self::ReferenceToUnknownNode(node_id) => {
                write!(f, "reference to unknown node {node_id}")
            }
            Self::ReferenceToUnknownWay(way_id) => {
                write!(f, "reference to unknown way {way_id}")
            }
            Self::InvalidMemberType(role, type_) => {
                write!(f, "member with role {role} can't be of type {type_}")
            }
        }
    }
}

impl std::error::Error for InvalidRestriction {}

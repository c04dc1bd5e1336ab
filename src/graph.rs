// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::ev::EdgeFlags;
use crate::turn_cost::TurnCostStorage;
use crate::{earth_distance, EdgeId, Encoding, NodeId, Point};

/// Represents a junction or a dead end of the road network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub osm_id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// Bidirectional connection between two [Nodes](Node).
///
/// The forward direction runs from `base` to `adj`; `geometry`
/// (if present) is ordered the same way and includes both end points.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub base: NodeId,
    pub adj: NodeId,
    pub way_id: i64,

    /// Length in meters.
    pub distance: f64,

    pub flags: EdgeFlags,
    pub geometry: Vec<Point>,
}

impl Edge {
    /// Returns true if travelling the edge in the forward direction arrives at `node`.
    pub fn is_adjacent_to_node(&self, node: NodeId) -> bool {
        self.adj == node
    }

    pub fn is_incident_to(&self, node: NodeId) -> bool {
        self.base == node || self.adj == node
    }

    /// Returns the node on the other end of the edge, if `node` is one of its ends.
    pub fn other_node(&self, node: NodeId) -> Option<NodeId> {
        if self.base == node {
            Some(self.adj)
        } else if self.adj == node {
            Some(self.base)
        } else {
            None
        }
    }
}

/// Represents a road network as [Nodes](Node) and bidirectional [Edges](Edge)
/// addressed by dense indices, together with the [Encoding] of their attributes
/// and the costs of turns between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    encoding: Encoding,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_edges: Vec<Vec<EdgeId>>,
    turn_costs: TurnCostStorage,
}

impl Graph {
    pub fn new(encoding: Encoding) -> Self {
        let turn_costs = TurnCostStorage::new(encoding.turn_words());
        Self {
            encoding,
            nodes: Vec::default(),
            edges: Vec::default(),
            node_edges: Vec::default(),
            turn_costs,
        }
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Appends a [Node], returning its id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.node_edges.push(Vec::default());
        id
    }

    pub fn get_node(&self, id: NodeId) -> Option<Node> {
        self.nodes.get(id as usize).copied()
    }

    /// Returns an iterator over all [Nodes](Node) with their ids.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(id, n)| (id as NodeId, n))
    }

    /// Appends an [Edge] from `base` to `adj`, returning its id.
    ///
    /// The length is computed from the geometry, or from the
    /// positions of the end nodes if the geometry is shorter than 2 points.
    ///
    /// # Panics
    ///
    /// Panics if `base` or `adj` is not a node of this graph.
    pub fn add_edge(
        &mut self,
        base: NodeId,
        adj: NodeId,
        way_id: i64,
        flags: EdgeFlags,
        geometry: Vec<Point>,
    ) -> EdgeId {
        assert!((base as usize) < self.nodes.len());
        assert!((adj as usize) < self.nodes.len());

        let distance = if geometry.len() >= 2 {
            geometry
                .windows(2)
                .map(|p| earth_distance(p[0].lat, p[0].lon, p[1].lat, p[1].lon))
                .sum()
        } else {
            let (a, b) = (self.nodes[base as usize], self.nodes[adj as usize]);
            earth_distance(a.lat, a.lon, b.lat, b.lon)
        };

        let id = self.edges.len() as EdgeId;
        self.edges.push(Edge {
            base,
            adj,
            way_id,
            distance,
            flags,
            geometry,
        });
        self.node_edges[base as usize].push(id);
        if adj != base {
            self.node_edges[adj as usize].push(id);
        }
        id
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id as usize)
    }

    /// Returns an iterator over all [Edges](Edge) with their ids.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(id, e)| (id as EdgeId, e))
    }

    /// Gets the ids of all edges touching a node with a given id.
    pub fn get_edges(&self, node: NodeId) -> &[EdgeId] {
        self.node_edges
            .get(node as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true if travelling the edge in the forward direction arrives at `node`.
    /// Unknown edges are never adjacent to anything.
    pub fn is_adjacent_to_node(&self, edge: EdgeId, node: NodeId) -> bool {
        matches!(self.get_edge(edge), Some(e) if e.is_adjacent_to_node(node))
    }

    pub fn turn_costs(&self) -> &TurnCostStorage {
        &self.turn_costs
    }

    pub fn turn_costs_mut(&mut self) -> &mut TurnCostStorage {
        &mut self.turn_costs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(osm_id: i64, lat: f64, lon: f64) -> Node {
        Node { osm_id, lat, lon }
    }

    #[test]
    fn nodes_and_edges() {
        let mut g = Graph::new(Encoding::new().unwrap());
        let a = g.add_node(node(10, 0.0, 0.0));
        let b = g.add_node(node(20, 0.0, 1.0));
        let c = g.add_node(node(30, 1.0, 1.0));
        assert_eq!((a, b, c), (0, 1, 2));

        let flags = g.encoding().create_edge_flags();
        let ab = g.add_edge(a, b, 100, flags.clone(), vec![]);
        let bc = g.add_edge(
            b,
            c,
            200,
            flags,
            vec![Point::new(0.0, 1.0), Point::new(0.5, 1.0), Point::new(1.0, 1.0)],
        );

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.get_edges(b), &[ab, bc]);
        assert_eq!(g.get_edges(a), &[ab]);
        assert_eq!(g.get_edges(42), &[] as &[EdgeId]);

        assert!((g.get_edge(ab).unwrap().distance - 111_195.08).abs() < 0.1);
        assert!((g.get_edge(bc).unwrap().distance - 111_195.08).abs() < 0.1);
        assert_eq!(g.get_node(c).unwrap().osm_id, 30);
        assert_eq!(g.get_node(3), None);
    }

    #[test]
    #[should_panic]
    fn edge_to_unknown_node() {
        let mut g = Graph::new(Encoding::new().unwrap());
        let a = g.add_node(node(10, 0.0, 0.0));
        let flags = g.encoding().create_edge_flags();
        g.add_edge(a, 1, 100, flags, vec![]);
    }

    #[test]
    fn adjacency() {
        let mut g = Graph::new(Encoding::new().unwrap());
        let a = g.add_node(node(1, 0.0, 0.0));
        let b = g.add_node(node(2, 0.0, 0.001));
        let flags = g.encoding().create_edge_flags();
        let e = g.add_edge(a, b, 1, flags, vec![]);

        assert!(g.is_adjacent_to_node(e, b));
        assert!(!g.is_adjacent_to_node(e, a));
        assert!(!g.is_adjacent_to_node(7, b));

        let edge = g.get_edge(e).unwrap();
        assert!(edge.is_incident_to(a));
        assert_eq!(edge.other_node(a), Some(b));
        assert_eq!(edge.other_node(b), Some(a));
        assert_eq!(edge.other_node(5), None);
    }
}

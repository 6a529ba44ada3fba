//! Backward single-target-set shortest paths over weighted graphs.
//!
//! Nodes are opaque `usize` indices and edges carry an opaque `label`, so the
//! search knows nothing about patterns or tasks. Costs are non-negative and
//! may be zero.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use plover_task::Cost;

/// Distance of nodes that cannot reach any target.
pub const INFINITE_COST: Cost = Cost::MAX;

pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub cost: Cost,
    pub label: usize,
}

/// Directed weighted graph with reverse adjacency for backward search.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    num_nodes: usize,
    edges: Vec<Edge>,
    incoming: Vec<Vec<EdgeId>>,
}

impl WeightedGraph {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            edges: Vec::new(),
            incoming: vec![Vec::new(); num_nodes],
        }
    }

    pub fn add_edge(&mut self, source: usize, target: usize, cost: Cost, label: usize) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(Edge {
            source,
            target,
            cost,
            label,
        });
        self.incoming[target].push(id);
        id
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn incoming(&self, node: usize) -> &[EdgeId] {
        &self.incoming[node]
    }
}

/// Result of [`backward_dijkstra`].
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    /// Cheapest cost from each node to a target; `INFINITE_COST` if none.
    pub distances: Vec<Cost>,
    /// Number of edges on the node's path in the shortest-path tree.
    pub hops: Vec<usize>,
    /// First edge on the node's tree path, `None` for targets and dead ends.
    pub parent_edge: Vec<Option<EdgeId>>,
}

impl ShortestPaths {
    pub fn is_reachable(&self, node: usize) -> bool {
        self.distances[node] != INFINITE_COST
    }

    pub fn distance(&self, node: usize) -> Cost {
        self.distances[node]
    }

    /// Whether `edge` lies on some cheapest path: `cost + d(target) =
    /// d(source)`. Zero-cost edges must also satisfy
    /// `hops(target) < hops(source)`, which rules out zero-cost cycles.
    pub fn is_optimal_edge(&self, edge: &Edge) -> bool {
        if !self.is_reachable(edge.target) || !self.is_reachable(edge.source) {
            return false;
        }
        self.distances[edge.target]
            .checked_add(edge.cost)
            .is_some_and(|d| d == self.distances[edge.source])
            && (edge.cost > 0 || self.hops[edge.target] < self.hops[edge.source])
    }

    /// Follow parent edges from `node` to a target.
    pub fn tree_path(&self, graph: &WeightedGraph, mut node: usize) -> Option<Vec<EdgeId>> {
        if !self.is_reachable(node) {
            return None;
        }
        let mut path = Vec::with_capacity(self.hops[node]);
        while let Some(edge) = self.parent_edge[node] {
            path.push(edge);
            node = graph.edge(edge).target;
        }
        Some(path)
    }
}

/// Dijkstra from the `targets` against edge direction.
///
/// Ties in distance are broken in favour of the node discovered first, and a
/// node's parent is only replaced on a strict improvement, so the result is
/// deterministic for a fixed edge insertion order.
pub fn backward_dijkstra(graph: &WeightedGraph, targets: &[usize]) -> ShortestPaths {
    let n = graph.num_nodes();
    let mut distances = vec![INFINITE_COST; n];
    let mut hops = vec![0usize; n];
    let mut parent_edge: Vec<Option<EdgeId>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut queue: BinaryHeap<Reverse<(Cost, usize, usize)>> = BinaryHeap::new();
    let mut order = 0usize;

    for &target in targets {
        if distances[target] != 0 {
            distances[target] = 0;
            queue.push(Reverse((0, order, target)));
            order += 1;
        }
    }

    while let Some(Reverse((dist, _, node))) = queue.pop() {
        if settled[node] || dist > distances[node] {
            continue;
        }
        settled[node] = true;

        for &edge_id in graph.incoming(node) {
            let edge = graph.edge(edge_id);
            let pred = edge.source;
            if settled[pred] {
                continue;
            }
            let Some(candidate) = dist.checked_add(edge.cost) else {
                continue;
            };
            if candidate < distances[pred] {
                distances[pred] = candidate;
                hops[pred] = hops[node] + 1;
                parent_edge[pred] = Some(edge_id);
                queue.push(Reverse((candidate, order, pred)));
                order += 1;
            }
        }
    }

    ShortestPaths {
        distances,
        hops,
        parent_edge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_to_nearest_target() {
        // 0 -1-> 1 -1-> 3, 0 -5-> 3, 2 isolated
        let mut g = WeightedGraph::new(4);
        g.add_edge(0, 1, 1, 10);
        g.add_edge(1, 3, 1, 11);
        g.add_edge(0, 3, 5, 12);
        let sp = backward_dijkstra(&g, &[3]);
        assert_eq!(sp.distances, vec![2, 1, INFINITE_COST, 0]);
        assert_eq!(sp.hops[0], 2);
        assert!(!sp.is_reachable(2));
        let path = sp.tree_path(&g, 0).unwrap();
        let labels: Vec<_> = path.iter().map(|&e| g.edge(e).label).collect();
        assert_eq!(labels, vec![10, 11]);
        assert!(sp.tree_path(&g, 2).is_none());
        assert!(sp.tree_path(&g, 3).unwrap().is_empty());
    }

    #[test]
    fn multiple_targets_and_zero_costs() {
        let mut g = WeightedGraph::new(4);
        g.add_edge(0, 1, 0, 0);
        g.add_edge(1, 0, 0, 1);
        g.add_edge(1, 2, 0, 2);
        g.add_edge(3, 2, 4, 3);
        let sp = backward_dijkstra(&g, &[2, 2]);
        assert_eq!(sp.distances, vec![0, 0, 0, 4]);
        assert_eq!(sp.hops, vec![2, 1, 0, 1]);
        // Zero-cost cycle 0 <-> 1: only the edge toward the target is optimal.
        assert!(sp.is_optimal_edge(g.edge(0)));
        assert!(!sp.is_optimal_edge(g.edge(1)));
    }

    #[test]
    fn optimal_edges_include_ties() {
        // Two equally cheap routes from 0 to target 3.
        let mut g = WeightedGraph::new(4);
        let a = g.add_edge(0, 1, 1, 0);
        let b = g.add_edge(0, 2, 1, 1);
        g.add_edge(1, 3, 1, 2);
        g.add_edge(2, 3, 1, 3);
        let detour = g.add_edge(0, 3, 3, 4);
        let sp = backward_dijkstra(&g, &[3]);
        assert!(sp.is_optimal_edge(g.edge(a)));
        assert!(sp.is_optimal_edge(g.edge(b)));
        assert!(!sp.is_optimal_edge(g.edge(detour)));
        assert_eq!(sp.parent_edge[0], Some(a));
    }

    #[test]
    fn tied_edge_into_deeper_subtree_is_optimal() {
        // 0 -1-> 1 -2-> 4 (tree path) and 0 -1-> 2 -1-> 3 -1-> 4, both cost 3.
        let mut g = WeightedGraph::new(5);
        let short = g.add_edge(0, 1, 1, 0);
        g.add_edge(1, 4, 2, 1);
        let long = g.add_edge(0, 2, 1, 2);
        g.add_edge(2, 3, 1, 3);
        g.add_edge(3, 4, 1, 4);
        let sp = backward_dijkstra(&g, &[4]);
        assert_eq!(sp.distances, vec![3, 2, 2, 1, 0]);
        assert_eq!(sp.hops[2], sp.hops[0]);
        assert!(sp.is_optimal_edge(g.edge(short)));
        assert!(sp.is_optimal_edge(g.edge(long)));
    }

    #[test]
    fn no_targets_means_everything_unreachable() {
        let mut g = WeightedGraph::new(2);
        g.add_edge(0, 1, 1, 0);
        let sp = backward_dijkstra(&g, &[]);
        assert!(sp.distances.iter().all(|&d| d == INFINITE_COST));
        assert!(!sp.is_optimal_edge(g.edge(0)));
    }
}

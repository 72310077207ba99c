// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::model::{DialogueGraph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeDegree {
    pub in_degree: u64,
    pub out_degree: u64,
}

/// Connected choices leaving and entering each node. Unconnected choices do not count.
pub fn degrees(graph: &DialogueGraph) -> BTreeMap<NodeId, NodeDegree> {
    let mut degrees: BTreeMap<NodeId, NodeDegree> = BTreeMap::new();
    for node_id in graph.nodes().keys() {
        degrees.entry(node_id.clone()).or_default();
    }

    for (node_id, node) in graph.nodes() {
        for target in node.target_node_ids() {
            let from_degree = degrees.entry(node_id.clone()).or_default();
            from_degree.out_degree = from_degree.out_degree.saturating_add(1);

            let to_degree = degrees.entry(target.clone()).or_default();
            to_degree.in_degree = to_degree.in_degree.saturating_add(1);
        }
    }

    degrees
}

/// Nodes no other node leads to, in id order.
pub fn starting_nodes(graph: &DialogueGraph) -> Vec<NodeId> {
    graph
        .nodes()
        .keys()
        .filter(|node_id| graph.is_starting_node(node_id))
        .cloned()
        .collect()
}

/// Nodes whose choices all lead nowhere.
pub fn ending_nodes(graph: &DialogueGraph) -> Vec<NodeId> {
    graph
        .nodes()
        .values()
        .filter(|node| node.target_node_ids().next().is_none())
        .map(|node| node.node_id().clone())
        .collect()
}

fn bfs_reachable<'a>(
    graph: &'a DialogueGraph,
    starts: impl IntoIterator<Item = &'a NodeId>,
) -> BTreeSet<&'a NodeId> {
    let mut visited: BTreeSet<&NodeId> = BTreeSet::new();
    let mut queue: VecDeque<&NodeId> = VecDeque::new();

    for start in starts {
        if graph.node(start).is_some() && visited.insert(start) {
            queue.push_back(start);
        }
    }

    while let Some(node_id) = queue.pop_front() {
        let Some(node) = graph.node(node_id) else {
            continue;
        };
        for next_id in node.target_node_ids() {
            if graph.node(next_id).is_some() && visited.insert(next_id) {
                queue.push_back(next_id);
            }
        }
    }

    visited
}

/// Every node a reader can arrive at from `from_node_id`, including itself.
pub fn reachable(graph: &DialogueGraph, from_node_id: &NodeId) -> Vec<NodeId> {
    let Some((node_id, _)) = graph.nodes().get_key_value(from_node_id) else {
        return Vec::new();
    };
    bfs_reachable(graph, [node_id]).into_iter().cloned().collect()
}

/// Nodes no starting node leads to. These only occur inside cycles nothing enters.
pub fn unreachable(graph: &DialogueGraph) -> Vec<NodeId> {
    let starts = graph.nodes().keys().filter(|node_id| graph.is_starting_node(node_id));
    let visited = bfs_reachable(graph, starts);

    graph
        .nodes()
        .keys()
        .filter(|node_id| !visited.contains(node_id))
        .cloned()
        .collect()
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::group::DialogueGroup;
use super::ids::{GroupId, NodeId};
use super::name::name_key;
use super::node::DialogueNode;

/// The working set of nodes and groups, keyed by id.
///
/// Edges are stored as `NodeId`s on the source node's choices, so cycles are representable
/// without shared ownership. All name-changing mutation goes through `ops::GraphModel`, which
/// keeps the name-integrity bookkeeping in sync; this type only exposes read access publicly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialogueGraph {
    nodes: BTreeMap<NodeId, DialogueNode>,
    groups: BTreeMap<GroupId, DialogueGroup>,
}

impl DialogueGraph {
    pub fn nodes(&self) -> &BTreeMap<NodeId, DialogueNode> {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut BTreeMap<NodeId, DialogueNode> {
        &mut self.nodes
    }

    pub fn groups(&self) -> &BTreeMap<GroupId, DialogueGroup> {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut BTreeMap<GroupId, DialogueGroup> {
        &mut self.groups
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&DialogueNode> {
        self.nodes.get(node_id)
    }

    pub fn group(&self, group_id: &GroupId) -> Option<&DialogueGroup> {
        self.groups.get(group_id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.groups.is_empty()
    }

    /// Nodes currently inside `group_id`, in id order.
    pub fn group_members(&self, group_id: &GroupId) -> Vec<&NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.group_id() == Some(group_id))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// `(source node, choice index)` pairs whose choice targets `node_id`.
    pub fn inbound_choices(&self, node_id: &NodeId) -> Vec<(&NodeId, usize)> {
        let mut inbound = Vec::new();
        for (source_id, source) in &self.nodes {
            for (index, choice) in source.choices().iter().enumerate() {
                if choice.target_node_id() == Some(node_id) {
                    inbound.push((source_id, index));
                }
            }
        }
        inbound
    }

    /// A node is a starting node when no other node's choice targets it.
    pub fn is_starting_node(&self, node_id: &NodeId) -> bool {
        !self.nodes.iter().any(|(source_id, source)| {
            source_id != node_id && source.target_node_ids().any(|target| target == node_id)
        })
    }

    /// Finds a node by display name, case-insensitively, in the given group (or among ungrouped
    /// nodes for `None`). Returns the first match in id order.
    pub fn find_node_by_name(&self, group_id: Option<&GroupId>, name: &str) -> Option<&NodeId> {
        let key = name_key(name);
        self.nodes
            .iter()
            .find(|(_, node)| {
                node.group_id() == group_id && name_key(node.name()) == key
            })
            .map(|(node_id, _)| node_id)
    }

    pub fn find_group_by_name(&self, name: &str) -> Option<&GroupId> {
        let key = name_key(name);
        self.groups
            .iter()
            .find(|(_, group)| name_key(group.name()) == key)
            .map(|(group_id, _)| group_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::fixtures::{branching_graph, oid};

    #[test]
    fn starting_node_has_no_inbound_choices_from_other_nodes() {
        let graph = branching_graph();

        assert!(graph.is_starting_node(&oid("n:start")));
        assert!(!graph.is_starting_node(&oid("n:left")));
        assert!(!graph.is_starting_node(&oid("n:end")));
    }

    #[test]
    fn inbound_choices_list_every_source_slot() {
        let graph = branching_graph();

        let inbound = graph.inbound_choices(&oid("n:end"));
        let sources = inbound
            .iter()
            .map(|(node_id, index)| (node_id.as_str().to_owned(), *index))
            .collect::<Vec<_>>();
        assert_eq!(sources, vec![("n:left".to_owned(), 0), ("n:right".to_owned(), 0)]);
    }

    #[test]
    fn find_node_by_name_is_case_insensitive_and_scoped() {
        let graph = branching_graph();

        assert_eq!(graph.find_node_by_name(None, "START"), Some(&oid("n:start")));
        assert_eq!(graph.find_node_by_name(None, "left"), None);

        let group_id = graph.find_group_by_name("forest").expect("group").clone();
        assert_eq!(graph.find_node_by_name(Some(&group_id), "left"), Some(&oid("n:left")));
    }
}

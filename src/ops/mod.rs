// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for dialogue graphs.
//!
//! [`GraphModel`] owns the graph together with its name-integrity bookkeeping. Every operation
//! that adds, removes, renames or regroups an element performs the matching
//! register/deregister calls, at most once per name change, so the error counter only ever moves
//! one step at a time.

use std::fmt;

use tracing::debug;

use crate::integrity::{EntityKey, NameIntegrityTracker, NameScope};
use crate::model::{
    sanitize_name, Choice, DialogueGraph, DialogueGroup, DialogueKind, DialogueNode, GroupId,
    NodeId, Position, DEFAULT_GROUP_NAME, DEFAULT_NODE_NAME,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    NodeNotFound { node_id: NodeId },
    GroupNotFound { group_id: GroupId },
    ChoiceOutOfRange { node_id: NodeId, choice_index: usize, choice_count: usize },
    SelfConnection { node_id: NodeId },
    ChoiceCountFixed { node_id: NodeId, kind: DialogueKind },
    LastChoice { node_id: NodeId },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::GroupNotFound { group_id } => write!(f, "group not found (id={group_id})"),
            Self::ChoiceOutOfRange { node_id, choice_index, choice_count } => write!(
                f,
                "choice index {choice_index} out of range for node {node_id} \
                 ({choice_count} choices)"
            ),
            Self::SelfConnection { node_id } => {
                write!(f, "a choice cannot lead back to its own node (id={node_id})")
            }
            Self::ChoiceCountFixed { node_id, kind } => {
                write!(f, "choices of {kind} node {node_id} cannot be added or removed")
            }
            Self::LastChoice { node_id } => {
                write!(f, "node {node_id} must keep at least one choice")
            }
        }
    }
}

impl std::error::Error for EditError {}

/// The editable graph plus its duplicate-name tracker.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    graph: DialogueGraph,
    names: NameIntegrityTracker,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts an already-assembled graph and registers every group and node name as if each had
    /// just been authored. Groups are registered first, then nodes in their current scope.
    pub(crate) fn from_graph(graph: DialogueGraph) -> Self {
        let mut model = Self {
            graph,
            names: NameIntegrityTracker::new(),
        };

        let groups = model
            .graph
            .groups()
            .values()
            .map(|group| (group.group_id().clone(), group.name().to_owned()))
            .collect::<Vec<_>>();
        for (group_id, name) in groups {
            model.names.register(&NameScope::Groups, &EntityKey::Group(group_id), &name);
        }

        let nodes = model
            .graph
            .nodes()
            .values()
            .map(|node| (node.node_id().clone(), node_scope(node), node.name().to_owned()))
            .collect::<Vec<_>>();
        for (node_id, scope, name) in nodes {
            model.names.register(&scope, &EntityKey::Node(node_id), &name);
        }

        model
    }

    pub fn graph(&self) -> &DialogueGraph {
        &self.graph
    }

    pub fn names(&self) -> &NameIntegrityTracker {
        &self.names
    }

    pub fn name_errors(&self) -> usize {
        self.names.error_count()
    }

    pub fn save_allowed(&self) -> bool {
        self.names.save_allowed()
    }

    pub fn node(&self, node_id: &NodeId) -> Result<&DialogueNode, EditError> {
        self.graph
            .node(node_id)
            .ok_or_else(|| EditError::NodeNotFound { node_id: node_id.clone() })
    }

    pub fn group(&self, group_id: &GroupId) -> Result<&DialogueGroup, EditError> {
        self.graph
            .group(group_id)
            .ok_or_else(|| EditError::GroupNotFound { group_id: group_id.clone() })
    }

    /// Creates an ungrouped node with a fresh id and the kind's default choices. An empty `name`
    /// falls back to [`DEFAULT_NODE_NAME`].
    pub fn add_node(&mut self, kind: DialogueKind, name: &str, position: Position) -> NodeId {
        let node_id = NodeId::generate();
        let name = sanitize_name(or_default(name, DEFAULT_NODE_NAME));
        let node = DialogueNode::new(node_id.clone(), kind, name, position);
        self.names.register(
            &NameScope::UngroupedNodes,
            &EntityKey::Node(node_id.clone()),
            node.name(),
        );
        self.graph.nodes_mut().insert(node_id.clone(), node);
        node_id
    }

    /// Creates an empty group; an empty `name` falls back to [`DEFAULT_GROUP_NAME`].
    pub fn add_group(&mut self, name: &str, position: Position) -> GroupId {
        let group_id = GroupId::generate();
        let name = sanitize_name(or_default(name, DEFAULT_GROUP_NAME));
        let group = DialogueGroup::new(group_id.clone(), name, position);
        self.names.register(&NameScope::Groups, &EntityKey::Group(group_id.clone()), group.name());
        self.graph.groups_mut().insert(group_id.clone(), group);
        group_id
    }

    /// Creates a group and moves `members` into it, one node at a time.
    pub fn add_group_with_members(
        &mut self,
        name: &str,
        position: Position,
        members: &[NodeId],
    ) -> Result<GroupId, EditError> {
        if let Some(missing) = members.iter().find(|node_id| self.graph.node(node_id).is_none()) {
            return Err(EditError::NodeNotFound { node_id: missing.clone() });
        }

        let group_id = self.add_group(name, position);
        for node_id in members {
            self.set_node_group(node_id, Some(&group_id))?;
        }
        Ok(group_id)
    }

    /// Moves a node into `group_id`, or out of any group for `None`.
    ///
    /// The old scope is deregistered before the new one is registered.
    pub fn set_node_group(
        &mut self,
        node_id: &NodeId,
        group_id: Option<&GroupId>,
    ) -> Result<(), EditError> {
        if let Some(group_id) = group_id {
            self.group(group_id)?;
        }

        let node = self
            .graph
            .nodes_mut()
            .get_mut(node_id)
            .ok_or_else(|| EditError::NodeNotFound { node_id: node_id.clone() })?;
        if node.group_id() == group_id {
            return Ok(());
        }

        let entity = EntityKey::Node(node_id.clone());
        let old_scope = node_scope(node);
        self.names.deregister(&old_scope, &entity, node.name());
        node.set_group_id(group_id.cloned());
        self.names.register(&node_scope(node), &entity, node.name());
        Ok(())
    }

    /// Renames a node and returns the sanitized name that was applied.
    pub fn rename_node(&mut self, node_id: &NodeId, new_name: &str) -> Result<String, EditError> {
        let new_name = sanitize_name(new_name);
        let node = self
            .graph
            .nodes_mut()
            .get_mut(node_id)
            .ok_or_else(|| EditError::NodeNotFound { node_id: node_id.clone() })?;
        if node.name() == new_name {
            return Ok(new_name);
        }

        let entity = EntityKey::Node(node_id.clone());
        let scope = node_scope(node);
        self.names.deregister(&scope, &entity, node.name());
        node.set_name(new_name.clone());
        self.names.register(&scope, &entity, &new_name);
        Ok(new_name)
    }

    /// Renames a group and returns the sanitized name that was applied. Member nodes keep their
    /// scope, which is keyed by group id.
    pub fn rename_group(
        &mut self,
        group_id: &GroupId,
        new_name: &str,
    ) -> Result<String, EditError> {
        let new_name = sanitize_name(new_name);
        let group = self
            .graph
            .groups_mut()
            .get_mut(group_id)
            .ok_or_else(|| EditError::GroupNotFound { group_id: group_id.clone() })?;
        if group.name() == new_name {
            return Ok(new_name);
        }

        let entity = EntityKey::Group(group_id.clone());
        self.names.deregister(&NameScope::Groups, &entity, group.name());
        group.set_name(new_name.clone());
        self.names.register(&NameScope::Groups, &entity, &new_name);
        Ok(new_name)
    }

    /// Points choice `choice_index` of `source` at `target`, replacing any previous target.
    pub fn connect(
        &mut self,
        source: &NodeId,
        choice_index: usize,
        target: &NodeId,
    ) -> Result<(), EditError> {
        self.node(target)?;
        if source == target {
            return Err(EditError::SelfConnection { node_id: source.clone() });
        }

        let choice = self.choice_mut(source, choice_index)?;
        choice.set_target_node_id(Some(target.clone()));
        Ok(())
    }

    /// Clears the target of a choice and returns the node it used to lead to.
    pub fn disconnect(
        &mut self,
        source: &NodeId,
        choice_index: usize,
    ) -> Result<Option<NodeId>, EditError> {
        let choice = self.choice_mut(source, choice_index)?;
        let previous = choice.target_node_id().cloned();
        choice.set_target_node_id(None);
        Ok(previous)
    }

    /// Deletes a node: every choice leading to it is disconnected, its own choices go with it,
    /// and its name leaves whichever scope it was registered in.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Result<DialogueNode, EditError> {
        self.node(node_id)?;

        let inbound = self
            .graph
            .inbound_choices(node_id)
            .into_iter()
            .map(|(source, choice_index)| (source.clone(), choice_index))
            .collect::<Vec<_>>();
        for (source, choice_index) in &inbound {
            self.disconnect(source, *choice_index)?;
        }

        let node = self
            .graph
            .nodes_mut()
            .remove(node_id)
            .ok_or_else(|| EditError::NodeNotFound { node_id: node_id.clone() })?;
        self.names.deregister(&node_scope(&node), &EntityKey::Node(node_id.clone()), node.name());

        debug!(node_id = %node_id, severed = inbound.len(), "node removed");
        Ok(node)
    }

    /// Deletes a group after moving each of its members back to the ungrouped scope.
    pub fn remove_group(&mut self, group_id: &GroupId) -> Result<DialogueGroup, EditError> {
        self.group(group_id)?;

        let members = self.graph.group_members(group_id).into_iter().cloned().collect::<Vec<_>>();
        for node_id in &members {
            self.set_node_group(node_id, None)?;
        }

        let group = self
            .graph
            .groups_mut()
            .remove(group_id)
            .ok_or_else(|| EditError::GroupNotFound { group_id: group_id.clone() })?;
        let entity = EntityKey::Group(group_id.clone());
        self.names.deregister(&NameScope::Groups, &entity, group.name());

        debug!(group_id = %group_id, ungrouped = members.len(), "group removed");
        Ok(group)
    }

    /// `true` when the node exists and no other node's choice leads to it.
    pub fn is_starting_node(&self, node_id: &NodeId) -> bool {
        self.graph.node(node_id).is_some() && self.graph.is_starting_node(node_id)
    }

    pub fn set_node_text(&mut self, node_id: &NodeId, text: &str) -> Result<(), EditError> {
        self.node_mut(node_id)?.set_text(text);
        Ok(())
    }

    pub fn move_node(&mut self, node_id: &NodeId, position: Position) -> Result<(), EditError> {
        self.node_mut(node_id)?.set_position(position);
        Ok(())
    }

    pub fn move_group(&mut self, group_id: &GroupId, position: Position) -> Result<(), EditError> {
        self.graph
            .groups_mut()
            .get_mut(group_id)
            .ok_or_else(|| EditError::GroupNotFound { group_id: group_id.clone() })?
            .set_position(position);
        Ok(())
    }

    /// Appends an unconnected choice to a `Multiple` node and returns its index.
    pub fn add_choice(&mut self, node_id: &NodeId, text: &str) -> Result<usize, EditError> {
        let node = self.node_mut(node_id)?;
        if node.kind() == DialogueKind::Single {
            return Err(EditError::ChoiceCountFixed { node_id: node_id.clone(), kind: node.kind() });
        }

        node.choices_mut().push(Choice::new(text));
        Ok(node.choices().len() - 1)
    }

    /// Removes a choice (and the edge leaving through it) from a `Multiple` node.
    pub fn remove_choice(
        &mut self,
        node_id: &NodeId,
        choice_index: usize,
    ) -> Result<Choice, EditError> {
        let node = self.node_mut(node_id)?;
        if node.kind() == DialogueKind::Single {
            return Err(EditError::ChoiceCountFixed { node_id: node_id.clone(), kind: node.kind() });
        }

        let choice_count = node.choices().len();
        if choice_index >= choice_count {
            return Err(EditError::ChoiceOutOfRange {
                node_id: node_id.clone(),
                choice_index,
                choice_count,
            });
        }
        if choice_count == 1 {
            return Err(EditError::LastChoice { node_id: node_id.clone() });
        }

        Ok(node.choices_mut().remove(choice_index))
    }

    pub fn set_choice_text(
        &mut self,
        node_id: &NodeId,
        choice_index: usize,
        text: &str,
    ) -> Result<(), EditError> {
        self.choice_mut(node_id, choice_index)?.set_text(text);
        Ok(())
    }

    /// Removes every element and all name bookkeeping; the error counter returns to zero.
    pub fn clear(&mut self) {
        self.graph = DialogueGraph::default();
        self.names.clear();
    }

    fn node_mut(&mut self, node_id: &NodeId) -> Result<&mut DialogueNode, EditError> {
        self.graph
            .nodes_mut()
            .get_mut(node_id)
            .ok_or_else(|| EditError::NodeNotFound { node_id: node_id.clone() })
    }

    fn choice_mut(
        &mut self,
        node_id: &NodeId,
        choice_index: usize,
    ) -> Result<&mut Choice, EditError> {
        let node = self.node_mut(node_id)?;
        let choice_count = node.choices().len();
        node.choices_mut().get_mut(choice_index).ok_or_else(|| EditError::ChoiceOutOfRange {
            node_id: node_id.clone(),
            choice_index,
            choice_count,
        })
    }
}

fn or_default<'a>(name: &'a str, default: &'a str) -> &'a str {
    if name.is_empty() {
        default
    } else {
        name
    }
}

fn node_scope(node: &DialogueNode) -> NameScope {
    match node.group_id() {
        Some(group_id) => NameScope::GroupNodes(group_id.clone()),
        None => NameScope::UngroupedNodes,
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editable on-disk form of a dialogue graph.
//!
//! A snapshot keeps raw ids everywhere (choice targets are id strings), plus the name sets of
//! the save that produced it so the next save can tell which compiled artifacts became stale.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::model::{
    sanitize_name, Choice, DialogueGraph, DialogueGroup, DialogueKind, DialogueNode, GroupId, Id,
    NodeId, Position,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub file_name: String,
    #[serde(default)]
    pub groups: Vec<GroupSnapshot>,
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
    #[serde(default)]
    pub old_group_names: BTreeSet<String>,
    #[serde(default)]
    pub old_ungrouped_node_names: BTreeSet<String>,
    /// Grouped node names keyed by group name; every group has an entry, even when empty.
    #[serde(default)]
    pub old_grouped_node_names: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: PositionJson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub name: String,
    pub text: String,
    pub kind: DialogueKindJson,
    pub choices: Vec<ChoiceSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub position: PositionJson,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSnapshot {
    pub text: String,
    /// Empty when the choice leads nowhere.
    #[serde(default)]
    pub target_node_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionJson {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueKindJson {
    Single,
    Multiple,
}

impl From<DialogueKind> for DialogueKindJson {
    fn from(kind: DialogueKind) -> Self {
        match kind {
            DialogueKind::Single => Self::Single,
            DialogueKind::Multiple => Self::Multiple,
        }
    }
}

impl From<DialogueKindJson> for DialogueKind {
    fn from(kind: DialogueKindJson) -> Self {
        match kind {
            DialogueKindJson::Single => Self::Single,
            DialogueKindJson::Multiple => Self::Multiple,
        }
    }
}

impl From<Position> for PositionJson {
    fn from(position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

impl From<PositionJson> for Position {
    fn from(position: PositionJson) -> Self {
        Position::new(position.x, position.y)
    }
}

impl GraphSnapshot {
    /// Captures `graph` under `file_name`. Groups and nodes are emitted in id order, so the
    /// serialized bytes only change when the graph does.
    pub fn from_graph(file_name: &str, graph: &DialogueGraph) -> Self {
        let groups = graph
            .groups()
            .values()
            .map(|group| GroupSnapshot {
                id: group.group_id().to_string(),
                name: group.name().to_owned(),
                position: group.position().into(),
            })
            .collect::<Vec<_>>();

        let nodes = graph
            .nodes()
            .values()
            .map(|node| NodeSnapshot {
                id: node.node_id().to_string(),
                name: node.name().to_owned(),
                text: node.text().to_owned(),
                kind: node.kind().into(),
                choices: node
                    .choices()
                    .iter()
                    .map(|choice| ChoiceSnapshot {
                        text: choice.text().to_owned(),
                        target_node_id: choice
                            .target_node_id()
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                    })
                    .collect(),
                group_id: node.group_id().map(ToString::to_string),
                position: node.position().into(),
            })
            .collect::<Vec<_>>();

        let old_group_names = graph
            .groups()
            .values()
            .map(|group| group.name().to_owned())
            .collect::<BTreeSet<_>>();

        let mut old_ungrouped_node_names = BTreeSet::new();
        let mut old_grouped_node_names = graph
            .groups()
            .values()
            .map(|group| (group.name().to_owned(), BTreeSet::new()))
            .collect::<BTreeMap<_, _>>();
        for node in graph.nodes().values() {
            match node.group_id().and_then(|group_id| graph.group(group_id)) {
                Some(group) => {
                    old_grouped_node_names
                        .entry(group.name().to_owned())
                        .or_default()
                        .insert(node.name().to_owned());
                }
                None => {
                    old_ungrouped_node_names.insert(node.name().to_owned());
                }
            }
        }

        Self {
            file_name: file_name.to_owned(),
            groups,
            nodes,
            old_group_names,
            old_ungrouped_node_names,
            old_grouped_node_names,
        }
    }

    /// Rebuilds the graph in two passes: every group and node is created with its stored id
    /// first, then choice targets are resolved against the complete id set.
    ///
    /// Nothing is returned unless every reference resolves.
    pub fn into_graph(self) -> Result<DialogueGraph, StoreError> {
        let mut graph = DialogueGraph::default();

        for group in self.groups {
            let group_id: GroupId = parse_id("groups[].id", &group.id)?;
            if graph.groups().contains_key(&group_id) {
                return Err(StoreError::DuplicateId {
                    field: "groups[].id",
                    value: group.id,
                });
            }
            check_stored_name("groups[].name", &group.name)?;
            let position = Position::from(group.position);
            let dialogue_group = DialogueGroup::new(group_id.clone(), group.name, position);
            graph.groups_mut().insert(group_id, dialogue_group);
        }

        let mut unresolved = Vec::<(NodeId, Vec<String>)>::with_capacity(self.nodes.len());
        for node in self.nodes {
            let node_id: NodeId = parse_id("nodes[].id", &node.id)?;
            if graph.nodes().contains_key(&node_id) {
                return Err(StoreError::DuplicateId {
                    field: "nodes[].id",
                    value: node.id,
                });
            }
            check_stored_name("nodes[].name", &node.name)?;

            let kind = DialogueKind::from(node.kind);
            if !kind.accepts_choice_count(node.choices.len()) {
                return Err(StoreError::InvalidChoiceCount {
                    node_id,
                    kind,
                    count: node.choices.len(),
                });
            }

            let group_id = match node.group_id.as_deref().filter(|raw| !raw.is_empty()) {
                Some(raw) => {
                    let group_id: GroupId = parse_id("nodes[].group_id", raw)?;
                    if graph.group(&group_id).is_none() {
                        return Err(StoreError::DanglingGroup { node_id, group_id });
                    }
                    Some(group_id)
                }
                None => None,
            };

            let mut dialogue_node =
                DialogueNode::new(node_id.clone(), kind, node.name, node.position.into());
            dialogue_node.set_text(node.text);
            dialogue_node.set_group_id(group_id);

            let mut targets = Vec::with_capacity(node.choices.len());
            *dialogue_node.choices_mut() = node
                .choices
                .into_iter()
                .map(|choice| {
                    targets.push(choice.target_node_id);
                    Choice::new(choice.text)
                })
                .collect();

            graph.nodes_mut().insert(node_id.clone(), dialogue_node);
            unresolved.push((node_id, targets));
        }

        for (node_id, targets) in unresolved {
            for (choice_index, raw) in targets.into_iter().enumerate() {
                if raw.is_empty() {
                    continue;
                }
                let target_node_id: NodeId =
                    parse_id("nodes[].choices[].target_node_id", &raw)?;
                if !graph.nodes().contains_key(&target_node_id) {
                    return Err(StoreError::DanglingReference {
                        node_id,
                        choice_index,
                        target_node_id,
                    });
                }

                let choice = graph
                    .nodes_mut()
                    .get_mut(&node_id)
                    .and_then(|node| node.choices_mut().get_mut(choice_index));
                if let Some(choice) = choice {
                    choice.set_target_node_id(Some(target_node_id));
                }
            }
        }

        Ok(graph)
    }
}

fn parse_id<T>(field: &'static str, raw: &str) -> Result<Id<T>, StoreError> {
    Id::new(raw).map_err(|source| StoreError::InvalidId {
        field,
        value: raw.to_owned(),
        source: Box::new(source),
    })
}

/// Stored names must already be in sanitized form; blank names load and count as name errors.
fn check_stored_name(field: &'static str, name: &str) -> Result<(), StoreError> {
    if sanitize_name(name) != name {
        return Err(StoreError::InvalidName {
            field,
            value: name.to_owned(),
        });
    }
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The resolved, runtime-facing form of a dialogue graph.
//!
//! One [`DialogueRecord`] per node, addressed by [`RecordRef`] (group name or ungrouped, plus
//! dialogue name). Choices point at records directly instead of carrying node ids.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use super::StoreError;
use crate::model::{name_key, sanitize_name, DialogueGraph, DialogueKind, NodeId};

/// Location of a compiled dialogue record inside an asset tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordRef {
    group: Option<String>,
    name: String,
}

impl RecordRef {
    pub fn ungrouped(name: impl Into<String>) -> Self {
        Self {
            group: None,
            name: name.into(),
        }
    }

    pub fn grouped(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            name: name.into(),
        }
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{group}/{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledChoice {
    pub text: String,
    pub next_dialogue: Option<RecordRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueRecord {
    pub name: String,
    pub text: String,
    pub kind: DialogueKind,
    pub choices: Vec<CompiledChoice>,
    pub is_starting_dialogue: bool,
}

/// Index of everything compiled for one file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueContainer {
    pub file_name: String,
    pub group_names: BTreeSet<String>,
    pub ungrouped_dialogues: BTreeSet<String>,
    pub grouped_dialogues: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledAsset {
    container: DialogueContainer,
    records: BTreeMap<RecordRef, DialogueRecord>,
}

impl CompiledAsset {
    /// Compiles `graph`: records are built first, then every connected choice is resolved
    /// through the node id of its target.
    ///
    /// Two records may not share a location (compared case-insensitively, as file names are);
    /// blank names are rejected.
    pub fn compile(file_name: &str, graph: &DialogueGraph) -> Result<Self, StoreError> {
        let mut asset = Self {
            container: DialogueContainer {
                file_name: file_name.to_owned(),
                ..DialogueContainer::default()
            },
            records: BTreeMap::new(),
        };

        let mut group_keys = BTreeSet::new();
        for group in graph.groups().values() {
            if group.name().is_empty() {
                return Err(StoreError::InvalidName {
                    field: "group name",
                    value: group.group_id().to_string(),
                });
            }
            if sanitize_name(group.name()) != group.name() {
                return Err(StoreError::InvalidName {
                    field: "group name",
                    value: group.name().to_owned(),
                });
            }
            if !group_keys.insert(name_key(group.name())) {
                return Err(StoreError::DuplicateName {
                    group: None,
                    name: group.name().to_owned(),
                });
            }
            asset.container.group_names.insert(group.name().to_owned());
            asset.container.grouped_dialogues.entry(group.name().to_owned()).or_default();
        }

        let mut locations = HashMap::<&NodeId, RecordRef>::with_capacity(graph.nodes().len());
        let mut location_keys = BTreeSet::new();
        for node in graph.nodes().values() {
            if node.name().is_empty() {
                return Err(StoreError::InvalidName {
                    field: "dialogue name",
                    value: node.node_id().to_string(),
                });
            }
            if sanitize_name(node.name()) != node.name() {
                return Err(StoreError::InvalidName {
                    field: "dialogue name",
                    value: node.name().to_owned(),
                });
            }

            let group_name = node
                .group_id()
                .and_then(|group_id| graph.group(group_id))
                .map(|group| group.name().to_owned());
            let record_ref = match group_name {
                Some(group_name) => {
                    asset
                        .container
                        .grouped_dialogues
                        .entry(group_name.clone())
                        .or_default()
                        .insert(node.name().to_owned());
                    RecordRef::grouped(group_name, node.name())
                }
                None => {
                    asset.container.ungrouped_dialogues.insert(node.name().to_owned());
                    RecordRef::ungrouped(node.name())
                }
            };

            let location_key = (record_ref.group().map(name_key), name_key(record_ref.name()));
            if !location_keys.insert(location_key) {
                return Err(StoreError::DuplicateName {
                    group: record_ref.group().map(ToOwned::to_owned),
                    name: record_ref.name().to_owned(),
                });
            }

            asset.records.insert(
                record_ref.clone(),
                DialogueRecord {
                    name: node.name().to_owned(),
                    text: node.text().to_owned(),
                    kind: node.kind(),
                    choices: node
                        .choices()
                        .iter()
                        .map(|choice| CompiledChoice {
                            text: choice.text().to_owned(),
                            next_dialogue: None,
                        })
                        .collect(),
                    is_starting_dialogue: graph.is_starting_node(node.node_id()),
                },
            );
            locations.insert(node.node_id(), record_ref);
        }

        for node in graph.nodes().values() {
            let Some(record) = locations
                .get(node.node_id())
                .and_then(|record_ref| asset.records.get_mut(record_ref))
            else {
                continue;
            };
            for (compiled, choice) in record.choices.iter_mut().zip(node.choices()) {
                compiled.next_dialogue = choice
                    .target_node_id()
                    .and_then(|target| locations.get(target))
                    .cloned();
            }
        }

        Ok(asset)
    }

    pub(crate) fn from_parts(
        container: DialogueContainer,
        records: BTreeMap<RecordRef, DialogueRecord>,
    ) -> Self {
        Self { container, records }
    }

    pub fn container(&self) -> &DialogueContainer {
        &self.container
    }

    pub fn records(&self) -> &BTreeMap<RecordRef, DialogueRecord> {
        &self.records
    }

    pub fn record(&self, record_ref: &RecordRef) -> Option<&DialogueRecord> {
        self.records.get(record_ref)
    }

    /// Follows choice `choice_index` of the record at `from`.
    pub fn next(
        &self,
        from: &RecordRef,
        choice_index: usize,
    ) -> Option<(&RecordRef, &DialogueRecord)> {
        let next = self
            .records
            .get(from)?
            .choices
            .get(choice_index)?
            .next_dialogue
            .as_ref()?;
        self.records.get_key_value(next)
    }
}

#[cfg(test)]
mod tests {
    use super::{CompiledAsset, RecordRef};
    use crate::model::fixtures::{branching_graph, cyclic_graph, oid};
    use crate::model::{DialogueKind, DialogueNode, Position};
    use crate::store::StoreError;

    #[test]
    fn compile_resolves_choices_to_record_locations() {
        let asset = CompiledAsset::compile("Demo", &branching_graph()).unwrap();

        let start = asset.record(&RecordRef::ungrouped("Start")).unwrap();
        assert!(start.is_starting_dialogue);
        assert_eq!(start.choices[0].next_dialogue, Some(RecordRef::grouped("Forest", "Left")));
        assert_eq!(start.choices[1].next_dialogue, Some(RecordRef::ungrouped("Right")));

        let (end_ref, end) = asset.next(&RecordRef::grouped("Forest", "Left"), 0).unwrap();
        assert_eq!(end_ref, &RecordRef::ungrouped("End"));
        assert!(!end.is_starting_dialogue);
        assert_eq!(end.choices[0].next_dialogue, None);
        assert!(asset.next(&RecordRef::ungrouped("End"), 0).is_none());
    }

    #[test]
    fn container_lists_groups_and_dialogues() {
        let asset = CompiledAsset::compile("Demo", &branching_graph()).unwrap();
        let container = asset.container();

        assert_eq!(container.file_name, "Demo");
        assert_eq!(container.group_names.iter().collect::<Vec<_>>(), ["Forest"]);
        assert_eq!(
            container.ungrouped_dialogues.iter().collect::<Vec<_>>(),
            ["End", "Right", "Start"]
        );
        assert_eq!(container.grouped_dialogues["Forest"].iter().collect::<Vec<_>>(), ["Left"]);
    }

    #[test]
    fn cycles_compile() {
        let asset = CompiledAsset::compile("Loop", &cyclic_graph()).unwrap();

        let (pong_ref, _) = asset.next(&RecordRef::ungrouped("Ping"), 0).unwrap();
        let (ping_ref, _) = asset.next(pong_ref, 0).unwrap();
        assert_eq!(ping_ref, &RecordRef::ungrouped("Ping"));
        assert!(asset.records().values().all(|record| !record.is_starting_dialogue));
    }

    #[test]
    fn colliding_locations_are_rejected() {
        let mut graph = branching_graph();
        graph.nodes_mut().insert(
            oid("n:other-end"),
            DialogueNode::new(oid("n:other-end"), DialogueKind::Single, "END", Position::default()),
        );

        match CompiledAsset::compile("Demo", &graph).unwrap_err() {
            StoreError::DuplicateName { group, name } => {
                assert_eq!(group, None);
                assert!(name.eq_ignore_ascii_case("end"));
            }
            other => panic!("expected DuplicateName, got: {other:?}"),
        }
    }

    #[test]
    fn unsanitized_names_are_not_compiled() {
        let mut graph = branching_graph();
        graph.nodes_mut().get_mut(&oid("n:right")).unwrap().set_name("Two Words".to_owned());

        match CompiledAsset::compile("Demo", &graph).unwrap_err() {
            StoreError::InvalidName { field, value } => {
                assert_eq!(field, "dialogue name");
                assert_eq!(value, "Two Words");
            }
            other => panic!("expected InvalidName, got: {other:?}"),
        }
    }
}

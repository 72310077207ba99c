// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use dialogue_graph::model::{DialogueGraph, DialogueKind, NodeId, Position};
use dialogue_graph::ops::GraphModel;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("dialogue_graph_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn checksum_graph(graph: &DialogueGraph) -> u64 {
    let mut acc = 0u64;
    for (node_id, node) in graph.nodes() {
        acc = acc.wrapping_mul(131).wrapping_add(node_id.as_str().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.name().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.choices().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.target_node_ids().count() as u64);
    }
    for group in graph.groups().values() {
        acc = acc.wrapping_mul(131).wrapping_add(group.name().len() as u64);
    }
    acc
}

pub mod graph {
    use super::{DialogueKind, GraphModel, NodeId, Position};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        Medium,
        Large,
    }

    impl Case {
        fn shape(self) -> (usize, usize) {
            match self {
                Self::Small => (2, 10),
                Self::Medium => (8, 25),
                Self::Large => (20, 50),
            }
        }
    }

    /// `groups` groups of `per_group` nodes each plus as many ungrouped nodes. Every third node
    /// is a `Multiple` node with a second choice jumping ahead; the last node loops back to the
    /// first.
    pub fn fixture(case: Case) -> GraphModel {
        let (groups, per_group) = case.shape();
        let mut model = GraphModel::new();
        let mut node_ids: Vec<NodeId> = Vec::with_capacity((groups + 1) * per_group);

        for group_index in 0..=groups {
            let members = (0..per_group)
                .map(|node_index| {
                    let i = group_index * per_group + node_index;
                    let kind = if i % 3 == 0 {
                        DialogueKind::Multiple
                    } else {
                        DialogueKind::Single
                    };
                    let node_id = model.add_node(
                        kind,
                        &format!("Line{node_index}"),
                        Position::new(node_index as f64 * 240.0, group_index as f64 * 180.0),
                    );
                    model
                        .set_node_text(&node_id, &format!("Dialogue line number {i}."))
                        .expect("set text");
                    node_id
                })
                .collect::<Vec<_>>();

            if group_index < groups {
                model
                    .add_group_with_members(
                        &format!("Scene{group_index}"),
                        Position::new(-40.0, group_index as f64 * 180.0 - 40.0),
                        &members,
                    )
                    .expect("group members");
            }
            node_ids.extend(members);
        }

        let count = node_ids.len();
        for (i, node_id) in node_ids.iter().enumerate() {
            model.connect(node_id, 0, &node_ids[(i + 1) % count]).expect("connect next");
            if i % 3 == 0 {
                let jump = model.add_choice(node_id, "Skip ahead").expect("add choice");
                model.connect(node_id, jump, &node_ids[(i + 7) % count]).expect("connect jump");
            }
        }

        assert_eq!(model.name_errors(), 0, "fixture names must be unique per scope");
        model
    }
}

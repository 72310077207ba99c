// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::graph::DialogueGraph;
use super::group::DialogueGroup;
use super::ids::{GroupId, NodeId};
use super::node::{Choice, DialogueKind, DialogueNode, Position};

pub(crate) fn oid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn gid(value: &str) -> GroupId {
    GroupId::new(value).expect("group id")
}

fn node(node_id: &str, kind: DialogueKind, name: &str, x: f64) -> DialogueNode {
    DialogueNode::new(oid(node_id), kind, name, Position::new(x, 0.0))
}

fn connect(graph: &mut DialogueGraph, from: &str, choice_index: usize, to: &str) {
    let source = graph.nodes_mut().get_mut(&oid(from)).expect("source node");
    source.choices_mut()[choice_index].set_target_node_id(Some(oid(to)));
}

/// `Start` branches to `Left` (inside group `Forest`) and `Right`; both lead to `End`.
pub(crate) fn branching_graph() -> DialogueGraph {
    let mut graph = DialogueGraph::default();

    let forest = gid("g:forest");
    graph.groups_mut().insert(
        forest.clone(),
        DialogueGroup::new(forest.clone(), "Forest", Position::new(0.0, 200.0)),
    );

    let mut start = node("n:start", DialogueKind::Multiple, "Start", 0.0);
    start.set_text("Which way?");
    start.choices_mut()[0].set_text("Go left");
    start.choices_mut().push(Choice::new("Go right"));
    graph.nodes_mut().insert(oid("n:start"), start);

    let mut left = node("n:left", DialogueKind::Single, "Left", 100.0);
    left.set_group_id(Some(forest));
    graph.nodes_mut().insert(oid("n:left"), left);

    graph
        .nodes_mut()
        .insert(oid("n:right"), node("n:right", DialogueKind::Single, "Right", 200.0));
    graph
        .nodes_mut()
        .insert(oid("n:end"), node("n:end", DialogueKind::Single, "End", 300.0));

    connect(&mut graph, "n:start", 0, "n:left");
    connect(&mut graph, "n:start", 1, "n:right");
    connect(&mut graph, "n:left", 0, "n:end");
    connect(&mut graph, "n:right", 0, "n:end");

    graph
}

/// Two nodes pointing at each other: `Ping` -> `Pong` -> `Ping`.
pub(crate) fn cyclic_graph() -> DialogueGraph {
    let mut graph = DialogueGraph::default();

    graph
        .nodes_mut()
        .insert(oid("n:ping"), node("n:ping", DialogueKind::Single, "Ping", 0.0));
    graph
        .nodes_mut()
        .insert(oid("n:pong"), node("n:pong", DialogueKind::Single, "Pong", 100.0));

    connect(&mut graph, "n:ping", 0, "n:pong");
    connect(&mut graph, "n:pong", 0, "n:ping");

    graph
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::ids::{GroupId, NodeId};

pub const DEFAULT_NODE_NAME: &str = "DialogueName";
pub const DEFAULT_NODE_TEXT: &str = "Dialogue text.";
pub const DEFAULT_SINGLE_CHOICE_TEXT: &str = "Next Dialogue";
pub const DEFAULT_MULTIPLE_CHOICE_TEXT: &str = "New Choice";

/// Canvas position of a node or group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How many outbound choices a node carries.
///
/// `Single` nodes always have exactly one choice; `Multiple` nodes have one or more and the
/// author can add or remove choices (never below one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueKind {
    Single,
    Multiple,
}

impl DialogueKind {
    pub fn default_choice_text(self) -> &'static str {
        match self {
            Self::Single => DEFAULT_SINGLE_CHOICE_TEXT,
            Self::Multiple => DEFAULT_MULTIPLE_CHOICE_TEXT,
        }
    }

    pub fn accepts_choice_count(self, count: usize) -> bool {
        match self {
            Self::Single => count == 1,
            Self::Multiple => count >= 1,
        }
    }
}

impl fmt::Display for DialogueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Multiple => f.write_str("multiple"),
        }
    }
}

/// One outbound edge slot of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    text: String,
    target_node_id: Option<NodeId>,
}

impl Choice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_node_id: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn target_node_id(&self) -> Option<&NodeId> {
        self.target_node_id.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.target_node_id.is_some()
    }

    pub(crate) fn set_target_node_id(&mut self, target_node_id: Option<NodeId>) {
        self.target_node_id = target_node_id;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogueNode {
    node_id: NodeId,
    name: String,
    text: String,
    kind: DialogueKind,
    choices: Vec<Choice>,
    group_id: Option<GroupId>,
    position: Position,
}

impl DialogueNode {
    /// Builds a node with the kind's default choice set.
    pub fn new(
        node_id: NodeId,
        kind: DialogueKind,
        name: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            node_id,
            name: name.into(),
            text: DEFAULT_NODE_TEXT.to_owned(),
            kind,
            choices: vec![Choice::new(kind.default_choice_text())],
            group_id: None,
            position,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn kind(&self) -> DialogueKind {
        self.kind
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub(crate) fn choices_mut(&mut self) -> &mut Vec<Choice> {
        &mut self.choices
    }

    pub fn group_id(&self) -> Option<&GroupId> {
        self.group_id.as_ref()
    }

    pub(crate) fn set_group_id(&mut self, group_id: Option<GroupId>) {
        self.group_id = group_id;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Ids of every node this node's choices point at, in choice order.
    pub fn target_node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.choices.iter().filter_map(Choice::target_node_id)
    }
}

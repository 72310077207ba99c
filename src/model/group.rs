// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::GroupId;
use super::node::Position;

pub const DEFAULT_GROUP_NAME: &str = "DialogueGroup";

/// A named container of nodes. Membership is stored on the node side (`DialogueNode::group_id`).
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueGroup {
    group_id: GroupId,
    name: String,
    position: Position,
}

impl DialogueGroup {
    pub fn new(group_id: GroupId, name: impl Into<String>, position: Position) -> Self {
        Self {
            group_id,
            name: name.into(),
            position,
        }
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

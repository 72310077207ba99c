// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A dialogue graph holds nodes (with their outbound choices) and groups, keyed by stable ids.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod graph;
pub mod group;
pub mod ids;
pub mod name;
pub mod node;

pub use graph::DialogueGraph;
pub use group::{DialogueGroup, DEFAULT_GROUP_NAME};
pub use ids::{GroupId, Id, IdError, NodeId};
pub use name::{name_key, sanitize_name};
pub use node::{
    Choice, DialogueKind, DialogueNode, Position, DEFAULT_MULTIPLE_CHOICE_TEXT, DEFAULT_NODE_NAME,
    DEFAULT_NODE_TEXT, DEFAULT_SINGLE_CHOICE_TEXT,
};

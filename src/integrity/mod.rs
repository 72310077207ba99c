// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Duplicate-name bookkeeping for nodes and groups.
//!
//! Names are compared case-insensitively inside a scope: ungrouped nodes share one scope, the
//! nodes of each group share that group's scope, and all group names share a global scope. The
//! tracker keeps a single error counter across every scope; it moves by exactly one step per
//! `register`/`deregister` call and drives a [`SaveGate`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::model::{name_key, GroupId, NodeId};

/// An element whose name is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    Node(NodeId),
    Group(GroupId),
}

/// A case-insensitive namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NameScope {
    UngroupedNodes,
    GroupNodes(GroupId),
    Groups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const MARKER_PALETTE: [MarkerColor; 8] = [
    MarkerColor { r: 0xe0, g: 0x4f, b: 0x5f },
    MarkerColor { r: 0xf2, g: 0x9e, b: 0x4c },
    MarkerColor { r: 0xd8, g: 0xc8, b: 0x3b },
    MarkerColor { r: 0x6c, g: 0xc0, b: 0x4a },
    MarkerColor { r: 0x3b, g: 0xb2, b: 0xc8 },
    MarkerColor { r: 0x4a, g: 0x74, b: 0xe0 },
    MarkerColor { r: 0x9b, g: 0x59, b: 0xd0 },
    MarkerColor { r: 0xd0, g: 0x59, b: 0xa8 },
];

/// Collision highlight shared by every entity that currently uses the same name in a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorMarker {
    color: MarkerColor,
}

impl ErrorMarker {
    fn for_key(key: &str) -> Self {
        // FNV-1a keeps the colour stable across runs for the same name.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in key.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        let index = (hash % MARKER_PALETTE.len() as u64) as usize;
        Self {
            color: MARKER_PALETTE[index],
        }
    }

    pub fn color(&self) -> MarkerColor {
        self.color
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NameEntry {
    entities: Vec<EntityKey>,
    marker: ErrorMarker,
}

/// Enables or disables saving as the error counter crosses between 0 and 1.
///
/// The gate reacts to the literal values 0 and 1 only. Because the counter moves one step at a
/// time, every 0->1 crossing disables saving and every 1->0 crossing enables it; values above 1
/// leave the gate where it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveGate {
    enabled: bool,
    disabled_transitions: u64,
    enabled_transitions: u64,
}

impl Default for SaveGate {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_transitions: 0,
            enabled_transitions: 0,
        }
    }
}

impl SaveGate {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of times saving went from allowed to blocked.
    pub fn disabled_transitions(&self) -> u64 {
        self.disabled_transitions
    }

    /// Number of times saving went from blocked to allowed.
    pub fn enabled_transitions(&self) -> u64 {
        self.enabled_transitions
    }

    fn observe(&mut self, error_count: usize) {
        if error_count == 0 && !self.enabled {
            self.enabled = true;
            self.enabled_transitions += 1;
            debug!("saving enabled");
        }

        if error_count == 1 && self.enabled {
            self.enabled = false;
            self.disabled_transitions += 1;
            debug!("saving disabled");
        }
    }
}

/// One name currently held by two or more entities of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub scope: NameScope,
    pub name_key: String,
    pub entities: Vec<EntityKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIntegrityTracker {
    ungrouped_nodes: BTreeMap<String, NameEntry>,
    grouped_nodes: BTreeMap<GroupId, BTreeMap<String, NameEntry>>,
    groups: BTreeMap<String, NameEntry>,
    blank: BTreeSet<EntityKey>,
    markers: BTreeMap<EntityKey, ErrorMarker>,
    error_count: usize,
    gate: SaveGate,
}

impl NameIntegrityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn save_allowed(&self) -> bool {
        self.gate.is_enabled()
    }

    pub fn gate(&self) -> &SaveGate {
        &self.gate
    }

    /// The collision marker currently applied to `entity`, if any.
    pub fn marker(&self, entity: &EntityKey) -> Option<ErrorMarker> {
        self.markers.get(entity).copied()
    }

    pub fn is_blank(&self, entity: &EntityKey) -> bool {
        self.blank.contains(entity)
    }

    /// Entities registered under `name` in `scope`, in registration order.
    pub fn entities(&self, scope: &NameScope, name: &str) -> &[EntityKey] {
        self.scope_map(scope)
            .and_then(|map| map.get(&name_key(name)))
            .map(|entry| entry.entities.as_slice())
            .unwrap_or(&[])
    }

    pub fn collisions(&self) -> Vec<NameCollision> {
        let mut out = Vec::new();
        let mut push_scope = |scope: NameScope, map: &BTreeMap<String, NameEntry>| {
            for (key, entry) in map {
                if entry.entities.len() >= 2 {
                    out.push(NameCollision {
                        scope: scope.clone(),
                        name_key: key.clone(),
                        entities: entry.entities.clone(),
                    });
                }
            }
        };

        push_scope(NameScope::UngroupedNodes, &self.ungrouped_nodes);
        for (group_id, map) in &self.grouped_nodes {
            push_scope(NameScope::GroupNodes(group_id.clone()), map);
        }
        push_scope(NameScope::Groups, &self.groups);
        out
    }

    /// Records that `entity` now uses `name` inside `scope`.
    pub fn register(&mut self, scope: &NameScope, entity: &EntityKey, name: &str) {
        if name.is_empty() {
            if self.blank.insert(entity.clone()) {
                debug!(?entity, "blank name registered");
                self.increment();
            }
            return;
        }

        let key = name_key(name);
        let map = self.scope_map_mut(scope);
        if !map.contains_key(&key) {
            let marker = ErrorMarker::for_key(&key);
            map.insert(
                key,
                NameEntry {
                    entities: vec![entity.clone()],
                    marker,
                },
            );
            return;
        }
        let Some(entry) = map.get_mut(&key) else {
            return;
        };

        if entry.entities.contains(entity) {
            warn!(?entity, ?scope, name = %key, "entity registered twice under the same name");
            return;
        }

        entry.entities.push(entity.clone());
        let marker = entry.marker;
        let first = entry.entities[0].clone();
        let crossed = entry.entities.len() == 2;

        self.markers.insert(entity.clone(), marker);
        if crossed {
            debug!(?scope, name = %key, "duplicate name");
            self.markers.insert(first, marker);
            self.increment();
        }
    }

    /// Records that `entity` no longer uses `name` inside `scope`.
    pub fn deregister(&mut self, scope: &NameScope, entity: &EntityKey, name: &str) {
        if name.is_empty() {
            if self.blank.remove(entity) {
                debug!(?entity, "blank name cleared");
                self.decrement();
            } else {
                warn!(?entity, "deregistering a blank name that was never registered");
            }
            return;
        }

        let key = name_key(name);
        let Some(entry) = self.existing_scope_map_mut(scope).and_then(|map| map.get_mut(&key))
        else {
            warn!(?entity, ?scope, name = %key, "deregistering an unknown name");
            return;
        };
        let Some(position) = entry.entities.iter().position(|candidate| candidate == entity) else {
            warn!(?entity, ?scope, name = %key, "entity does not use this name");
            return;
        };

        entry.entities.remove(position);
        let remaining = entry.entities.len();
        let survivor = entry.entities.first().cloned();
        if remaining == 0 {
            if let Some(map) = self.existing_scope_map_mut(scope) {
                map.remove(&key);
            }
            if let NameScope::GroupNodes(group_id) = scope {
                if self.grouped_nodes.get(group_id).is_some_and(BTreeMap::is_empty) {
                    self.grouped_nodes.remove(group_id);
                }
            }
        }

        self.markers.remove(entity);
        if remaining == 1 {
            if let Some(survivor) = survivor {
                self.markers.remove(&survivor);
            }
            self.decrement();
        }
    }

    /// Drops every registration and forces the counter back to zero.
    pub fn clear(&mut self) {
        self.ungrouped_nodes.clear();
        self.grouped_nodes.clear();
        self.groups.clear();
        self.blank.clear();
        self.markers.clear();
        self.error_count = 0;
        self.gate.observe(0);
    }

    fn increment(&mut self) {
        self.error_count += 1;
        self.gate.observe(self.error_count);
    }

    fn decrement(&mut self) {
        let Some(next) = self.error_count.checked_sub(1) else {
            warn!("name error counter would drop below zero");
            return;
        };
        self.error_count = next;
        self.gate.observe(self.error_count);
    }

    fn scope_map(&self, scope: &NameScope) -> Option<&BTreeMap<String, NameEntry>> {
        match scope {
            NameScope::UngroupedNodes => Some(&self.ungrouped_nodes),
            NameScope::GroupNodes(group_id) => self.grouped_nodes.get(group_id),
            NameScope::Groups => Some(&self.groups),
        }
    }

    fn existing_scope_map_mut(
        &mut self,
        scope: &NameScope,
    ) -> Option<&mut BTreeMap<String, NameEntry>> {
        match scope {
            NameScope::UngroupedNodes => Some(&mut self.ungrouped_nodes),
            NameScope::GroupNodes(group_id) => self.grouped_nodes.get_mut(group_id),
            NameScope::Groups => Some(&mut self.groups),
        }
    }

    fn scope_map_mut(&mut self, scope: &NameScope) -> &mut BTreeMap<String, NameEntry> {
        match scope {
            NameScope::UngroupedNodes => &mut self.ungrouped_nodes,
            NameScope::GroupNodes(group_id) => {
                self.grouped_nodes.entry(group_id.clone()).or_default()
            }
            NameScope::Groups => &mut self.groups,
        }
    }
}

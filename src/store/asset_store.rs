// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::compiled::{
    CompiledAsset, CompiledChoice, DialogueContainer, DialogueRecord, RecordRef,
};
use super::snapshot::{DialogueKindJson, GraphSnapshot};
use crate::model::{sanitize_name, DialogueGraph, DialogueKind, GroupId, IdError, NodeId};
use crate::ops::GraphModel;

const GRAPHS_DIR: &str = "Graphs";
const DIALOGUES_DIR: &str = "Dialogues";
const GLOBAL_DIR: &str = "Global";
const GROUPS_DIR: &str = "Groups";
const RECORDS_DIR: &str = "Dialogues";
const SNAPSHOT_SUFFIX: &str = "Graph";
const ASSET_EXTENSION: &str = "json";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidName {
        field: &'static str,
        value: String,
    },
    SnapshotNotFound {
        file_name: String,
        path: PathBuf,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    DuplicateId {
        field: &'static str,
        value: String,
    },
    DuplicateName {
        group: Option<String>,
        name: String,
    },
    DanglingReference {
        node_id: NodeId,
        choice_index: usize,
        target_node_id: NodeId,
    },
    DanglingGroup {
        node_id: NodeId,
        group_id: GroupId,
    },
    InvalidChoiceCount {
        node_id: NodeId,
        kind: DialogueKind,
        count: usize,
    },
    PathOutsideStore {
        root: PathBuf,
        path: PathBuf,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidName { field, value } => write!(f, "invalid {field}: {value:?}"),
            Self::SnapshotNotFound { file_name, path } => {
                write!(f, "no saved dialogue graph named {file_name:?} (looked at {path:?})")
            }
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::DuplicateId { field, value } => write!(f, "duplicate id for {field}: {value:?}"),
            Self::DuplicateName { group, name } => match group {
                Some(group) => write!(f, "dialogue name {name:?} is used twice in group {group:?}"),
                None => write!(f, "name {name:?} is used twice"),
            },
            Self::DanglingReference {
                node_id,
                choice_index,
                target_node_id,
            } => write!(
                f,
                "choice {choice_index} of node {node_id} leads to missing node {target_node_id}"
            ),
            Self::DanglingGroup { node_id, group_id } => {
                write!(f, "node {node_id} belongs to missing group {group_id}")
            }
            Self::InvalidChoiceCount {
                node_id,
                kind,
                count,
            } => write!(f, "{kind} node {node_id} cannot have {count} choices"),
            Self::PathOutsideStore { root, path } => {
                write!(f, "path is outside the asset store: root={root:?} path={path:?}")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidName { .. }
            | Self::SnapshotNotFound { .. }
            | Self::DuplicateId { .. }
            | Self::DuplicateName { .. }
            | Self::DanglingReference { .. }
            | Self::DanglingGroup { .. }
            | Self::InvalidChoiceCount { .. }
            | Self::PathOutsideStore { .. }
            | Self::SymlinkRefused { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// What a save did to each artifact, as paths relative to the store root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub file_name: String,
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl SaveReport {
    /// `true` when nothing on disk was created, rewritten or deleted.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    fn record(&mut self, path: PathBuf, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Created => self.created.push(path),
            WriteOutcome::Updated => self.updated.push(path),
            WriteOutcome::Unchanged => self.unchanged.push(path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Directory tree holding snapshots and compiled assets, keyed by file name.
///
/// ```text
/// <root>/Graphs/<file>Graph.json
/// <root>/Dialogues/<file>/<file>.json
/// <root>/Dialogues/<file>/Global/Dialogues/<dialogue>.json
/// <root>/Dialogues/<file>/Groups/<group>/<group>.json
/// <root>/Dialogues/<file>/Groups/<group>/Dialogues/<dialogue>.json
/// ```
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
    durability: WriteDurability,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self, file_name: &str) -> PathBuf {
        self.root
            .join(GRAPHS_DIR)
            .join(format!("{file_name}{SNAPSHOT_SUFFIX}.{ASSET_EXTENSION}"))
    }

    pub fn container_path(&self, file_name: &str) -> PathBuf {
        self.asset_dir(file_name).join(asset_file(file_name))
    }

    pub fn group_dir(&self, file_name: &str, group_name: &str) -> PathBuf {
        self.asset_dir(file_name).join(GROUPS_DIR).join(group_name)
    }

    pub fn group_asset_path(&self, file_name: &str, group_name: &str) -> PathBuf {
        self.group_dir(file_name, group_name).join(asset_file(group_name))
    }

    pub fn record_path(&self, file_name: &str, record_ref: &RecordRef) -> PathBuf {
        let dir = match record_ref.group() {
            Some(group_name) => self.group_dir(file_name, group_name),
            None => self.asset_dir(file_name).join(GLOBAL_DIR),
        };
        dir.join(RECORDS_DIR).join(asset_file(record_ref.name()))
    }

    fn asset_dir(&self, file_name: &str) -> PathBuf {
        self.root.join(DIALOGUES_DIR).join(file_name)
    }

    /// Writes the snapshot and compiled assets for `graph` under `file_name`.
    ///
    /// Artifacts for groups and dialogues that the previous save of `file_name` produced but
    /// `graph` no longer has are deleted first. Group artifacts are written before dialogue
    /// records, the container and snapshot last. Files whose bytes would not change are left
    /// alone. A previous snapshot that does not parse is overwritten, with no cleanup baseline.
    pub fn save(&self, file_name: &str, graph: &DialogueGraph) -> Result<SaveReport, StoreError> {
        validate_file_name(file_name)?;

        let compiled = CompiledAsset::compile(file_name, graph)?;
        let snapshot = GraphSnapshot::from_graph(file_name, graph);
        let previous = match self.load_snapshot(file_name) {
            Ok(previous) => Some(previous),
            Err(StoreError::SnapshotNotFound { .. }) => None,
            Err(StoreError::Json { path, source }) => {
                warn!(
                    file_name,
                    path = %path.display(),
                    error = %source,
                    "unreadable snapshot overwritten without stale-artifact cleanup"
                );
                None
            }
            Err(err) => return Err(err),
        };

        let mut report = SaveReport {
            file_name: file_name.to_owned(),
            ..SaveReport::default()
        };

        if let Some(previous) = previous.as_ref() {
            for stale in previous.old_group_names.difference(&snapshot.old_group_names) {
                let dir = self.group_dir(file_name, stale);
                if remove_dir_in_store(&self.root, &dir)? {
                    debug!(file_name, group = %stale, "stale group removed");
                    report.removed.push(self.relative(&dir));
                }
            }
        }

        for group_name in &compiled.container().group_names {
            let json = GroupAssetJson {
                group_name: group_name.clone(),
            };
            self.write_json(&self.group_asset_path(file_name, group_name), &json, &mut report)?;
        }

        if let Some(previous) = previous.as_ref() {
            let stale_ungrouped = previous
                .old_ungrouped_node_names
                .difference(&snapshot.old_ungrouped_node_names)
                .map(RecordRef::ungrouped);
            let stale_grouped = previous
                .old_grouped_node_names
                .iter()
                .filter(|(group_name, _)| snapshot.old_group_names.contains(*group_name))
                .flat_map(|(group_name, old_names)| {
                    let current = snapshot.old_grouped_node_names.get(group_name);
                    old_names
                        .iter()
                        .filter(move |name| !current.is_some_and(|current| current.contains(*name)))
                        .map(move |name| RecordRef::grouped(group_name.clone(), name.clone()))
                });

            for stale in stale_ungrouped.chain(stale_grouped) {
                let path = self.record_path(file_name, &stale);
                if remove_file_in_store(&self.root, &path)? {
                    debug!(file_name, dialogue = %stale, "stale dialogue removed");
                    report.removed.push(self.relative(&path));
                }
            }
        }

        for (record_ref, record) in compiled.records() {
            let json = dialogue_record_to_json(record);
            self.write_json(&self.record_path(file_name, record_ref), &json, &mut report)?;
        }

        let container = dialogue_container_to_json(compiled.container());
        self.write_json(&self.container_path(file_name), &container, &mut report)?;
        self.write_json(&self.snapshot_path(file_name), &snapshot, &mut report)?;

        info!(
            file_name,
            nodes = graph.nodes().len(),
            groups = graph.groups().len(),
            created = report.created.len(),
            updated = report.updated.len(),
            removed = report.removed.len(),
            "dialogue graph saved"
        );
        Ok(report)
    }

    /// Rebuilds an editable model from the snapshot saved under `file_name`, with every name
    /// registered as if freshly authored.
    pub fn load(&self, file_name: &str) -> Result<GraphModel, StoreError> {
        validate_file_name(file_name)?;

        let graph = self.load_snapshot(file_name)?.into_graph()?;
        let model = GraphModel::from_graph(graph);

        info!(
            file_name,
            nodes = model.graph().nodes().len(),
            groups = model.graph().groups().len(),
            name_errors = model.name_errors(),
            "dialogue graph loaded"
        );
        Ok(model)
    }

    pub fn load_snapshot(&self, file_name: &str) -> Result<GraphSnapshot, StoreError> {
        let path = self.snapshot_path(file_name);
        let json = read_artifact(&path, file_name)?;
        serde_json::from_str(&json).map_err(|source| StoreError::Json { path, source })
    }

    /// Reads back the compiled container and every record it lists.
    pub fn load_compiled(&self, file_name: &str) -> Result<CompiledAsset, StoreError> {
        validate_file_name(file_name)?;

        let container_path = self.container_path(file_name);
        let json = read_artifact(&container_path, file_name)?;
        let container_json: DialogueContainerJson =
            serde_json::from_str(&json).map_err(|source| StoreError::Json {
                path: container_path.clone(),
                source,
            })?;
        let container = dialogue_container_from_json(container_json)?;

        let record_refs = container
            .ungrouped_dialogues
            .iter()
            .map(RecordRef::ungrouped)
            .chain(container.grouped_dialogues.iter().flat_map(|(group_name, names)| {
                names.iter().map(move |name| RecordRef::grouped(group_name.clone(), name.clone()))
            }))
            .collect::<Vec<_>>();

        let mut records = BTreeMap::new();
        for record_ref in record_refs {
            let path = self.record_path(file_name, &record_ref);
            let json = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let record_json: DialogueRecordJson =
                serde_json::from_str(&json).map_err(|source| StoreError::Json { path, source })?;
            records.insert(record_ref, dialogue_record_from_json(record_json));
        }

        Ok(CompiledAsset::from_parts(container, records))
    }

    fn write_json<T: Serialize>(
        &self,
        path: &Path,
        value: &T,
        report: &mut SaveReport,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let outcome = write_if_changed(
            &self.root,
            path,
            format!("{json}\n").as_bytes(),
            self.durability,
        )?;
        report.record(self.relative(path), outcome);
        Ok(())
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// File names become directory and file names, so they must already be in sanitized form.
fn validate_file_name(file_name: &str) -> Result<(), StoreError> {
    validate_name_segment("file_name", file_name)
}

fn validate_name_segment(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.is_empty() || sanitize_name(value) != value {
        return Err(StoreError::InvalidName {
            field,
            value: value.to_owned(),
        });
    }
    Ok(())
}

fn asset_file(name: &str) -> String {
    format!("{name}.{ASSET_EXTENSION}")
}

fn read_artifact(path: &Path, file_name: &str) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(json),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(StoreError::SnapshotNotFound {
                file_name: file_name.to_owned(),
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

include!("asset_store/helpers.rs");

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use dialogue_graph::model::{DialogueKind, Position};
use dialogue_graph::ops::GraphModel;
use dialogue_graph::query::compiled::{follow_choice, ungrouped_dialogue_names};
use dialogue_graph::session::{demo_session, EditorSession, SessionError};
use dialogue_graph::store::{AssetStore, GraphSnapshot, RecordRef, StoreError};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("dialogue-graph-it-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn start_end_model() -> GraphModel {
    let mut model = GraphModel::new();
    let start = model.add_node(DialogueKind::Single, "Start", Position::new(0.0, 0.0));
    let end = model.add_node(DialogueKind::Single, "End", Position::new(300.0, 0.0));
    model.connect(&start, 0, &end).unwrap();
    model
}

#[test]
fn saved_start_leads_to_end_in_compiled_records() {
    let tmp = TempDir::new("start-end");
    let store = AssetStore::new(tmp.path().join("Assets"));
    let model = start_end_model();

    store.save("demo", model.graph()).unwrap();
    let asset = store.load_compiled("demo").unwrap();

    let start = asset.record(&RecordRef::ungrouped("Start")).unwrap();
    assert!(start.is_starting_dialogue);
    assert_eq!(start.choices[0].next_dialogue, Some(RecordRef::ungrouped("End")));
    assert!(!asset.record(&RecordRef::ungrouped("End")).unwrap().is_starting_dialogue);
    assert_eq!(
        follow_choice(&asset, &RecordRef::ungrouped("Start"), 0).map(|record| record.name.as_str()),
        Some("End")
    );
    assert_eq!(ungrouped_dialogue_names(&asset, true), ["Start"]);

    let start_id = model.graph().find_node_by_name(None, "Start").unwrap();
    let end_id = model.graph().find_node_by_name(None, "End").unwrap();
    assert!(model.is_starting_node(start_id));
    assert!(!model.is_starting_node(end_id));
}

#[test]
fn duplicate_names_block_the_session_until_fixed() {
    let tmp = TempDir::new("dup");
    let mut session = EditorSession::new(AssetStore::new(tmp.path()));

    let model = session.model_mut();
    let a = model.add_node(DialogueKind::Single, "A", Position::default());
    let b = model.add_node(DialogueKind::Single, "B", Position::default());
    model.rename_node(&a, "Dup").unwrap();
    model.rename_node(&b, "Dup").unwrap();
    assert_eq!(session.model().name_errors(), 1);

    match session.save("Story").unwrap_err() {
        SessionError::SaveBlocked { name_errors } => assert_eq!(name_errors, 1),
        other => panic!("expected SaveBlocked, got: {other:?}"),
    }
    assert!(!session.store().snapshot_path("Story").exists());

    session.model_mut().rename_node(&b, "Unique").unwrap();
    assert_eq!(session.model().name_errors(), 0);
    session.save("Story").unwrap();
    assert!(session.store().snapshot_path("Story").exists());
}

#[test]
fn demo_round_trips_through_a_fresh_session() {
    let tmp = TempDir::new("round-trip");
    let mut writer = demo_session(AssetStore::new(tmp.path())).unwrap();
    writer.save("Forest Walk").unwrap();
    assert_eq!(writer.file_name(), "ForestWalk");

    let mut reader = EditorSession::new(AssetStore::new(tmp.path()));
    reader.load("ForestWalk").unwrap();

    assert_eq!(reader.model().graph(), writer.model().graph());
    assert_eq!(reader.file_name(), "ForestWalk");
    assert!(reader.model().save_allowed());

    let again = reader.save("ForestWalk").unwrap();
    assert!(again.is_noop(), "unexpected writes: {again:?}");
}

#[test]
fn renaming_a_group_moves_its_records() {
    let tmp = TempDir::new("rename-group");
    let store = AssetStore::new(tmp.path());
    let mut model = GraphModel::new();
    let hello = model.add_node(DialogueKind::Single, "Hello", Position::default());
    let intro = model
        .add_group_with_members("Intro", Position::default(), &[hello.clone()])
        .unwrap();
    store.save("Story", model.graph()).unwrap();
    let old_record = store.record_path("Story", &RecordRef::grouped("Intro", "Hello"));
    assert!(old_record.exists());

    model.rename_group(&intro, "Prologue").unwrap();
    let report = store.save("Story", model.graph()).unwrap();

    assert!(!old_record.exists());
    assert!(!store.group_dir("Story", "Intro").exists());
    assert!(store.record_path("Story", &RecordRef::grouped("Prologue", "Hello")).exists());
    assert!(!report.removed.is_empty());

    let container = store.load_compiled("Story").unwrap();
    assert_eq!(
        container.container().group_names.iter().collect::<Vec<_>>(),
        ["Prologue"]
    );
}

#[test]
fn loading_an_unknown_file_name_fails_cleanly() {
    let tmp = TempDir::new("missing");
    let mut session = demo_session(AssetStore::new(tmp.path())).unwrap();
    let before = session.model().graph().clone();

    match session.load("Nothing").unwrap_err() {
        SessionError::Store(StoreError::SnapshotNotFound { file_name, .. }) => {
            assert_eq!(file_name, "Nothing");
        }
        other => panic!("expected SnapshotNotFound, got: {other:?}"),
    }
    assert_eq!(session.model().graph(), &before);
}

#[test]
fn snapshot_with_a_dangling_target_is_rejected() {
    let tmp = TempDir::new("dangling");
    let store = AssetStore::new(tmp.path());
    store.save("demo", start_end_model().graph()).unwrap();

    let path = store.snapshot_path("demo");
    let mut snapshot: GraphSnapshot =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let choice = snapshot
        .nodes
        .iter_mut()
        .flat_map(|node| node.choices.iter_mut())
        .find(|choice| !choice.target_node_id.is_empty())
        .unwrap();
    choice.target_node_id = "ghost".to_owned();
    std::fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();

    match store.load("demo").unwrap_err() {
        StoreError::DanglingReference { target_node_id, .. } => {
            assert_eq!(target_node_id.as_str(), "ghost");
        }
        other => panic!("expected DanglingReference, got: {other:?}"),
    }
}
